//! PlannerDay - CLI entry point

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, error, info};

use plannerday::cli::{Cli, Command, DelegateOpts, config_arg, generate_after_help, get_log_path};
use plannerday::compose::{ComposeAction, ComposeRunner};
use plannerday::config::Config;
use plannerday::envfile::{EnsureOutcome, EnvTemplate, Secrets, ensure_env_file};
use plannerday::llm::create_client;
use plannerday::planner::PlannerAgent;
use plannerday::tools::{ToolContext, ToolExecutor};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dynamic after_help shows whether the configured container tool is installed
    let raw_args: Vec<String> = std::env::args_os().map(|a| a.to_string_lossy().into_owned()).collect();
    let program = Config::load_quiet(config_arg(&raw_args).as_ref())
        .map(|c| c.compose.program)
        .unwrap_or_else(|| Config::default().compose.program);
    let mut cmd = Cli::command().after_help(generate_after_help(&program));
    let cli = Cli::from_arg_matches(&cmd.clone().get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, program = %config.compose.program, "PlannerDay loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    let Some(command) = cli.command else {
        cmd.print_help()?;
        return Ok(());
    };

    match command {
        Command::Env { path } => cmd_env(&config, path),
        Command::Plan { prompt, max_iterations } => cmd_plan(config, prompt, max_iterations).await,
        delegated => {
            let (action, opts) = delegated
                .compose_action()
                .ok_or_else(|| eyre::eyre!("not a container command: {:?}", delegated))?;
            cmd_compose(&config, action, opts).await
        }
    }
}

/// Delegate to the container tool; its exit status becomes ours
async fn cmd_compose(config: &Config, action: ComposeAction, opts: DelegateOpts) -> Result<()> {
    debug!(action = action.name(), dry_run = opts.dry_run, "cmd_compose: called");
    let runner = ComposeRunner::new(config.compose.clone()).with_dry_run(opts.dry_run);

    if let Err(e) = runner.run(action).await {
        error!(error = %e, "cmd_compose: {} failed", action.name());
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

/// Create the env file from the configured template unless it exists
fn cmd_env(config: &Config, path: Option<PathBuf>) -> Result<()> {
    debug!(?path, "cmd_env: called");
    let template = match path {
        Some(path) => EnvTemplate::new(path, config.env.template.clone()),
        None => config.env.template(),
    }
    .context("Invalid env template")?;

    let outcome = ensure_env_file(&template)
        .with_context(|| format!("Failed to create {}", template.path().display()))?;
    info!(path = %template.path().display(), ?outcome, "cmd_env: done");

    let notice = outcome.notice(template.path());
    match outcome {
        EnsureOutcome::Created => println!("{} {}", "✓".green(), notice),
        EnsureOutcome::AlreadyExists => println!("{} {}", "•".yellow(), notice),
    }
    Ok(())
}

/// Run the day-planning agent and print its answer
async fn cmd_plan(config: Config, prompt: Option<String>, max_iterations: Option<u32>) -> Result<()> {
    debug!(?prompt, ?max_iterations, "cmd_plan: called");
    let template = config.env.template().context("Invalid env template")?;
    let secrets = Secrets::load(template).context("Failed to read env file")?;

    let llm = create_client(&config.llm, secrets.resolve(&config.llm.api_key_env))
        .context("Failed to create LLM client")?;
    let ctx = ToolContext::from_config(&config, &secrets).context("Failed to create HTTP client")?;

    let mut agent_config = config.agent.clone();
    if let Some(max) = max_iterations {
        agent_config.max_iterations = max;
    }
    let prompt = prompt.unwrap_or_else(|| agent_config.prompt.clone());

    let agent = PlannerAgent::new(llm, ToolExecutor::planner(), ctx, agent_config).with_max_tokens(config.llm.max_tokens);
    let run = match agent.run(&prompt).await {
        Ok(run) => run,
        Err(e) => {
            if let Some(wait) = e.retry_after() {
                eprintln!(
                    "{} The LLM provider is rate limiting requests; try again in {}s",
                    "!".yellow(),
                    wait.as_secs()
                );
            }
            return Err(e).context("Planning failed");
        }
    };
    info!(
        iterations = run.iterations,
        input_tokens = run.usage.input_tokens,
        output_tokens = run.usage.output_tokens,
        "cmd_plan: done"
    );

    println!("Response: {}", run.output);
    Ok(())
}
