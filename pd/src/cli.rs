//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::compose::ComposeAction;

/// Environment variable that overrides the log directory
pub const LOG_DIR_ENV: &str = "PLANNERDAY_LOG_DIR";

/// PlannerDay - weather-aware day planner and container helper
#[derive(Parser)]
#[command(
    name = "pd",
    about = "Weather-aware day planning agent and its container lifecycle commands",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the application's container image
    Build {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Start the application's containers in the background
    Run {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Stop and remove the application's containers
    Stop {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Stop, then remove containers, images and volumes, and prune the system
    Clean {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Stream container logs
    Logs {
        /// Print current logs and exit instead of following
        #[arg(long)]
        no_follow: bool,

        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Open an interactive shell inside the running application container
    Shell {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Run the test suite inside a transient container
    Test {
        #[command(flatten)]
        opts: DelegateOpts,
    },

    /// Create the .env file with placeholder API keys if it does not exist
    Env {
        /// Path of the env file (default from config, then .env)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Ask the agent to plan your day around the local weather
    Plan {
        /// Request to send (default from config)
        prompt: Option<String>,

        /// Maximum LLM calls before giving up
        #[arg(short, long)]
        max_iterations: Option<u32>,
    },
}

/// Flags shared by the container commands
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct DelegateOpts {
    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl Command {
    /// Compose action and options for container commands
    pub fn compose_action(&self) -> Option<(ComposeAction, DelegateOpts)> {
        debug!(command = ?self, "Command::compose_action: called");
        match self {
            Self::Build { opts } => Some((ComposeAction::Build, *opts)),
            Self::Run { opts } => Some((ComposeAction::Run, *opts)),
            Self::Stop { opts } => Some((ComposeAction::Stop, *opts)),
            Self::Clean { opts } => Some((ComposeAction::Clean, *opts)),
            Self::Logs { no_follow, opts } => Some((ComposeAction::Logs { follow: !no_follow }, *opts)),
            Self::Shell { opts } => Some((ComposeAction::Shell, *opts)),
            Self::Test { opts } => Some((ComposeAction::Test, *opts)),
            Self::Env { .. } | Self::Plan { .. } => None,
        }
    }
}

/// Result of checking a required tool
pub struct ToolCheck {
    pub name: String,
    pub available: bool,
    pub version: Option<String>,
}

impl ToolCheck {
    /// Check if a tool is available and get its version
    pub fn check(name: &str, version_args: &[&str]) -> Self {
        debug!(name, ?version_args, "ToolCheck::check: called");
        let result = std::process::Command::new(name).args(version_args).output();

        match result {
            Ok(output) if output.status.success() => {
                debug!(name, "ToolCheck::check: tool available");
                let version_str = String::from_utf8_lossy(&output.stdout);
                Self {
                    name: name.to_string(),
                    available: true,
                    version: Some(parse_version(&version_str)),
                }
            }
            _ => {
                debug!(name, "ToolCheck::check: tool not available");
                Self {
                    name: name.to_string(),
                    available: false,
                    version: None,
                }
            }
        }
    }
}

/// Parse version from command output (extracts first version-like string)
fn parse_version(output: &str) -> String {
    // "Docker version 27.3.1, build ce12230" -> "27.3.1"
    for word in output.split_whitespace() {
        let word = word.trim_start_matches('v');
        if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            let version: String = word.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
            let version = version.trim_end_matches('.');
            if !version.is_empty() {
                return version.to_string();
            }
        }
    }
    "unknown".to_string()
}

/// Check the container tooling the delegated commands need
pub fn check_required_tools(program: &str) -> Vec<ToolCheck> {
    debug!(program, "check_required_tools: called");
    vec![ToolCheck::check(program, &["--version"])]
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let dir = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plannerday")
            .join("logs"),
    };
    let path = dir.join("plannerday.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Value of `-c/--config` in raw arguments, read before clap parses them
pub fn config_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" => break,
            "-c" | "--config" => return iter.next().map(PathBuf::from),
            _ => {
                if let Some(value) = arg.strip_prefix("--config=") {
                    return Some(PathBuf::from(value));
                }
                if let Some(value) = arg.strip_prefix("-c")
                    && !value.is_empty()
                {
                    return Some(PathBuf::from(value.strip_prefix('=').unwrap_or(value)));
                }
            }
        }
    }
    None
}

/// Generate the after_help text with tool checks and the log location
pub fn generate_after_help(program: &str) -> String {
    debug!(program, "generate_after_help: called");
    let tools = check_required_tools(program);
    let mut help = String::new();

    help.push_str("Required Tools:\n");
    for tool in &tools {
        let icon = if tool.available { "\u{2705}" } else { "\u{274C}" };
        let version = tool.version.as_deref().unwrap_or("not found");
        help.push_str(&format!("  {} {:<10} {}\n", icon, tool.name, version));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["pd"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::parse_from(["pd", "build"]);
        assert!(matches!(
            cli.command,
            Some(Command::Build {
                opts: DelegateOpts { dry_run: false }
            })
        ));
    }

    #[test]
    fn test_cli_parse_dry_run() {
        let cli = Cli::parse_from(["pd", "clean", "--dry-run"]);
        let (action, opts) = cli.command.unwrap().compose_action().unwrap();
        assert_eq!(action, ComposeAction::Clean);
        assert!(opts.dry_run);
    }

    #[test]
    fn test_cli_parse_logs() {
        let cli = Cli::parse_from(["pd", "logs"]);
        let (action, _) = cli.command.unwrap().compose_action().unwrap();
        assert_eq!(action, ComposeAction::Logs { follow: true });

        let cli = Cli::parse_from(["pd", "logs", "--no-follow"]);
        let (action, _) = cli.command.unwrap().compose_action().unwrap();
        assert_eq!(action, ComposeAction::Logs { follow: false });
    }

    #[test]
    fn test_cli_parse_each_delegate() {
        for (name, expected) in [
            ("run", ComposeAction::Run),
            ("stop", ComposeAction::Stop),
            ("shell", ComposeAction::Shell),
            ("test", ComposeAction::Test),
        ] {
            let cli = Cli::parse_from(["pd", name]);
            let (action, _) = cli.command.unwrap().compose_action().unwrap();
            assert_eq!(action, expected);
        }
    }

    #[test]
    fn test_cli_parse_env() {
        let cli = Cli::parse_from(["pd", "env"]);
        assert!(matches!(cli.command, Some(Command::Env { path: None })));

        let cli = Cli::parse_from(["pd", "env", "--path", "deploy/.env"]);
        match cli.command {
            Some(Command::Env { path: Some(path) }) => assert_eq!(path, PathBuf::from("deploy/.env")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from(["pd", "plan", "What should I do tonight?", "--max-iterations", "4"]);
        match cli.command {
            Some(Command::Plan { prompt, max_iterations }) => {
                assert_eq!(prompt.as_deref(), Some("What should I do tonight?"));
                assert_eq!(max_iterations, Some(4));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::parse_from(["pd", "plan"]).command.unwrap().compose_action().is_none());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["pd", "env", "-c", "/tmp/pd.yml", "-l", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pd.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["pd", "deploy"]).is_err());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("Docker version 27.3.1, build ce12230"), "27.3.1");
        assert_eq!(parse_version("podman version 5.2.0"), "5.2.0");
        assert_eq!(parse_version("v1.2.3"), "1.2.3");
        assert_eq!(parse_version("no version here"), "unknown");
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_arg() {
        assert_eq!(config_arg(&args(&["pd", "build"])), None);
        assert_eq!(config_arg(&args(&["pd", "-c", "a.yml", "build"])), Some(PathBuf::from("a.yml")));
        assert_eq!(config_arg(&args(&["pd", "build", "--config", "b.yml"])), Some(PathBuf::from("b.yml")));
        assert_eq!(config_arg(&args(&["pd", "--config=c.yml"])), Some(PathBuf::from("c.yml")));
        assert_eq!(config_arg(&args(&["pd", "-cd.yml"])), Some(PathBuf::from("d.yml")));
        assert_eq!(config_arg(&args(&["pd", "plan", "--", "-c", "x"])), None);
        assert_eq!(config_arg(&args(&["pd", "-c"])), None);
    }

    #[test]
    fn test_after_help_checks_configured_program() {
        let help = generate_after_help("pd-no-such-container-tool");
        assert!(help.contains("pd-no-such-container-tool"));
        assert!(help.contains("not found"));
        assert!(help.contains("Logs are written to:"));
    }

    #[test]
    fn test_missing_tool_check() {
        let check = ToolCheck::check("pd-definitely-not-installed", &["--version"]);
        assert!(!check.available);
        assert!(check.version.is_none());
    }
}
