//! Lifecycle actions and the command lines they expand to

use std::fmt;

use tracing::debug;

use crate::config::ComposeConfig;

/// One external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Container lifecycle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// Build the application image
    Build,
    /// Start containers in the background
    Run,
    /// Stop and remove containers
    Stop,
    /// Stop, then remove containers and images and prune the system
    Clean,
    /// Stream container logs
    Logs { follow: bool },
    /// Interactive shell in the running application container
    Shell,
    /// Test suite in a throwaway container
    Test,
}

impl ComposeAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
            Self::Stop => "stop",
            Self::Clean => "clean",
            Self::Logs { .. } => "logs",
            Self::Shell => "shell",
            Self::Test => "test",
        }
    }

    /// Expand into the ordered invocations that implement this action
    pub fn invocations(&self, config: &ComposeConfig) -> Vec<Invocation> {
        debug!(action = self.name(), "ComposeAction::invocations: called");
        let compose = |extra: &[&str]| {
            let mut args = compose_prefix(config);
            args.extend(extra.iter().map(|s| s.to_string()));
            Invocation::new(config.program.clone(), args)
        };

        match self {
            Self::Build => vec![compose(&["build"])],
            Self::Run => vec![compose(&["up", "-d"])],
            Self::Stop => vec![compose(&["down"])],
            Self::Clean => {
                let mut steps = Self::Stop.invocations(config);
                steps.push(compose(&["rm", "-f"]));
                steps.push(compose(&["down", "--rmi", "all", "--volumes"]));
                steps.push(Invocation::new(config.program.clone(), ["system", "prune", "-f"]));
                steps
            }
            Self::Logs { follow: true } => vec![compose(&["logs", "-f"])],
            Self::Logs { follow: false } => vec![compose(&["logs"])],
            Self::Shell => vec![compose(&["exec", config.service.as_str(), config.shell.as_str()])],
            Self::Test => {
                let mut inv = compose(&["run", "--rm", config.service.as_str()]);
                inv.args.extend(config.test_command.iter().cloned());
                vec![inv]
            }
        }
    }
}

/// `compose [-f FILE] [-p PROJECT]`
fn compose_prefix(config: &ComposeConfig) -> Vec<String> {
    let mut args = vec!["compose".to_string()];
    if let Some(file) = &config.file {
        args.push("-f".to_string());
        args.push(file.display().to_string());
    }
    if let Some(project) = &config.project_name {
        args.push("-p".to_string());
        args.push(project.clone());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lines(action: ComposeAction, config: &ComposeConfig) -> Vec<String> {
        action.invocations(config).iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_simple_actions() {
        let config = ComposeConfig::default();
        assert_eq!(lines(ComposeAction::Build, &config), vec!["docker compose build"]);
        assert_eq!(lines(ComposeAction::Run, &config), vec!["docker compose up -d"]);
        assert_eq!(lines(ComposeAction::Stop, &config), vec!["docker compose down"]);
        assert_eq!(
            lines(ComposeAction::Logs { follow: true }, &config),
            vec!["docker compose logs -f"]
        );
        assert_eq!(
            lines(ComposeAction::Logs { follow: false }, &config),
            vec!["docker compose logs"]
        );
    }

    #[test]
    fn test_clean_stops_first() {
        let config = ComposeConfig::default();
        assert_eq!(
            lines(ComposeAction::Clean, &config),
            vec![
                "docker compose down",
                "docker compose rm -f",
                "docker compose down --rmi all --volumes",
                "docker system prune -f",
            ]
        );
    }

    #[test]
    fn test_shell_and_test_target_service() {
        let config = ComposeConfig::default();
        assert_eq!(
            lines(ComposeAction::Shell, &config),
            vec!["docker compose exec plannerday-agent /bin/bash"]
        );
        assert_eq!(
            lines(ComposeAction::Test, &config),
            vec!["docker compose run --rm plannerday-agent cargo test"]
        );
    }

    #[test]
    fn test_file_and_project_flags() {
        let config = ComposeConfig {
            program: "podman".to_string(),
            file: Some(PathBuf::from("deploy/compose.yml")),
            project_name: Some("pd".to_string()),
            ..Default::default()
        };
        assert_eq!(
            lines(ComposeAction::Build, &config),
            vec!["podman compose -f deploy/compose.yml -p pd build"]
        );
        // system prune is not a compose subcommand
        assert_eq!(
            lines(ComposeAction::Clean, &config).last().unwrap(),
            "podman system prune -f"
        );
    }

    #[test]
    fn test_action_names() {
        assert_eq!(ComposeAction::Logs { follow: false }.name(), "logs");
        assert_eq!(ComposeAction::Clean.name(), "clean");
    }
}
