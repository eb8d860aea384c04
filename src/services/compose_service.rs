use crate::domain::{ProcessRunner, ProjectSettings};
use crate::services::ServiceCatalog;
use anyhow::{Result, bail};
use std::sync::Arc;

/// Options for `up`.
#[derive(Debug, Clone, Default)]
pub struct UpOptions {
    pub services: Vec<String>,
    /// `service=number` pairs forwarded as `--scale` flags.
    pub scales: Vec<String>,
    pub force_recreate: bool,
}

/// One entry point per proxied subcommand. Each builds the orchestrator
/// argument vector, runs it in the project directory and hands back the
/// orchestrator's own exit code.
pub struct ComposeService {
    settings: ProjectSettings,
    runner: Arc<dyn ProcessRunner>,
    catalog: ServiceCatalog,
}

impl ComposeService {
    pub fn new(settings: ProjectSettings, runner: Arc<dyn ProcessRunner>) -> Self {
        let catalog = ServiceCatalog::new(runner.clone(), settings.binary());
        Self {
            settings,
            runner,
            catalog,
        }
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Create and start containers.
    pub fn up(&self, options: &UpOptions) -> Result<i32> {
        let mut args = vec!["up".to_string(), "-d".to_string(), "--build".to_string()];
        for scale in &options.scales {
            args.push("--scale".to_string());
            args.push(scale.clone());
        }
        if options.force_recreate {
            args.push("--force-recreate".to_string());
        }
        args.extend(options.services.iter().cloned());

        self.compose(args)
    }

    /// Stop and remove containers, networks, images and volumes.
    pub fn down(&self, remove_orphans: bool) -> Result<i32> {
        let mut args = vec!["down".to_string()];
        if remove_orphans {
            args.push("--remove-orphans".to_string());
        }

        self.compose(args)
    }

    pub fn start(&self, services: &[String]) -> Result<i32> {
        self.ensure_known_services(services)?;
        self.forward("start", services)
    }

    pub fn stop(&self, services: &[String]) -> Result<i32> {
        self.ensure_known_services(services)?;
        self.forward("stop", services)
    }

    pub fn restart(&self, services: &[String]) -> Result<i32> {
        self.ensure_known_services(services)?;
        self.forward("restart", services)
    }

    /// List containers. Backs both `ps` and `status`.
    pub fn ps(&self, services: &[String]) -> Result<i32> {
        self.forward("ps", services)
    }

    /// Follow container logs. Blocks until the user interrupts.
    pub fn logs(&self, services: &[String]) -> Result<i32> {
        let mut args = vec!["logs".to_string(), "-f".to_string()];
        args.extend(services.iter().cloned());

        self.compose(args)
    }

    /// Validate and view the compose file, or only the declared service
    /// names when `services_only` is set.
    pub fn config(&self, services_only: bool) -> Result<i32> {
        let mut args = vec!["config".to_string()];
        if services_only {
            args.push("--services".to_string());
        }

        self.compose(args)
    }

    /// Execute a command in a running container.
    pub fn exec(&self, service: &str, command: &[String]) -> Result<i32> {
        let mut args = vec!["exec".to_string(), service.to_string()];
        args.extend(command.iter().cloned());

        self.compose(args)
    }

    /// Run a one-off command in a container.
    pub fn run(&self, service: &str, command: &[String]) -> Result<i32> {
        let mut args = vec!["run".to_string(), service.to_string()];
        args.extend(command.iter().cloned());

        self.compose(args)
    }

    /// Build one service, or every service when none is given. Extra
    /// arguments pass through unmodified.
    pub fn build(&self, service: Option<&str>, extra_args: &[String]) -> Result<i32> {
        let mut args = vec!["build".to_string()];
        if let Some(service) = service {
            args.push(service.to_string());
        }
        args.extend(extra_args.iter().cloned());

        self.compose(args)
    }

    pub fn images(&self, extra_args: &[String]) -> Result<i32> {
        let mut args = vec!["images".to_string()];
        args.extend(extra_args.iter().cloned());

        self.compose(args)
    }

    /// Declared service names, freshly resolved for the configured project.
    pub fn list_services(&self) -> Result<Vec<String>> {
        let directory = self.settings.directory()?;
        let flags = self.settings.extra_flags()?;
        self.catalog.list_services(&directory, &flags)
    }

    /// Completion entry point: candidates starting with `incomplete`, in
    /// discovery order. Never fails.
    pub fn complete_services(&self, incomplete: &str) -> Vec<String> {
        let Ok(directory) = self.settings.directory() else {
            return Vec::new();
        };
        let Ok(flags) = self.settings.extra_flags() else {
            return Vec::new();
        };

        self.catalog.complete(&directory, &flags, incomplete)
    }

    fn ensure_known_services(&self, services: &[String]) -> Result<()> {
        if services.is_empty() {
            return Ok(());
        }

        let known = self.list_services()?;
        for service in services {
            if !known.contains(service) {
                bail!(
                    "Serviço '{service}' não está declarado no projeto (serviços: {})",
                    known.join(", ")
                );
            }
        }

        Ok(())
    }

    fn forward(&self, subcommand: &str, services: &[String]) -> Result<i32> {
        let mut args = vec![subcommand.to_string()];
        args.extend(services.iter().cloned());

        self.compose(args)
    }

    fn compose(&self, args: Vec<String>) -> Result<i32> {
        let directory = self.settings.directory()?;
        let flags = self.settings.extra_flags()?;

        let mut argv = Vec::with_capacity(flags.len() + args.len() + 1);
        argv.push(self.settings.binary().to_string());
        argv.extend(flags);
        argv.extend(args);

        self.runner.stream(&argv, Some(&directory))
    }
}
