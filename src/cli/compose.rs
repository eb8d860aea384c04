use crate::domain::ProcessRunner;
use crate::infra::SystemRunner;
use crate::infra::config::{load_config, project_settings};
use crate::infra::groups::{self, DOCKER_GROUP};
use crate::services::{ComposeService, UpOptions};
use anyhow::Result;
use clap::{CommandFactory, Subcommand};
use clap_complete::Shell;
use std::path::Path;
use std::sync::Arc;

#[derive(Subcommand)]
pub enum ComposeAction {
    /// Cria e inicia os containers do projeto
    Up {
        /// Serviços a subir (todos quando omitido)
        service: Vec<String>,
        /// Escala um serviço, no formato 'serviço=n'
        #[arg(long = "scale", value_name = "SERVIÇO=N")]
        scales: Vec<String>,
        /// Força a recriação dos serviços
        #[arg(long)]
        force_recreate: bool,
    },
    /// Para e remove containers, redes e volumes do projeto
    Down {
        /// Mantém containers do projeto que não estão na configuração atual
        #[arg(long)]
        no_remove_orphans: bool,
    },
    /// Inicia serviços
    Start {
        /// Serviços a iniciar
        service: Vec<String>,
    },
    /// Para serviços
    Stop {
        /// Serviços a parar
        service: Vec<String>,
    },
    /// Reinicia serviços
    Restart {
        /// Serviços a reiniciar
        service: Vec<String>,
    },
    /// Lista os containers
    Ps {
        /// Serviços a listar
        service: Vec<String>,
    },
    /// Mostra o status dos serviços
    Status {
        /// Serviços a consultar
        service: Vec<String>,
    },
    /// Acompanha os logs dos containers
    Logs {
        /// Serviços a acompanhar
        service: Vec<String>,
    },
    /// Valida e mostra o arquivo compose
    Config {
        /// Lista os serviços em vez da configuração completa
        #[arg(long)]
        services: bool,
    },
    /// Executa um comando em um container em execução
    Exec {
        /// Container onde o comando será executado
        service: String,
        /// Comando a executar, repassado sem modificação
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Roda um comando avulso em um container
    Run {
        /// Container onde o comando será executado
        service: String,
        /// Comando a executar, repassado sem modificação
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Constrói os containers
    Build {
        /// Serviço a construir (todos quando omitido)
        #[arg(allow_hyphen_values = true)]
        service: Option<String>,
        /// Argumentos extras repassados ao build
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Lista as imagens usadas pelos containers
    Images {
        /// Argumentos extras repassados ao images
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Adiciona o usuário atual ao grupo docker e abre uma nova sessão de
    /// login para que a mudança tenha efeito
    FixUp,
    /// Gera o script de completação para o shell
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(hide = true)]
    Complete {
        /// Prefixo já digitado do nome do serviço
        #[arg(default_value = "")]
        incomplete: String,
    },
}

/// Dispatches one parsed subcommand and returns the exit code to propagate.
pub fn run(action: ComposeAction, config_dir: &Path) -> Result<i32> {
    let config = load_config(config_dir)?;
    let settings = project_settings(&config)?;
    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner::new());
    let service = ComposeService::new(settings, runner.clone());

    match action {
        ComposeAction::Up {
            service: services,
            scales,
            force_recreate,
        } => {
            groups::ensure_membership(DOCKER_GROUP)?;
            service.up(&UpOptions {
                services,
                scales,
                force_recreate,
            })
        }
        ComposeAction::Down { no_remove_orphans } => service.down(!no_remove_orphans),
        ComposeAction::Start { service: services } => service.start(&services),
        ComposeAction::Stop { service: services } => service.stop(&services),
        ComposeAction::Restart { service: services } => service.restart(&services),
        ComposeAction::Ps { service: services } | ComposeAction::Status { service: services } => {
            service.ps(&services)
        }
        ComposeAction::Logs { service: services } => service.logs(&services),
        ComposeAction::Config { services } => service.config(services),
        ComposeAction::Exec {
            service: name,
            command,
        } => service.exec(&name, &command),
        ComposeAction::Run {
            service: name,
            command,
        } => service.run(&name, &command),
        ComposeAction::Build {
            service: name,
            args,
        } => service.build(name.as_deref(), &args),
        ComposeAction::Images { args } => service.images(&args),
        ComposeAction::FixUp => groups::fix_up(runner.as_ref()),
        ComposeAction::Completions { shell } => {
            let mut command = super::Cli::command();
            clap_complete::generate(shell, &mut command, "composebox", &mut std::io::stdout());
            Ok(0)
        }
        ComposeAction::Complete { incomplete } => {
            for candidate in service.complete_services(&incomplete) {
                println!("{candidate}");
            }
            Ok(0)
        }
    }
}
