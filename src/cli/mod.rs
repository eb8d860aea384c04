pub mod compose;

pub use compose::{ComposeAction, run};

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "composebox",
    about = "Proxy do docker-compose com escopo de projeto e completação de serviços"
)]
pub struct Cli {
    /// Diretório de configuração (default: ~/.config/composebox)
    #[arg(
        long,
        env = "COMPOSEBOX_CONFIG_DIR",
        default_value_os_t = crate::infra::config::default_config_dir()
    )]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: ComposeAction,
}
