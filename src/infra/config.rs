use crate::domain::{ProjectSettings, Source};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_TOML_NAME: &str = "composebox.toml";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/home/dev"))
        .join(".config/composebox")
}

#[derive(Deserialize, Debug, Default)]
pub struct ProjectConfig {
    /// Project (simulator) name. Lowercased into the default `-p` flag.
    pub name: Option<String>,
    /// Directory holding the compose file. Supports `~`. When absent, the
    /// current working directory is used, resolved at each invocation.
    pub directory: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ComposeConfig {
    /// Orchestrator binary (default: docker-compose).
    pub binary: Option<String>,
    /// Replaces the default `-p <name>` pair prepended to every invocation.
    pub extra_flags: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

/// Loads `composebox.toml` from the config directory. A missing file is not
/// an error: every field has a usable default.
pub fn load_config(config_dir: &Path) -> Result<AppConfig> {
    let path = config_dir.join(DEFAULT_CONFIG_TOML_NAME);
    if !path.exists() {
        debug!("config ausente em {:?}, usando padrões", path);
        return Ok(AppConfig::default());
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("lendo configuração {:?}", path))?;

    toml::from_str(&content).with_context(|| format!("parsing configuração {:?}", path))
}

/// Builds the project settings out of the loaded configuration.
pub fn project_settings(config: &AppConfig) -> Result<ProjectSettings> {
    let directory = match &config.project.directory {
        Some(raw) => {
            let expanded = shellexpand::tilde(raw).into_owned();
            Source::Static(PathBuf::from(expanded))
        }
        None => Source::computed(|| {
            std::env::current_dir().context("resolvendo diretório atual")
        }),
    };

    let name = match &config.project.name {
        Some(name) => name.clone(),
        None => directory_basename(&directory)?,
    };

    let mut settings = ProjectSettings::new(name, directory);

    if let Some(binary) = &config.compose.binary {
        settings = settings.with_binary(binary.clone());
    }
    if let Some(flags) = &config.compose.extra_flags {
        settings = settings.with_extra_flags(Source::Static(flags.clone()));
    }

    Ok(settings)
}

fn directory_basename(directory: &Source<PathBuf>) -> Result<String> {
    let resolved = directory.resolve()?;
    match resolved.file_name().and_then(|n| n.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => bail!("não foi possível derivar o nome do projeto de {:?}", resolved),
    }
}
