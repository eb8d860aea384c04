use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

/// Default orchestrator binary driven by every subcommand.
pub const DEFAULT_COMPOSE_BINARY: &str = "docker-compose";

/// A configuration value that is either fixed up front or computed again on
/// every call.
///
/// The computed form is evaluated once per resolution, so a directory source
/// like "wherever the user currently is" stays accurate across a long-lived
/// handle.
pub enum Source<T> {
    Static(T),
    Computed(Box<dyn Fn() -> Result<T> + Send + Sync>),
}

impl<T: Clone> Source<T> {
    pub fn computed(f: impl Fn() -> Result<T> + Send + Sync + 'static) -> Self {
        Self::Computed(Box::new(f))
    }

    pub fn resolve(&self) -> Result<T> {
        match self {
            Self::Static(value) => Ok(value.clone()),
            Self::Computed(compute) => compute(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Identity and invocation defaults of the compose project being driven.
///
/// The extra flags are prepended to every orchestrator invocation and default
/// to the `-p <name>` project-scoping pair, lowercased.
#[derive(Debug)]
pub struct ProjectSettings {
    name: String,
    binary: String,
    directory: Source<PathBuf>,
    extra_flags: Source<Vec<String>>,
}

impl ProjectSettings {
    pub fn new(name: impl Into<String>, directory: Source<PathBuf>) -> Self {
        let name = name.into();
        let flags = vec!["-p".to_string(), name.to_lowercase()];
        Self {
            name,
            binary: DEFAULT_COMPOSE_BINARY.to_string(),
            directory,
            extra_flags: Source::Static(flags),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_extra_flags(mut self, extra_flags: Source<Vec<String>>) -> Self {
        self.extra_flags = extra_flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Resolves the project directory as an absolute path.
    pub fn directory(&self) -> Result<PathBuf> {
        let directory = self.directory.resolve()?;
        if directory.is_absolute() {
            Ok(directory)
        } else {
            Ok(std::env::current_dir()?.join(directory))
        }
    }

    pub fn extra_flags(&self) -> Result<Vec<String>> {
        self.extra_flags.resolve()
    }
}
