use crate::domain::ProcessRunner;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a discovered service list stays valid.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(60);

/// Identifies one cache entry: same directory plus same flags, same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CatalogKey {
    directory: PathBuf,
    extra_flags: Vec<String>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    services: Vec<String>,
    created_at: Instant,
}

/// Answers "which services does the project at this directory declare?" by
/// asking the orchestrator for its service list, with a short-lived cache so
/// shell completion stays within interactive latency.
pub struct ServiceCatalog {
    runner: Arc<dyn ProcessRunner>,
    binary: String,
    expiry: Duration,
    entries: Mutex<HashMap<CatalogKey, CacheEntry>>,
}

impl ServiceCatalog {
    pub fn new(runner: Arc<dyn ProcessRunner>, binary: impl Into<String>) -> Self {
        Self::with_expiry(runner, binary, DEFAULT_EXPIRY)
    }

    pub fn with_expiry(
        runner: Arc<dyn ProcessRunner>,
        binary: impl Into<String>,
        expiry: Duration,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            expiry,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lists the services declared for the project at `directory`, in the
    /// order the orchestrator reports them.
    ///
    /// A cache entry younger than the expiry window is returned without any
    /// I/O; otherwise the list is rediscovered and the entry replaced.
    /// Discovery failures propagate and are never cached.
    pub fn list_services(&self, directory: &Path, extra_flags: &[String]) -> Result<Vec<String>> {
        let key = CatalogKey {
            directory: directory.to_path_buf(),
            extra_flags: extra_flags.to_vec(),
        };

        // The lock is held across discovery: at most one probe per key can be
        // in flight, even with concurrent completion requests.
        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.get(&key) {
            if entry.created_at.elapsed() < self.expiry {
                return Ok(entry.services.clone());
            }
        }

        let services = self.discover(directory, extra_flags)?;
        entries.insert(
            key,
            CacheEntry {
                services: services.clone(),
                created_at: Instant::now(),
            },
        );

        Ok(services)
    }

    /// Completion contract: candidates from `list_services` whose names start
    /// with `incomplete`, in discovery order. Never fails — a completion
    /// request that cannot be answered returns no candidates.
    pub fn complete(&self, directory: &Path, extra_flags: &[String], incomplete: &str) -> Vec<String> {
        match self.list_services(directory, extra_flags) {
            Ok(services) => services
                .into_iter()
                .filter(|service| service.starts_with(incomplete))
                .collect(),
            Err(err) => {
                debug!("completação de serviços indisponível: {err:#}");
                Vec::new()
            }
        }
    }

    fn discover(&self, directory: &Path, extra_flags: &[String]) -> Result<Vec<String>> {
        debug!("descobrindo serviços em {:?}", directory);

        let mut argv = Vec::with_capacity(extra_flags.len() + 3);
        argv.push(self.binary.clone());
        argv.extend(extra_flags.iter().cloned());
        argv.push("config".to_string());
        argv.push("--services".to_string());

        let output = self
            .runner
            .capture(&argv, Some(directory))
            .with_context(|| format!("listando serviços de {:?}", directory))?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CallMode, MockRunner};

    fn catalog_with(mock: &Arc<MockRunner>, expiry: Duration) -> ServiceCatalog {
        ServiceCatalog::with_expiry(mock.clone(), "docker-compose", expiry)
    }

    fn flags() -> Vec<String> {
        vec!["-p".to_string(), "mysim".to_string()]
    }

    #[test]
    fn test_discovery_invokes_config_services_in_directory() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        let services = catalog
            .list_services(Path::new("/proj"), &flags())
            .unwrap();
        assert_eq!(services, vec!["web"]);

        let call = mock.last_call().unwrap();
        assert_eq!(call.mode, CallMode::Capture);
        assert_eq!(
            call.argv,
            vec!["docker-compose", "-p", "mysim", "config", "--services"]
        );
        assert_eq!(call.cwd.as_deref(), Some(Path::new("/proj")));
    }

    #[test]
    fn test_second_call_within_expiry_hits_the_cache() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\nworker\n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        let first = catalog.list_services(Path::new("/proj"), &flags()).unwrap();
        let second = catalog.list_services(Path::new("/proj"), &flags()).unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.capture_count(), 1);
    }

    #[test]
    fn test_expired_entry_is_rediscovered_and_replaced() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\n");
        let catalog = catalog_with(&mock, Duration::ZERO);

        let first = catalog.list_services(Path::new("/proj"), &flags()).unwrap();
        assert_eq!(first, vec!["web"]);

        mock.set_capture_output("web\ndb\n");
        let second = catalog.list_services(Path::new("/proj"), &flags()).unwrap();

        assert_eq!(second, vec!["web", "db"]);
        assert_eq!(mock.capture_count(), 2);
    }

    #[test]
    fn test_output_is_trimmed_and_blank_lines_dropped() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\nworker\n\n  db  \n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        let services = catalog.list_services(Path::new("/proj"), &flags()).unwrap();
        assert_eq!(services, vec!["web", "worker", "db"]);
    }

    #[test]
    fn test_distinct_directories_never_share_an_entry() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        let first = catalog.list_services(Path::new("/a"), &flags()).unwrap();
        mock.set_capture_output("db\n");
        let second = catalog.list_services(Path::new("/b"), &flags()).unwrap();

        assert_eq!(first, vec!["web"]);
        assert_eq!(second, vec!["db"]);
        assert_eq!(mock.capture_count(), 2);

        // Both entries stay live side by side.
        assert_eq!(
            catalog.list_services(Path::new("/a"), &flags()).unwrap(),
            vec!["web"]
        );
        assert_eq!(mock.capture_count(), 2);
    }

    #[test]
    fn test_distinct_flags_never_share_an_entry() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        catalog.list_services(Path::new("/proj"), &flags()).unwrap();
        catalog
            .list_services(Path::new("/proj"), &["-p".to_string(), "other".to_string()])
            .unwrap();

        assert_eq!(mock.capture_count(), 2);
    }

    #[test]
    fn test_complete_filters_by_prefix_preserving_order() {
        let mock = Arc::new(MockRunner::new());
        mock.set_capture_output("web\nworker\nwebhook\n");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        let all = catalog.complete(Path::new("/proj"), &flags(), "");
        assert_eq!(all, vec!["web", "worker", "webhook"]);

        let filtered = catalog.complete(Path::new("/proj"), &flags(), "web");
        assert_eq!(filtered, vec!["web", "webhook"]);

        // Byte-prefix match is case-sensitive.
        let none = catalog.complete(Path::new("/proj"), &flags(), "WEB");
        assert!(none.is_empty());
    }

    #[test]
    fn test_list_propagates_discovery_failure() {
        let mock = Arc::new(MockRunner::new());
        mock.set_fail_on("capture");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        assert!(catalog.list_services(Path::new("/proj"), &flags()).is_err());
    }

    #[test]
    fn test_complete_swallows_discovery_failure() {
        let mock = Arc::new(MockRunner::new());
        mock.set_fail_on("capture");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        assert!(catalog.complete(Path::new("/proj"), &flags(), "web").is_empty());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mock = Arc::new(MockRunner::new());
        mock.set_fail_on("capture");
        let catalog = catalog_with(&mock, DEFAULT_EXPIRY);

        assert!(catalog.list_services(Path::new("/proj"), &flags()).is_err());

        // Next call retries discovery instead of serving a poisoned entry.
        mock.clear_fail_on();
        mock.set_capture_output("web\n");
        let services = catalog.list_services(Path::new("/proj"), &flags()).unwrap();
        assert_eq!(services, vec!["web"]);
        assert_eq!(mock.capture_count(), 2);
    }
}
