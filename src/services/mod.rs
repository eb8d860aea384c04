pub mod catalog;
pub mod compose_service;

pub use catalog::ServiceCatalog;
pub use compose_service::{ComposeService, UpOptions};
