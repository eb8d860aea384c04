pub mod error;
pub mod project;
pub mod traits;

pub use error::GroupMembershipError;
pub use project::{DEFAULT_COMPOSE_BINARY, ProjectSettings, Source};
pub use traits::ProcessRunner;
