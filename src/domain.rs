mod container;
mod error;
pub mod project;
pub mod traits;

pub use container::{Container, split_container_name};
pub use error::RegistryError;
pub use project::{Project, ProjectSummary};
pub use traits::{ComposeRuntime, Hook, HookRunner};
