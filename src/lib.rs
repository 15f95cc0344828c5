pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    ComposeRuntime, Container, Hook, HookRunner, Project, ProjectSummary, RegistryError,
};
pub use infra::{AppConfig, DockerComposeAdapter, ScriptHookRunner};
pub use services::ProjectRegistry;
