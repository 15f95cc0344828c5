pub mod compose_adapter;
pub mod config;
pub mod hooks;

pub use compose_adapter::DockerComposeAdapter;
pub use config::AppConfig;
pub use hooks::ScriptHookRunner;
