pub mod project;
pub mod setup;

pub use project::{ProjectArgs, ProjectCommand};
