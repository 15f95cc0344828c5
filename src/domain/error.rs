use super::Hook;
use thiserror::Error;

/// Failures the registry reports as distinct kinds.
///
/// Everything else (a failing `stop`, `build`, ...) travels as a plain
/// `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to query {what} from the container engine")]
    Query {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("malformed container record: {record}")]
    Parse {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{hook} hook failed")]
    Hook {
        hook: Hook,
        #[source]
        source: anyhow::Error,
    },

    #[error("no service selected for {project} and no default configured for {command}")]
    NoService {
        project: String,
        command: &'static str,
    },
}
