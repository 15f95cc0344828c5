use serde::Deserialize;

/// One container as reported by the engine (`ps --format {{json .}}`).
///
/// Project and service are never stored: they are derived from `name` on
/// every call so they cannot drift from what the engine reported.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Container {
    #[serde(rename = "Name", alias = "Names")]
    pub name: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
}

impl Container {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            created_at: created_at.into(),
        }
    }

    /// Parses a single engine JSON record.
    pub fn from_json(record: &str) -> serde_json::Result<Self> {
        serde_json::from_str(record)
    }

    pub fn project_name(&self) -> &str {
        split_container_name(&self.name).0
    }

    pub fn service_name(&self) -> &str {
        split_container_name(&self.name).1
    }

    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Splits `<project><sep><service><sep><index>` into `(project, service)`.
///
/// `sep` is whichever of `_` or `-` sits right before the numeric replica
/// index, so both `demo_web_1` and `my-app-web-1` resolve. Without an index
/// the last separator splits project from service; without any separator the
/// whole name is the project.
pub fn split_container_name(name: &str) -> (&str, &str) {
    let is_sep = |c: char| c == '_' || c == '-';

    let Some(idx_sep) = name.rfind(is_sep) else {
        return (name, "");
    };

    let index = &name[idx_sep + 1..];
    let has_index = !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit());

    if !has_index {
        return (&name[..idx_sep], &name[idx_sep + 1..]);
    }

    let sep = &name[idx_sep..idx_sep + 1];
    let rest = &name[..idx_sep];

    match rest.rfind(sep) {
        Some(svc_sep) => (&rest[..svc_sep], &rest[svc_sep + 1..]),
        None => (rest, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_underscore_convention() {
        let c = Container::new("demo_web_1", "running", "");
        assert_eq!(c.project_name(), "demo");
        assert_eq!(c.service_name(), "web");
    }

    #[test]
    fn splits_dash_convention_with_dashed_project() {
        assert_eq!(split_container_name("my-app-web-1"), ("my-app", "web"));
    }

    #[test]
    fn underscore_index_keeps_dashes_in_service() {
        assert_eq!(
            split_container_name("shop_order-worker_12"),
            ("shop", "order-worker")
        );
    }

    #[test]
    fn name_without_index_splits_on_last_separator() {
        assert_eq!(split_container_name("demo_web"), ("demo", "web"));
    }

    #[test]
    fn name_without_separator_is_all_project() {
        assert_eq!(split_container_name("postgres"), ("postgres", ""));
    }

    #[test]
    fn name_with_only_index_has_no_service() {
        assert_eq!(split_container_name("demo_1"), ("demo", ""));
    }

    #[test]
    fn derived_names_are_stable_across_calls() {
        let c = Container::new("demo_web_1", "exited", "");
        let first = (c.project_name().to_string(), c.service_name().to_string());
        let second = (c.project_name().to_string(), c.service_name().to_string());
        assert_eq!(first, second);
        assert_eq!(c.name, "demo_web_1");
    }

    #[test]
    fn parses_engine_record_with_names_key() {
        let record = r#"{"Names":"demo_web_1","State":"running","CreatedAt":"2024-03-05 14:07:09 +0100 CET","Image":"nginx"}"#;
        let c = Container::from_json(record).unwrap();
        assert_eq!(c.name, "demo_web_1");
        assert!(c.is_running());
    }

    #[test]
    fn rejects_record_missing_state() {
        let record = r#"{"Name":"demo_web_1","CreatedAt":"2024-03-05 14:07:09 +0100 CET"}"#;
        assert!(Container::from_json(record).is_err());
    }
}
