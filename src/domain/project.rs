use serde::Deserialize;
use std::fmt;

/// A compose project selected by the caller, optionally narrowed to one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub service: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: None,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        let service = service.into();
        self.service = (!service.is_empty()).then_some(service);
        self
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn is_service_defined(&self) -> bool {
        self.service.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns a copy with `default` selected when no service was given.
    pub fn with_default_service(&self, default: Option<&str>) -> Self {
        if self.is_service_defined() {
            return self.clone();
        }
        match default {
            Some(service) => self.clone().with_service(service),
            None => self.clone(),
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.service_name() {
            Some(service) => write!(f, "{}:{}", self.name, service),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An entry of `compose ls --format json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    #[serde(rename = "Name")]
    pub name: String,
    /// Engine status text such as `running(2)` or `exited(3)`
    #[serde(rename = "Status", default)]
    pub status: String,
}

impl ProjectSummary {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.contains("running")
    }
}

impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_service_when_selected() {
        assert_eq!(Project::new("demo").to_string(), "demo");
        assert_eq!(Project::new("demo").with_service("web").to_string(), "demo:web");
    }

    #[test]
    fn empty_service_is_not_defined() {
        let project = Project::new("demo").with_service("");
        assert!(!project.is_service_defined());
        assert_eq!(project.service_name(), None);
    }

    #[test]
    fn default_service_only_fills_gaps() {
        let bare = Project::new("demo");
        assert_eq!(
            bare.with_default_service(Some("app")).service_name(),
            Some("app")
        );

        let chosen = Project::new("demo").with_service("worker");
        assert_eq!(
            chosen.with_default_service(Some("app")).service_name(),
            Some("worker")
        );

        assert_eq!(bare.with_default_service(None).service_name(), None);
    }

    #[test]
    fn summary_running_status_is_detected() {
        assert!(ProjectSummary::new("alpha", "running(3)").is_running());
        assert!(ProjectSummary::new("alpha", "exited(1), running(2)").is_running());
        assert!(!ProjectSummary::new("beta", "exited(3)").is_running());
    }

    #[test]
    fn summary_parses_compose_ls_entry() {
        let json = r#"[{"Name":"alpha","Status":"running(2)","ConfigFiles":"/src/alpha/compose.yml"}]"#;
        let summaries: Vec<ProjectSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(summaries, vec![ProjectSummary::new("alpha", "running(2)")]);
    }
}
