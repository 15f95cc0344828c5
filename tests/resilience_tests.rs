use stackctl::test_support::{MockProjectState, MockRuntime};
use stackctl::{AppConfig, Project, ProjectRegistry, RegistryError};
use std::sync::Arc;

fn create_registry() -> (ProjectRegistry, Arc<MockRuntime>) {
    let mock = Arc::new(MockRuntime::new());
    let registry =
        ProjectRegistry::new(Arc::new(AppConfig::default()), mock.clone(), mock.clone());
    (registry, mock)
}

#[test]
fn test_resilience_one_stop_failure_does_not_abort_batch() {
    let (registry, mock) = create_registry();
    mock.add_project("gamma", MockProjectState::Running);
    mock.add_project("delta", MockProjectState::Running);
    mock.set_fail_on("stop:gamma");

    let failed = registry.stop_other_active_projects(&Project::new("target"));

    assert_eq!(failed, ["gamma"]);
    assert_eq!(mock.get_state("delta"), Some(MockProjectState::Stopped));
}

#[test]
fn test_resilience_start_proceeds_when_others_fail_to_stop() {
    let (registry, mock) = create_registry();
    mock.add_project("gamma", MockProjectState::Running);
    mock.add_project("delta", MockProjectState::Running);
    mock.set_fail_on("stop:gamma");

    registry
        .start_project(&Project::new("target"), false, false)
        .expect("start must not fail because another project resisted stopping");

    assert_eq!(mock.get_state("target"), Some(MockProjectState::Running));
    assert_eq!(mock.get_state("delta"), Some(MockProjectState::Stopped));
    // gamma could not be stopped; exclusivity is best effort
    assert_eq!(mock.get_state("gamma"), Some(MockProjectState::Running));
}

#[test]
fn test_resilience_every_stop_failing_still_succeeds() {
    let (registry, mock) = create_registry();
    for name in ["a", "b", "c"] {
        mock.add_project(name, MockProjectState::Running);
    }
    mock.set_fail_on("stop");

    let failed = registry.stop_other_active_projects(&Project::new("z"));

    assert_eq!(failed, ["a", "b", "c"]);
    assert_eq!(mock.commands_for("stop"), ["stop:a", "stop:b", "stop:c"]);
}

#[test]
fn test_resilience_query_failure_on_guarded_operation_is_fatal() {
    let (registry, mock) = create_registry();
    mock.set_fail_on("list_projects:all");

    for result in [
        registry.stop_project(&Project::new("alpha")),
        registry.restart_project(&Project::new("alpha")),
        registry.remove_project(&Project::new("alpha")),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RegistryError>(),
            Some(RegistryError::Query { .. })
        ));
    }

    assert!(mock.commands_for("stop").is_empty());
    assert!(mock.commands_for("restart").is_empty());
    assert!(mock.commands_for("remove").is_empty());
}
