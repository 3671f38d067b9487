use super::*;
use crate::state;
use serde_json::json;

fn shape() -> StateShape {
    StateShape::new()
        .field("count", ValueKind::Number)
        .field("label", ValueKind::String)
}

#[test]
fn initial_values_override_defaults_only_for_declared_keys() {
    let initial = state! { "count" => 5, "unrelated" => true };
    let state = initial_state(
        &shape(),
        || state! { "count" => 0, "label" => "clicks" },
        &initial,
    );
    assert_eq!(state, state! { "count" => 5, "label" => "clicks" });
}

#[test]
fn initial_state_keeps_undeclared_defaults() {
    let state = initial_state(
        &shape(),
        || state! { "count" => 0, "label" => "x", "extra" => 1 },
        &StateMap::new(),
    );
    assert_eq!(state.get("extra"), Some(&json!(1)));
}

#[test]
fn check_state_reports_missing_declared_key() {
    let err = check_state("Counter", &shape(), &state! { "count" => 0 }, TypeCheck::Warn)
        .unwrap_err();
    assert_eq!(
        err,
        ComponentError::MissingStateKey {
            component: "Counter".into(),
            key: "label".into(),
        }
    );
}

#[test]
fn check_state_type_policy() {
    let state = state! { "count" => "zero", "label" => "x" };
    assert!(check_state("Counter", &shape(), &state, TypeCheck::Off).is_ok());
    assert!(check_state("Counter", &shape(), &state, TypeCheck::Warn).is_ok());
    let err = check_state("Counter", &shape(), &state, TypeCheck::Deny).unwrap_err();
    assert!(matches!(
        err,
        ComponentError::StateTypeMismatch { ref key, expected: ValueKind::Number, ref found, .. }
            if key == "count" && found == "string"
    ));
}

#[test]
fn null_satisfies_any_declaration() {
    let state = state! { "count" => Value::Null, "label" => Value::Null };
    assert!(check_state("Counter", &shape(), &state, TypeCheck::Deny).is_ok());
}

#[test]
fn merge_commits_only_partial_outcomes() {
    let container = StateContainer::new(state! { "count" => 0 });
    let before = container.snapshot();

    assert!(!container.merge(&Outcome::Nothing));
    assert!(!container.merge(&Outcome::Scalar(json!(3))));
    assert!(!container.merge(&Outcome::Scalar(Value::Null)));
    assert_eq!(container.snapshot(), before);
    assert!(!container.has_render_request());
    assert_eq!(container.commit_count(), 0);

    assert!(container.merge(&Outcome::Partial(state! { "count" => 2, "extra" => "y" })));
    assert_eq!(container.snapshot(), state! { "count" => 2, "extra" => "y" });
    assert_eq!(container.commit_count(), 1);
}

#[test]
fn merge_is_shallow() {
    let container = StateContainer::new(state! { "user" => json!({ "name": "a", "age": 3 }) });
    container.merge(&Outcome::Partial(state! { "user" => json!({ "name": "b" }) }));
    assert_eq!(container.get("user"), Some(json!({ "name": "b" })));
}

#[test]
fn render_request_is_taken_once() {
    let container = StateContainer::new(StateMap::new());
    container.merge(&Outcome::Partial(StateMap::new()));
    assert!(container.take_render_request());
    assert!(!container.take_render_request());
}
