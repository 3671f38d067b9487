use super::*;
use crate::definition::{ComponentBuilder, ComponentDefinition};
use crate::instance::Instance;
use crate::overrides::Props;
use crate::state;
use crate::value::ValueKind;
use serde_json::json;
use std::cell::{Cell, RefCell};

/// Counter whose `on_click` records how often the default ran.
struct Fixture {
    definition: Rc<ComponentDefinition<(), ()>>,
    default_calls: Rc<Cell<usize>>,
    seen_by_default: Rc<RefCell<Vec<StateMap>>>,
}

impl Fixture {
    fn new() -> Self {
        let default_calls = Rc::new(Cell::new(0));
        let seen_by_default = Rc::new(RefCell::new(Vec::new()));
        let calls = Rc::clone(&default_calls);
        let seen = Rc::clone(&seen_by_default);
        let definition = ComponentBuilder::<(), ()>::new()
            .display_name("Counter")
            .state_field("count", ValueKind::Number)
            .default_state(|| state! { "count" => 0 })
            .listener("on_click", move |arg, _| {
                calls.set(calls.get() + 1);
                seen.borrow_mut().push(arg.state.clone());
                state! { "count" => arg.integer("count") + 1 }
            })
            .listener("touch", |_, _| ())
            .listener("answer", |_, _| json!(42))
            .listener("add", |arg, args| {
                let step = args.first().and_then(Value::as_i64).unwrap_or_default();
                state! { "count" => arg.integer("count") + step }
            })
            .render(|_| ())
            .build()
            .unwrap();
        Self {
            definition,
            default_calls,
            seen_by_default,
        }
    }

    fn mount(&self, props: Props<(), ()>) -> Instance<(), ()> {
        self.definition.mount(props).unwrap()
    }
}

#[test]
fn without_override_the_default_runs_and_commits() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new());

    let outcome = instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(outcome, Outcome::Partial(state! { "count" => 1 }));
    assert_eq!(instance.get("count"), Some(json!(1)));
    assert_eq!(fixture.default_calls.get(), 1);
    assert_eq!(fixture.seen_by_default.borrow()[0], state! { "count" => 0 });
}

#[test]
fn unstructured_default_results_leave_state_untouched() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().value("count", 7));
    let before = instance.state();

    assert_eq!(instance.dispatch("touch", &[]).unwrap(), Outcome::Nothing);
    assert_eq!(instance.dispatch("answer", &[]).unwrap(), Outcome::Scalar(json!(42)));

    assert_eq!(instance.state(), before);
    assert_eq!(instance.commit_count(), 0);
    assert!(!instance.has_render_request());
}

#[test]
fn runtime_arguments_reach_the_handlers() {
    let fixture = Fixture::new();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let instance = fixture.mount(Props::new().on("add", move |_, args| {
        sink.borrow_mut().extend_from_slice(args);
    }));

    instance.dispatch("add", &[json!(3), json!("extra")]).unwrap();

    assert_eq!(instance.get("count"), Some(json!(3)));
    assert_eq!(*received.borrow(), vec![json!(3), json!("extra")]);
}

#[test]
fn replace_never_runs_the_default() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener(
        "on_click",
        Override::replace(|arg, _| state! { "count" => arg.integer("count") + 10 }),
    ));

    instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(fixture.default_calls.get(), 0);
    assert_eq!(instance.get("count"), Some(json!(10)));
}

#[test]
fn suppressed_listener_does_nothing() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener("on_click", Override::suppress()));

    let outcome = instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(outcome, Outcome::Nothing);
    assert_eq!(fixture.default_calls.get(), 0);
    assert_eq!(instance.get("count"), Some(json!(0)));
    assert!(!instance.has_render_request());
}

#[test]
fn after_default_override_sees_proposed_state_and_wins() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener(
        "on_click",
        Override::after(|arg, _| state! { "count" => arg.integer("count") + 10 }),
    ));

    instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(fixture.default_calls.get(), 1);
    assert_eq!(instance.get("count"), Some(json!(11)));
    assert_eq!(instance.commit_count(), 1);
}

#[test]
fn after_default_override_returning_nothing_commits_the_default_result() {
    let fixture = Fixture::new();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let instance = fixture.mount(Props::new().on("on_click", move |arg, _| {
        *sink.borrow_mut() = Some(arg.integer("count"));
    }));

    let outcome = instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(*seen.borrow(), Some(1));
    assert_eq!(outcome, Outcome::Partial(state! { "count" => 1 }));
    assert_eq!(instance.state(), state! { "count" => 1 });
}

#[test]
fn after_default_scalar_override_discards_the_default_state() {
    let fixture = Fixture::new();
    let instance =
        fixture.mount(Props::new().listener("on_click", Override::after(|_, _| json!(false))));

    let outcome = instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(outcome, Outcome::Scalar(json!(false)));
    assert_eq!(fixture.default_calls.get(), 1);
    assert_eq!(instance.get("count"), Some(json!(0)));
}

#[test]
fn before_default_returning_none_cancels_the_event() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener("on_click", Override::before(|_, _| None)));
    let before = instance.state();

    let outcome = instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(outcome, Outcome::Nothing);
    assert_eq!(fixture.default_calls.get(), 0);
    assert_eq!(instance.state(), before);
    assert!(!instance.has_render_request());
}

#[test]
fn before_default_settle_commits_partial_without_the_default() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener(
        "on_click",
        Override::before(|_, _| Some(BeforeResult::settle(state! { "count" => 5 }))),
    ));

    instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(fixture.default_calls.get(), 0);
    assert_eq!(instance.get("count"), Some(json!(5)));
}

#[test]
fn before_default_proceed_feeds_partial_to_the_default() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().value("count", 2).listener(
        "on_click",
        Override::before(|_, _| Some(BeforeResult::proceed(state! { "count" => 5, "tag" => "x" }))),
    ));

    instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(fixture.default_calls.get(), 1);
    assert_eq!(
        fixture.seen_by_default.borrow()[0],
        state! { "count" => 5, "tag" => "x" }
    );
    // the default's result wins; the partial itself is not committed
    assert_eq!(instance.state(), state! { "count" => 6 });
}

#[test]
fn before_default_partial_is_committed_when_the_default_returns_nothing() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener(
        "touch",
        Override::before(|_, _| Some(BeforeResult::proceed(state! { "count" => 9 }))),
    ));

    let outcome = instance.dispatch("touch", &[]).unwrap();

    assert_eq!(outcome, Outcome::Partial(state! { "count" => 9 }));
    assert_eq!(instance.get("count"), Some(json!(9)));
}

#[test]
fn before_default_empty_proceed_runs_the_default_on_unchanged_state() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().listener(
        "on_click",
        Override::before(|_, _| Some(BeforeResult::proceed(()))),
    ));

    instance.dispatch("on_click", &[]).unwrap();

    assert_eq!(fixture.seen_by_default.borrow()[0], state! { "count" => 0 });
    assert_eq!(instance.get("count"), Some(json!(1)));
}

#[test]
fn suppress_default_is_decided_on_every_call() {
    let fixture = Fixture::new();
    let veto = Rc::new(Cell::new(true));
    let toggle = Rc::clone(&veto);
    let instance = fixture.mount(Props::new().listener(
        "on_click",
        Override::before(move |arg, _| {
            let result = if toggle.get() {
                BeforeResult::settle(state! { "count" => arg.integer("count") + 100 })
            } else {
                BeforeResult::proceed(())
            };
            toggle.set(!toggle.get());
            Some(result)
        }),
    ));

    instance.dispatch("on_click", &[]).unwrap();
    assert_eq!(instance.get("count"), Some(json!(100)));
    assert_eq!(fixture.default_calls.get(), 0);

    instance.dispatch("on_click", &[]).unwrap();
    assert_eq!(instance.get("count"), Some(json!(101)));
    assert_eq!(fixture.default_calls.get(), 1);
    assert!(veto.get());
}

#[test]
fn overrides_are_read_when_the_event_fires() {
    let fixture = Fixture::new();
    let mut instance = fixture.mount(Props::new());
    let listener = instance.listeners().get("on_click").unwrap().clone();

    listener.fire();
    assert_eq!(instance.get("count"), Some(json!(1)));

    instance
        .set_props(Props::new().listener(
            "on_click",
            Override::replace(|_, _| state! { "count" => -1 }),
        ))
        .unwrap();
    listener.fire();
    assert_eq!(instance.get("count"), Some(json!(-1)));
    assert_eq!(fixture.default_calls.get(), 1);

    instance.set_props(Props::new()).unwrap();
    listener.fire();
    assert_eq!(instance.get("count"), Some(json!(0)));
}

/// Model that records when it is dropped.
struct DropFlag(Rc<Cell<bool>>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

#[test]
fn retained_listener_is_inert_after_unmount() {
    let dropped = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dropped);
    let init = move || DropFlag(Rc::clone(&flag));
    let definition = ComponentBuilder::<DropFlag, ()>::with_model(init)
        .state_field("count", ValueKind::Number)
        .default_state(|| state! { "count" => 0 })
        .listener("on_click", |arg, _| state! { "count" => arg.integer("count") + 1 })
        .render(|_| ())
        .build()
        .unwrap();
    let instance = definition.mount(Props::new()).unwrap();
    let listener = instance.listeners().get("on_click").unwrap().clone();
    assert_eq!(listener.fire(), Outcome::Partial(state! { "count" => 1 }));

    instance.unmount();

    assert!(dropped.get());
    assert_eq!(listener.fire(), Outcome::Nothing);
    assert_eq!(listener.name(), "on_click");
}

#[test]
fn composed_table_matches_declared_listeners() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new());

    let names: Vec<_> = instance.listeners().names().collect();
    assert_eq!(names, ["on_click", "touch", "answer", "add"]);

    let err = instance.dispatch("on_hover", &[]).unwrap_err();
    assert_eq!(
        err,
        ComponentError::UnknownListener {
            component: "Counter".into(),
            name: "on_hover".into(),
        }
    );
}

#[test]
fn overrides_for_undeclared_listeners_are_never_composed() {
    let fixture = Fixture::new();
    let instance = fixture.mount(Props::new().on("on_hover", |_, _| state! { "count" => 50 }));

    assert!(!instance.listeners().contains("on_hover"));
    assert_eq!(instance.listeners().len(), 4);
}

#[test]
fn listener_arg_reads_numeric_fields_leniently() {
    let arg = ListenerArg {
        state: state! { "price" => 2.5, "count" => 3, "label" => "x" },
        instance: InstanceModel::new(()),
    };

    assert_eq!(arg.number("price"), 2.5);
    assert_eq!(arg.number("count"), 3.0);
    assert_eq!(arg.integer("count"), 3);
    assert_eq!(arg.number("label"), 0.0);
    assert_eq!(arg.integer("missing"), 0);
}

#[test]
fn handlers_can_use_the_instance_model() {
    let definition = ComponentBuilder::<Vec<String>, ()>::new()
        .listener("log", |arg, args| {
            let entry = args[0].as_str().unwrap_or_default().to_string();
            arg.instance.update(|log| log.push(entry));
        })
        .render(|_| ())
        .build()
        .unwrap();
    let instance = definition.mount(Props::new()).unwrap();

    instance.dispatch("log", &[json!("a")]).unwrap();
    instance.dispatch("log", &[json!("b")]).unwrap();

    assert_eq!(instance.model().get(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(instance.commit_count(), 0);
}
