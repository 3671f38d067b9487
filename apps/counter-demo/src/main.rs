use std::rc::Rc;

use lego_core::prelude::*;
use lego_testing::TestHost;

fn counter() -> Result<Rc<ComponentDefinition<Vec<i64>, String>>, ComponentError> {
    ComponentBuilder::<Vec<i64>, String>::new()
        .display_name("Counter")
        .state_field("count", ValueKind::Number)
        .state_field("step", ValueKind::Number)
        .default_state(|| state! { "count" => 0, "step" => 1 })
        .listener("increment", |arg, _| {
            let count = arg.integer("count") + arg.integer("step");
            arg.instance.update(|history| history.push(count));
            state! { "count" => count }
        })
        .listener("reset", |_, _| state! { "count" => 0 })
        .intercepter("label", |arg, _| {
            Value::from(format!("{} click(s)", arg.integer("count")))
        })
        .wrapper("panel", |children| format!("[ {} ]", children.join(" · ")))
        .render(|arg| {
            let label = arg.intercepters.call("label", &[]).unwrap_or_default();
            let mut children = arg.children.to_vec();
            children.push(label.as_str().unwrap_or_default().to_string());
            arg.wrappers.wrap("panel", children).unwrap_or_default()
        })
        .build()
}

fn run(
    title: &str,
    definition: &Rc<ComponentDefinition<Vec<i64>, String>>,
    props: Props<Vec<i64>, String>,
) {
    let mut host = match TestHost::mount(definition, props.child(title.to_string())) {
        Ok(host) => host,
        Err(err) => {
            log::error!("failed to mount {title}: {err}");
            return;
        }
    };
    for _ in 0..3 {
        if let Err(err) = host.fire("increment", &[]) {
            log::error!("{title}: {err}");
        }
    }
    let history = host.instance().model().get();
    println!(
        "{:<14} {} (history {:?})",
        title,
        host.last_frame().map(String::as_str).unwrap_or_default(),
        history
    );
    host.unmount();
}

fn main() {
    env_logger::init();

    let definition = match counter() {
        Ok(definition) => definition,
        Err(err) => {
            log::error!("invalid definition: {err}");
            return;
        }
    };

    run("default", &definition, Props::new());
    run("step=5", &definition, Props::new().value("step", 5));
    run(
        "replace",
        &definition,
        Props::new().listener(
            "increment",
            Override::replace(|arg, _| state! { "count" => arg.integer("count") - 1 }),
        ),
    );
    run(
        "after-default",
        &definition,
        Props::new().on("increment", |arg, _| state! { "count" => arg.integer("count") * 2 }),
    );
    run(
        "capped",
        &definition,
        Props::new().listener(
            "increment",
            Override::before(|arg, _| {
                (arg.integer("count") < 2).then(|| BeforeResult::proceed(()))
            }),
        ),
    );
    run(
        "custom label",
        &definition,
        Props::new().intercepter("label", |arg, _| {
            Value::from(format!("#{}", arg.integer("count")))
        }),
    );
}
