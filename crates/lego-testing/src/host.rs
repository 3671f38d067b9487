use std::rc::Rc;

use lego_core::{
    ComponentDefinition, ComponentError, Instance, MountOptions, Outcome, Props, StateMap, Value,
};

/// Upper bound on render passes a single [`TestHost::pump_until_idle`] runs
/// before giving up on a component that keeps committing from `did_update`.
pub const MAX_UPDATE_PASSES: usize = 50;

/// Headless host for exercising components in tests.
///
/// `TestHost` plays the part of the UI runtime: it mounts one instance,
/// renders it, and after every event re-renders until no commit is pending,
/// consulting `should_update` and calling `did_update` the way a host
/// framework serializes updates. Every rendered output is kept as a frame.
pub struct TestHost<M: 'static, V: 'static> {
    instance: Option<Instance<M, V>>,
    rendered_state: StateMap,
    frames: Vec<V>,
    skipped: usize,
}

impl<M: 'static, V: 'static> TestHost<M, V> {
    /// Mount with default options, render once and run `did_mount`.
    pub fn mount(
        definition: &Rc<ComponentDefinition<M, V>>,
        props: Props<M, V>,
    ) -> Result<Self, ComponentError> {
        Self::mount_with(definition, props, MountOptions::default())
    }

    pub fn mount_with(
        definition: &Rc<ComponentDefinition<M, V>>,
        props: Props<M, V>,
        options: MountOptions,
    ) -> Result<Self, ComponentError> {
        let instance = Instance::mount(Rc::clone(definition), props, options)?;
        let rendered_state = instance.state();
        let first_frame = instance.render();
        let mut host = Self {
            instance: Some(instance),
            rendered_state,
            frames: vec![first_frame],
            skipped: 0,
        };
        host.instance().did_mount();
        host.pump_until_idle();
        Ok(host)
    }

    /// The mounted instance.
    ///
    /// # Panics
    ///
    /// Panics after [`unmount`](Self::unmount).
    pub fn instance(&self) -> &Instance<M, V> {
        self.instance.as_ref().expect("instance is unmounted")
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    pub fn state(&self) -> StateMap {
        self.instance().state()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.instance().get(key)
    }

    /// Fires a listener, then settles pending renders.
    pub fn fire(&mut self, name: &str, args: &[Value]) -> Result<Outcome, ComponentError> {
        let outcome = self.instance().dispatch(name, args)?;
        self.pump_until_idle();
        Ok(outcome)
    }

    pub fn intercept(&self, name: &str, args: &[Value]) -> Result<Value, ComponentError> {
        self.instance().intercept(name, args)
    }

    /// Installs new props and renders them.
    pub fn set_props(&mut self, props: Props<M, V>) -> Result<(), ComponentError> {
        let instance = self.instance.as_mut().expect("instance is unmounted");
        instance.set_props(props)?;
        let frame = instance.render();
        self.frames.push(frame);
        self.pump_until_idle();
        Ok(())
    }

    /// Renders until the instance reports no pending commit.
    ///
    /// A `did_update` hook that commits again triggers another pass. After
    /// [`MAX_UPDATE_PASSES`] passes the pending request is dropped and an
    /// error is logged.
    pub fn pump_until_idle(&mut self) {
        let Some(instance) = self.instance.as_ref() else {
            return;
        };
        let mut passes = 0;
        while instance.take_render_request() {
            if passes == MAX_UPDATE_PASSES {
                log::error!(
                    "{}: still updating after {MAX_UPDATE_PASSES} passes, giving up",
                    instance.name()
                );
                break;
            }
            passes += 1;
            let next_state = instance.state();
            if instance.should_update(&self.rendered_state) {
                self.frames.push(instance.render());
                let previous = std::mem::replace(&mut self.rendered_state, next_state);
                instance.did_update(&previous);
            } else {
                log::debug!("{}: render skipped by should_update", instance.name());
                self.skipped += 1;
                self.rendered_state = next_state;
            }
        }
    }

    /// Every output rendered so far, oldest first.
    pub fn frames(&self) -> &[V] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&V> {
        self.frames.last()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of updates `should_update` declined to render.
    pub fn skipped_updates(&self) -> usize {
        self.skipped
    }

    /// Runs `will_unmount` and drops the instance. Frames stay readable.
    pub fn unmount(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.unmount();
        }
    }
}

/// Convenience helper for tests that only need a host for the duration of
/// one closure.
pub fn run_test_host<M: 'static, V: 'static, R>(
    definition: &Rc<ComponentDefinition<M, V>>,
    props: Props<M, V>,
    f: impl FnOnce(&mut TestHost<M, V>) -> R,
) -> Result<R, ComponentError> {
    let mut host = TestHost::mount(definition, props)?;
    let result = f(&mut host);
    host.unmount();
    Ok(result)
}
