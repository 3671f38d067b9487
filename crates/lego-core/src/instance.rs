//! Mounted instances.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::definition::ComponentDefinition;
use crate::error::ComponentError;
use crate::intercepters::{self, Intercepters};
use crate::listeners::{self, Listeners};
use crate::options::MountOptions;
use crate::outcome::Outcome;
use crate::overrides::Props;
use crate::owned::InstanceModel;
use crate::render::{HookArg, RenderArg, Wrapper, Wrappers};
use crate::scope::Scope;
use crate::state::{check_state, initial_state, StateContainer};
use crate::value::{StateMap, Value};

/// One mounted use of a [`ComponentDefinition`].
///
/// Owns the instance's state and model. The host drives it: it fires
/// listeners, polls [`take_render_request`](Self::take_render_request) and
/// calls [`render`](Self::render) and the lifecycle methods in order. Nothing
/// here is reentrant across instances or threads.
pub struct Instance<M, V> {
    definition: Rc<ComponentDefinition<M, V>>,
    scope: Rc<Scope<M>>,
    listeners: Listeners<M>,
    intercepters: Intercepters<M>,
    wrappers: IndexMap<String, Wrapper<V>>,
    children: Vec<V>,
    options: MountOptions,
}

impl<M: 'static, V: 'static> Instance<M, V> {
    pub fn mount(
        definition: Rc<ComponentDefinition<M, V>>,
        props: Props<M, V>,
        options: MountOptions,
    ) -> Result<Self, ComponentError> {
        props.check_names(&definition, options.unknown_props())?;
        let Props {
            initial,
            listeners: overrides,
            intercepters: intercepter_overrides,
            wrappers,
            children,
        } = props;

        let model = InstanceModel::new(definition.initialize());
        let state = initial_state(
            definition.state_shape(),
            || definition.default_state(),
            &initial,
        );
        check_state(
            definition.name(),
            definition.state_shape(),
            &state,
            options.type_check(),
        )?;

        let scope = Rc::new(Scope::new(
            Rc::from(definition.name()),
            StateContainer::new(state),
            model,
            overrides,
        ));
        let listeners = listeners::compose(definition.default_listeners(), &scope);
        let intercepters = intercepters::compose(
            definition.default_intercepters(),
            &intercepter_overrides,
            &scope,
        );
        log::debug!(
            "{}: mounted with {} listener(s), {} intercepter(s)",
            definition.name(),
            listeners.len(),
            intercepters.len()
        );

        Ok(Self {
            definition,
            scope,
            listeners,
            intercepters,
            wrappers,
            children,
            options,
        })
    }

    /// Installs new usage-site props.
    ///
    /// Listener overrides take effect on the next event. Intercepters are
    /// rebound. Initial state values are ignored once mounted.
    pub fn set_props(&mut self, props: Props<M, V>) -> Result<(), ComponentError> {
        props.check_names(&self.definition, self.options.unknown_props())?;
        let Props {
            initial,
            listeners: overrides,
            intercepters: intercepter_overrides,
            wrappers,
            children,
        } = props;
        if !initial.is_empty() {
            log::debug!(
                "{}: ignoring {} initial value(s) on update",
                self.name(),
                initial.len()
            );
        }
        self.scope.replace_overrides(overrides);
        self.intercepters = intercepters::compose(
            self.definition.default_intercepters(),
            &intercepter_overrides,
            &self.scope,
        );
        self.wrappers = wrappers;
        self.children = children;
        Ok(())
    }
}

impl<M, V> Instance<M, V> {
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn definition(&self) -> &Rc<ComponentDefinition<M, V>> {
        &self.definition
    }

    pub fn options(&self) -> MountOptions {
        self.options
    }

    /// A copy of the current state.
    pub fn state(&self) -> StateMap {
        self.scope.state().snapshot()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.scope.state().get(key)
    }

    pub fn model(&self) -> &InstanceModel<M> {
        self.scope.model()
    }

    pub fn listeners(&self) -> &Listeners<M> {
        &self.listeners
    }

    pub fn intercepters(&self) -> &Intercepters<M> {
        &self.intercepters
    }

    /// Fires the named listener.
    pub fn dispatch(&self, name: &str, args: &[Value]) -> Result<Outcome, ComponentError> {
        self.listeners.call(name, args)
    }

    /// Runs the named intercepter.
    pub fn intercept(&self, name: &str, args: &[Value]) -> Result<Value, ComponentError> {
        self.intercepters.call(name, args)
    }

    pub fn commit_count(&self) -> u64 {
        self.scope.state().commit_count()
    }

    pub fn has_render_request(&self) -> bool {
        self.scope.state().has_render_request()
    }

    /// Returns and clears whether a commit happened since the last call.
    pub fn take_render_request(&self) -> bool {
        self.scope.state().take_render_request()
    }

    pub fn render(&self) -> V {
        let arg = RenderArg {
            state: self.state(),
            instance: self.model().clone(),
            listeners: &self.listeners,
            intercepters: &self.intercepters,
            children: &self.children,
            wrappers: Wrappers::resolve(self.definition.default_wrappers(), &self.wrappers),
        };
        self.definition.render_with(arg)
    }

    fn hook_arg(&self) -> HookArg<'_, M> {
        HookArg {
            state: self.state(),
            instance: self.model().clone(),
            listeners: &self.listeners,
            intercepters: &self.intercepters,
        }
    }

    pub fn did_mount(&self) {
        if let Some(hook) = self.definition.hooks().did_mount.as_ref() {
            hook(&self.hook_arg());
        }
    }

    /// Asks whether the committed state should be rendered.
    ///
    /// The hook's bundle carries `rendered_state`, the state of the last
    /// render, and the hook's argument is the current state. `true` when no
    /// hook is defined.
    pub fn should_update(&self, rendered_state: &StateMap) -> bool {
        let Some(hook) = self.definition.hooks().should_update.as_ref() else {
            return true;
        };
        let arg = HookArg {
            state: rendered_state.clone(),
            ..self.hook_arg()
        };
        hook(&arg, &self.state())
    }

    pub fn did_update(&self, previous_state: &StateMap) {
        if let Some(hook) = self.definition.hooks().did_update.as_ref() {
            hook(&self.hook_arg(), previous_state);
        }
    }

    /// Runs `will_unmount` and drops the instance together with its model.
    pub fn unmount(self) {
        if let Some(hook) = self.definition.hooks().will_unmount.as_ref() {
            hook(&self.hook_arg());
        }
        log::debug!("{}: unmounted", self.name());
    }
}

impl<M, V> fmt::Debug for Instance<M, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name())
            .field("state", &self.state())
            .field("listeners", &self.listeners)
            .field("intercepters", &self.intercepters)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/instance_tests.rs"]
mod tests;
