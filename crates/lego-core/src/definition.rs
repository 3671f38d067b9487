//! Component definitions: the author's defaults, shared read-only by every
//! instance.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ComponentError;
use crate::instance::Instance;
use crate::intercepters::Transformer;
use crate::listeners::{Handler, ListenerArg};
use crate::options::MountOptions;
use crate::outcome::Outcome;
use crate::overrides::Props;
use crate::render::{HookArg, LifecycleHooks, RenderArg, RenderFn, Wrapper};
use crate::state::StateShape;
use crate::value::{StateMap, Value, ValueKind};

const ANONYMOUS: &str = "Anonymous";

/// A declaratively defined component.
///
/// Built once with [`ComponentBuilder`] and then shared through an `Rc`; an
/// instance never mutates its definition.
pub struct ComponentDefinition<M, V> {
    display_name: Option<String>,
    shape: StateShape,
    default_state: Rc<dyn Fn() -> StateMap>,
    listeners: IndexMap<String, Handler<M>>,
    intercepters: IndexMap<String, Transformer<M>>,
    wrappers: IndexMap<String, Wrapper<V>>,
    initialize: Rc<dyn Fn() -> M>,
    hooks: LifecycleHooks<M>,
    render: RenderFn<M, V>,
}

impl<M, V> ComponentDefinition<M, V> {
    /// Display name, or `"Anonymous"`.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(ANONYMOUS)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn state_shape(&self) -> &StateShape {
        &self.shape
    }

    pub fn default_state(&self) -> StateMap {
        (self.default_state)()
    }

    pub fn default_listeners(&self) -> &IndexMap<String, Handler<M>> {
        &self.listeners
    }

    pub fn default_intercepters(&self) -> &IndexMap<String, Transformer<M>> {
        &self.intercepters
    }

    pub fn default_wrappers(&self) -> &IndexMap<String, Wrapper<V>> {
        &self.wrappers
    }

    pub fn declares_listener(&self, name: &str) -> bool {
        self.listeners.contains_key(name)
    }

    pub fn declares_intercepter(&self, name: &str) -> bool {
        self.intercepters.contains_key(name)
    }

    pub fn declares_wrapper(&self, name: &str) -> bool {
        self.wrappers.contains_key(name)
    }

    pub fn hooks(&self) -> &LifecycleHooks<M> {
        &self.hooks
    }

    pub(crate) fn initialize(&self) -> M {
        (self.initialize)()
    }

    pub(crate) fn render_with(&self, arg: RenderArg<'_, M, V>) -> V {
        (self.render)(arg)
    }
}

impl<M: 'static, V: 'static> ComponentDefinition<M, V> {
    /// Mounts a new instance with default options.
    pub fn mount(self: &Rc<Self>, props: Props<M, V>) -> Result<Instance<M, V>, ComponentError> {
        Instance::mount(Rc::clone(self), props, MountOptions::default())
    }

    pub fn mount_with(
        self: &Rc<Self>,
        props: Props<M, V>,
        options: MountOptions,
    ) -> Result<Instance<M, V>, ComponentError> {
        Instance::mount(Rc::clone(self), props, options)
    }
}

impl<M, V> fmt::Debug for ComponentDefinition<M, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name())
            .field("shape", &self.shape)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("intercepters", &self.intercepters.keys().collect::<Vec<_>>())
            .field("wrappers", &self.wrappers.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks.present())
            .finish()
    }
}

/// Builder for [`ComponentDefinition`].
///
/// ```
/// use lego_core::{state, ComponentBuilder, ValueKind};
///
/// let counter = ComponentBuilder::<(), String>::new()
///     .display_name("Counter")
///     .state_field("count", ValueKind::Number)
///     .default_state(|| state! { "count" => 0 })
///     .listener("increment", |arg, _| state! { "count" => arg.integer("count") + 1 })
///     .render(|arg| format!("count = {}", arg.state["count"]))
///     .build()
///     .unwrap();
/// assert_eq!(counter.name(), "Counter");
/// ```
pub struct ComponentBuilder<M, V> {
    display_name: Option<String>,
    shape: StateShape,
    default_state: Rc<dyn Fn() -> StateMap>,
    listeners: IndexMap<String, Handler<M>>,
    intercepters: IndexMap<String, Transformer<M>>,
    wrappers: IndexMap<String, Wrapper<V>>,
    initialize: Rc<dyn Fn() -> M>,
    hooks: LifecycleHooks<M>,
    render: Option<RenderFn<M, V>>,
}

impl<M: Default + 'static, V: 'static> ComponentBuilder<M, V> {
    /// Starts a definition whose instance model is `M::default()`.
    pub fn new() -> Self {
        Self::with_model(M::default)
    }
}

impl<M: Default + 'static, V: 'static> Default for ComponentBuilder<M, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static, V: 'static> ComponentBuilder<M, V> {
    /// Starts a definition whose instance model is produced by `initialize`,
    /// called once per mount.
    pub fn with_model(initialize: impl Fn() -> M + 'static) -> Self {
        Self {
            display_name: None,
            shape: StateShape::new(),
            default_state: Rc::new(StateMap::new),
            listeners: IndexMap::new(),
            intercepters: IndexMap::new(),
            wrappers: IndexMap::new(),
            initialize: Rc::new(initialize),
            hooks: LifecycleHooks::default(),
            render: None,
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn state_shape(mut self, shape: StateShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn state_field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.shape = self.shape.field(name, kind);
        self
    }

    pub fn default_state(mut self, default_state: impl Fn() -> StateMap + 'static) -> Self {
        self.default_state = Rc::new(default_state);
        self
    }

    pub fn listener<F, O>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> O + 'static,
        O: Into<Outcome>,
    {
        let handler: Handler<M> =
            Rc::new(move |arg: &ListenerArg<M>, args: &[Value]| handler(arg, args).into());
        self.listeners.insert(name.into(), handler);
        self
    }

    pub fn intercepter<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> Value + 'static,
    {
        self.intercepters.insert(name.into(), Rc::new(transform));
        self
    }

    pub fn wrapper<F>(mut self, name: impl Into<String>, wrap: F) -> Self
    where
        F: Fn(Vec<V>) -> V + 'static,
    {
        self.wrappers.insert(name.into(), Rc::new(wrap));
        self
    }

    pub fn did_mount(mut self, hook: impl Fn(&HookArg<'_, M>) + 'static) -> Self {
        self.hooks.did_mount = Some(Rc::new(hook));
        self
    }

    pub fn will_unmount(mut self, hook: impl Fn(&HookArg<'_, M>) + 'static) -> Self {
        self.hooks.will_unmount = Some(Rc::new(hook));
        self
    }

    pub fn did_update(mut self, hook: impl Fn(&HookArg<'_, M>, &StateMap) + 'static) -> Self {
        self.hooks.did_update = Some(Rc::new(hook));
        self
    }

    pub fn should_update(
        mut self,
        hook: impl Fn(&HookArg<'_, M>, &StateMap) -> bool + 'static,
    ) -> Self {
        self.hooks.should_update = Some(Rc::new(hook));
        self
    }

    pub fn render(mut self, render: impl Fn(RenderArg<'_, M, V>) -> V + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    pub fn build(self) -> Result<Rc<ComponentDefinition<M, V>>, ComponentError> {
        let name = self.display_name.as_deref().unwrap_or(ANONYMOUS).to_string();
        let render = self
            .render
            .ok_or(ComponentError::MissingRender { component: name })?;
        Ok(Rc::new(ComponentDefinition {
            display_name: self.display_name,
            shape: self.shape,
            default_state: self.default_state,
            listeners: self.listeners,
            intercepters: self.intercepters,
            wrappers: self.wrappers,
            initialize: self.initialize,
            hooks: self.hooks,
            render,
        }))
    }
}

#[cfg(test)]
#[path = "tests/definition_tests.rs"]
mod tests;
