//! Usage-site props: per-instance overrides of a definition's behaviors.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::definition::ComponentDefinition;
use crate::error::{ComponentError, PropKind};
use crate::intercepters::Transformer;
use crate::listeners::{BeforeHandler, Handler, ListenerArg};
use crate::options::UnknownProps;
use crate::outcome::{BeforeResult, Outcome};
use crate::render::Wrapper;
use crate::value::{StateMap, Value};

/// Execution order and suppression chosen by a listener override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompositionMode {
    /// The default never runs.
    Replace,
    /// The default runs first and the override sees its proposed state.
    AfterDefault,
    /// The override runs first and may redirect or veto the default.
    BeforeDefault,
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Replace => "replace",
            Self::AfterDefault => "after-default",
            Self::BeforeDefault => "before-default",
        };
        f.write_str(name)
    }
}

/// A caller-supplied override for one named listener.
pub enum Override<M> {
    /// Suppress the default. With no handler the event does nothing at all.
    Replace(Option<Handler<M>>),
    AfterDefault(Handler<M>),
    BeforeDefault(BeforeHandler<M>),
}

impl<M> Clone for Override<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Replace(handler) => Self::Replace(handler.clone()),
            Self::AfterDefault(handler) => Self::AfterDefault(Rc::clone(handler)),
            Self::BeforeDefault(handler) => Self::BeforeDefault(Rc::clone(handler)),
        }
    }
}

impl<M> fmt::Debug for Override<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(handler) => f
                .debug_struct("Replace")
                .field("handler", &handler.is_some())
                .finish(),
            Self::AfterDefault(_) => f.write_str("AfterDefault"),
            Self::BeforeDefault(_) => f.write_str("BeforeDefault"),
        }
    }
}

impl<M> Override<M> {
    pub fn mode(&self) -> CompositionMode {
        match self {
            Self::Replace(_) => CompositionMode::Replace,
            Self::AfterDefault(_) => CompositionMode::AfterDefault,
            Self::BeforeDefault(_) => CompositionMode::BeforeDefault,
        }
    }
}

impl<M: 'static> Override<M> {
    pub fn replace<F, O>(handler: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> O + 'static,
        O: Into<Outcome>,
    {
        Self::Replace(Some(Rc::new(move |arg: &ListenerArg<M>, args: &[Value]| {
            handler(arg, args).into()
        })))
    }

    /// Disables the listener for this instance.
    pub fn suppress() -> Self {
        Self::Replace(None)
    }

    pub fn after<F, O>(handler: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> O + 'static,
        O: Into<Outcome>,
    {
        Self::AfterDefault(Rc::new(move |arg: &ListenerArg<M>, args: &[Value]| {
            handler(arg, args).into()
        }))
    }

    pub fn before<F>(handler: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> Option<BeforeResult> + 'static,
    {
        Self::BeforeDefault(Rc::new(handler))
    }
}

/// Everything a usage site passes to one instance.
///
/// A bare handler given to [`Props::on`] composes after the default, the same
/// as [`Override::after`].
pub struct Props<M, V> {
    pub(crate) initial: StateMap,
    pub(crate) listeners: IndexMap<String, Override<M>>,
    pub(crate) intercepters: IndexMap<String, Transformer<M>>,
    pub(crate) wrappers: IndexMap<String, Wrapper<V>>,
    pub(crate) children: Vec<V>,
}

impl<M, V> Default for Props<M, V> {
    fn default() -> Self {
        Self {
            initial: StateMap::new(),
            listeners: IndexMap::new(),
            intercepters: IndexMap::new(),
            wrappers: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

impl<M: 'static, V: 'static> Props<M, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial value for a declared state key. Read once, at mount.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial.insert(name.into(), value.into());
        self
    }

    pub fn values(mut self, values: StateMap) -> Self {
        self.initial.extend(values);
        self
    }

    pub fn listener(mut self, name: impl Into<String>, spec: Override<M>) -> Self {
        self.listeners.insert(name.into(), spec);
        self
    }

    pub fn on<F, O>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> O + 'static,
        O: Into<Outcome>,
    {
        self.listener(name, Override::after(handler))
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

    pub fn child(mut self, child: V) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = V>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn initial_values(&self) -> &StateMap {
        &self.initial
    }

    /// Applies the unknown-prop policy against what `definition` declares.
    pub fn check_names(
        &self,
        definition: &ComponentDefinition<M, V>,
        policy: UnknownProps,
    ) -> Result<(), ComponentError> {
        if policy == UnknownProps::Ignore {
            return Ok(());
        }
        let unknown = self
            .initial
            .keys()
            .filter(|name| !definition.state_shape().contains(name))
            .map(|name| (PropKind::Value, name))
            .chain(
                self.listeners
                    .keys()
                    .filter(|name| !definition.declares_listener(name))
                    .map(|name| (PropKind::Listener, name)),
            )
            .chain(
                self.intercepters
                    .keys()
                    .filter(|name| !definition.declares_intercepter(name))
                    .map(|name| (PropKind::Intercepter, name)),
            )
            .chain(
                self.wrappers
                    .keys()
                    .filter(|name| !definition.declares_wrapper(name))
                    .map(|name| (PropKind::Wrapper, name)),
            );
        for (kind, name) in unknown {
            if policy == UnknownProps::Deny {
                return Err(ComponentError::UnknownProp {
                    component: definition.name().to_string(),
                    kind,
                    name: name.clone(),
                });
            }
            log::warn!("{}: ignoring unknown {kind} `{name}`", definition.name());
        }
        Ok(())
    }
}
