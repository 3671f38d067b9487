//! Render adapter: the argument bundles handed to the author's render
//! function and lifecycle hooks.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::intercepters::Intercepters;
use crate::listeners::Listeners;
use crate::owned::InstanceModel;
use crate::value::StateMap;

/// Wraps rendered children into a single node.
pub type Wrapper<V> = Rc<dyn Fn(Vec<V>) -> V>;

pub type RenderFn<M, V> = Rc<dyn Fn(RenderArg<'_, M, V>) -> V>;

/// Wrappers resolved for one render pass.
pub struct Wrappers<V> {
    table: IndexMap<String, Wrapper<V>>,
}

impl<V> Wrappers<V> {
    /// Usage-site wrappers win over defaults. Names the definition does not
    /// declare are dropped.
    pub(crate) fn resolve(
        defaults: &IndexMap<String, Wrapper<V>>,
        overrides: &IndexMap<String, Wrapper<V>>,
    ) -> Self {
        let table = defaults
            .iter()
            .map(|(name, default)| {
                let wrapper = overrides.get(name).unwrap_or(default);
                (name.clone(), Rc::clone(wrapper))
            })
            .collect();
        Self { table }
    }

    pub fn get(&self, name: &str) -> Option<&Wrapper<V>> {
        self.table.get(name)
    }

    /// Applies the named wrapper, or returns `None` if it is not declared.
    pub fn wrap(&self, name: &str, children: Vec<V>) -> Option<V> {
        self.get(name).map(|wrapper| wrapper(children))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Everything the author's render function reads.
pub struct RenderArg<'a, M, V> {
    pub state: StateMap,
    pub instance: InstanceModel<M>,
    pub listeners: &'a Listeners<M>,
    pub intercepters: &'a Intercepters<M>,
    pub children: &'a [V],
    pub wrappers: Wrappers<V>,
}

/// The bundle lifecycle hooks receive ahead of the host's own arguments.
pub struct HookArg<'a, M> {
    pub state: StateMap,
    pub instance: InstanceModel<M>,
    pub listeners: &'a Listeners<M>,
    pub intercepters: &'a Intercepters<M>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    DidMount,
    WillUnmount,
    DidUpdate,
    ShouldUpdate,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DidMount => "did_mount",
            Self::WillUnmount => "will_unmount",
            Self::DidUpdate => "did_update",
            Self::ShouldUpdate => "should_update",
        };
        f.write_str(name)
    }
}

pub type Hook<M> = Rc<dyn Fn(&HookArg<'_, M>)>;
/// Receives the state as it was before the update.
pub type UpdateHook<M> = Rc<dyn Fn(&HookArg<'_, M>, &StateMap)>;
/// Receives the state about to be rendered.
pub type ShouldUpdateHook<M> = Rc<dyn Fn(&HookArg<'_, M>, &StateMap) -> bool>;

/// Lifecycle hooks an author may define. Absent hooks are no-ops.
pub struct LifecycleHooks<M> {
    pub(crate) did_mount: Option<Hook<M>>,
    pub(crate) will_unmount: Option<Hook<M>>,
    pub(crate) did_update: Option<UpdateHook<M>>,
    pub(crate) should_update: Option<ShouldUpdateHook<M>>,
}

impl<M> Default for LifecycleHooks<M> {
    fn default() -> Self {
        Self {
            did_mount: None,
            will_unmount: None,
            did_update: None,
            should_update: None,
        }
    }
}

impl<M> LifecycleHooks<M> {
    /// Hooks present, in host invocation order.
    pub fn present(&self) -> Vec<Lifecycle> {
        [
            (Lifecycle::DidMount, self.did_mount.is_some()),
            (Lifecycle::ShouldUpdate, self.should_update.is_some()),
            (Lifecycle::DidUpdate, self.did_update.is_some()),
            (Lifecycle::WillUnmount, self.will_unmount.is_some()),
        ]
        .into_iter()
        .filter_map(|(hook, present)| present.then_some(hook))
        .collect()
    }

    pub fn has(&self, hook: Lifecycle) -> bool {
        self.present().contains(&hook)
    }
}
