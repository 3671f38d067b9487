//! Listener composition.
//!
//! Every listener a definition declares becomes a [`Listener`] that, when
//! fired, looks up the instance's current override and runs it together with
//! the default in the order the override's [`Override`] variant selects.

use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::ComponentError;
use crate::outcome::{BeforeResult, Outcome};
use crate::overrides::Override;
use crate::owned::InstanceModel;
use crate::scope::Scope;
use crate::value::{merged, StateMap, Value};

/// `{ state, instance }` as seen by listeners and intercepters.
///
/// `state` is a copy taken when the event fired. Handlers propose changes by
/// returning an [`Outcome`], not by editing this copy.
pub struct ListenerArg<M> {
    pub state: StateMap,
    pub instance: InstanceModel<M>,
}

impl<M> ListenerArg<M> {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Reads a numeric state field, treating anything else as zero.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or_default()
    }

    pub fn integer(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or_default()
    }

    /// The same argument with a proposed outcome layered over its state.
    /// Non-structured outcomes contribute no keys.
    pub(crate) fn with_proposed(&self, outcome: &Outcome) -> Self {
        let state = match outcome.partial() {
            Some(partial) => merged(&self.state, partial),
            None => self.state.clone(),
        };
        Self {
            state,
            instance: self.instance.clone(),
        }
    }
}

impl<M> Clone for ListenerArg<M> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            instance: self.instance.clone(),
        }
    }
}

impl<M> fmt::Debug for ListenerArg<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerArg")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Default listeners and replace/after overrides.
pub type Handler<M> = Rc<dyn Fn(&ListenerArg<M>, &[Value]) -> Outcome>;

/// Overrides that run before the default. `None` cancels the event.
pub type BeforeHandler<M> = Rc<dyn Fn(&ListenerArg<M>, &[Value]) -> Option<BeforeResult>>;

/// One composed listener, bound to its instance.
///
/// Holds its instance weakly: once the instance is unmounted, firing a
/// retained listener does nothing and returns `Nothing`.
pub struct Listener<M> {
    name: Rc<str>,
    default: Handler<M>,
    scope: Weak<Scope<M>>,
}

impl<M> Clone for Listener<M> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            default: Rc::clone(&self.default),
            scope: Weak::clone(&self.scope),
        }
    }
}

impl<M> Listener<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fires the listener with no runtime arguments.
    pub fn fire(&self) -> Outcome {
        self.call(&[])
    }

    /// Fires the listener.
    ///
    /// Returns the outcome handed to the merge gate, whether or not it was
    /// committed. A cancelled or suppressed event returns `Nothing`.
    pub fn call(&self, args: &[Value]) -> Outcome {
        let name = &*self.name;
        let Some(scope) = self.scope.upgrade() else {
            log::warn!("{name}: fired after its instance was unmounted");
            return Outcome::Nothing;
        };
        let scope = &*scope;
        let arg = scope.listener_arg();
        let Some(spec) = scope.current_override(name) else {
            log::trace!("{}.{name}: default", scope.component());
            let result = (self.default)(&arg, args);
            return scope.commit(name, result);
        };
        log::trace!("{}.{name}: {}", scope.component(), spec.mode());

        match spec {
            Override::Replace(None) => Outcome::Nothing,
            Override::Replace(Some(handler)) => scope.commit(name, handler(&arg, args)),
            Override::AfterDefault(handler) => {
                let next_state = (self.default)(&arg, args);
                let next_arg = arg.with_proposed(&next_state);
                let result = handler(&next_arg, args);
                let committed = if result.is_nothing() {
                    next_state
                } else {
                    result
                };
                scope.commit(name, committed)
            }
            Override::BeforeDefault(handler) => {
                let Some(result) = handler(&arg, args) else {
                    log::trace!("{}.{name}: cancelled before default", scope.component());
                    return Outcome::Nothing;
                };
                let suppress_default = result.suppress_default;
                let next_state = result.into_partial();
                if suppress_default {
                    return scope.commit(name, next_state);
                }
                let next_arg = arg.with_proposed(&next_state);
                let default_result = (self.default)(&next_arg, args);
                let committed = if default_result.is_nothing() {
                    next_state
                } else {
                    default_result
                };
                scope.commit(name, committed)
            }
        }
    }
}

impl<M> fmt::Debug for Listener<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("name", &self.name).finish()
    }
}

/// Composed listeners of one instance, keyed exactly by the declared names.
pub struct Listeners<M> {
    component: Rc<str>,
    table: IndexMap<String, Listener<M>>,
}

impl<M> Clone for Listeners<M> {
    fn clone(&self) -> Self {
        Self {
            component: Rc::clone(&self.component),
            table: self.table.clone(),
        }
    }
}

impl<M> Listeners<M> {
    pub fn get(&self, name: &str) -> Option<&Listener<M>> {
        self.table.get(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Outcome, ComponentError> {
        let listener = self
            .get(name)
            .ok_or_else(|| ComponentError::UnknownListener {
                component: self.component.to_string(),
                name: name.to_string(),
            })?;
        Ok(listener.call(args))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener<M>> {
        self.table.values()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<M> fmt::Debug for Listeners<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table.keys()).finish()
    }
}

/// Builds one composed listener per declared default.
pub(crate) fn compose<M>(
    defaults: &IndexMap<String, Handler<M>>,
    scope: &Rc<Scope<M>>,
) -> Listeners<M> {
    let component: Rc<str> = Rc::from(scope.component());
    let table = defaults
        .iter()
        .map(|(name, default)| {
            let listener = Listener {
                name: Rc::from(name.as_str()),
                default: Rc::clone(default),
                scope: Rc::downgrade(scope),
            };
            (name.clone(), listener)
        })
        .collect();
    Listeners { component, table }
}

#[cfg(test)]
#[path = "tests/listeners_tests.rs"]
mod tests;
