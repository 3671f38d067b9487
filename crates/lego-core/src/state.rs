//! Instance state: the declared shape, construction-time seeding and the
//! merge gate every listener result passes through.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use crate::error::ComponentError;
use crate::options::TypeCheck;
use crate::outcome::Outcome;
use crate::value::{describe, StateMap, Value, ValueKind};

/// Names and declared kinds of the state fields a component owns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateShape {
    fields: IndexMap<String, ValueKind>,
}

impl StateShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<ValueKind> {
        self.fields.get(name).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Seeds an instance's state.
///
/// The author's defaults are overridden by those `initial_values` whose keys
/// the shape declares; every other initial value is ignored.
pub fn initial_state(
    shape: &StateShape,
    default_state: impl FnOnce() -> StateMap,
    initial_values: &StateMap,
) -> StateMap {
    let mut state = default_state();
    for (key, value) in initial_values {
        if shape.contains(key) {
            state.insert(key.clone(), value.clone());
        }
    }
    state
}

/// Verifies that `state` holds every declared key with an acceptable kind.
///
/// Missing keys always fail. Kind mismatches are handled per `type_check`.
pub fn check_state(
    component: &str,
    shape: &StateShape,
    state: &StateMap,
    type_check: TypeCheck,
) -> Result<(), ComponentError> {
    for (key, expected) in shape.iter() {
        let Some(value) = state.get(key) else {
            return Err(ComponentError::MissingStateKey {
                component: component.to_string(),
                key: key.to_string(),
            });
        };
        if expected.accepts(value) {
            continue;
        }
        match type_check {
            TypeCheck::Off => {}
            TypeCheck::Warn => log::warn!(
                "{component}: state key `{key}` expects {expected}, found {}",
                describe(value)
            ),
            TypeCheck::Deny => {
                return Err(ComponentError::StateTypeMismatch {
                    component: component.to_string(),
                    key: key.to_string(),
                    expected,
                    found: describe(value),
                })
            }
        }
    }
    Ok(())
}

/// Mutable state of one instance.
///
/// The only way to change the state after construction is [`merge`], which
/// commits structured outcomes and ignores everything else.
///
/// [`merge`]: StateContainer::merge
#[derive(Debug, Default)]
pub struct StateContainer {
    current: RefCell<StateMap>,
    render_requested: Cell<bool>,
    commits: Cell<u64>,
}

impl StateContainer {
    pub fn new(initial: StateMap) -> Self {
        Self {
            current: RefCell::new(initial),
            render_requested: Cell::new(false),
            commits: Cell::new(0),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> StateMap {
        self.current.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&StateMap) -> R) -> R {
        f(&self.current.borrow())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.current.borrow().get(key).cloned()
    }

    /// Shallow-merges a partial outcome into the state.
    ///
    /// Returns whether anything was committed. `Nothing` and `Scalar` leave
    /// the state untouched and do not request a render.
    pub fn merge(&self, outcome: &Outcome) -> bool {
        let Outcome::Partial(partial) = outcome else {
            return false;
        };
        {
            let mut current = self.current.borrow_mut();
            for (key, value) in partial {
                current.insert(key.clone(), value.clone());
            }
        }
        self.commits.set(self.commits.get() + 1);
        self.render_requested.set(true);
        true
    }

    /// Number of merges committed since construction.
    pub fn commit_count(&self) -> u64 {
        self.commits.get()
    }

    pub fn has_render_request(&self) -> bool {
        self.render_requested.get()
    }

    /// Returns and clears the pending render request.
    pub fn take_render_request(&self) -> bool {
        self.render_requested.replace(false)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
