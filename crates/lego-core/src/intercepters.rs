//! Intercepter composition: value transformers that are either the author's
//! default or a full replacement from the usage site.

use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::ComponentError;
use crate::listeners::ListenerArg;
use crate::scope::Scope;
use crate::value::Value;

pub type Transformer<M> = Rc<dyn Fn(&ListenerArg<M>, &[Value]) -> Value>;

/// A transformer bound to its instance.
///
/// Each call receives a `{ state, instance }` view read at call time, so an
/// intercepter held across commits always sees live state. After the
/// instance is unmounted it yields `Value::Null` without running.
pub struct Intercepter<M> {
    name: Rc<str>,
    transform: Transformer<M>,
    overridden: bool,
    scope: Weak<Scope<M>>,
}

impl<M> Clone for Intercepter<M> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            transform: Rc::clone(&self.transform),
            overridden: self.overridden,
            scope: Weak::clone(&self.scope),
        }
    }
}

impl<M> Intercepter<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the usage site replaced the default transformer.
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn call(&self, args: &[Value]) -> Value {
        let Some(scope) = self.scope.upgrade() else {
            log::warn!("{}: intercepted after its instance was unmounted", self.name);
            return Value::Null;
        };
        let arg = scope.listener_arg();
        (self.transform)(&arg, args)
    }
}

impl<M> fmt::Debug for Intercepter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercepter")
            .field("name", &self.name)
            .field("overridden", &self.overridden)
            .finish()
    }
}

pub struct Intercepters<M> {
    component: Rc<str>,
    table: IndexMap<String, Intercepter<M>>,
}

impl<M> Clone for Intercepters<M> {
    fn clone(&self) -> Self {
        Self {
            component: Rc::clone(&self.component),
            table: self.table.clone(),
        }
    }
}

impl<M> Intercepters<M> {
    pub fn get(&self, name: &str) -> Option<&Intercepter<M>> {
        self.table.get(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ComponentError> {
        let intercepter = self
            .get(name)
            .ok_or_else(|| ComponentError::UnknownIntercepter {
                component: self.component.to_string(),
                name: name.to_string(),
            })?;
        Ok(intercepter.call(args))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
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

impl<M> fmt::Debug for Intercepters<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table.values()).finish()
    }
}

/// Binds one intercepter per declared default, preferring `overrides`.
/// Overrides for undeclared names are not bound.
pub(crate) fn compose<M>(
    defaults: &IndexMap<String, Transformer<M>>,
    overrides: &IndexMap<String, Transformer<M>>,
    scope: &Rc<Scope<M>>,
) -> Intercepters<M> {
    let table = defaults
        .iter()
        .map(|(name, default)| {
            let (transform, overridden) = match overrides.get(name) {
                Some(replacement) => (Rc::clone(replacement), true),
                None => (Rc::clone(default), false),
            };
            let intercepter = Intercepter {
                name: Rc::from(name.as_str()),
                transform,
                overridden,
                scope: Rc::downgrade(scope),
            };
            (name.clone(), intercepter)
        })
        .collect::<IndexMap<_, _>>();
    log::debug!(
        "{}: bound {} intercepter(s), {} overridden",
        scope.component(),
        table.len(),
        table.values().filter(|i| i.overridden).count()
    );
    Intercepters {
        component: Rc::from(scope.component()),
        table,
    }
}

#[cfg(test)]
#[path = "tests/intercepters_tests.rs"]
mod tests;
