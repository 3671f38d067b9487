use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Which usage-site table a prop name was looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    Value,
    Listener,
    Intercepter,
    Wrapper,
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Value => "state value",
            Self::Listener => "listener",
            Self::Intercepter => "intercepter",
            Self::Wrapper => "wrapper",
        };
        f.write_str(name)
    }
}

/// Errors raised while defining, mounting or addressing a component.
///
/// Failures inside handlers, intercepters or render functions are never
/// wrapped in this type; they unwind straight to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("component `{component}` has no render function")]
    MissingRender { component: String },
    #[error("state of `{component}` is missing declared key `{key}`")]
    MissingStateKey { component: String, key: String },
    #[error("state key `{key}` of `{component}` expects {expected}, found {found}")]
    StateTypeMismatch {
        component: String,
        key: String,
        expected: ValueKind,
        found: String,
    },
    #[error("`{component}` declares no {kind} named `{name}`")]
    UnknownProp {
        component: String,
        kind: PropKind,
        name: String,
    },
    #[error("`{component}` has no listener named `{name}`")]
    UnknownListener { component: String, name: String },
    #[error("`{component}` has no intercepter named `{name}`")]
    UnknownIntercepter { component: String, name: String },
}
