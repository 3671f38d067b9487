//! Results produced by listeners and the values that decide what gets committed.

use crate::value::{StateMap, Value};

/// What a handler hands back to the composer.
///
/// Only [`Outcome::Partial`] is ever merged into instance state. `Scalar`
/// still counts as a returned value when the composer chooses between a
/// default's and an override's result, which is what separates it from
/// `Nothing`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Outcome {
    /// The handler returned nothing.
    #[default]
    Nothing,
    /// A non-structured value; never committed.
    Scalar(Value),
    /// A partial state to shallow-merge into the current state.
    Partial(StateMap),
}

impl Outcome {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn partial(&self) -> Option<&StateMap> {
        match self {
            Self::Partial(partial) => Some(partial),
            _ => None,
        }
    }

    /// Reads `key` from a partial outcome.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.partial().and_then(|partial| partial.get(key))
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Self::Nothing
    }
}

impl From<StateMap> for Outcome {
    fn from(partial: StateMap) -> Self {
        Self::Partial(partial)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(partial) => Self::Partial(partial),
            other => Self::Scalar(other),
        }
    }
}

impl<T: Into<Outcome>> From<Option<T>> for Outcome {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nothing, Into::into)
    }
}

/// Result of a listener override that runs before the default.
///
/// `suppress_default` is decided per call, so a single override can let the
/// default run on one event and veto it on the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeforeResult {
    pub partial: Outcome,
    pub suppress_default: bool,
}

impl BeforeResult {
    /// Proposes `partial` and lets the default run on top of it.
    pub fn proceed(partial: impl Into<Outcome>) -> Self {
        Self {
            partial: partial.into(),
            suppress_default: false,
        }
    }

    /// Commits `partial` without running the default.
    pub fn settle(partial: impl Into<Outcome>) -> Self {
        Self {
            partial: partial.into(),
            suppress_default: true,
        }
    }

    /// The proposed state as the default listener will see it. A missing
    /// partial counts as an empty one.
    pub(crate) fn into_partial(self) -> Outcome {
        match self.partial {
            Outcome::Nothing => Outcome::Partial(StateMap::new()),
            other => other,
        }
    }
}
