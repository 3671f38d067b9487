//! Dynamic values carried in component state.

use std::fmt;

pub use serde_json::Value;

/// Reactive state bag of a component instance.
///
/// Keys keep their insertion order so that declared fields are reported in the
/// order the author listed them.
pub type StateMap = serde_json::Map<String, Value>;

/// Declared type of a state field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueKind {
    #[default]
    Any,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Returns the concrete kind of `value`, or `None` for `null`.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Array(_) => Some(Self::Array),
            Value::Object(_) => Some(Self::Object),
        }
    }

    /// `null` satisfies every declaration, mirroring optional props.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, Self::of(value)) {
            (Self::Any, _) | (_, None) => true,
            (expected, Some(found)) => expected == found,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// Short name of the kind of `value`, used in diagnostics.
pub(crate) fn describe(value: &Value) -> String {
    ValueKind::of(value).map_or_else(|| "null".to_string(), |kind| kind.to_string())
}

/// Shallow-merges `partial` over `base`, returning a new map.
pub(crate) fn merged(base: &StateMap, partial: &StateMap) -> StateMap {
    let mut next = base.clone();
    for (key, value) in partial {
        next.insert(key.clone(), value.clone());
    }
    next
}

/// Builds a [`StateMap`] from `key => value` pairs.
///
/// ```
/// let state = lego_core::state! { "count" => 0, "label" => "clicks" };
/// assert_eq!(state["count"], 0);
/// ```
#[macro_export]
macro_rules! state {
    () => {
        $crate::StateMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::StateMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}
