//! Mount-time configuration.

/// How declared state types are enforced at mount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeCheck {
    Off,
    /// Log a warning and keep the value.
    #[default]
    Warn,
    /// Refuse to mount.
    Deny,
}

/// How usage-site props naming nothing the definition declares are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownProps {
    #[default]
    Ignore,
    Warn,
    Deny,
}

/// Options applied when an instance is mounted or receives new props.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountOptions {
    type_check: TypeCheck,
    unknown_props: UnknownProps,
}

impl MountOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject every questionable prop instead of logging it.
    pub fn strict() -> Self {
        Self {
            type_check: TypeCheck::Deny,
            unknown_props: UnknownProps::Deny,
        }
    }

    pub fn with_type_check(mut self, type_check: TypeCheck) -> Self {
        self.type_check = type_check;
        self
    }

    pub fn with_unknown_props(mut self, unknown_props: UnknownProps) -> Self {
        self.unknown_props = unknown_props;
        self
    }

    pub fn type_check(&self) -> TypeCheck {
        self.type_check
    }

    pub fn unknown_props(&self) -> UnknownProps {
        self.unknown_props
    }
}
