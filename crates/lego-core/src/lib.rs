//! Declarative components whose named behaviors can be overridden per instance.
//!
//! An author describes a component once, as a [`ComponentDefinition`]: default
//! state, default listeners and intercepters, default wrappers, an instance
//! model initializer, lifecycle hooks and a render function. Each usage site
//! mounts an [`Instance`] with [`Props`] that may override any named behavior.
//! Listener overrides compose with the default in one of three
//! [`CompositionMode`]s; intercepters and wrappers are replaced outright.

pub mod definition;
pub mod error;
pub mod instance;
pub mod intercepters;
pub mod listeners;
pub mod options;
pub mod outcome;
pub mod overrides;
pub mod owned;
pub mod render;
mod scope;
pub mod state;
pub mod value;

pub use definition::{ComponentBuilder, ComponentDefinition};
pub use error::{ComponentError, PropKind};
pub use instance::Instance;
pub use intercepters::{Intercepter, Intercepters, Transformer};
pub use listeners::{BeforeHandler, Handler, Listener, ListenerArg, Listeners};
pub use options::{MountOptions, TypeCheck, UnknownProps};
pub use outcome::{BeforeResult, Outcome};
pub use overrides::{CompositionMode, Override, Props};
pub use owned::InstanceModel;
pub use render::{
    Hook, HookArg, Lifecycle, LifecycleHooks, RenderArg, RenderFn, ShouldUpdateHook, UpdateHook,
    Wrapper, Wrappers,
};
pub use state::{check_state, initial_state, StateContainer, StateShape};
pub use value::{StateMap, Value, ValueKind};

pub mod prelude {
    pub use crate::{
        state, BeforeResult, ComponentBuilder, ComponentDefinition, ComponentError, Instance,
        ListenerArg, MountOptions, Outcome, Override, Props, StateMap, Value, ValueKind,
    };
}
