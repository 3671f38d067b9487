//! Testing utilities and a headless host for lego components.

pub mod host;
pub mod spy;

pub use host::{run_test_host, TestHost, MAX_UPDATE_PASSES};
pub use spy::{Spy, SpyCall};

pub mod prelude {
    pub use crate::host::*;
    pub use crate::spy::*;
}
