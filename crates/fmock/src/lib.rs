//! Call interception and verification for tests.
//!
//! A [`FunctionMocker`] replaces named functions and class methods with a
//! [`Substitute`] that records each call's arguments, answers according to a
//! [`ReturnPolicy`], and verifies call counts with a small comparator
//! language (`"2"`, `">=2"`, `"<=2"`, `"<2"`, `">2"`, `"!=2"`, `"==2"`).
//! Calls reach substitutes through an [`Interception`] capability; the
//! bundled [`DispatchTable`] is a call-dispatch table that hosts declare
//! their functions and methods in.

pub mod comparator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod mocker;
pub mod policy;
pub mod registry;
pub mod substitute;
pub mod target;

pub use comparator::{CmpOp, Comparator, IntoComparator};
pub use config::MockerConfig;
pub use dispatch::{DispatchTable, Interception};
pub use error::{BoxError, MockError};
pub use fmock_value::{ArgumentRecord, Value};
pub use ledger::InvocationLedger;
pub use mocker::{FunctionMocker, MockSession};
pub use policy::ReturnPolicy;
pub use registry::ReplacementRegistry;
pub use substitute::Substitute;
pub use target::TargetIdentity;
