//! Dialer registration: the multi-string list and the mutations applied to it.

pub mod multi_sz;
pub mod registration;

pub use multi_sz::{MAX_VALUE_UNITS, MultiSz};
pub use registration::{RegistrationOutcome, register, unregister};
