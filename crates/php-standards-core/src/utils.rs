//! Utility functions shared by sniff implementations.

pub mod allowance;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
