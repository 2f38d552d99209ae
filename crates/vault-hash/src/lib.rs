//! Hash functions shipped alongside the cipher workspace.
//!
//! These are independent compression pipelines; they share no state with the
//! cipher core beyond ordinary byte handling.

#![forbid(unsafe_code)]

mod sha256;

pub use crate::sha256::Sha256;
