//! Settlement building blocks
//!
//! Pure logic used by the order settlement flow, kept free of storage so it
//! can be unit-tested directly:
//!
//! - [`money`] - decimal price math (snapshots, line totals, order totals)
//! - [`policy`] - discount applicability rules
//! - [`code`] - human-readable order code generation

pub mod code;
pub mod money;
pub mod policy;

pub use code::generate_order_code;
pub use policy::{Applicability, RejectReason};
