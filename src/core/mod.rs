//! Canonical document model, builders, validation, and numbering.
//!
//! Every builder, format generator, and renderer in the crate consumes the
//! [`DocumentData`] structure defined here; nothing downstream recomputes
//! what the VAT engine already decided.

mod builder;
pub mod currencies;
mod error;
mod numbering;
mod types;
pub mod units;
mod validation;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
pub use units::{default_unit_code, is_known_unit_code};
pub use validation::*;
