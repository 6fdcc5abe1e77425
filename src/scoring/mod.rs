//! Judge input handling: separator normalization, validation, and the
//! trimmed-sum aggregation over a complete panel.

pub mod aggregate;
pub mod normalize;
pub mod validate;

pub use aggregate::aggregate;
pub use normalize::{canonicalize, limit_to_one_fraction_digit, normalize_separators};
pub use validate::{validate, ValidationError};
