//! Result type alias for eslint-off operations

use crate::error::EslintOffError;

/// Standard Result type for eslint-off operations
pub type Result<T> = std::result::Result<T, EslintOffError>;
