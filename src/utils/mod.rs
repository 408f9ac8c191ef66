//! Utility functions shared by the HTTP layer.
//!
//! - [`url_validator`] - Validation of URLs submitted for shortening

pub mod url_validator;
