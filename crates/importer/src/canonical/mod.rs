//! Canonical JSON interchange format for resort catalogs.

pub mod models;
pub mod transformer;
pub mod validator;

pub const FORMAT_VERSION: &str = "1.0.0";
