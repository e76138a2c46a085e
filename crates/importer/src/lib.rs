pub mod canonical;
pub mod error;
pub mod report;

pub use error::{ImporterError, Result};
