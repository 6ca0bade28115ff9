pub mod csv;
pub mod error;
pub mod extract;
pub mod pages;
pub mod translate;

pub use error::{IngestError, Result};
