//! Reference index, retirement map and their loaders.

pub mod error;
pub mod index;
pub mod like;
pub mod loader;
pub mod retired;

pub use error::{ReferenceError, Result};
pub use index::ReferenceIndex;
pub use like::LikePattern;
pub use loader::{
    REFERENCE_COLUMNS, load_reference, load_retired, reference_from_reader, retired_from_reader,
};
pub use retired::RetirementMap;
