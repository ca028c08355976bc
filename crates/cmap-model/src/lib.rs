pub mod coding_system;
pub mod record;
pub mod reference;
pub mod term_type;
pub mod validation;

pub use coding_system::{
    CodingSystemFamily, CodingSystemSet, NON_UMLS_CODING_SYSTEMS, SENTINEL, UMLS_CODING_SYSTEMS,
    is_missing,
};
pub use record::InputRecord;
pub use reference::ReferenceRow;
pub use term_type::{
    ADMINISTRATIVE_TERM_TYPES, IGNORED_TERM_TYPES, PREFERRED_TERM, PriorityRank, TermTypes,
};
pub use validation::{
    COMMENT_NOT_UNIQUE, COMMENT_RETIRED_CONCEPT, Classification, FieldChange, ValidationResult,
};
