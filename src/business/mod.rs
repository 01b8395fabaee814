//! Business records and the fixed vocabularies used to build them.

pub mod lookup;
pub mod model;

pub use lookup::{
    BusinessTypeInfo, CATCH_ALL_CATEGORY, DEFAULT_PERSONA, business_type, business_types,
    category_option, hours_preset, persona_for, resolve_category,
};
pub use model::{Business, BusinessDraft, BusinessStatus};
