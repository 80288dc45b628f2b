pub mod criteria;
pub mod engine;

pub use criteria::FilterCriteria;
pub use engine::{
    apply_filters, extract_abilities, filter_by_attributes, filter_by_name, has_active_filters,
};
