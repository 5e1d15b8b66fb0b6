pub mod correlator;
pub mod document_to_ir;
pub mod name_normalizer;
pub mod promote_inline;
pub mod recursion;
pub mod type_resolver;
pub mod variables;

pub use document_to_ir::{TransformOptions, transform, transform_with_options};
