pub mod endpoints;
pub mod schemas;
pub mod types;

pub use endpoints::*;
pub use schemas::*;
pub use types::{IrGroup, IrInfo, IrSpec, NormalizedName};
