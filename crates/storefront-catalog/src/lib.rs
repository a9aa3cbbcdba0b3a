pub mod client;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod normalize;

pub use client::{CatalogClient, UpstreamResponse};
pub use error::{CatalogError, LookupError};
pub use lookup::{lookup_product, LookupContext};
pub use normalize::{infer_source, normalize_product, normalize_products, NormalizeOptions};
