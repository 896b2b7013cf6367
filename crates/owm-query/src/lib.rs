//! OpenWeatherMap query templates.
//!
//! A static catalog maps (family, name) to a URL template with `{PARAMn}`
//! placeholders and optional suffix fragments. [`QueryBuilder`] fills them in
//! and returns the request path, without scheme or API key.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod family;
pub mod param;
pub mod template;

pub use builder::{ExcessPolicy, QueryBuilder};
pub use catalog::{Catalog, EntrySpec, Partition, STANDARD_ENTRIES};
pub use error::{BuildError, CatalogError};
pub use family::QueryFamily;
pub use param::QueryParam;
pub use template::QueryTemplate;
