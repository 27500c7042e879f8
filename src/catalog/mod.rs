//! Content catalog wiring.
//!
//! Types here mirror the authored content: entries grouped into categories,
//! categories aggregated from part files into one catalog per language or
//! role. `Registry` holds the published catalogs; `CatalogIndex` gives fast
//! entry lookup and positional navigation inside one catalog.

pub mod aggregate;
pub mod identity;
pub mod index;
pub mod model;
pub mod registry;

pub use aggregate::aggregate;
pub use identity::{
    CatalogId, CatalogKind, CategoryId, CrossLanguageId, Difficulty, EntryId, is_url_safe,
};
pub use index::{CatalogIndex, EntryLocation};
pub use model::{
    Catalog, CatalogMetadata, Category, Challenge, Diagram, Entry, QuizQuestion, Section,
};
pub use registry::{PublishError, Registry, RegistryBuilder};
