//! Searchable, filterable software catalog view.
//!
//! The catalog is fetched once through a [`CatalogSource`].  After that, every
//! interaction (typing in the search box, toggling a category checkbox,
//! removing a chip, clearing filters) recomputes the visible subset locally:
//!
//! - the search text is lower-cased, trimmed and matched as a substring of
//!   each item's name or tagline;
//! - checked categories are conjunctive, so an item must carry all of them;
//! - survivors keep their catalog order.
//!
//! [`CatalogView`] is a [`shelf_core::Model`]; run it with
//! [`shelf_core::Program`] and feed it page events through the program
//! handle, or drive it directly with [`shelf_core::testing::TestProgram`].

pub mod catalog;
pub mod filter;
pub mod item;
pub mod markup;
pub mod panel;
pub mod source;
pub mod view;

pub use catalog::Catalog;
pub use filter::{Filtered, Query, Selection};
pub use item::{Category, CategoryId, CategoryKind, Item, ItemId};
pub use panel::{Chip, FilterControl, FilterPanel};
pub use source::{CatalogSource, FetchError, HttpSource, StaticSource, DEFAULT_ENDPOINT};
pub use view::{regions, CatalogFlags, CatalogOptions, CatalogView, Msg, Phase};
