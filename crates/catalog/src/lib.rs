//! Catalog construction and presentation for the storefront.
//!
//! Two data paths feed the same record shape:
//! - **live**: [`index`] walks the store's folder tree, matches covers to
//!   titles, and [`Catalog`] serves cached snapshots and hydrated records;
//! - **precomputed**: [`CatalogReader`] loads a manifest plus page files
//!   written earlier by [`write_catalog`].
//!
//! [`filter`] and the paging helpers then shape either sequence for the
//! list view.

pub mod error;
mod filter;
mod index;
mod models;
mod normalize;
mod reader;
mod service;
mod writer;

pub use crate::filter::{CategoryFilter, clamp_page, filter, page_count, page_slice};
pub use crate::index::{IndexEvent, IndexOptions, index, index_stream};
pub use crate::models::{BookRecord, Index, Manifest};
pub use crate::normalize::{document_title, image_base, keys_match, normalize};
pub use crate::reader::{CatalogReader, MANIFEST_FILE, page_file_name};
pub use crate::service::{Catalog, FALLBACK_DESCRIPTION, HydrateOptions, hydrate};
pub use crate::writer::write_catalog;
