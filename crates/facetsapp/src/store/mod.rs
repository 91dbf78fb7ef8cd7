//! # Storage Layer
//!
//! Saved views live in a key-value store: one key holds one JSON array of
//! [`CustomView`](crate::views::CustomView) objects. The [`backend::StorageBackend`]
//! trait is the raw I/O seam, and [`view_store::ViewStore`] owns the view list
//! and the active view on top of it.
//!
//! ## Durability
//!
//! Every mutation is write-through. The store serializes the list it is about
//! to hold, hands it to the backend, and only then swaps it in. A failed write
//! therefore leaves both disk and memory as they were.
//!
//! ## Corruption
//!
//! A payload that does not decode (bad JSON, missing fields, unknown
//! operators) opens as an empty store. The raw text is first copied to
//! `<key>.corrupt` so the next save does not destroy it. Opening never fails.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, written atomically.
//! - [`mem_backend::MemBackend`]: For testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data-dir>/
//! ├── facets.toml                          # Configuration
//! ├── content-custom-views.json            # Saved views
//! └── content-custom-views.corrupt.json    # Last unreadable payload, if any
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod view_store;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use view_store::ViewStore;
