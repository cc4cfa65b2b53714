//! Search-engine-backed secondary indexing for Yndex.
//!
//! This crate provides a "key → set of record identifiers" index whose
//! storage and lookup are delegated to a pluggable search engine. The
//! crate owns the adapter layer: the concurrency discipline that lets
//! mutations (put, remove, rebuild) and reads (get) interleave safely
//! against a stateful engine, the multi-value semantics, and the key
//! collation applied before every operation. The engine itself is an
//! external collaborator behind the [`SearchEngine`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      yndex-fts                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchIndex (state checks, collation, locking, delegation) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchEngine trait                                         │
//! │  ├── MemoryEngine (in-process fallback)                     │
//! │  └── full-text engines (out of tree)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LockCoordinator (modification gate + shared/exclusive)     │
//! │  Collation (canonical key normalization)                    │
//! │  Rebuild (RecordSource scan → engine repopulation)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yndex_fts::{IndexConfig, Key, MemoryEngine, RecordRef, SearchIndex};
//!
//! let engine = Arc::new(MemoryEngine::new());
//! let source = Arc::new(record_store.associations());
//! let index = SearchIndex::create(IndexConfig::named("users.name"), engine, source)?;
//!
//! index.put(Key::text("Alice"), RecordRef::new("#12:0"))?;
//! let refs = index.get(Key::text("alice"))?;
//! assert!(refs.contains(&RecordRef::new("#12:0")));
//! ```

pub mod adapter;
pub mod collate;
pub mod engine;
pub mod locks;
pub mod rebuild;
pub mod types;

// Re-exports
pub use adapter::SearchIndex;
pub use collate::{Collation, Key, KeyType};
pub use engine::{ManagedIndex, MemoryEngine, SearchEngine};
pub use locks::LockCoordinator;
pub use rebuild::{LogProgress, ProgressListener, RebuildState, RecordSource};
pub use types::{IndexConfig, RecordRef, ValueSet};
