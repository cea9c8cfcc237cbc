//! # Genesis Export Store
//!
//! The collaborator interfaces the exporter reads chain state through, and
//! reference backends for them.
//!
//! ## Overview
//!
//! The exporter is storage-agnostic: module state, the delegated validator
//! set, signing infos and consensus params are all reached through traits
//! in [`traits`]. This crate ships:
//!
//! - [`MemoryChain`] - In-memory chain head, validators, signing infos, params
//! - [`ModuleRegistry`] - Ordered module exporters, the reference aggregator
//! - [`SlashingModule`] - Exports signing infos as the `slashing` genesis
//! - [`InvariantRegistry`] - Named invariant routes, the reference checker
//! - [`SqliteSigningInfoStore`] - Persistent signing infos on SQLite
//!
//! ## Usage
//!
//! ```rust
//! use genesis_export_core::{ConsAddress, ExportContext, SigningInfo};
//! use genesis_export_store::{MemoryChain, SigningInfoStore};
//!
//! let chain = MemoryChain::at_height(100);
//! let addr = ConsAddress::from_bytes(vec![1u8; 20]);
//! chain.insert_signing_info(SigningInfo::new(addr.clone(), 12)).unwrap();
//!
//! let ctx = ExportContext::pinned(100);
//! let info = chain.get_signing_info(&ctx, &addr).unwrap().unwrap();
//! assert_eq!(info.start_height, 12);
//! ```
//!
//! ## Design Notes
//!
//! - **Synchronous**: an export is one flow of control, so no trait is async
//! - **Cursor iteration**: signing infos are walked through a materialized
//!   cursor, so per-record write-back never contends with the iteration
//! - **Checkers report, callers decide**: invariant violations come back as
//!   values; halting is the exporter's policy

pub mod error;
pub mod invariants;
pub mod memory;
pub mod migration;
pub mod modules;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use invariants::{InvariantRegistry, InvariantResult};
pub use memory::MemoryChain;
pub use modules::{ModuleExporter, ModuleRegistry, SlashingModule, StaticModule};
pub use sqlite::SqliteSigningInfoStore;
pub use traits::{
    ChainHead, ConsensusParamsSource, InvariantChecker, InvariantViolation, ModuleAggregator,
    SigningInfoCursor, SigningInfoStore, ValidatorSetProvider,
};
