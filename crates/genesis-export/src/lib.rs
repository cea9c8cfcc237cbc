//! # Genesis Export
//!
//! Turns the live state of a running chain into a deterministic snapshot:
//! every module's genesis state plus the active delegated validator set,
//! ready to start a new chain or bootstrap a new node.
//!
//! ## Overview
//!
//! - [`ExportCoordinator`] - Orchestrates an export end to end
//! - [`ZeroHeightPreparer`] - Makes state valid as height zero of a new chain
//! - [`ValidatorSetReader`] - Projects the delegated validator set into records
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use genesis_export::{Collaborators, ExportConfig, ExportCoordinator};
//! use genesis_export::core::{ConsAddress, DelegatedValidator, ModuleName};
//! use genesis_export::store::{InvariantRegistry, MemoryChain, ModuleRegistry, StaticModule};
//!
//! let chain = Arc::new(MemoryChain::at_height(100));
//! chain
//!     .push_validator(DelegatedValidator::new(ConsAddress::from_bytes(vec![1u8; 20]), 10))
//!     .unwrap();
//!
//! let mut modules = ModuleRegistry::new();
//! modules
//!     .register(Arc::new(StaticModule::new(
//!         ModuleName::new("bank").unwrap(),
//!         serde_json::json!({ "balances": [] }),
//!     )))
//!     .unwrap();
//!
//! let exporter = ExportCoordinator::new(
//!     Collaborators::from_chain(chain, Arc::new(modules), Arc::new(InvariantRegistry::new())),
//!     ExportConfig::default(),
//! );
//!
//! let exported = exporter.export(false, &[], &[]).unwrap();
//! assert_eq!(exported.height, 101);
//! ```
//!
//! ## Failure model
//!
//! Aggregation, validator-set and consensus-param failures are returned as
//! [`ExportError`]s; no partial snapshot is ever returned. Invariant
//! violations and signing-info persistence failures during zero-height
//! preparation are [`FatalError`]s, handled by the configured
//! [`HaltPolicy`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod validators;
pub mod zero_height;

// Re-export component crates
pub use genesis_export_core as core;
pub use genesis_export_store as store;

pub use config::{ExportConfig, HaltPolicy};
pub use coordinator::{Collaborators, ExportCoordinator};
pub use error::{ExportError, FatalError, Result, ValidatorSetError};
pub use validators::ValidatorSetReader;
pub use zero_height::{ZeroHeightPreparer, ZeroHeightReport};

pub use genesis_export_core::{ExportedState, ModuleName, ValidatorRecord};
