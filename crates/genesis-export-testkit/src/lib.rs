//! # Genesis Export Testkit
//!
//! Testing utilities for the genesis exporter.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Module states with the exact app-state bytes they must render to
//! - **Generators**: Proptest strategies for validator sets, modules and whole chains
//! - **Fixtures**: A reference chain and a builder for variations of it
//! - **Faults**: Collaborators that fail on demand
//!
//! ## Golden Vectors
//!
//! ```rust
//! use genesis_export_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, _) in verify_all_vectors() {
//!     assert!(matches, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use genesis_export_testkit::generators::ChainParams;
//! use genesis_export::ExportConfig;
//!
//! proptest! {
//!     #[test]
//!     fn export_is_idempotent(params: ChainParams) {
//!         let fixture = params.build();
//!         let exporter = fixture.coordinator(ExportConfig::propagating());
//!         let a = exporter.export(false, &[], &[]).unwrap();
//!         let b = exporter.export(false, &[], &[]).unwrap();
//!         prop_assert_eq!(a.app_state, b.app_state);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use genesis_export::ExportConfig;
//! use genesis_export_testkit::fixtures::ChainFixture;
//!
//! let fixture = ChainFixture::new();
//! let exported = fixture
//!     .coordinator(ExportConfig::propagating())
//!     .export(false, &[], &[])
//!     .unwrap();
//! assert_eq!(exported.height, 101);
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faults::{FailingModule, FailingSigningInfoStore, UnavailableValidators};
pub use fixtures::{module_name, validator_address, ChainFixture, FixtureBuilder};
pub use generators::ChainParams;
pub use vectors::{all_vectors, render_vector, verify_all_vectors, GoldenVector};

/// Install a test-friendly tracing subscriber once per process.
///
/// Output goes through the test harness so it only shows for failing
/// tests. Honors `RUST_LOG`; defaults to `debug` for the exporter crates.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "genesis_export=debug,genesis_export_store=debug,genesis_export_core=debug",
        )
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
