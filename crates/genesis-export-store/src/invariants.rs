//! Invariant registry: the reference [`InvariantChecker`].
//!
//! Modules register named invariants under a `module/route` pair. Asserting
//! runs them in registration order and stops at the first broken one.

use genesis_export_core::ExportContext;

use crate::traits::{InvariantChecker, InvariantViolation};

/// Outcome of a single invariant: `Err(message)` when broken.
pub type InvariantResult = std::result::Result<(), String>;

type InvariantFn = Box<dyn Fn(&ExportContext) -> InvariantResult + Send + Sync>;

struct RegisteredInvariant {
    module: String,
    route: String,
    check: InvariantFn,
}

/// Registry of named invariants.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<RegisteredInvariant>,
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invariant under `module/route`.
    pub fn register<F>(&mut self, module: impl Into<String>, route: impl Into<String>, check: F)
    where
        F: Fn(&ExportContext) -> InvariantResult + Send + Sync + 'static,
    {
        self.invariants.push(RegisteredInvariant {
            module: module.into(),
            route: route.into(),
            check: Box::new(check),
        });
    }

    /// Registered routes as `module/route`.
    pub fn routes(&self) -> Vec<String> {
        self.invariants
            .iter()
            .map(|i| format!("{}/{}", i.module, i.route))
            .collect()
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no invariant is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl InvariantChecker for InvariantRegistry {
    fn assert_invariants(&self, ctx: &ExportContext) -> Result<(), InvariantViolation> {
        for invariant in &self.invariants {
            if let Err(message) = (invariant.check)(ctx) {
                return Err(InvariantViolation {
                    module: invariant.module.clone(),
                    route: invariant.route.clone(),
                    message,
                });
            }
        }

        tracing::debug!(count = self.invariants.len(), height = ctx.height(), "invariants hold");
        Ok(())
    }
}
