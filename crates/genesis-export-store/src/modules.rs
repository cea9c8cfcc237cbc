//! Module registry: the reference [`ModuleAggregator`].
//!
//! Each state-machine module contributes one [`ModuleExporter`]. The
//! registry runs them in registration order and collects their genesis
//! values under their module names.

use std::collections::BTreeSet;
use std::sync::Arc;

use genesis_export_core::{AppStateDocument, ExportContext, ModuleName, SigningInfo};
use serde_json::{json, Value};

use crate::error::{Result, StoreError};
use crate::traits::{ModuleAggregator, SigningInfoStore};

/// Exports one module's genesis state.
pub trait ModuleExporter: Send + Sync {
    /// The module's name; keys its entry in the combined document.
    fn name(&self) -> &ModuleName;

    /// Export the module's state at the context's height.
    fn export_genesis(&self, ctx: &ExportContext) -> Result<Value>;
}

/// A module whose genesis is a fixed value.
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: ModuleName,
    genesis: Value,
}

impl StaticModule {
    /// Create a module that always exports `genesis`.
    pub fn new(name: ModuleName, genesis: Value) -> Self {
        Self { name, genesis }
    }
}

impl ModuleExporter for StaticModule {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn export_genesis(&self, _ctx: &ExportContext) -> Result<Value> {
        Ok(self.genesis.clone())
    }
}

/// Exports slashing state from a signing-info store.
///
/// Genesis shape: `{ "signing_infos": [ ... ] }`, records in cursor order.
pub struct SlashingModule {
    name: ModuleName,
    signing_infos: Arc<dyn SigningInfoStore>,
}

impl SlashingModule {
    /// Create an exporter named `slashing` over a signing-info store.
    pub fn new(signing_infos: Arc<dyn SigningInfoStore>) -> Result<Self> {
        Ok(Self {
            name: ModuleName::new("slashing")
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
            signing_infos,
        })
    }
}

impl ModuleExporter for SlashingModule {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn export_genesis(&self, ctx: &ExportContext) -> Result<Value> {
        let infos: Vec<SigningInfo> = self.signing_infos.signing_info_cursor(ctx)?.collect();
        Ok(json!({ "signing_infos": serde_json::to_value(infos)? }))
    }
}

/// Ordered set of module exporters.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn ModuleExporter>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exporter. Names must be unique.
    pub fn register(&mut self, exporter: Arc<dyn ModuleExporter>) -> Result<()> {
        if self.contains(exporter.name()) {
            return Err(StoreError::DuplicateModule(exporter.name().clone()));
        }
        self.modules.push(exporter);
        Ok(())
    }

    /// Whether a module with this name is registered.
    pub fn contains(&self, name: &ModuleName) -> bool {
        self.modules.iter().any(|m| m.name() == name)
    }

    /// Registered module names, in export order.
    pub fn names(&self) -> Vec<ModuleName> {
        self.modules.iter().map(|m| m.name().clone()).collect()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleAggregator for ModuleRegistry {
    fn aggregate_genesis(
        &self,
        ctx: &ExportContext,
        modules: &[ModuleName],
    ) -> Result<AppStateDocument> {
        let selected: BTreeSet<&ModuleName> = modules.iter().collect();

        // Reject unknown names before running any exporter
        if let Some(unknown) = selected.iter().copied().find(|name| !self.contains(name)) {
            return Err(StoreError::UnknownModule(unknown.clone()));
        }

        let mut doc = AppStateDocument::new();
        for module in &self.modules {
            if !selected.is_empty() && !selected.contains(module.name()) {
                continue;
            }

            let genesis = module.export_genesis(ctx)?;
            tracing::debug!(module = %module.name(), height = ctx.height(), "exported module genesis");
            doc.insert(module.name().clone(), genesis);
        }

        Ok(doc)
    }
}
