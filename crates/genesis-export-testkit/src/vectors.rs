//! Golden app-state vectors.
//!
//! Each vector pairs a set of module genesis values with the exact bytes
//! the canonical renderer must produce for them. Any change to key order,
//! indentation or escaping shows up here first.

use genesis_export_core::{canonical_app_state, AppStateDocument, CoreError, ModuleName};
use serde_json::Value;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Module name and that module's genesis as JSON text, in the order a
    /// registry would hand them over.
    pub modules: &'static [(&'static str, &'static str)],
    /// Expected rendered app state.
    pub expected_app_state: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty document",
            modules: &[],
            expected_app_state: "{}",
        },
        GoldenVector {
            name: "single module with empty state",
            modules: &[("bank", "{}")],
            expected_app_state: "{\n  \"bank\": {}\n}",
        },
        GoldenVector {
            name: "modules ordered by name",
            modules: &[
                ("staking", r#"{"params":{"bond_denom":"stake"}}"#),
                ("auth", r#"{"accounts":[]}"#),
            ],
            expected_app_state: r#"{
  "auth": {
    "accounts": []
  },
  "staking": {
    "params": {
      "bond_denom": "stake"
    }
  }
}"#,
        },
        GoldenVector {
            name: "nested keys sorted, arrays kept in order",
            modules: &[(
                "bank",
                r#"{"supply":["100stake","5atom"],"balances":[{"coins":[],"address":"cosmos1xyz"}]}"#,
            )],
            expected_app_state: r#"{
  "bank": {
    "balances": [
      {
        "address": "cosmos1xyz",
        "coins": []
      }
    ],
    "supply": [
      "100stake",
      "5atom"
    ]
  }
}"#,
        },
        GoldenVector {
            name: "scalar values",
            modules: &[(
                "ccvconsumer",
                r#"{"memo":null,"height":-1,"enabled":true}"#,
            )],
            expected_app_state: r#"{
  "ccvconsumer": {
    "enabled": true,
    "height": -1,
    "memo": null
  }
}"#,
        },
        GoldenVector {
            name: "escaped strings",
            modules: &[("gov", r#"{"title":"a \"quoted\" line\nbreak"}"#)],
            expected_app_state: r#"{
  "gov": {
    "title": "a \"quoted\" line\nbreak"
  }
}"#,
        },
    ]
}

/// Build the document a vector describes.
pub fn document_from_vector(vector: &GoldenVector) -> Result<AppStateDocument, CoreError> {
    let mut doc = AppStateDocument::new();
    for (name, genesis) in vector.modules {
        let name = ModuleName::new(*name)?;
        let value: Value = serde_json::from_str(genesis)
            .map_err(|e| CoreError::DecodingError(e.to_string()))?;
        doc.insert(name, value);
    }
    Ok(doc)
}

/// Render a vector's document to canonical bytes.
pub fn render_vector(vector: &GoldenVector) -> Result<Vec<u8>, CoreError> {
    canonical_app_state(&document_from_vector(vector)?)
}

/// Render every vector and compare against its expected bytes.
///
/// Returns `(name, matches, rendered)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let rendered = match render_vector(v) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => format!("<render failed: {}>", e),
            };
            let matches = rendered == v.expected_app_state;
            (v.name.to_string(), matches, rendered)
        })
        .collect()
}
