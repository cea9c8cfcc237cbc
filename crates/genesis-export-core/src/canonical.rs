//! Canonical JSON rendering of the combined genesis document.
//!
//! The document is a map from module name to that module's opaque genesis
//! value. Rendering rules:
//! - Top-level keys in byte order of the module name (the map is a `BTreeMap`)
//! - Nested object keys in byte order (`serde_json::Map` without
//!   `preserve_order` is sorted)
//! - Two-space indentation, `\n` line breaks, no trailing newline
//!
//! The same document always renders to the same bytes, which is what makes
//! two exports of unchanged state byte-identical.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::ModuleName;

/// Indentation used for every rendered document.
pub const INDENT: &[u8] = b"  ";

/// The combined genesis document, keyed by module name.
pub type AppStateDocument = BTreeMap<ModuleName, Value>;

/// Render a genesis document to canonical indented JSON bytes.
pub fn canonical_app_state(doc: &AppStateDocument) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(buf)
}

/// Parse canonical app-state bytes back into a document.
pub fn parse_app_state(bytes: &[u8]) -> Result<AppStateDocument, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn module(name: &str) -> ModuleName {
        ModuleName::new(name).unwrap()
    }

    #[test]
    fn test_two_space_indent_and_sorted_modules() {
        let mut doc = AppStateDocument::new();
        doc.insert(module("slashing"), json!({ "params": {} }));
        doc.insert(module("auth"), json!({ "accounts": [] }));

        let bytes = canonical_app_state(&doc).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "{\n  \"auth\": {\n    \"accounts\": []\n  },\n  \"slashing\": {\n    \"params\": {}\n  }\n}"
        );
    }

    #[test]
    fn test_nested_keys_sorted() {
        let mut doc = AppStateDocument::new();
        doc.insert(module("bank"), json!({ "z": 1, "a": 2 }));

        let text = String::from_utf8(canonical_app_state(&doc).unwrap()).unwrap();
        let a = text.find("\"a\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        assert!(a < z);
    }

    #[test]
    fn test_empty_document() {
        let doc = AppStateDocument::new();
        assert_eq!(canonical_app_state(&doc).unwrap(), b"{}");
    }

    #[test]
    fn test_parse_back() {
        let mut doc = AppStateDocument::new();
        doc.insert(module("bank"), json!({ "supply": ["100stake"] }));

        let bytes = canonical_app_state(&doc).unwrap();
        let parsed = parse_app_state(&bytes).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_app_state(b"not json"),
            Err(CoreError::DecodingError(_))
        ));
    }
}
