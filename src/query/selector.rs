//! Rich query selector construction
//!
//! A selector always constrains `docType`; extra equality filters are ANDed.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// Name of the discriminator field in every stored document
pub const DOC_TYPE_FIELD: &str = "docType";

/// Equality selector over one document type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    doc_type: String,
    filters: BTreeMap<String, String>,
}

impl Selector {
    /// All documents of `doc_type`
    pub fn doc_type(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            filters: BTreeMap::new(),
        }
    }

    /// Build from a type and a mapping of extra attribute filters
    pub fn build<I, K, V>(doc_type: impl Into<String>, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        filters
            .into_iter()
            .fold(Self::doc_type(doc_type), |selector, (k, v)| selector.and_eq(k, v))
    }

    /// Add `attribute == value`
    ///
    /// A filter on `docType` itself is ignored; the discriminator is fixed.
    pub fn and_eq(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        let attribute = attribute.into();
        if attribute != DOC_TYPE_FIELD {
            self.filters.insert(attribute, value.into());
        }
        self
    }

    /// The document type constrained by this selector
    pub fn target_type(&self) -> &str {
        &self.doc_type
    }

    /// Selector expression as a JSON value
    pub fn to_value(&self) -> Value {
        let mut selector = Map::new();
        selector.insert(DOC_TYPE_FIELD.to_string(), Value::String(self.doc_type.clone()));
        for (attribute, value) in &self.filters {
            selector.insert(attribute.clone(), Value::String(value.clone()));
        }
        json!({ "selector": selector })
    }

    /// Query string handed to the host engine
    pub fn to_query_string(&self) -> String {
        self.to_value().to_string()
    }
}
