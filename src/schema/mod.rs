//! Schema module for synthesizing schema.org JSON-LD documents
//!
//! # Components
//!
//! - `Classifier`: Ordered keyword rules that pick a schema.org type
//! - `build_prompt`: Bounded prompt describing one page
//! - `Inference`: Injected text-generation capability (Ollama client shipped)
//! - `SchemaGenerator`: Classify, prompt, infer, validate, fall back

mod classify;
mod generator;
mod inference;
mod prompt;

pub use classify::{Classifier, ContentType, Rule};
pub use generator::{fallback_document, parse_schema, strip_code_fences, SchemaGenerator};
pub use inference::{build_inference, DisabledInference, Inference, InferenceError, OllamaInference};
pub use prompt::{build_prompt, MARKDOWN_CHARS};

use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Value of `@context` in every generated document
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Faults that cause a page to receive the fallback document
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{0}")]
    Inference(#[from] InferenceError),

    #[error("inference timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generated JSON-LD is not a valid object")]
    NotAnObject,
}

/// A JSON-LD object guaranteed to carry `@context` and `@type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaDocument(Map<String, Value>);

impl SchemaDocument {
    fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the `@context` value when it is a string
    pub fn context(&self) -> Option<&str> {
        self.0.get("@context").and_then(Value::as_str)
    }

    /// Returns the `@type` value when it is a string
    pub fn type_name(&self) -> Option<&str> {
        self.0.get("@type").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<SchemaDocument> for Value {
    fn from(document: SchemaDocument) -> Self {
        Value::Object(document.0)
    }
}
