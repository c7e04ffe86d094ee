//! JSON-LD schema generation with deterministic fallback

use super::classify::{Classifier, ContentType};
use super::inference::Inference;
use super::prompt::build_prompt;
use super::{SchemaDocument, SchemaError, SCHEMA_CONTEXT};
use crate::crawler::PageRecord;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Generates one schema document per page record
pub struct SchemaGenerator {
    inference: Arc<dyn Inference>,
    classifier: Classifier,
    timeout: Duration,
}

impl SchemaGenerator {
    /// Creates a generator using the default classification rules
    ///
    /// # Arguments
    ///
    /// * `inference` - Inference capability used for every page
    /// * `timeout` - Upper bound on a single inference call
    pub fn new(inference: Arc<dyn Inference>, timeout: Duration) -> Self {
        Self {
            inference,
            classifier: Classifier::default(),
            timeout,
        }
    }

    /// Replaces the classification rules
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Classifies a page record
    pub fn classify(&self, record: &PageRecord) -> ContentType {
        self.classifier
            .classify(&record.metadata.title, &record.markdown)
    }

    /// Generates the schema document for a page, never failing
    pub async fn generate(&self, record: &PageRecord) -> SchemaDocument {
        self.generate_reporting(record).await.0
    }

    /// Generates the schema document for a page
    ///
    /// # Returns
    ///
    /// The generated document and, when generation faulted and the fallback
    /// document was used instead, the fault that caused it
    pub async fn generate_reporting(
        &self,
        record: &PageRecord,
    ) -> (SchemaDocument, Option<SchemaError>) {
        let content_type = self.classify(record);

        match self.try_generate(record, content_type).await {
            Ok(document) => (document, None),
            Err(e) => {
                tracing::error!("Error generating JSON-LD for {}: {}", record.url, e);
                (fallback_document(record), Some(e))
            }
        }
    }

    async fn try_generate(
        &self,
        record: &PageRecord,
        content_type: ContentType,
    ) -> Result<SchemaDocument, SchemaError> {
        let prompt = build_prompt(record, content_type);
        tracing::debug!("Generating JSON-LD for {} as {}", record.url, content_type);

        let text = tokio::time::timeout(self.timeout, self.inference.infer(&prompt))
            .await
            .map_err(|_| SchemaError::Timeout(self.timeout))??;

        parse_schema(&text, content_type)
    }
}

/// Removes a surrounding markdown code fence from generated text
///
/// ```
/// use schema_crawler::schema::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
/// assert_eq!(strip_code_fences("  {}  "), "{}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with("```json") {
        trimmed
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses generated text into a schema document
///
/// The text must decode to a JSON object. A missing `@context` is set to
/// `https://schema.org` and a missing `@type` to the classified type.
pub fn parse_schema(text: &str, content_type: ContentType) -> Result<SchemaDocument, SchemaError> {
    let value: Value = serde_json::from_str(&strip_code_fences(text))?;

    let Value::Object(mut map) = value else {
        return Err(SchemaError::NotAnObject);
    };

    map.entry("@context")
        .or_insert_with(|| Value::String(SCHEMA_CONTEXT.to_string()));
    map.entry("@type")
        .or_insert_with(|| Value::String(content_type.as_str().to_string()));

    Ok(SchemaDocument::from_map(map))
}

/// Builds the deterministic fallback document for a page
pub fn fallback_document(record: &PageRecord) -> SchemaDocument {
    let metadata = &record.metadata;
    let mut map = Map::new();

    map.insert("@context".into(), SCHEMA_CONTEXT.into());
    map.insert("@type".into(), ContentType::WebPage.as_str().into());
    map.insert(
        "name".into(),
        non_empty_or(&metadata.title, "Untitled Page").into(),
    );
    map.insert("url".into(), record.url.clone().into());
    map.insert(
        "description".into(),
        non_empty_or(&metadata.description, "No description available").into(),
    );
    map.insert("dateModified".into(), chrono::Utc::now().to_rfc3339().into());
    map.insert("wordCount".into(), metadata.word_count.into());

    SchemaDocument::from_map(map)
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Metadata;
    use crate::schema::{InferenceError, Rule};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Inference that returns a fixed reply and records prompts
    struct FixedInference {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedInference {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Inference for FixedInference {
        async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(InferenceError::Api)
        }
    }

    struct SlowInference;

    #[async_trait]
    impl Inference for SlowInference {
        async fn infer(&self, _prompt: &str) -> Result<String, InferenceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("{}".to_string())
        }
    }

    fn record(title: &str, markdown: &str) -> PageRecord {
        PageRecord {
            url: "https://example.com/faq".to_string(),
            metadata: Metadata {
                title: title.to_string(),
                description: "Answers".to_string(),
                word_count: 42,
                ..Metadata::default()
            },
            markdown: markdown.to_string(),
            html: String::new(),
            text_content: String::new(),
            links: Vec::new(),
        }
    }

    fn generator(inference: Arc<dyn Inference>) -> SchemaGenerator {
        SchemaGenerator::new(inference, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_generated_document_kept() {
        let inference = FixedInference::ok(
            r#"{"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}"#,
        );
        let (document, fault) = generator(inference.clone())
            .generate_reporting(&record("FAQ", ""))
            .await;

        assert!(fault.is_none());
        assert_eq!(document.type_name(), Some("Organization"));
        assert_eq!(document.get("name"), Some(&Value::from("Acme")));
        assert!(inference.prompts.lock().unwrap()[0].contains("Content Type: FAQPage"));
    }

    #[tokio::test]
    async fn test_custom_classifier_drives_prompt() {
        let inference = FixedInference::ok("{}");
        let generator = generator(inference.clone()).with_classifier(Classifier::with_rules(vec![
            Rule::new(&["pricing"], ContentType::Product),
        ]));

        // The default FAQ rule is gone
        assert_eq!(generator.classify(&record("FAQ", "")), ContentType::WebPage);

        let document = generator.generate(&record("Plans", "See our Pricing")).await;
        assert_eq!(document.type_name(), Some("Product"));
        assert!(inference.prompts.lock().unwrap()[0].contains("Content Type: Product"));
    }

    #[tokio::test]
    async fn test_missing_context_and_type_filled() {
        let inference = FixedInference::ok("```json\n{\"name\": \"Acme\"}\n```");
        let document = generator(inference).generate(&record("FAQ", "")).await;

        assert_eq!(document.context(), Some(SCHEMA_CONTEXT));
        assert_eq!(document.type_name(), Some("FAQPage"));
    }

    #[tokio::test]
    async fn test_inference_failure_falls_back() {
        let inference = FixedInference::failing("model unavailable");
        let (document, fault) = generator(inference)
            .generate_reporting(&record("Questions", ""))
            .await;

        assert!(matches!(fault, Some(SchemaError::Inference(_))));
        assert_eq!(document.context(), Some(SCHEMA_CONTEXT));
        assert_eq!(document.type_name(), Some("WebPage"));
        assert_eq!(document.get("name"), Some(&Value::from("Questions")));
        assert_eq!(
            document.get("url"),
            Some(&Value::from("https://example.com/faq"))
        );
        assert_eq!(document.get("description"), Some(&Value::from("Answers")));
        assert_eq!(document.get("wordCount"), Some(&Value::from(42)));
        assert!(document.get("dateModified").is_some());
    }

    #[tokio::test]
    async fn test_non_object_falls_back() {
        let inference = FixedInference::ok("[1, 2, 3]");
        let (document, fault) = generator(inference)
            .generate_reporting(&record("", ""))
            .await;

        assert!(matches!(fault, Some(SchemaError::NotAnObject)));
        assert_eq!(document.get("name"), Some(&Value::from("Untitled Page")));
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        let inference = FixedInference::ok("Sure! Here is your schema:");
        let (_, fault) = generator(inference)
            .generate_reporting(&record("", ""))
            .await;

        assert!(matches!(fault, Some(SchemaError::Json(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let (document, fault) = generator(Arc::new(SlowInference))
            .generate_reporting(&record("", ""))
            .await;

        assert!(matches!(fault, Some(SchemaError::Timeout(_))));
        assert_eq!(document.type_name(), Some("WebPage"));
    }

    #[test]
    fn test_fallback_defaults() {
        let mut page = record("", "");
        page.metadata.description.clear();
        let document = fallback_document(&page);

        assert_eq!(document.get("name"), Some(&Value::from("Untitled Page")));
        assert_eq!(
            document.get("description"),
            Some(&Value::from("No description available"))
        );
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_existing_context_preserved() {
        let document = parse_schema(
            r#"{"@context": "http://schema.org/", "@type": "Product"}"#,
            ContentType::WebPage,
        )
        .unwrap();

        assert_eq!(document.context(), Some("http://schema.org/"));
        assert_eq!(document.type_name(), Some("Product"));
    }
}
