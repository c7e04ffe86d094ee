//! Keyword-based content classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// schema.org type a page is classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "FAQPage")]
    FaqPage,
    Product,
    Service,
    AboutPage,
    ContactPage,
    Article,
    WebPage,
}

impl ContentType {
    /// Returns the schema.org type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FaqPage => "FAQPage",
            Self::Product => "Product",
            Self::Service => "Service",
            Self::AboutPage => "AboutPage",
            Self::ContactPage => "ContactPage",
            Self::Article => "Article",
            Self::WebPage => "WebPage",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule: any keyword present selects the content type
#[derive(Debug, Clone)]
pub struct Rule {
    pub keywords: Vec<String>,
    pub content_type: ContentType,
}

impl Rule {
    pub fn new(keywords: &[&str], content_type: ContentType) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            content_type,
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword.as_str()))
    }
}

/// Ordered rule table, first match wins
///
/// Rules are evaluated against the lowercased title and markdown joined by a
/// space. A page matching no rule is a [`ContentType::WebPage`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Creates a classifier from an explicit rule table
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Returns the rule table in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classifies a page from its title and markdown
    pub fn classify(&self, title: &str, markdown: &str) -> ContentType {
        let haystack = format!("{} {}", title, markdown).to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| rule.content_type)
            .unwrap_or(ContentType::WebPage)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_rules(vec![
            Rule::new(
                &["faq", "frequently asked", "questions and answers"],
                ContentType::FaqPage,
            ),
            Rule::new(
                &["buy now", "add to cart", "purchase", "price", "$", "₹"],
                ContentType::Product,
            ),
            Rule::new(&["service", "consulting", "solution"], ContentType::Service),
            Rule::new(
                &["about us", "about", "company", "team", "history"],
                ContentType::AboutPage,
            ),
            Rule::new(
                &["contact", "reach us", "get in touch", "address"],
                ContentType::ContactPage,
            ),
            Rule::new(
                &["blog", "article", "news", "post", "published"],
                ContentType::Article,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(title: &str, markdown: &str) -> ContentType {
        Classifier::default().classify(title, markdown)
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("", "Frequently Asked Questions"), ContentType::FaqPage);
        assert_eq!(classify("", "Add to cart"), ContentType::Product);
        assert_eq!(classify("", "Only ₹499"), ContentType::Product);
        assert_eq!(classify("", "IT consulting"), ContentType::Service);
        assert_eq!(classify("", "Our history"), ContentType::AboutPage);
        assert_eq!(classify("", "Get in touch"), ContentType::ContactPage);
        assert_eq!(classify("", "Latest news"), ContentType::Article);
        assert_eq!(classify("", "Hello world"), ContentType::WebPage);
    }

    #[test]
    fn test_first_match_wins() {
        // FAQ outranks the price keyword
        assert_eq!(classify("", "FAQ: what is the price?"), ContentType::FaqPage);
        // "$" outranks "about"
        assert_eq!(classify("", "About our $5 plan"), ContentType::Product);
    }

    #[test]
    fn test_title_participates() {
        assert_eq!(classify("Managed Services", "Hello"), ContentType::Service);
        assert_eq!(classify("Contact", ""), ContentType::ContactPage);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("", "BLOG"), ContentType::Article);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = Classifier::with_rules(vec![Rule::new(&["Recipe"], ContentType::Article)]);
        assert_eq!(classifier.classify("", "a recipe"), ContentType::Article);
        assert_eq!(classifier.classify("", "faq"), ContentType::WebPage);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ContentType::FaqPage.to_string(), "FAQPage");
        assert_eq!(
            serde_json::to_string(&ContentType::FaqPage).unwrap(),
            "\"FAQPage\""
        );
    }
}
