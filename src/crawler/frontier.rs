//! Frontier for managing the crawl queue
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched (breadth-first traversal)
//! - Deduplication against both pending and visited URLs
//! - URL admission (validity, blocklists, scope)
//! - The page budget that bounds a crawl

use crate::url::{check_admissible, normalize_url};
use std::collections::{HashSet, VecDeque};

/// Frontier manages the to-visit queue and the visited set of one crawl
///
/// All URLs are stored in normalized form, so a page reachable through
/// several fragment variants is queued and visited once.
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<String>,

    /// Mirror of `queue` for constant-time membership checks
    pending: HashSet<String>,

    /// URLs that were fetched successfully
    visited: HashSet<String>,

    /// Site identity of the seed URL
    scope_domain: String,

    /// Whether URLs outside `scope_domain` are admitted
    allow_cross_domain: bool,

    /// Maximum number of visited pages
    page_budget: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `scope_domain` - Site identity (host plus explicit port) of the seed
    /// * `allow_cross_domain` - Whether to follow links off the scope domain
    /// * `page_budget` - Maximum number of pages to visit
    pub fn new(scope_domain: impl Into<String>, allow_cross_domain: bool, page_budget: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            scope_domain: scope_domain.into(),
            allow_cross_domain,
            page_budget,
        }
    }

    /// Returns true if the URL passes the admission policy for this crawl
    pub fn is_admissible(&self, url: &str) -> bool {
        match check_admissible(url, &self.scope_domain, self.allow_cross_domain) {
            Ok(_) => true,
            Err(reason) => {
                tracing::trace!("Rejected {}: {}", url, reason);
                false
            }
        }
    }

    /// Adds a URL to the back of the queue
    ///
    /// The URL is normalized first. It is admitted only if it has not been
    /// visited, is not already pending, and passes the admission policy.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The URL was rejected or is a duplicate
    pub fn enqueue(&mut self, url: &str) -> bool {
        let normalized = normalize_url(url);

        if self.visited.contains(&normalized) || self.pending.contains(&normalized) {
            return false;
        }

        if !self.is_admissible(&normalized) {
            return false;
        }

        self.pending.insert(normalized.clone());
        self.queue.push_back(normalized);
        true
    }

    /// Removes and returns the oldest queued URL
    pub fn dequeue(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.pending.remove(&url);
        Some(url)
    }

    /// Records a URL as visited
    ///
    /// Returns false if it was already visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(normalize_url(url))
    }

    /// Returns true if the URL (in normalized form) has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&normalize_url(url))
    }

    /// Returns true if the URL (in normalized form) is waiting in the queue
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(&normalize_url(url))
    }

    /// Returns true while there is queued work and budget left
    pub fn has_work(&self) -> bool {
        !self.queue.is_empty() && self.visited.len() < self.page_budget
    }

    /// Returns the number of visited pages
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns the number of URLs in the queue
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the page budget
    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    /// Returns the scope domain
    pub fn scope_domain(&self) -> &str {
        &self.scope_domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(budget: usize) -> Frontier {
        Frontier::new("example.com", false, budget)
    }

    #[test]
    fn test_fifo_order() {
        let mut f = frontier(10);
        assert!(f.enqueue("https://example.com/a"));
        assert!(f.enqueue("https://example.com/b"));
        assert!(f.enqueue("https://example.com/c"));

        assert_eq!(f.dequeue().as_deref(), Some("https://example.com/a"));
        assert_eq!(f.dequeue().as_deref(), Some("https://example.com/b"));
        assert_eq!(f.dequeue().as_deref(), Some("https://example.com/c"));
        assert_eq!(f.dequeue(), None);
    }

    #[test]
    fn test_pending_duplicates_rejected() {
        let mut f = frontier(10);
        assert!(f.enqueue("https://example.com/a"));
        assert!(!f.enqueue("https://example.com/a"));
        assert!(!f.enqueue("https://example.com/a#section"));
        assert_eq!(f.pending_count(), 1);
    }

    #[test]
    fn test_visited_rejected() {
        let mut f = frontier(10);
        assert!(f.mark_visited("https://example.com/a"));
        assert!(!f.mark_visited("https://example.com/a#top"));
        assert!(!f.enqueue("https://example.com/a"));
        assert!(f.is_visited("https://example.com/a#anything"));
    }

    #[test]
    fn test_dequeued_url_no_longer_pending() {
        let mut f = frontier(10);
        f.enqueue("https://example.com/a");
        let url = f.dequeue().unwrap();
        assert!(!f.is_pending(&url));

        // A fetch failure leaves it unvisited, so it may be rediscovered
        assert!(f.enqueue(&url));
    }

    #[test]
    fn test_admission_applied() {
        let mut f = frontier(10);
        assert!(!f.enqueue("https://other.com/"));
        assert!(!f.enqueue("https://example.com/file.pdf"));
        assert!(!f.enqueue("mailto:team@example.com"));
        assert!(f.is_empty());
    }

    #[test]
    fn test_cross_domain_allowed() {
        let mut f = Frontier::new("example.com", true, 10);
        assert!(f.enqueue("https://other.com/"));
        assert!(!f.enqueue("https://twitter.com/acme"));
    }

    #[test]
    fn test_budget_stops_work() {
        let mut f = frontier(2);
        f.enqueue("https://example.com/a");
        f.enqueue("https://example.com/b");
        f.enqueue("https://example.com/c");

        assert!(f.has_work());
        f.mark_visited("https://example.com/x");
        assert!(f.has_work());
        f.mark_visited("https://example.com/y");
        assert!(!f.has_work());
        assert_eq!(f.pending_count(), 3);
    }

    #[test]
    fn test_empty_queue_stops_work() {
        let f = frontier(5);
        assert!(!f.has_work());
    }
}
