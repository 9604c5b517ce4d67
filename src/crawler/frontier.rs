//! Crawl frontier management
//!
//! This module handles:
//! - FIFO queue of normalized URLs still to visit
//! - Deduplication against both queued and visited URLs
//! - The page budget

use crate::url::{normalize_url, NormalizedUrl};
use crate::UrlError;
use std::collections::{HashSet, VecDeque};

/// A queued URL: the address to request and its dedup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL as it was first discovered
    pub url: String,
    pub key: NormalizedUrl,
}

/// Frontier of discovered-but-unvisited URLs plus the visited set
///
/// URLs are handed out in discovery order. Once a URL has been handed out it
/// is visited, whatever the outcome of its fetch, and can never be queued
/// again. Later spellings of a queued URL are dropped, so the first one seen
/// is the one requested.
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting to be visited, oldest first
    queue: VecDeque<QueuedUrl>,

    /// Keys of everything currently in `queue`
    queued: HashSet<String>,

    /// Keys of everything already handed out
    visited: HashSet<String>,

    /// Maximum number of URLs handed out
    budget: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given page budget
    pub fn new(budget: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            budget,
        }
    }

    /// Adds a URL unless its normalized form is already queued or visited
    ///
    /// Returns Ok(true) if the URL was added, or an error if it cannot be
    /// normalized.
    pub fn add_to_frontier(&mut self, url: &str) -> Result<bool, UrlError> {
        let key = normalize_url(url)?;
        if self.visited.contains(key.as_str()) || self.queued.contains(key.as_str()) {
            return Ok(false);
        }
        self.queued.insert(key.as_str().to_string());
        self.queue.push_back(QueuedUrl {
            url: url.trim().to_string(),
            key,
        });
        Ok(true)
    }

    /// Takes the next URL to visit and marks it visited
    ///
    /// Returns None once the frontier is empty or the budget is spent.
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        if self.budget_exhausted() {
            return None;
        }
        let next = self.queue.pop_front()?;
        self.queued.remove(next.key.as_str());
        self.visited.insert(next.key.as_str().to_string());
        Some(next)
    }

    pub fn is_visited(&self, key: &NormalizedUrl) -> bool {
        self.visited.contains(key.as_str())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_size(&self) -> usize {
        self.queue.len()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.budget
    }
}
