//! Crawler module for page fetching and analysis
//!
//! This module contains the core audit logic, including:
//! - HTTP fetching and manual redirect-chain following
//! - HTML parsing and link extraction
//! - Canonical and internal-link issue classification
//! - The crawl frontier and overall audit coordination

mod analyzer;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use analyzer::{analyze_page, check_canonical, check_internal_link, PageAnalysis};
pub use coordinator::{run_audit, Auditor};
pub use fetcher::{
    build_http_client, fetch_page, follow_redirects, is_redirect, FetchResult, RedirectChain,
    RedirectHop,
};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{parse_html, ParsedPage};
