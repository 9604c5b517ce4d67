//! Site-wide probes that run after the crawl
//!
//! - Sitemap consistency (scheme and `www.` forms of listed URLs)
//! - Redirect patterns (all scheme/host permutations of a path)

mod patterns;
mod sitemap;

pub use patterns::{
    pattern_targets, probe_patterns, sample_paths, test_url_patterns, PatternOutcome,
    PatternReport, PatternResult, UrlPattern,
};
pub use sitemap::{check_sitemap, parse_sitemap_locs, summarize_sitemap, SitemapSummary};
