//! Integration tests for siteprobe
//!
//! These tests use wiremock mock servers for the auditor and temporary
//! directories for the image optimizer.

mod common;
mod crawl_tests;
mod optimize_tests;
mod redirect_tests;
mod sitemap_tests;
