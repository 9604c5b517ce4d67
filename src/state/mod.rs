//! State module for tracking audit progress
//!
//! # Components
//!
//! - `PreferredFormat` / `FormatLatch`: the site's detected scheme/host format, set once per run
//! - `PageRecord`, `Issue`: per-page findings
//! - `AuditSession`: everything accumulated over a run

mod format;
mod session;

pub use format::{FormatLatch, PreferredFormat};
pub use session::{AuditSession, FetchFailure, Issue, IssueKind, PageRecord};
