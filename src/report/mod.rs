//! Report Module
//!
//! Turns per-racer trade records into one multi-tab HTML page.
//!
//! # Pipeline
//!
//! ```text
//! TradeRecord ──format_record──▶ rows ──render_tbody──▶ body
//!   body ──render_table──▶ table ──render_pane──▶ pane
//!   label ──render_tab──▶ tab
//! ReportDocument collects (tab, pane) per racer, then finalize() emits the page
//! ```
//!
//! # Usage Pattern
//!
//! ```ignore
//! use racer_report::report::{Racer, ReportDocument};
//!
//! let mut doc = ReportDocument::new(&settings.report);
//! for (i, racer) in settings.racers.iter().enumerate() {
//!     let records = source.records(&racer.id).await?;
//!     doc.process(i, racer, &records);
//! }
//! let html = doc.finalize();
//! ```

mod document;
pub mod format;
pub mod fragments;
mod record;

pub use document::ReportDocument;
pub use format::{format_open_time, format_open_time_in, format_record};
pub use record::{sort_records, Command, Identifier, OpenTime, Racer, TradeRecord};
