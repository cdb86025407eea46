#![deny(unreachable_pub)]
//! Racer positions report
//!
//! Reads each racer's open trades from the trade cache, renders them into
//! a tabbed Bootstrap page and publishes the page to Cloudflare Workers KV.

pub mod config;
mod errors;
pub mod report;
pub mod runner;
pub mod server;
pub mod sink;
pub mod source;

pub use errors::{PublishError, ReportError, ReportResult};
pub use report::{Command, Racer, ReportDocument, TradeRecord};
