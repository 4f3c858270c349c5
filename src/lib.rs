//! Static HTML report for a suite of floating-point accuracy runs.
//!
//! The report is rebuilt from scratch for every filter state: results are
//! loaded once by [`loader::ResultsLoader`], and [`page::render_body`] turns
//! the document plus a [`filter::FilterState`] into an element tree.

pub mod app;
pub mod charts;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod filter;
pub mod filter_ui;
pub mod loader;
pub mod page;
pub mod plot;
pub mod results;
pub mod stats;
pub mod table;

pub use error::{ReportError, Result};
