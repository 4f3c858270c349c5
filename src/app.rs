use crate::config::ReportConfig;
use crate::element::Node;
use crate::error::Result;
use crate::filter::FilterState;
use crate::filter_ui::FilterEvent;
use crate::loader::{DefaultFetcher, Fetch, ResultsLoader};
use crate::page::{error_body, render_body, wrap_document};
use crate::results::ResultsDocument;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns everything a report render needs: the loader with its cached
/// document, the current filter state and the report options.
pub struct ReportApp<F: Fetch = DefaultFetcher> {
    loader: ResultsLoader<F>,
    filter: FilterState,
    config: ReportConfig,
}

impl<F: Fetch> ReportApp<F> {
    pub fn new(loader: ResultsLoader<F>, config: ReportConfig) -> Self {
        let filter = FilterState::with_excluded(config.exclude.iter().copied());
        ReportApp {
            loader,
            filter,
            config,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn results(&self) -> Result<Arc<ResultsDocument>> {
        self.loader.get_results()
    }

    /// Render the body for the current state. A failed load renders an
    /// error body instead of propagating.
    pub fn render(&self) -> Node {
        self.body_for(&self.loader.get_results())
    }

    /// Body for a load that was already attempted. Failures are not cached,
    /// so a caller that needs both the page and the outcome loads once and
    /// renders from that.
    pub fn body_for(&self, loaded: &Result<Arc<ResultsDocument>>) -> Node {
        match loaded {
            Ok(doc) => render_body(doc, &self.filter, &self.config),
            Err(err) => {
                warn!(
                    source = %self.loader.source(),
                    error = %err,
                    "rendering error page"
                );
                error_body(err, &self.config)
            }
        }
    }

    /// Full HTML document for the current state.
    pub fn render_html(&self) -> String {
        self.html_for(&self.loader.get_results())
    }

    pub fn html_for(&self, loaded: &Result<Arc<ResultsDocument>>) -> String {
        wrap_document(&self.config.title, &self.body_for(loaded))
    }

    /// Apply a checkbox click and rebuild the whole body.
    pub fn dispatch(&mut self, event: FilterEvent) -> Node {
        event.apply(&mut self.filter);
        info!(
            event = ?event,
            hidden = self.filter.excluded().count(),
            "filters changed, re-rendering"
        );
        self.render()
    }
}
