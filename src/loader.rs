use crate::error::{ReportError, Result};
use crate::results::ResultsDocument;
use reqwest::header::CONTENT_TYPE;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Where the results JSON lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsSource {
    Path(PathBuf),
    Url(String),
}

impl ResultsSource {
    /// `http://` and `https://` locations are fetched, anything else is a
    /// local path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            ResultsSource::Url(location.to_string())
        } else {
            ResultsSource::Path(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for ResultsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsSource::Path(p) => write!(f, "{}", p.display()),
            ResultsSource::Url(u) => f.write_str(u),
        }
    }
}

/// Raw retrieval of the results body.
pub trait Fetch {
    fn fetch(&self, source: &ResultsSource) -> Result<String>;
}

/// Reads files from disk and fetches URLs with a blocking HTTP client.
#[derive(Debug, Default)]
pub struct DefaultFetcher {
    client: reqwest::blocking::Client,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for DefaultFetcher {
    fn fetch(&self, source: &ResultsSource) -> Result<String> {
        match source {
            ResultsSource::Path(path) => Ok(std::fs::read_to_string(path)?),
            ResultsSource::Url(url) => {
                let resp = self
                    .client
                    .get(url)
                    .header(CONTENT_TYPE, "text/plain")
                    .send()?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(ReportError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(resp.text()?)
            }
        }
    }
}

/// Loads the results document once and hands out the cached copy after.
///
/// The lock is held for the whole first load, so concurrent callers wait
/// for it instead of issuing a second fetch.
pub struct ResultsLoader<F: Fetch = DefaultFetcher> {
    source: ResultsSource,
    fetcher: F,
    cached: Mutex<Option<Arc<ResultsDocument>>>,
}

impl ResultsLoader<DefaultFetcher> {
    pub fn new(source: ResultsSource) -> Self {
        Self::with_fetcher(source, DefaultFetcher::new())
    }
}

impl<F: Fetch> ResultsLoader<F> {
    pub fn with_fetcher(source: ResultsSource, fetcher: F) -> Self {
        ResultsLoader {
            source,
            fetcher,
            cached: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &ResultsSource {
        &self.source
    }

    pub fn get_results(&self) -> Result<Arc<ResultsDocument>> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(doc) = cached.as_ref() {
            debug!(source = %self.source, "results served from cache");
            return Ok(Arc::clone(doc));
        }

        info!(source = %self.source, "loading results");
        let body = self.fetcher.fetch(&self.source)?;
        let doc = Arc::new(ResultsDocument::from_json(&body)?);
        info!(tests = doc.tests.len(), "results loaded");
        *cached = Some(Arc::clone(&doc));
        Ok(doc)
    }
}
