//! Configuration for comparison runs

use std::path::PathBuf;
use std::time::Duration;

/// Default URL of the reference server
pub const DEFAULT_REFERENCE_URL: &str = "http://localhost:9092";
/// Default URL of the server under test
pub const DEFAULT_CANDIDATE_URL: &str = "http://127.0.0.1:8081";
/// Default directory that receives failure artifacts
pub const DEFAULT_RESULTS_DIR: &str = "test_results";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a comparison run
///
/// Resolved once at the entry point and handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonConfig {
    /// Base URL of the trusted reference server
    pub reference_url: String,
    /// Base URL of the server under test
    pub candidate_url: String,
    /// Directory wiped at the start of a run and filled with `.diff` files
    pub results_dir: PathBuf,
    /// Timeout applied to every single request
    pub timeout: Duration,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_URL, DEFAULT_CANDIDATE_URL)
    }
}

impl ComparisonConfig {
    /// Create a configuration for the given pair of servers
    pub fn new(reference_url: &str, candidate_url: &str) -> Self {
        Self {
            reference_url: normalize_base_url(reference_url),
            candidate_url: normalize_base_url(candidate_url),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.results_dir = results_dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalog paths all start with `/`, so base URLs are kept without one.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
