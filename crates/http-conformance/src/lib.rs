//! Differential HTTP conformance checking
//!
//! Replays a fixed catalog of requests against a trusted reference server and
//! a server under test, and reports every divergence in status code, headers
//! or body.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │  Reference      │      │  Candidate      │
//! │  (nginx)        │      │  (under test)   │
//! │  :9092          │      │  :8081          │
//! └────────┬────────┘      └────────┬────────┘
//!          │                        │
//!          └──────────┬─────────────┘
//!                     │
//!              ┌──────▼──────┐      ┌──────────────┐
//!              │  Comparison │─────▶│ test_results │
//!              │  Runner     │      │  *.diff      │
//!              └─────────────┘      └──────────────┘
//! ```

pub mod catalog;
pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod harness;
pub mod report;
pub mod results_dir;

pub use catalog::TestCase;
pub use config::ComparisonConfig;
pub use error::{ConformanceError, ConformanceResult};
pub use harness::{ComparisonRunner, RunSummary, TestOutcome, TestReport};
