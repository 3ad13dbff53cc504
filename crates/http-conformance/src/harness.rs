//! Runner that replays the catalog against both servers

use crate::catalog::TestCase;
use crate::client::{CapturedResponse, ServerClient, ServerRole};
use crate::compare::{compare_responses, HeaderDiff};
use crate::config::ComparisonConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::report::write_failure_artifact;
use crate::results_dir::reset_results_dir;
use chrono::Local;
use serde::Serialize;
use std::error::Error as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What went wrong in a failing test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetails {
    pub reference_status: u16,
    pub candidate_status: u16,
    pub header_diffs: Vec<HeaderDiff>,
    pub body_match: bool,
}

/// Result of a single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Status, headers (modulo the ignore set) and body all matched
    Pass,
    /// Both servers answered but the responses diverged
    Fail(FailureDetails),
    /// One of the requests did not produce a response
    Error(String),
}

/// Outcome of one catalog entry, plus where its artifact went
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub artifact: Option<PathBuf>,
}

/// Aggregate counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Replays test cases against the reference and candidate servers
pub struct ComparisonRunner {
    pub config: ComparisonConfig,
    reference: ServerClient,
    candidate: ServerClient,
    pub results: Vec<TestReport>,
}

impl ComparisonRunner {
    /// Create a new runner from config
    pub fn new(config: ComparisonConfig) -> ConformanceResult<Self> {
        let reference =
            ServerClient::new(ServerRole::Reference, &config.reference_url, config.timeout)?;
        let candidate =
            ServerClient::new(ServerRole::Candidate, &config.candidate_url, config.timeout)?;

        Ok(Self {
            config,
            reference,
            candidate,
            results: Vec::new(),
        })
    }

    /// Wipe and recreate the results directory. Must succeed before any test runs.
    pub fn prepare(&self) -> ConformanceResult<()> {
        reset_results_dir(&self.config.results_dir)?;
        info!("Prepared results directory {:?}", self.config.results_dir);
        Ok(())
    }

    /// Run one test case.
    ///
    /// Request failures become [`TestOutcome::Error`]; only a failed artifact
    /// write is returned as `Err`.
    pub async fn run_test(&mut self, case: &TestCase) -> ConformanceResult<&TestReport> {
        print!("Testing {:20} ... ", case.name);
        let _ = io::stdout().flush();

        let report = match self.exchange(case).await {
            Ok((reference, candidate)) => self.judge(case, &reference, &candidate)?,
            Err(e) => {
                let message = describe(&e);
                warn!(test = %case.name, "request failed: {}", message);
                println!("🔥 ERROR: {}", message);
                TestReport {
                    name: case.name.clone(),
                    outcome: TestOutcome::Error(message),
                    artifact: None,
                }
            }
        };

        self.results.push(report);
        Ok(&self.results[self.results.len() - 1])
    }

    /// Run every case in order. Failures never stop the run early.
    pub async fn run_all(&mut self, cases: &[TestCase]) -> ConformanceResult<RunSummary> {
        for case in cases {
            self.run_test(case).await?;
        }
        Ok(self.summary())
    }

    async fn exchange(
        &self,
        case: &TestCase,
    ) -> ConformanceResult<(CapturedResponse, CapturedResponse)> {
        let reference = self.reference.send(case).await?;
        let candidate = self.candidate.send(case).await?;
        Ok((reference, candidate))
    }

    fn judge(
        &self,
        case: &TestCase,
        reference: &CapturedResponse,
        candidate: &CapturedResponse,
    ) -> ConformanceResult<TestReport> {
        let comparison = compare_responses(reference, candidate);
        if comparison.is_match() {
            println!("✅ PASS");
            return Ok(TestReport {
                name: case.name.clone(),
                outcome: TestOutcome::Pass,
                artifact: None,
            });
        }

        println!("❌ FAIL");
        let artifact = write_failure_artifact(
            &self.config.results_dir,
            &case.name,
            reference,
            candidate,
            &comparison.header_diffs,
            &Local::now(),
        )?;

        Ok(TestReport {
            name: case.name.clone(),
            outcome: TestOutcome::Fail(FailureDetails {
                reference_status: reference.status.as_u16(),
                candidate_status: candidate.status.as_u16(),
                header_diffs: comparison.header_diffs,
                body_match: comparison.body_match,
            }),
            artifact: Some(artifact),
        })
    }

    pub fn summary(&self) -> RunSummary {
        self.results
            .iter()
            .fold(RunSummary::default(), |mut summary, report| {
                summary.total += 1;
                match report.outcome {
                    TestOutcome::Pass => summary.passed += 1,
                    TestOutcome::Fail(_) => summary.failed += 1,
                    TestOutcome::Error(_) => summary.errored += 1,
                }
                summary
            })
    }

    /// Check if all tests passed
    pub fn all_passed(&self) -> bool {
        self.summary().all_passed()
    }

    /// Print summary of all results
    pub fn print_summary(&self) {
        let summary = self.summary();

        println!();
        println!("Results: {}/{} passed", summary.passed, summary.total);
        if summary.all_passed() {
            println!("✅ All tests passed!");
            return;
        }

        println!("❌ {} failed, {} errored", summary.failed, summary.errored);
        for report in &self.results {
            if let Some(ref artifact) = report.artifact {
                println!("   {} -> {}", report.name, artifact.display());
            }
        }
    }

    /// Write every report as JSON for downstream tooling
    pub fn write_json_summary(&self, path: &Path) -> ConformanceResult<()> {
        #[derive(Serialize)]
        struct SummaryFile<'a> {
            reference_url: &'a str,
            candidate_url: &'a str,
            summary: RunSummary,
            results: &'a [TestReport],
        }

        let file = SummaryFile {
            reference_url: self.reference.base_url(),
            candidate_url: self.candidate.base_url(),
            summary: self.summary(),
            results: &self.results,
        };

        serde_json::to_vec_pretty(&file)
            .map_err(io::Error::from)
            .and_then(|bytes| fs::write(path, bytes))
            .map_err(|source| ConformanceError::WriteSummary {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Error message including the transport-level cause, e.g. "connection refused".
fn describe(err: &ConformanceError) -> String {
    let mut message = err.to_string();
    // The direct source is already part of the top-level message.
    let mut cause = err.source().and_then(|s| s.source());
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
