//! Failure artifacts
//!
//! One plain-text `.diff` file is written per failing test case, holding the
//! two status codes, the header discrepancies and a unified diff of the bodies.
//!
//! Header names appear lower-cased, as the HTTP client normalises them on
//! receipt; the casing the server wrote is not recoverable. Bodies and header
//! values are decoded lossily here for display only.

use crate::client::CapturedResponse;
use crate::compare::HeaderDiff;
use crate::error::{ConformanceError, ConformanceResult};
use chrono::{DateTime, TimeZone};
use similar::TextDiff;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 60;

/// `{name}_{HHMMSS}.diff`
pub fn artifact_file_name<Tz: TimeZone>(name: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.diff", name, at.format("%H%M%S"))
}

/// Line-based unified diff of two bodies, reference as "from".
pub fn body_diff(reference: &str, candidate: &str) -> String {
    let old: Vec<&str> = reference.lines().collect();
    let new: Vec<&str> = candidate.lines().collect();
    let diff = TextDiff::configure().diff_slices(&old, &new);

    diff.unified_diff()
        .context_radius(3)
        .missing_newline_hint(false)
        .header("reference", "candidate")
        .to_string()
}

/// Render the artifact text for one failing test case
pub fn render_report(
    name: &str,
    reference: &CapturedResponse,
    candidate: &CapturedResponse,
    header_diffs: &[HeaderDiff],
) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "TEST FAILURE: {}", name);
    let _ = writeln!(
        out,
        "Status (reference | candidate): {} | {}",
        reference.status.as_u16(),
        candidate.status.as_u16()
    );
    let _ = writeln!(out, "{}", rule);

    if !header_diffs.is_empty() {
        let _ = writeln!(out, "HEADER DISCREPANCIES:");
        for diff in header_diffs {
            let _ = writeln!(out, "  - {}", diff);
        }
        let _ = writeln!(out, "{}", rule);
    }

    let _ = writeln!(out, "BODY DIFF (reference vs candidate):");
    let (reference_text, candidate_text) = (reference.text(), candidate.text());
    if reference.body != candidate.body && reference_text == candidate_text {
        let _ = writeln!(
            out,
            "Bodies differ in bytes that are not valid UTF-8 ({} vs {} bytes)",
            reference.body.len(),
            candidate.body.len()
        );
    }
    out.push_str(&body_diff(&reference_text, &candidate_text));
    out
}

/// Write the failure artifact for `name` into `dir`, returning its path.
///
/// An existing file with the same name is never overwritten; a numeric
/// suffix is appended instead.
pub fn write_failure_artifact<Tz: TimeZone>(
    dir: &Path,
    name: &str,
    reference: &CapturedResponse,
    candidate: &CapturedResponse,
    header_diffs: &[HeaderDiff],
    at: &DateTime<Tz>,
) -> ConformanceResult<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let contents = render_report(name, reference, candidate, header_diffs);
    let file_name = artifact_file_name(name, at);
    let stem = file_name.trim_end_matches(".diff");

    let mut attempt = 0u32;
    loop {
        let path = if attempt == 0 {
            dir.join(&file_name)
        } else {
            dir.join(format!("{}_{}.diff", stem, attempt))
        };

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())
                    .map_err(|source| ConformanceError::WriteArtifact {
                        path: path.clone(),
                        source,
                    })?;
                info!("Wrote failure artifact: {:?}", path);
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(ConformanceError::WriteArtifact { path, source }),
        }
    }
}
