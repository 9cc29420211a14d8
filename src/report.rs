//! CLI output formatting for build results.
//!
//! # Output Format
//!
//! One header line per phase, with per-file warnings indented underneath,
//! then a trailer naming the output location and the overall tally:
//!
//! ```text
//! ==> clean: 2 files
//! ==> php: 14 files
//! ==> styles: 6 files
//!     warning: assets/css/src/broken.css: Processing failed: bad nesting
//! ==> scripts: 3 files
//!
//! Output: ../acme
//! Archive: ../acme.zip
//! Done: 25 files, 1 failure
//! ```
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::bundle::{BuildSummary, PhaseOutcome};

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format one phase header plus its per-file warnings.
pub fn format_phase(phase: &PhaseOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "==> {}: {}",
        phase.name,
        plural(phase.files, "file")
    )];
    for failure in &phase.failures {
        lines.push(format!(
            "    warning: {}: {}",
            failure.path.display(),
            failure.error
        ));
    }
    lines
}

/// Format a finished build: every phase, then the output trailer.
pub fn format_summary(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for phase in &summary.phases {
        lines.extend(format_phase(phase));
    }

    lines.push(String::new());
    lines.push(format!("Output: {}", summary.dest_root.display()));
    if let Some(archive) = &summary.archive {
        lines.push(format!("Archive: {}", archive.display()));
    }

    let failures = summary.failure_count();
    if failures == 0 {
        lines.push(format!(
            "Done: {}, no failures",
            plural(summary.files_handled(), "file")
        ));
    } else {
        lines.push(format!(
            "Done: {}, {}",
            plural(summary.files_handled(), "file"),
            plural(failures, "failure")
        ));
    }
    lines
}

/// Print a build summary to stdout.
pub fn print_summary(summary: &BuildSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FileFailure;
    use std::path::PathBuf;

    fn clean_phase() -> PhaseOutcome {
        PhaseOutcome {
            name: "styles",
            files: 6,
            failures: Vec::new(),
        }
    }

    fn failing_phase() -> PhaseOutcome {
        PhaseOutcome {
            name: "styles",
            files: 5,
            failures: vec![FileFailure {
                path: PathBuf::from("assets/css/src/broken.css"),
                error: "bad nesting".to_string(),
            }],
        }
    }

    #[test]
    fn phase_header_counts_files() {
        assert_eq!(format_phase(&clean_phase()), vec!["==> styles: 6 files"]);
    }

    #[test]
    fn singular_file_count() {
        let phase = PhaseOutcome {
            name: "fonts",
            files: 1,
            failures: Vec::new(),
        };
        assert_eq!(format_phase(&phase), vec!["==> fonts: 1 file"]);
    }

    #[test]
    fn failures_listed_as_indented_warnings() {
        let lines = format_phase(&failing_phase());
        assert_eq!(lines[0], "==> styles: 5 files");
        assert_eq!(
            lines[1],
            "    warning: assets/css/src/broken.css: bad nesting"
        );
    }

    #[test]
    fn summary_trailer_names_output_and_archive() {
        let summary = BuildSummary {
            phases: vec![clean_phase()],
            dest_root: PathBuf::from("../acme"),
            archive: Some(PathBuf::from("../acme.zip")),
        };
        let lines = format_summary(&summary);
        assert!(lines.contains(&"Output: ../acme".to_string()));
        assert!(lines.contains(&"Archive: ../acme.zip".to_string()));
        assert_eq!(lines.last().unwrap(), "Done: 6 files, no failures");
    }

    #[test]
    fn summary_without_archive_omits_archive_line() {
        let summary = BuildSummary {
            phases: vec![clean_phase()],
            dest_root: PathBuf::from("."),
            archive: None,
        };
        let lines = format_summary(&summary);
        assert!(!lines.iter().any(|l| l.starts_with("Archive:")));
    }

    #[test]
    fn summary_counts_failures() {
        let summary = BuildSummary {
            phases: vec![clean_phase(), failing_phase()],
            dest_root: PathBuf::from("."),
            archive: None,
        };
        let lines = format_summary(&summary);
        assert_eq!(lines.last().unwrap(), "Done: 11 files, 1 failure");
    }
}
