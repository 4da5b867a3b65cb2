//! Compatibility analysis.
//!
//! Translates diffs into issues, scores them and estimates per-subsystem
//! migration impact.
//!
//! ```
//! use canspec_core::analysis::{analyze_spec_diff, CompatibilityLevel, RiskLevel};
//! use canspec_core::diff::{compute_diff, DiffOptions};
//! use canspec_core::model::{CanSpecMessage, MessageId};
//!
//! let old = vec![CanSpecMessage::new(MessageId::new(0x100), "EngineStatus", 8)];
//! let diff = compute_diff(&old, &[], &DiffOptions::default());
//! let analysis = analyze_spec_diff("v1", "v2", "release-bot", &diff);
//! assert_eq!(analysis.compatibility_score(), 90);
//! assert_eq!(analysis.compatibility_level(), CompatibilityLevel::MinorIncompatibility);
//! assert_eq!(analysis.migration_risk(), RiskLevel::Medium);
//! ```

pub mod impact;
pub mod issues;
pub mod model;
pub mod scoring;

use std::time::Instant;

use canspec_core_types::RequestContext;

use crate::diff::SpecDiff;
use crate::{log_op_end, log_op_start};

pub use impact::assess_impacts;
pub use model::{
    CompatibilityAnalysis, CompatibilityIssue, CompatibilityLevel, ImpactAssessment,
    IssueCategory, IssueSeverity, RiskLevel,
};
pub use scoring::{score_compatibility, CompatibilityOutcome};

/// Build a fully calculated analysis from a diff
pub fn analyze_spec_diff(
    old_spec_id: &str,
    new_spec_id: &str,
    analyst: &str,
    diff: &SpecDiff,
) -> CompatibilityAnalysis {
    analyze_spec_diff_with_context(&RequestContext::new(), old_spec_id, new_spec_id, analyst, diff)
}

/// As [`analyze_spec_diff`], logging under the caller's request id
pub fn analyze_spec_diff_with_context(
    context: &RequestContext,
    old_spec_id: &str,
    new_spec_id: &str,
    analyst: &str,
    diff: &SpecDiff,
) -> CompatibilityAnalysis {
    let started = Instant::now();
    let mut analysis = CompatibilityAnalysis::new(old_spec_id, new_spec_id, analyst);
    log_op_start!(
        "analyze",
        analysis_id = analysis.id(),
        request_id = %context.request_id,
        diff_count = diff.len()
    );

    for d in &diff.diffs {
        analysis.add_issue(CompatibilityIssue::from_diff(d));
    }
    for impact in assess_impacts(&diff.diffs) {
        analysis.add_impact(impact);
    }
    let outcome = analysis.calculate_compatibility();

    log_op_end!(
        "analyze",
        duration_ms = started.elapsed().as_millis() as u64,
        analysis_id = analysis.id(),
        request_id = %context.request_id,
        issue_count = analysis.total_issues(),
        score = outcome.score,
        level = %outcome.level
    );
    analysis
}
