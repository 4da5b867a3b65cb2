//! Markdown report for specification diffs.

use crate::diff::model::SpecDiff;
use crate::model::{CanSpecDiff, ChangeSeverity};

/// Render a Markdown summary of a [`SpecDiff`]
///
/// Informational only; the structured diff is the source of truth.
pub fn render_human_summary(diff: &SpecDiff) -> String {
    let mut out = String::new();
    let summary = &diff.summary;

    out.push_str("## Specification Diff\n\n");

    let worst = diff
        .max_severity()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "None".to_string());
    out.push_str(&format!(
        "**Changes**: {}  \n**Highest severity**: {}\n\n",
        diff.len(),
        worst
    ));

    if diff.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str(&format!(
        "| | Added | Removed | Modified |\n\
         |---|---|---|---|\n\
         | Messages | {} | {} | {} |\n\
         | Signals | {} | {} | {} |\n\n",
        summary.messages_added,
        summary.messages_removed,
        summary.messages_modified,
        summary.signals_added,
        summary.signals_removed,
        summary.signals_modified,
    ));

    if !summary.impacted_subsystems.is_empty() {
        let names: Vec<&str> = summary
            .impacted_subsystems
            .iter()
            .map(String::as_str)
            .collect();
        out.push_str(&format!("**Impacted subsystems**: {}\n\n", names.join(", ")));
    }

    // Most severe first; emission order within a severity
    for severity in ChangeSeverity::ALL.iter().rev() {
        let group: Vec<&CanSpecDiff> = diff
            .diffs
            .iter()
            .filter(|d| d.severity == *severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("### {} ({})\n\n", severity, group.len()));
        for d in group {
            out.push_str(&format!("- **{}** {}", d.change_category, d.summary));
            if let (Some(old), Some(new)) = (&d.old_value, &d.new_value) {
                out.push_str(&format!(": `{}` → `{}`", old, new));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out
}
