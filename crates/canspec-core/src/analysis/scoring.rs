//! Compatibility scoring rule.

use serde::{Deserialize, Serialize};

use super::model::{CompatibilityLevel, RiskLevel};

pub const BREAKING_PENALTY: usize = 10;
pub const WARNING_PENALTY: usize = 3;
pub const INFO_PENALTY: usize = 1;

/// Score, level and risk derived from issue counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityOutcome {
    /// 0 to 100
    pub score: u8,
    pub level: CompatibilityLevel,
    pub risk: RiskLevel,
}

/// Score a set of issue counts
///
/// `score = max(0, 100 - (10 * breaking + 3 * warning + info))`. The level
/// and risk depend only on the breaking and warning counts. Never fails.
pub fn score_compatibility(breaking: usize, warning: usize, info: usize) -> CompatibilityOutcome {
    let penalty = breaking
        .saturating_mul(BREAKING_PENALTY)
        .saturating_add(warning.saturating_mul(WARNING_PENALTY))
        .saturating_add(info.saturating_mul(INFO_PENALTY));
    let score = u8::try_from(100usize.saturating_sub(penalty)).unwrap_or(0);

    let level = match (breaking, warning) {
        (0, 0) => CompatibilityLevel::FullyCompatible,
        (0, _) => CompatibilityLevel::Compatible,
        (1..=5, _) => CompatibilityLevel::MinorIncompatibility,
        _ => CompatibilityLevel::MajorIncompatibility,
    };

    let risk = match breaking {
        0 => RiskLevel::Low,
        1..=3 => RiskLevel::Medium,
        4..=10 => RiskLevel::High,
        _ => RiskLevel::Critical,
    };

    CompatibilityOutcome { score, level, risk }
}
