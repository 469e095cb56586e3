use tracing::warn;

pub const DEFAULT_GOVERNANCE_FLOOR: i32 = -7;
/// Lowest supported floor: every sub-factor maxed out still leaves a score of 1.
pub const MIN_GOVERNANCE_FLOOR: i32 = -24;

/// Scoring dials. The governance floor bounds how far present controls can lower a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    governance_floor: i32,
}

impl ScoringConfig {
    pub fn new(governance_floor: i32) -> Self {
        let sanitized = governance_floor.clamp(MIN_GOVERNANCE_FLOOR, 0);
        if sanitized != governance_floor {
            warn!(
                requested = governance_floor,
                applied = sanitized,
                "governance floor outside supported range; clamped"
            );
        }

        Self {
            governance_floor: sanitized,
        }
    }

    pub fn governance_floor(&self) -> i32 {
        self.governance_floor
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GOVERNANCE_FLOOR)
    }
}
