/// Draw-rule thresholds applied by the game layer.
///
/// Kept separate from the rules code so a caller can tighten or loosen the
/// automatic draw detection without touching the arbiter.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Half-move clock value at which the fifty-move draw triggers.
    ///
    /// The clock counts plies since the last pawn move or capture, so the
    /// literal FIDE "fifty full moves" rule corresponds to 100. The default
    /// of 50 preserves the historical behavior of this engine; pass 100 for
    /// strict FIDE scoring.
    pub halfmove_draw_threshold: u16,
    /// Number of occurrences of a position (by reduced signature) that
    /// triggers the repetition draw.
    pub repetition_draw_count: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            halfmove_draw_threshold: 50,
            repetition_draw_count: 3,
        }
    }
}

impl RuleConfig {
    /// Thresholds matching the FIDE handbook: 100 plies, 3 repetitions.
    pub fn fide() -> Self {
        RuleConfig {
            halfmove_draw_threshold: 100,
            repetition_draw_count: 3,
        }
    }
}
