/// Apply stat stage multipliers according to the standard formula.
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(-6, 6) as i32;

    if clamped_stage == 0 {
        return base_stat;
    }

    let (numerator, denominator) = if clamped_stage < 0 {
        (2, 2 - clamped_stage)
    } else {
        (2 + clamped_stage, 2)
    };

    // Round half up in integer arithmetic so the result is platform independent.
    let scaled = base_stat as i32 * numerator;
    ((scaled * 2 + denominator) / (denominator * 2)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_stage_multipliers() {
        assert_eq!(apply_stat_stage_multiplier(100, 0), 100); // No change
        assert_eq!(apply_stat_stage_multiplier(100, 1), 150); // +1 stage: 1.5x
        assert_eq!(apply_stat_stage_multiplier(100, 2), 200); // +2 stage: 2.0x
        assert_eq!(apply_stat_stage_multiplier(100, -1), 67); // -1 stage: 2/3x
        assert_eq!(apply_stat_stage_multiplier(100, -2), 50); // -2 stage: 1/2x
        assert_eq!(apply_stat_stage_multiplier(100, 6), 400); // +6 stage: 4.0x
        assert_eq!(apply_stat_stage_multiplier(100, -6), 25); // -6 stage: 1/4x
    }

    #[test]
    fn test_out_of_range_stages_are_clamped() {
        assert_eq!(apply_stat_stage_multiplier(80, 12), apply_stat_stage_multiplier(80, 6));
        assert_eq!(apply_stat_stage_multiplier(80, -9), apply_stat_stage_multiplier(80, -6));
    }
}
