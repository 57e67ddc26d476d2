//! Small numeric and clock helpers shared by the runtime and the game.

/// Sign of `value` as -1, 0, or +1.
pub fn sgn(value: i32) -> i32 {
    match value {
        v if v > 0 => 1,
        v if v < 0 => -1,
        _ => 0,
    }
}

/// Number of digits in the magnitude of `value`. Zero has zero digits.
pub fn count_digits(value: i32) -> u32 {
    let mut remaining = value.unsigned_abs();
    let mut digits = 0;
    while remaining > 0 {
        remaining /= 10;
        digits += 1;
    }
    digits
}

/// Decomposes a millisecond counter into wall-clock hours, minutes, and
/// seconds. Hours wrap at 24 so a long session reads like a clock.
pub fn split_playtime(total_ms: u64) -> (u64, u64, u64) {
    let total_seconds = total_ms / 1000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = (total_seconds / 3600) % 24;
    (hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgn_covers_all_three_cases() {
        assert_eq!(sgn(42), 1);
        assert_eq!(sgn(-7), -1);
        assert_eq!(sgn(0), 0);
    }

    #[test]
    fn count_digits_handles_zero_and_negatives() {
        assert_eq!(count_digits(0), 0);
        assert_eq!(count_digits(9), 1);
        assert_eq!(count_digits(-1234), 4);
    }

    #[test]
    fn split_playtime_decomposes_mixed_duration() {
        let ms = (2 * 3600 + 5 * 60 + 7) * 1000;
        assert_eq!(split_playtime(ms), (2, 5, 7));
    }

    #[test]
    fn split_playtime_wraps_hours_at_a_day() {
        let ms = 25 * 3600 * 1000;
        assert_eq!(split_playtime(ms), (1, 0, 0));
    }
}
