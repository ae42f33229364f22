/// Hour of day after applying the display offset, in 0..24.
pub fn adjusted_hour(hour: u32, offset: i32) -> u32 {
    (hour as i64 + offset as i64).rem_euclid(24) as u32
}

/// Fraction of the day elapsed, 0 to 1.
pub fn day_fraction(adjusted_hour: u32, minute: u32) -> f64 {
    (adjusted_hour as f64 + minute as f64 / 60.0) / 24.0
}

/// Dial angle for a time of day.
///
/// Every observed midnight adds a full turn so the dial keeps advancing
/// instead of rotating back to zero.
pub fn target_angle(adjusted_hour: u32, minute: u32, day_wraps: u64) -> f64 {
    let revolutions = day_fraction(adjusted_hour, minute) + day_wraps as f64;
    revolutions * 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_offset_wraps_both_ways() {
        assert_eq!(adjusted_hour(3, -5), 22);
        assert_eq!(adjusted_hour(22, 5), 3);
        assert_eq!(adjusted_hour(12, 0), 12);
        assert_eq!(adjusted_hour(0, -24), 0);
        assert_eq!(adjusted_hour(23, -49), 22);
    }

    #[test]
    fn test_six_am_is_quarter_turn() {
        assert_eq!(day_fraction(6, 0), 0.25);
        assert_eq!(target_angle(6, 0, 0), 90.0);
        assert_eq!(target_angle(adjusted_hour(11, -5), 0, 0), 90.0);
    }

    #[test]
    fn test_day_wraps_add_full_turns() {
        assert_eq!(target_angle(0, 0, 1), 360.0);
        assert_eq!(target_angle(12, 0, 2), 900.0);
    }

    #[test]
    fn test_angle_never_decreases_within_a_day() {
        for wraps in [0, 1, 7] {
            let mut last = f64::MIN;
            for hour in 0..24 {
                for minute in 0..60 {
                    let angle = target_angle(hour, minute, wraps);
                    assert!(angle >= last, "{:02}:{:02} went backwards", hour, minute);
                    assert!(angle < (wraps + 1) as f64 * 360.0);
                    last = angle;
                }
            }
        }
    }
}
