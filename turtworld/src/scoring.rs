//! Coin and completion scoring.

/// Points for a coin before the combo multiplier.
pub const BASE_COIN_POINTS: u32 = 100;

/// Flat bonus for finishing a level with every coin collected.
pub const PERFECT_BONUS: u32 = 5000;

/// Score multiplier for a coin picked up at `combo`.
pub fn combo_multiplier(combo: u32) -> f32 {
    match combo {
        15.. => 3.0,
        10..=14 => 2.0,
        5..=9 => 1.5,
        _ => 1.0,
    }
}

/// Points awarded for one coin at `combo`, rounded down.
pub fn coin_points(combo: u32) -> u32 {
    (BASE_COIN_POINTS as f32 * combo_multiplier(combo)).floor() as u32
}

/// Whether finishing now earns [`PERFECT_BONUS`]. Levels without coins never do.
pub fn is_perfect(collected: usize, total: usize) -> bool {
    total > 0 && collected == total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_points_table() {
        let cases = [
            (0, 100),
            (1, 100),
            (4, 100),
            (5, 150),
            (9, 150),
            (10, 200),
            (14, 200),
            (15, 300),
            (40, 300),
        ];
        for (combo, points) in cases {
            assert_eq!(coin_points(combo), points, "combo {combo}");
        }
    }

    #[test]
    fn perfect_needs_every_coin() {
        assert!(is_perfect(3, 3));
        assert!(!is_perfect(2, 3));
        assert!(!is_perfect(0, 0));
    }
}
