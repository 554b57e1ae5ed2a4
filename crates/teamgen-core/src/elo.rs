// Elo-style win probability between two team ratings.

/// Rating gap that corresponds to 10:1 odds on the logistic curve.
pub const ELO_SCALE: f64 = 400.0;

/// Probability that a side rated `ra` beats a side rated `rb`:
/// `1 / (1 + 10^((rb - ra) / 400))`.
pub fn win_probability(ra: f64, rb: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rb - ra) / ELO_SCALE))
}

/// Mean rating of a team. Returns 0.0 for an empty team.
pub fn average(sum: f64, members: usize) -> f64 {
    if members == 0 {
        0.0
    } else {
        sum / members as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_are_a_coin_flip() {
        assert!((win_probability(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn two_hundred_point_edge() {
        let p1 = win_probability(1600.0, 1400.0);
        assert!((p1 - 0.7597).abs() < 1e-4, "got {p1}");
        let p2 = 1.0 - p1;
        assert!((p2 - 0.2403).abs() < 1e-4, "got {p2}");
    }

    #[test]
    fn probabilities_are_complementary() {
        let forward = win_probability(1725.5, 1510.0);
        let backward = win_probability(1510.0, 1725.5);
        assert!((forward + backward - 1.0).abs() < 1e-12);
    }

    #[test]
    fn four_hundred_points_is_ten_to_one() {
        let p = win_probability(1800.0, 1400.0);
        assert!((p - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn average_of_empty_team_is_zero() {
        assert_eq!(average(0.0, 0), 0.0);
        assert_eq!(average(3400.0, 2), 1700.0);
    }
}
