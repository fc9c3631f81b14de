//! Mortality
//!
//! Age-dependent death rolls for the character and every tracked relative.

use rand::Rng;

/// Base mortality rates by age bracket (annual probability)
const MORTALITY_RATES: &[(u32, f64)] = &[
    (0, 0.0008),   // Infant
    (5, 0.0002),   // Child
    (15, 0.0006),  // Teen
    (30, 0.0012),  // Young adult
    (45, 0.003),   // Middle age
    (55, 0.008),   // Late middle age
    (65, 0.02),    // Senior
    (75, 0.05),    // Elderly
    (85, 0.13),    // Very old
    (95, 0.3),     // Ancient
    (105, 0.6),    // Supercentenarian
];

/// Annual mortality rate for a given age
pub fn annual_rate(years: u32) -> f64 {
    MORTALITY_RATES
        .iter()
        .rev()
        .find(|(age, _)| years >= *age)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0008)
}

/// Multiplier applied to the character's base rate: 1.0 at full health,
/// 5.0 at zero.
pub fn frailty(health: i32) -> f64 {
    1.0 + (100 - health.clamp(0, 100)) as f64 / 25.0
}

/// Yearly death roll for the player character.
pub fn character_dies<R: Rng + ?Sized>(rng: &mut R, age: u32, health: i32) -> bool {
    let rate = (annual_rate(age) * frailty(health)).min(1.0);
    rng.gen::<f64>() < rate
}

/// Yearly death roll for a relative.
pub fn relative_dies<R: Rng + ?Sized>(rng: &mut R, age: u32) -> bool {
    rng.gen::<f64>() < annual_rate(age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mortality_rates() {
        // Very old should have high mortality
        assert!(annual_rate(90) > annual_rate(30));
        assert!(annual_rate(110) > annual_rate(90));

        // Children are the safest bracket
        assert!(annual_rate(10) < annual_rate(0));
        assert!(annual_rate(10) < annual_rate(40));
    }

    #[test]
    fn test_poor_health_raises_risk() {
        assert_eq!(frailty(100), 1.0);
        assert_eq!(frailty(0), 5.0);
        assert!(frailty(40) > frailty(80));
    }

    #[test]
    fn test_centenarians_rarely_survive_long() {
        let mut rng = StdRng::seed_from_u64(99);
        let survivors = (0..1_000)
            .filter(|_| (105..115).all(|age| !relative_dies(&mut rng, age)))
            .count();
        assert!(survivors < 5, "{survivors} relatives outlived ten years past 105");
    }
}
