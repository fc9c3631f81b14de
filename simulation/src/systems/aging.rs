//! Aging System - yearly body changes that happen regardless of choices

use rand::{Rng, RngCore};

use crate::character::Character;

/// Smarts keep growing on their own until adulthood.
const GROWTH_AGE: u32 = 18;
/// Health decline starts after this age.
const DECLINE_AGE: u32 = 45;
const TEEN_LOOKS_AGE: u32 = 13;
/// Looks start fading after this age.
const LOOKS_DECAY_AGE: u32 = 50;

/// Natural decay and growth. Runs right after the age increment.
pub fn base_aging(character: &mut Character, rng: &mut dyn RngCore) {
    let age = character.age;
    if age <= GROWTH_AGE {
        character.change_smarts(rng.gen_range(0..=2));
    }
    if age > DECLINE_AGE {
        let cap = ((age - DECLINE_AGE) / 8 + 1) as i32;
        character.change_health(-rng.gen_range(0..=cap));
    } else {
        character.change_health(rng.gen_range(-1..=1));
    }
}

/// Teen glow-up and late-life fading.
///
/// At 13 a yearly looks gain is drawn (usually small, sometimes zero) and
/// applied every year until a ceiling drawn fresh each year from [18, 24].
/// Past 50, looks above a floor of 20-25 fade by up to 4 points a year.
pub fn looks_trajectory(character: &mut Character, rng: &mut dyn RngCore) {
    let age = character.age;
    if age == TEEN_LOOKS_AGE {
        character.teen_looks_inc = if rng.gen_range(1..=4) == 1 {
            rng.gen_range(0..=1)
        } else {
            (0..4).map(|_| rng.gen_range(0..=12)).min().unwrap_or(0)
        };
    }
    if age >= TEEN_LOOKS_AGE && age < rng.gen_range(18..=24) {
        character.change_looks(character.teen_looks_inc);
    }
    if age > LOOKS_DECAY_AGE && character.stats.looks > rng.gen_range(20..=25) {
        let cap = ((age - LOOKS_DECAY_AGE - 1) / 5 + 1).min(4) as i32;
        character.change_looks(-rng.gen_range(0..=cap));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn aged(age: u32) -> Character {
        let mut rng = StdRng::seed_from_u64(13);
        let mut c = Character::new(&mut rng);
        c.age = age;
        c
    }

    #[test]
    fn test_old_age_only_takes_health() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = aged(80);
        c.stats.health = 100;
        let smarts = c.stats.smarts;
        for _ in 0..20 {
            base_aging(&mut c, &mut rng);
        }
        assert!(c.stats.health < 100);
        assert_eq!(c.stats.smarts, smarts);
    }

    #[test]
    fn test_teen_looks_increment_is_drawn_at_thirteen() {
        // Lowest rolls: the 1-in-4 branch fires and draws zero
        let mut rng = StepRng::new(0, 0);
        let mut c = aged(TEEN_LOOKS_AGE);
        c.teen_looks_inc = 7;
        c.stats.looks = 40;
        looks_trajectory(&mut c, &mut rng);
        assert_eq!(c.teen_looks_inc, 0);
        assert_eq!(c.stats.looks, 40);
    }

    #[test]
    fn test_teen_looks_applied_until_ceiling() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = aged(15);
        c.teen_looks_inc = 3;
        c.stats.looks = 40;
        looks_trajectory(&mut c, &mut rng);
        assert_eq!(c.stats.looks, 43);

        c.age = 24;
        looks_trajectory(&mut c, &mut rng);
        assert_eq!(c.stats.looks, 43);
    }

    #[test]
    fn test_looks_fade_is_bounded() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut c = aged(90);
        c.stats.looks = 100;
        for _ in 0..10 {
            let before = c.stats.looks;
            looks_trajectory(&mut c, &mut rng);
            assert!(before - c.stats.looks <= 4);
        }
        assert!(c.stats.looks < 100);
    }
}
