//! One-off vignettes rolled during the random-events step.

use rand::{Rng, RngCore};
use tracing::info;

use crate::character::{Character, DeathCause};
use crate::config::SimConfig;
use crate::narrator::{Answer, LifeEvent, Question, Turn};
use crate::relations::ParentRole;

pub const VACCINATION_AGE: u32 = 2;

/// Rare lightning strike. Good or bad is a coin flip; a bad strike can kill.
pub fn lightning(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) -> Result<(), DeathCause> {
    if character.age < config.lightning_min_age || rng.gen_range(1..=config.lightning_odds) != 1 {
        return Ok(());
    }
    let lucky = rng.gen::<bool>();
    info!(lucky, "struck by lightning");
    turn.event(LifeEvent::StruckByLightning { lucky });
    apply_strike(character, rng, lucky);
    turn.show_stats(&character.stats);
    turn.pause();

    if !lucky && rng.gen_range(1..=config.lightning_fatal_odds) == 1 {
        return Err(DeathCause::Lightning);
    }
    Ok(())
}

/// Every stat swings all the way in one direction.
pub fn apply_strike(character: &mut Character, rng: &mut dyn RngCore, lucky: bool) {
    let swing = if lucky { 100 } else { -100 };
    character.change_happiness(rng, swing);
    character.change_health(swing);
    character.change_smarts(swing);
    character.change_looks(swing);
}

/// The toddler trip to the doctor. Only prompt besides the university flow.
pub fn vaccination(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    if character.age != VACCINATION_AGE || rng.gen_range(1..=100) > config.vaccination_percent {
        return;
    }
    turn.event(LifeEvent::VaccinationVisit);
    let choice = turn.ask(
        Question::Vaccination,
        &[Answer::StayCalm, Answer::ThrowTantrum, Answer::BiteMother],
    );

    let (event, hit, strain) = match choice {
        Answer::ThrowTantrum => (
            LifeEvent::ThrewTantrum,
            rng.gen_range(25..=35),
            rng.gen_range(6..=10),
        ),
        Answer::BiteMother => (
            LifeEvent::BitMother,
            rng.gen_range(6..=10),
            rng.gen_range(25..=35),
        ),
        _ => (LifeEvent::StayedCalm, 0, 0),
    };
    turn.event(event);
    character.change_happiness(rng, -hit);
    if let Some(mother) = character.parent_mut(ParentRole::Mother) {
        mother.change_relationship(-strain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::ScriptedNarrator;
    use crate::traits::TraitSet;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toddler() -> Character {
        let mut rng = StdRng::seed_from_u64(2);
        let mut c = Character::new(&mut rng);
        c.traits = TraitSet::new();
        c.age = VACCINATION_AGE;
        c
    }

    #[test]
    fn test_no_lightning_before_five() {
        let mut c = toddler();
        let before = c.stats;
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        assert_eq!(lightning(&mut c, &mut rng, &mut turn, &SimConfig::default()), Ok(()));
        assert_eq!(c.stats, before);
        assert!(turn.events().is_empty());
    }

    #[test]
    fn test_bad_strike_can_kill() {
        let mut c = toddler();
        c.age = 30;
        // Lowest rolls: struck, unlucky coin, fatal 1-in-5
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        let outcome = lightning(&mut c, &mut rng, &mut turn, &SimConfig::default());

        assert_eq!(outcome, Err(DeathCause::Lightning));
        assert_eq!(c.stats.health, 0);
        assert_eq!(c.stats.looks, 0);
        assert!(turn
            .events()
            .contains(&LifeEvent::StruckByLightning { lucky: false }));
        assert_eq!(narrator.stats_shown, 1);
    }

    #[test]
    fn test_lucky_strike_maxes_stats() {
        let mut c = toddler();
        let mut rng = StepRng::new(0, 0);
        apply_strike(&mut c, &mut rng, true);
        assert_eq!(c.stats.happiness, 100);
        assert_eq!(c.stats.health, 100);
        assert_eq!(c.stats.smarts, 100);
        assert_eq!(c.stats.looks, 100);
    }

    #[test]
    fn test_biting_strains_relationship_with_mother() {
        let mut c = toddler();
        c.stats.happiness = 90;
        c.parent_mut(ParentRole::Mother).expect("mother").relationship = 90;
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::new([Answer::BiteMother]);
        let mut turn = Turn::new(&mut narrator);
        vaccination(&mut c, &mut rng, &mut turn, &SimConfig::default());

        assert_eq!(c.stats.happiness, 84);
        assert_eq!(c.parent(ParentRole::Mother).expect("mother").relationship, 65);
        assert!(turn.events().contains(&LifeEvent::BitMother));
        assert_eq!(narrator.prompts[0].0, Question::Vaccination);
        assert_eq!(narrator.prompts[0].1.len(), 3);
    }

    #[test]
    fn test_staying_calm_costs_nothing() {
        let mut c = toddler();
        let before = c.stats;
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::new([Answer::StayCalm]);
        let mut turn = Turn::new(&mut narrator);
        vaccination(&mut c, &mut rng, &mut turn, &SimConfig::default());
        assert_eq!(c.stats, before);
        assert!(turn.events().contains(&LifeEvent::StayedCalm));
    }

    #[test]
    fn test_vaccination_only_at_two() {
        let mut c = toddler();
        c.age = 3;
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::default();
        vaccination(&mut c, &mut rng, &mut Turn::new(&mut narrator), &SimConfig::default());
        assert!(narrator.prompts.is_empty());
    }
}
