//! Life World - main orchestrator
//!
//! Owns one character, the random source, and the tunables, and drives a
//! single simulated year per [`LifeWorld::advance`] call. The order of the
//! steps matters: later steps read what earlier ones wrote.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::character::{Character, DeathCause, Obituary};
use crate::config::SimConfig;
use crate::narrator::{LifeEvent, Narrator, Turn, YearReport};
use crate::stats::exponential_sample;
use crate::systems::{aging, career, education, events, family, health, mortality};
use crate::systems::health::Illness;
use crate::tax::{ProgressiveTax, TaxPolicy};
use crate::traits;

/// Result of one call to [`LifeWorld::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Survived(YearReport),
    /// Terminal. Every later call returns the same obituary.
    Died(Obituary),
}

impl AdvanceOutcome {
    pub fn is_dead(&self) -> bool {
        matches!(self, AdvanceOutcome::Died(_))
    }
}

pub struct LifeWorld<R: RngCore = ChaCha8Rng> {
    pub character: Character,
    pub config: SimConfig,
    tax: Box<dyn TaxPolicy>,
    rng: R,
    obituary: Option<Obituary>,
}

impl LifeWorld<ChaCha8Rng> {
    /// A newborn driven by a seeded generator.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let character = Character::new(&mut rng);
        Self::new(character, rng)
    }
}

impl<R: RngCore> LifeWorld<R> {
    pub fn new(character: Character, rng: R) -> Self {
        Self {
            character,
            config: SimConfig::builtin().clone(),
            tax: Box::new(ProgressiveTax::default()),
            rng,
            obituary: None,
        }
    }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_tax(mut self, tax: impl TaxPolicy + 'static) -> Self {
        self.tax = Box::new(tax);
        self
    }

    pub fn obituary(&self) -> Option<&Obituary> {
        self.obituary.as_ref()
    }

    pub fn is_dead(&self) -> bool {
        self.obituary.is_some()
    }

    /// Process one year. Prompts, if any, are answered through `narrator`.
    pub fn advance(&mut self, narrator: &mut dyn Narrator) -> AdvanceOutcome {
        if let Some(obituary) = &self.obituary {
            return AdvanceOutcome::Died(obituary.clone());
        }

        let mut turn = Turn::new(narrator);
        match self.run_year(&mut turn) {
            Ok(()) => AdvanceOutcome::Survived(turn.finish(self.character.age)),
            Err(cause) => {
                turn.event(LifeEvent::Died(cause));
                turn.pause();
                let obituary = self.character.obituary(cause);
                info!(
                    id = %obituary.id,
                    age = obituary.age,
                    ?cause,
                    score = obituary.score,
                    "character died"
                );
                self.obituary = Some(obituary.clone());
                AdvanceOutcome::Died(obituary)
            }
        }
    }

    fn run_year(&mut self, turn: &mut Turn<'_>) -> Result<(), DeathCause> {
        let Self {
            character,
            config,
            tax,
            rng,
            ..
        } = self;
        let rng: &mut dyn RngCore = rng;

        // 1. Bookkeeping and base aging
        let old_happiness = character.stats.happiness;
        character.total_happiness += old_happiness as i64;
        character.age += 1;
        turn.event(LifeEvent::NewYear { age: character.age });
        aging::base_aging(character, rng);

        // 2-4. Personality, activity flags, karma
        traits::yearly_drift(character, rng);
        character.activities.reset();
        character.change_karma(rng.gen_range(-2..=2));

        // 5. Relatives age
        family::age_relations(character, rng);

        // 6. Natural death
        if mortality::character_dies(rng, character.age, character.stats.health) {
            return Err(DeathCause::OldAge);
        }

        // 7. Jackpot for the lottery activity
        character.lottery_jackpot =
            exponential_sample(rng, config.jackpot_min, config.jackpot_max).round() as i64;

        // 8. Work stress
        career::stress_drift(character, rng);

        // 9. Age-keyed body changes and depression
        aging::looks_trajectory(character, rng);
        health::check_onset(Illness::Depression, character, rng, turn);

        // 10. Relatives' mortality checks and funerals
        family::roll_relative_deaths(character, rng);
        family::bury_dead_relations(character, rng, turn);

        // 11. Random events
        random_events(character, rng, turn, config, &**tax)?;

        // 12. Work fallout from this year's mood
        career::end_of_year(character, rng, old_happiness, turn);

        debug!(
            age = character.age,
            happiness = character.stats.happiness,
            health = character.stats.health,
            money = character.money,
            "year complete"
        );
        Ok(())
    }
}

fn random_events(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
    tax: &dyn TaxPolicy,
) -> Result<(), DeathCause> {
    events::lightning(character, rng, turn, config)?;
    career::accrue_income(character, rng, tax, config);
    education::university_year(character, rng, turn, config);
    education::repay_student_loan(character, rng, turn, config);
    health::progress_illnesses(character, rng, turn)?;
    events::vaccination(character, rng, turn, config);
    family::sibling_births(character, rng, turn);
    education::schooling_drift(character, rng);
    education::school_milestones(character, rng, turn, config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::ScriptedNarrator;
    use crate::tax::NoTax;
    use rand::rngs::mock::StepRng;

    fn run_until(world: &mut LifeWorld, age: u32, narrator: &mut ScriptedNarrator) -> bool {
        while world.character.age < age {
            if world.advance(narrator).is_dead() {
                return false;
            }
        }
        true
    }

    #[test]
    fn test_year_bookkeeping() {
        let mut world = LifeWorld::seeded(7);
        let happiness = world.character.stats.happiness;
        let mut narrator = ScriptedNarrator::default();
        match world.advance(&mut narrator) {
            AdvanceOutcome::Survived(report) => {
                assert_eq!(report.age, 1);
                assert_eq!(report.events[0], LifeEvent::NewYear { age: 1 });
            }
            AdvanceOutcome::Died(_) => return,
        }
        assert_eq!(world.character.age, 1);
        assert_eq!(world.character.total_happiness, happiness as i64);
        assert!(world.character.lottery_jackpot >= 100_000);
        assert!(world.character.lottery_jackpot <= 1_000_000);
    }

    #[test]
    fn test_not_enrolled_before_six() {
        for seed in 0..20 {
            let mut world = LifeWorld::seeded(seed);
            let mut narrator = ScriptedNarrator::default();
            while world.character.age < 5 {
                if world.advance(&mut narrator).is_dead() {
                    break;
                }
                assert!(world.character.education.grades.is_none());
            }
        }
    }

    #[test]
    fn test_invariants_hold_across_lives() {
        for seed in 0..40 {
            let mut world = LifeWorld::seeded(seed).with_tax(NoTax);
            let mut narrator = ScriptedNarrator::default();
            for _ in 0..120 {
                if world.advance(&mut narrator).is_dead() {
                    break;
                }
                let c = &world.character;
                for stat in [c.stats.happiness, c.stats.health, c.stats.smarts, c.stats.looks] {
                    assert!((0..=100).contains(&stat));
                }
                assert!((0..=100).contains(&c.karma));
                assert!(c.career.is_consistent());
                assert!(c.education.student_loan >= 0);
                assert!(c.relations.iter().all(|r| r.alive));
                if (6..17).contains(&c.age) && !c.education.dropped_out {
                    let grades = c.education.grades.expect("enrolled");
                    assert!((0..=100).contains(&grades));
                }
                assert!(c.parents().count() <= 2);
            }
        }
    }

    #[test]
    fn test_death_is_terminal() {
        let mut world = LifeWorld::seeded(3);
        world.character.age = 104;
        world.character.stats.health = 0;
        let mut narrator = ScriptedNarrator::default();

        // Frailty at zero health makes the old-age roll certain past 105
        assert!(mortality::annual_rate(105) * mortality::frailty(0) >= 1.0);
        let outcome = world.advance(&mut narrator);
        let AdvanceOutcome::Died(obituary) = outcome else {
            panic!("expected death");
        };
        assert_eq!(obituary.cause, DeathCause::OldAge);
        assert_eq!(obituary.age, 105);
        assert!(narrator.events.contains(&LifeEvent::Died(DeathCause::OldAge)));

        let age = world.character.age;
        assert_eq!(world.advance(&mut narrator), AdvanceOutcome::Died(obituary));
        assert_eq!(world.character.age, age);
    }

    #[test]
    fn test_no_dead_relatives_left_after_old_age_death() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut character = Character::new(&mut rng);
        character.age = 90;
        for parent in character.relations.iter_mut() {
            parent.age = 110;
        }

        // Every roll is the lowest, so the character dies in the old-age check
        let mut world = LifeWorld::new(character, StepRng::new(0, 0));
        let mut narrator = ScriptedNarrator::default();
        let AdvanceOutcome::Died(obituary) = world.advance(&mut narrator) else {
            panic!("expected death");
        };
        assert_eq!(obituary.cause, DeathCause::OldAge);
        assert!(world.character.relations.iter().all(|r| r.alive));
        assert_eq!(world.character.parents().count(), 2);
    }

    #[test]
    fn test_vaccination_prompt_at_two() {
        let mut found = false;
        for seed in 0..40 {
            let mut world = LifeWorld::seeded(seed);
            let mut narrator = ScriptedNarrator::default();
            if !run_until(&mut world, 2, &mut narrator) {
                continue;
            }
            if narrator
                .prompts
                .iter()
                .any(|(q, _)| *q == crate::narrator::Question::Vaccination)
            {
                assert!(narrator.events.contains(&LifeEvent::StayedCalm));
                found = true;
            }
        }
        assert!(found, "no seed produced a vaccination visit");
    }
}
