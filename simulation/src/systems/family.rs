//! Family System
//!
//! Ages the tracked relatives, rolls their mortality checks and buries the
//! ones who died, and occasionally adds a younger sibling while the character
//! is a minor.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::character::Character;
use crate::narrator::{LifeEvent, Turn};
use crate::relations::{ParentRole, Relation, RelationKind};
use crate::stats::{exponential_sample, round_money, round_stochastic};
use crate::systems::mortality;

const ADULT_AGE: u32 = 18;

/// Yearly chance of a sibling being born, before age and family-size factors.
const BASE_SIBLING_RATE: f64 = 0.08;
const MOTHER_MIN_AGE: u32 = 18;
const MOTHER_MAX_AGE: u32 = 42;
/// Maternal fertility declines after this age.
const FERTILITY_DECLINE_AGE: u32 = 35;

/// Inheritance when a parent with full wealth dies, before generosity.
const FULL_ESTATE: f64 = 100_000.0;
const INHERITANCE_PERCENT: u32 = 70;

/// Age every relative and drift the relationship scores.
///
/// Parents grow closer while the character is a minor and then slowly drift
/// apart (-1, -1 or 0 with equal weight). Everyone else wanders by one point.
pub fn age_relations(character: &mut Character, rng: &mut dyn RngCore) {
    let minor = character.age < ADULT_AGE;
    for relation in character.relations.iter_mut() {
        relation.age_up(rng);
        let delta = if relation.is_parent() {
            if minor {
                1
            } else {
                [-1, -1, 0].choose(rng).copied().unwrap_or(0)
            }
        } else {
            rng.gen_range(-1..=1)
        };
        relation.change_relationship(delta);
    }
}

/// Roll this year's mortality check for every living relative. Returns how
/// many died.
pub fn roll_relative_deaths(character: &mut Character, rng: &mut dyn RngCore) -> usize {
    let mut deaths = 0;
    for relation in character.relations.iter_mut().filter(|r| r.alive) {
        if mortality::relative_dies(rng, relation.age) {
            relation.alive = false;
            deaths += 1;
        }
    }
    deaths
}

/// Remove every relative who died this year, grieve, and settle estates.
pub fn bury_dead_relations(character: &mut Character, rng: &mut dyn RngCore, turn: &mut Turn<'_>) {
    let (dead, living): (Vec<Relation>, Vec<Relation>) = std::mem::take(&mut character.relations)
        .into_iter()
        .partition(|r| !r.alive);
    character.relations = living;

    for relation in dead {
        info!(relative = relation.label(), age = relation.age, "relative died");
        turn.event(LifeEvent::RelativeDied {
            relative: relation.label(),
            name: relation.full_name(),
            age: relation.age,
        });

        let grief = match relation.kind {
            RelationKind::Sibling => rng.gen_range(25..=40),
            _ => rng.gen_range(40..=55),
        };
        let inheritance = match relation.kind {
            RelationKind::Parent { generosity, money, .. } => {
                roll_inheritance(rng, generosity, money)
            }
            _ => 0,
        };

        character.change_happiness(rng, -grief);
        if inheritance > 0 {
            turn.event(LifeEvent::Inherited {
                amount: inheritance,
            });
            character.money += inheritance;
            let windfall = round_stochastic(rng, 1.5 * (inheritance as f64).log10());
            character.change_happiness(rng, windfall);
        }
    }
}

/// Estate left to the character, or zero.
///
/// Paid with probability 70% times generosity%. The size is drawn from an
/// exponential tail between a generosity-scaled floor and an average that
/// grows with the square of the parent's wealth.
pub fn roll_inheritance<R: Rng + ?Sized>(rng: &mut R, generosity: i32, money: i32) -> i64 {
    if rng.gen_range(1..=100) > INHERITANCE_PERCENT
        || rng.gen_range(1..=100) > generosity.max(0) as u32
    {
        return 0;
    }
    let average = FULL_ESTATE * (money as f64 / 100.0).powi(2);
    let floor = (average * generosity as f64 / 200.0).max(1.0);
    let estate = exponential_sample(rng, floor, average);
    let amount = round_money(rng, estate);
    debug!(generosity, money, amount, "inheritance");
    amount
}

/// Maybe add a newborn brother or sister.
pub fn sibling_births(character: &mut Character, rng: &mut dyn RngCore, turn: &mut Turn<'_>) {
    if character.age >= ADULT_AGE {
        return;
    }
    let Some(mother) = character.parent(ParentRole::Mother) else {
        return;
    };
    if !(MOTHER_MIN_AGE..=MOTHER_MAX_AGE).contains(&mother.age) {
        return;
    }

    let age_factor = if mother.age > FERTILITY_DECLINE_AGE {
        (1.0 - (mother.age - FERTILITY_DECLINE_AGE) as f64 * 0.15).max(0.1)
    } else {
        1.0
    };
    let siblings_factor = (1.0 - character.sibling_count() as f64 * 0.1).max(0.2);
    if rng.gen::<f64>() >= BASE_SIBLING_RATE * age_factor * siblings_factor {
        return;
    }

    let surname = character
        .parent(ParentRole::Father)
        .unwrap_or(mother)
        .last_name
        .clone();
    let sibling = Relation::new_sibling(rng, &surname);
    info!(name = %sibling.full_name(), "sibling born");
    turn.event(LifeEvent::SiblingBorn {
        relative: sibling.label(),
        name: sibling.first_name.clone(),
    });
    character.relations.push(sibling);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::ScriptedNarrator;
    use crate::traits::TraitSet;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn child(seed: u64) -> Character {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut c = Character::new(&mut rng);
        c.traits = TraitSet::new();
        c
    }

    fn set_parent(c: &mut Character, role: ParentRole, generosity: i32, wealth: i32) {
        let parent = c.parent_mut(role).expect("parent");
        parent.kind = RelationKind::Parent {
            role,
            generosity,
            money: wealth,
        };
    }

    #[test]
    fn test_minor_grows_closer_to_parents() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = child(1);
        c.age = 10;
        for parent in c.relations.iter_mut() {
            parent.relationship = 50;
            parent.age = 30;
        }
        age_relations(&mut c, &mut rng);
        for parent in c.parents() {
            assert_eq!(parent.relationship, 51);
            assert_eq!(parent.age, 31);
        }
    }

    #[test]
    fn test_adult_parent_drift_never_rises() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut c = child(2);
        c.age = 30;
        for _ in 0..20 {
            for parent in c.relations.iter_mut() {
                parent.relationship = 50;
                parent.age = 40;
                parent.alive = true;
            }
            age_relations(&mut c, &mut rng);
            for parent in c.parents() {
                assert!((49..=50).contains(&parent.relationship));
            }
        }
    }

    #[test]
    fn test_dead_parent_removed_from_lookup() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = child(3);
        c.stats.happiness = 100;
        c.parent_mut(ParentRole::Father).expect("father").alive = false;

        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        bury_dead_relations(&mut c, &mut rng, &mut turn);

        assert!(c.parent(ParentRole::Father).is_none());
        assert!(c.parent(ParentRole::Mother).is_some());
        assert!(c.relations.iter().all(|r| r.alive));
        assert!(c.stats.happiness <= 60 || c.money > 0);
        assert!(matches!(
            turn.events()[0],
            LifeEvent::RelativeDied { relative: "father", .. }
        ));
    }

    #[test]
    fn test_mortality_rolled_only_for_the_living() {
        let mut c = child(9);
        c.parent_mut(ParentRole::Father).expect("father").alive = false;

        // The lowest roll is under every positive rate
        let mut rng = StepRng::new(0, 0);
        assert_eq!(roll_relative_deaths(&mut c, &mut rng), 1);
        assert!(c.relations.iter().all(|r| !r.alive));

        let mut rng = StdRng::seed_from_u64(9);
        let mut young = child(10);
        for parent in young.relations.iter_mut() {
            parent.age = 30;
        }
        let deaths: usize = (0..50)
            .map(|_| roll_relative_deaths(&mut young, &mut rng))
            .sum();
        assert!(deaths <= 3, "{deaths} thirty-year-olds died");
    }

    #[test]
    fn test_generous_parent_leaves_inheritance() {
        let mut c = child(4);
        c.stats.happiness = 80;
        c.money = 0;
        set_parent(&mut c, ParentRole::Mother, 100, 100);
        c.parent_mut(ParentRole::Mother).expect("mother").alive = false;

        // Lowest rolls: both inheritance checks pass, the estate is the floor
        // (100 000 * 100 / 200) and grief is 40
        let mut rng = StepRng::new(0, 0);
        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        bury_dead_relations(&mut c, &mut rng, &mut turn);

        assert_eq!(c.money, 50_000);
        assert!(turn
            .events()
            .contains(&LifeEvent::Inherited { amount: 50_000 }));
        // 1.5 * log10(50 000) = 7.05, which the mock rounds up
        assert_eq!(c.stats.happiness, 80 - 40 + 8);
    }

    #[test]
    fn test_stingy_parent_leaves_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roll_inheritance(&mut rng, 0, 100), 0);
        }
    }

    #[test]
    fn test_sibling_grief_is_lighter() {
        let mut c = child(6);
        c.stats.happiness = 100;
        let mut rng = StepRng::new(0, 0);
        let mut sibling = Relation::new_sibling(&mut rng, &c.last_name);
        sibling.alive = false;
        c.relations.push(sibling);

        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        bury_dead_relations(&mut c, &mut rng, &mut turn);
        assert_eq!(c.stats.happiness, 75);
        assert_eq!(c.sibling_count(), 0);
    }

    #[test]
    fn test_siblings_only_born_to_minors() {
        let mut rng = StepRng::new(0, 0);
        let mut c = child(7);
        c.parent_mut(ParentRole::Mother).expect("mother").age = 28;

        let mut narrator = ScriptedNarrator::default();
        let mut turn = Turn::new(&mut narrator);
        c.age = 20;
        sibling_births(&mut c, &mut rng, &mut turn);
        assert_eq!(c.sibling_count(), 0);

        c.age = 4;
        sibling_births(&mut c, &mut rng, &mut turn);
        assert_eq!(c.sibling_count(), 1);
        let father = c.parent(ParentRole::Father).expect("father").last_name.clone();
        let newborn = c.relations.last().expect("sibling");
        assert_eq!(newborn.last_name, father);
        assert_eq!(newborn.age, 0);
    }

    #[test]
    fn test_no_siblings_once_mother_is_gone() {
        let mut rng = StepRng::new(0, 0);
        let mut c = child(8);
        c.age = 4;
        c.relations.retain(|r| r.parent_role() != Some(ParentRole::Mother));
        let mut narrator = ScriptedNarrator::default();
        sibling_births(&mut c, &mut rng, &mut Turn::new(&mut narrator));
        assert_eq!(c.sibling_count(), 0);
    }
}
