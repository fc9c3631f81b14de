//! The player character
//!
//! All per-life state lives here. Subsystem state (career, schooling,
//! illnesses) is grouped into its own struct so each system owns its
//! invariants; the character adds the trait-aware stat mutators on top.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{ActivityFlags, CharacterId, Sex, Stats};
use crate::names;
use crate::relations::{ParentRole, Relation};
use crate::stats::{change_stat, round_stochastic};
use crate::systems::career::Career;
use crate::systems::education::Education;
use crate::systems::health::{Illness, Illnesses};
use crate::traits::{Trait, TraitSet};

/// Chance (percent) that one parent carries a different surname.
const SPLIT_SURNAME_PERCENT: u32 = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub age: u32,
    pub stats: Stats,
    pub karma: i32,
    /// May go negative through loan repayments.
    pub money: i64,
    /// Sum of happiness at the start of every year lived.
    pub total_happiness: i64,
    pub lottery_jackpot: i64,
    pub teen_looks_inc: i32,
    pub times_meditated: u32,
    #[serde(default)]
    pub activities: ActivityFlags,
    pub traits: TraitSet,
    pub career: Career,
    pub education: Education,
    #[serde(default)]
    pub illnesses: Illnesses,
    pub relations: Vec<Relation>,
}

impl Character {
    /// A newborn with randomized stats, traits and two living parents.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let sex = Sex::random(rng);
        let first_name = names::random_first_name(rng, sex).to_string();
        let last_name = names::random_last_name(rng).to_string();

        let stats = Stats {
            happiness: rng.gen_range(50..=100),
            health: rng.gen_range(75..=100),
            smarts: rng.gen_range(0..=50) + rng.gen_range(0..=50),
            looks: rng.gen_range(0..=65) + rng.gen_range(0..=35),
        };
        let karma: i32 = (0..4).map(|_| rng.gen_range(0..=25)).sum();

        let mut character = Self {
            id: CharacterId::random(rng),
            first_name,
            last_name,
            sex,
            age: 0,
            stats,
            karma,
            money: 0,
            total_happiness: 0,
            lottery_jackpot: 0,
            teen_looks_inc: 0,
            times_meditated: 0,
            activities: ActivityFlags::default(),
            traits: TraitSet::randomize(rng),
            career: Career::default(),
            education: Education::default(),
            illnesses: Illnesses::default(),
            relations: Vec::new(),
        };
        character.relations = character.make_parents(rng);
        character
    }

    fn make_parents<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Relation> {
        let mut mother_last = self.last_name.clone();
        let mut father_last = self.last_name.clone();
        if rng.gen_range(1..=100) <= SPLIT_SURNAME_PERCENT {
            let other = names::random_last_name(rng).to_string();
            // Children mostly carry the father's surname
            if rng.gen_range(1..=3) == 1 {
                father_last = other;
            } else {
                mother_last = other;
            }
        }

        let mother_age = (0..3)
            .map(|_| {
                let lo = rng.gen_range(18..=20);
                rng.gen_range(lo..=50)
            })
            .min()
            .unwrap_or(18);
        let father_age = (0..3)
            .map(|_| {
                let lo = rng.gen_range(18..=20);
                rng.gen_range(lo..=68)
            })
            .min()
            .unwrap_or(18);

        let mut mother = Relation::new_parent(rng, ParentRole::Mother, &mother_last, mother_age);
        let mut father = Relation::new_parent(rng, ParentRole::Father, &father_last, father_age);

        // Pull one parent's generosity part of the way towards the other's
        let mother_gen = mother.generosity().unwrap_or(0);
        let father_gen = father.generosity().unwrap_or(0);
        let (mover, diff) = if rng.gen::<bool>() {
            (&mut mother, father_gen - mother_gen)
        } else {
            (&mut father, mother_gen - father_gen)
        };
        if diff != 0 {
            let step = rng.gen_range(0..=diff.abs() / 2) * diff.signum();
            let current = mover.generosity().unwrap_or(0);
            mover.set_generosity(current + step);
        }

        vec![mother, father]
    }

    // ------------------------------------------------------------------------
    // Stat mutators
    // ------------------------------------------------------------------------

    /// Moody characters feel every change half again as strongly.
    pub fn change_happiness<R: Rng + ?Sized>(&mut self, rng: &mut R, delta: i32) {
        let delta = if delta != 0 && self.traits.contains(Trait::Moody) {
            round_stochastic(rng, delta as f64 * 1.5)
        } else {
            delta
        };
        self.stats.happiness = change_stat(self.stats.happiness, delta);
    }

    pub fn change_health(&mut self, delta: i32) {
        self.stats.health = change_stat(self.stats.health, delta);
    }

    pub fn change_smarts(&mut self, delta: i32) {
        self.stats.smarts = change_stat(self.stats.smarts, delta);
    }

    pub fn change_looks(&mut self, delta: i32) {
        self.stats.looks = change_stat(self.stats.looks, delta);
    }

    pub fn change_karma(&mut self, delta: i32) {
        self.karma = change_stat(self.karma, delta);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_depressed(&self) -> bool {
        self.illnesses.contains(Illness::Depression)
    }

    pub fn parent(&self, role: ParentRole) -> Option<&Relation> {
        self.relations.iter().find(|r| r.parent_role() == Some(role))
    }

    pub fn parent_mut(&mut self, role: ParentRole) -> Option<&mut Relation> {
        self.relations.iter_mut().find(|r| r.parent_role() == Some(role))
    }

    pub fn parents(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.relations.iter().filter(|r| r.is_parent())
    }

    pub fn sibling_count(&self) -> usize {
        self.relations.iter().filter(|r| r.is_sibling()).count()
    }

    /// Final accounting once a death condition has fired.
    pub fn obituary(&self, cause: DeathCause) -> Obituary {
        let years = self.age.max(1) as f64;
        let lifetime_happiness = (self.total_happiness as f64 / years).round() as i32;
        let score = self.stats.happiness as f64 * 0.3 + lifetime_happiness as f64 * 0.7;
        Obituary {
            id: self.id,
            name: self.full_name(),
            cause,
            age: self.age,
            lifetime_happiness,
            karma: self.karma,
            score,
        }
    }
}

// ============================================================================
// Death
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Lightning,
    HeartAttack,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::OldAge => f.write_str("You died of old age."),
            DeathCause::Lightning => f.write_str("You died after being struck by lightning."),
            DeathCause::HeartAttack => f.write_str("You died due to a massive heart attack."),
        }
    }
}

/// End-of-life summary. Returned once the character dies; the session is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obituary {
    pub id: CharacterId,
    pub name: String,
    pub cause: DeathCause,
    pub age: u32,
    /// Mean happiness over every year lived.
    pub lifetime_happiness: i32,
    pub karma: i32,
    pub score: f64,
}
