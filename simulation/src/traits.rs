//! Personality traits
//!
//! A character holds a small set of mutually compatible traits, picked once at
//! birth. Traits never act on their own; the systems consult them when
//! applying drift or one-off bonuses.

use std::collections::BTreeSet;
use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::character::Character;

/// Conflicting draws allowed for one trait slot before it is dropped.
const MAX_SLOT_ATTEMPTS: u32 = 50;

/// Percent chance that another trait slot is added during randomization.
const EXTRA_SLOT_PERCENT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    Cheerful,
    Grumpy,
    Moody,
    FastWorker,
    SlowWorker,
    Lazy,
}

/// Static metadata for a trait.
#[derive(Debug)]
pub struct TraitInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Chance (percent) that a drawn candidate is accepted.
    pub inclusion_percent: u32,
    pub conflicts: &'static [Trait],
}

const CHEERFUL: TraitInfo = TraitInfo {
    name: "Cheerful",
    description: "Good news lifts you higher than most.",
    inclusion_percent: 50,
    conflicts: &[Trait::Grumpy],
};

const GRUMPY: TraitInfo = TraitInfo {
    name: "Grumpy",
    description: "Your mood sours a little every year.",
    inclusion_percent: 35,
    conflicts: &[Trait::Cheerful],
};

const MOODY: TraitInfo = TraitInfo {
    name: "Moody",
    description: "Every change in happiness hits half again as hard.",
    inclusion_percent: 40,
    conflicts: &[],
};

const FAST_WORKER: TraitInfo = TraitInfo {
    name: "Fast Worker",
    description: "Your job performance tends to climb.",
    inclusion_percent: 45,
    conflicts: &[Trait::SlowWorker, Trait::Lazy],
};

const SLOW_WORKER: TraitInfo = TraitInfo {
    name: "Slow Worker",
    description: "Your job performance tends to slip.",
    inclusion_percent: 35,
    conflicts: &[Trait::FastWorker],
};

const LAZY: TraitInfo = TraitInfo {
    name: "Lazy",
    description: "You work less and worry less.",
    inclusion_percent: 40,
    conflicts: &[Trait::FastWorker],
};

impl Trait {
    pub const ALL: [Trait; 6] = [
        Trait::Cheerful,
        Trait::Grumpy,
        Trait::Moody,
        Trait::FastWorker,
        Trait::SlowWorker,
        Trait::Lazy,
    ];

    pub fn info(self) -> &'static TraitInfo {
        match self {
            Trait::Cheerful => &CHEERFUL,
            Trait::Grumpy => &GRUMPY,
            Trait::Moody => &MOODY,
            Trait::FastWorker => &FAST_WORKER,
            Trait::SlowWorker => &SLOW_WORKER,
            Trait::Lazy => &LAZY,
        }
    }

    /// Symmetric: a conflict declared on either side counts. A trait also
    /// conflicts with itself so a slot can't be filled twice.
    pub fn conflicts_with(self, other: Trait) -> bool {
        self == other
            || self.info().conflicts.contains(&other)
            || other.info().conflicts.contains(&self)
    }

    pub fn roll_selection<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        rng.gen_range(1..=100) <= self.info().inclusion_percent
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// A conflict-free set of traits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSet(BTreeSet<Trait>);

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a fresh set of traits.
    ///
    /// One slot is always opened; each further slot opens with 60% chance while
    /// the count stays below a freshly drawn ceiling. See [`TraitSet::fill_slot`]
    /// for how each slot is filled.
    pub fn randomize<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total = Trait::ALL.len();
        let mut slots = 1;
        while rng.gen_range(1..=100) <= EXTRA_SLOT_PERCENT && slots < rng.gen_range(1..=total) {
            slots += 1;
        }

        let mut set = Self::new();
        for _ in 0..slots {
            set.fill_slot(rng);
        }
        set
    }

    /// Draw traits until one passes its inclusion roll without conflicting
    /// with the set. Failed inclusion rolls are free; after 50 conflicting
    /// draws (a trait already held counts) the slot is left empty.
    pub fn fill_slot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut attempts = MAX_SLOT_ATTEMPTS;
        while attempts > 0 {
            let candidate = Trait::ALL[rng.gen_range(0..Trait::ALL.len())];
            if !candidate.roll_selection(rng) {
                continue;
            }
            if self.insert(candidate) {
                return true;
            }
            attempts -= 1;
        }
        false
    }

    /// Add a trait unless it conflicts with one already held.
    pub fn insert(&mut self, candidate: Trait) -> bool {
        if self.0.iter().any(|held| candidate.conflicts_with(*held)) {
            return false;
        }
        self.0.insert(candidate)
    }

    pub fn contains(&self, t: Trait) -> bool {
        self.0.contains(&t)
    }

    pub fn iter(&self) -> impl Iterator<Item = Trait> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rebuild the set, dropping any trait that conflicts with one kept
    /// before it. Returns how many were dropped.
    pub fn drop_conflicts(&mut self) -> usize {
        let before = self.0.len();
        let held = std::mem::take(&mut self.0);
        for t in held {
            self.insert(t);
        }
        before - self.0.len()
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        let mut set = Self::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

/// Yearly personality drift, applied right after base aging.
pub fn yearly_drift(character: &mut Character, rng: &mut dyn RngCore) {
    if character.traits.contains(Trait::Grumpy) && character.stats.happiness > 33 {
        let sulk = if rng.gen_range(1..=12) == 1 {
            rng.gen_range(4..=8)
        } else {
            rng.gen_range(0..=4)
        };
        character.change_happiness(rng, -sulk);
    }

    if character.traits.contains(Trait::FastWorker) {
        character.career.change_performance(rng.gen_range(0..=4));
    } else if character.traits.contains(Trait::SlowWorker) {
        character.career.change_performance(-rng.gen_range(0..=4));
    }

    if character.traits.contains(Trait::Lazy) {
        character.career.change_performance(-rng.gen_range(1..=5));
        character.career.change_stress(-rng.gen_range(0..=4));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_conflicts_are_symmetric() {
        for a in Trait::ALL {
            for b in Trait::ALL {
                assert_eq!(a.conflicts_with(b), b.conflicts_with(a), "{a} vs {b}");
            }
        }
        assert!(Trait::Cheerful.conflicts_with(Trait::Grumpy));
        assert!(Trait::Lazy.conflicts_with(Trait::FastWorker));
        assert!(!Trait::Moody.conflicts_with(Trait::Lazy));
    }

    #[test]
    fn test_randomized_traits_never_conflict() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let set = TraitSet::randomize(&mut rng);
            assert!(set.len() <= Trait::ALL.len());
            let held: Vec<Trait> = set.iter().collect();
            for (i, a) in held.iter().enumerate() {
                for b in &held[i + 1..] {
                    assert!(!a.conflicts_with(*b), "seed {seed}: {a} with {b}");
                }
            }
        }
    }

    #[test]
    fn test_insert_rejects_conflicts() {
        let mut set = TraitSet::new();
        assert!(set.insert(Trait::FastWorker));
        assert!(!set.insert(Trait::Lazy));
        assert!(!set.insert(Trait::FastWorker));
        assert!(set.insert(Trait::Moody));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_drop_conflicts_keeps_first() {
        let mut set = TraitSet(BTreeSet::from([Trait::Cheerful, Trait::Grumpy, Trait::Moody]));
        assert_eq!(set.drop_conflicts(), 1);
        assert!(set.contains(Trait::Cheerful));
        assert!(!set.contains(Trait::Grumpy));
        assert!(set.contains(Trait::Moody));
    }

    #[test]
    fn test_slot_left_empty_after_repeated_conflicts() {
        // The mock always draws the first trait and always passes its roll
        let mut rng = StepRng::new(0, 0);
        let mut set = TraitSet::new();
        assert!(set.fill_slot(&mut rng));
        assert!(!set.fill_slot(&mut rng));
        assert_eq!(set.len(), 1);
        assert!(set.contains(Trait::ALL[0]));
    }

    fn employee(traits: &[Trait]) -> Character {
        let mut rng = StdRng::seed_from_u64(17);
        let mut character = Character::new(&mut rng);
        character.traits = traits.iter().copied().collect();
        character.career.get_job(40_000);
        character
    }

    #[test]
    fn test_grumpy_sulks_only_while_content() {
        let mut character = employee(&[Trait::Grumpy]);
        character.stats.happiness = 50;
        // Lowest rolls: the 1-in-12 bad day fires and costs 4
        let mut rng = StepRng::new(0, 0);
        yearly_drift(&mut character, &mut rng);
        assert_eq!(character.stats.happiness, 46);

        character.stats.happiness = 33;
        yearly_drift(&mut character, &mut rng);
        assert_eq!(character.stats.happiness, 33);
    }

    #[test]
    fn test_worker_speed_sets_performance_direction() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut fast = employee(&[Trait::FastWorker]);
        let mut slow = employee(&[Trait::SlowWorker]);
        for _ in 0..10 {
            let (fast_before, slow_before) = (fast.career.performance, slow.career.performance);
            yearly_drift(&mut fast, &mut rng);
            yearly_drift(&mut slow, &mut rng);
            assert!(fast.career.performance >= fast_before);
            assert!(slow.career.performance <= slow_before);
        }
        assert!(fast.career.performance > 50);
        assert!(slow.career.performance < 50);
        assert_eq!(fast.career.stress, 45);
    }

    #[test]
    fn test_lazy_drift_only_touches_employed() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut character = Character::new(&mut rng);
        character.traits = [Trait::Lazy].into_iter().collect();
        yearly_drift(&mut character, &mut rng);
        assert_eq!(character.career.performance, 0);
        assert_eq!(character.career.stress, 0);

        character.career.get_job(40_000);
        yearly_drift(&mut character, &mut rng);
        assert!(character.career.performance < 50);
        assert!(character.career.stress <= 45);
    }
}
