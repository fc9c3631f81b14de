//! Health System
//!
//! Illnesses are a closed set of kinds. Each kind is described by one row in
//! [`ILLNESS_TABLE`]: when it starts, what onset costs, and how it progresses
//! each year (including recovery and fatal outcomes). Adding an illness means
//! adding a row, not a new branch in the year loop.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::character::{Character, DeathCause};
use crate::narrator::{LifeEvent, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Illness {
    Depression,
    HighBloodPressure,
}

impl Illness {
    pub fn name(self) -> &'static str {
        effects(self).name
    }
}

impl fmt::Display for Illness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one year living with an illness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Ongoing,
    Recovered,
    Fatal(DeathCause),
}

/// Effect table row for one illness kind.
pub struct IllnessEffects {
    pub illness: Illness,
    pub name: &'static str,
    pub onset: fn(&Character, &mut dyn RngCore) -> bool,
    pub on_onset: fn(&mut Character, &mut dyn RngCore),
    pub progress: fn(&mut Character, &mut dyn RngCore) -> Progress,
}

pub const ILLNESS_TABLE: &[IllnessEffects] = &[
    IllnessEffects {
        illness: Illness::Depression,
        name: "depression",
        onset: depression_onset,
        on_onset: depression_strikes,
        progress: depression_progress,
    },
    IllnessEffects {
        illness: Illness::HighBloodPressure,
        name: "high blood pressure",
        onset: hypertension_onset,
        on_onset: hypertension_strikes,
        progress: hypertension_progress,
    },
];

/// Rows are stored in declaration order of [`Illness`].
pub fn effects(illness: Illness) -> &'static IllnessEffects {
    &ILLNESS_TABLE[illness as usize]
}

/// Ordered set of current illnesses, each present at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Illnesses(Vec<Illness>);

impl Illnesses {
    /// Returns false if already present.
    pub fn add(&mut self, illness: Illness) -> bool {
        if self.contains(illness) {
            return false;
        }
        self.0.push(illness);
        true
    }

    pub fn remove(&mut self, illness: Illness) -> bool {
        let before = self.0.len();
        self.0.retain(|held| *held != illness);
        before != self.0.len()
    }

    pub fn contains(&self, illness: Illness) -> bool {
        self.0.contains(&illness)
    }

    pub fn iter(&self) -> impl Iterator<Item = Illness> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop repeated entries, keeping first occurrences. Returns how many went.
    pub fn dedup(&mut self) -> usize {
        let held = std::mem::take(&mut self.0);
        let before = held.len();
        for illness in held {
            self.add(illness);
        }
        before - self.0.len()
    }
}

impl FromIterator<Illness> for Illnesses {
    fn from_iter<I: IntoIterator<Item = Illness>>(iter: I) -> Self {
        let mut set = Self::default();
        for illness in iter {
            set.add(illness);
        }
        set
    }
}

/// Roll the onset condition for `illness` and apply it if it fires.
/// Returns whether the character fell ill.
pub fn check_onset(
    illness: Illness,
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
) -> bool {
    let row = effects(illness);
    if character.illnesses.contains(illness) || !(row.onset)(character, rng) {
        return false;
    }
    info!(illness = row.name, "illness onset");
    turn.event(LifeEvent::IllnessOnset(illness));
    (row.on_onset)(character, rng);
    character.illnesses.add(illness);
    true
}

/// Yearly progression of every current illness, in the order contracted.
pub fn progress_illnesses(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
) -> Result<(), DeathCause> {
    let current: Vec<Illness> = character.illnesses.iter().collect();
    for illness in current {
        match (effects(illness).progress)(character, rng) {
            Progress::Ongoing => {}
            Progress::Recovered => {
                info!(illness = illness.name(), "recovered");
                turn.event(LifeEvent::IllnessRecovered(illness));
                character.illnesses.remove(illness);
            }
            Progress::Fatal(cause) => return Err(cause),
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Depression
// ----------------------------------------------------------------------------

fn depression_onset(character: &Character, rng: &mut dyn RngCore) -> bool {
    character.stats.happiness < rng.gen_range(1..=10)
}

fn depression_strikes(character: &mut Character, rng: &mut dyn RngCore) {
    character.change_happiness(rng, -50);
    let toll = rng.gen_range(4..=8);
    character.change_health(-toll);
}

fn depression_progress(character: &mut Character, rng: &mut dyn RngCore) -> Progress {
    if character.stats.happiness >= rng.gen_range(20..=35) {
        let rebound = (100 - character.stats.happiness) / 2;
        character.change_happiness(rng, rebound);
        let heal = rng.gen_range(4..=8);
        character.change_health(heal);
        return Progress::Recovered;
    }
    let sadness = rng.gen_range(1..=2);
    character.change_happiness(rng, -sadness);
    let toll = rng.gen_range(1..=4);
    character.change_health(-toll);
    Progress::Ongoing
}

// ----------------------------------------------------------------------------
// High blood pressure
// ----------------------------------------------------------------------------

fn hypertension_onset(character: &Character, rng: &mut dyn RngCore) -> bool {
    character.career.stress > 85 && rng.gen_range(1..=7) == 1
}

fn hypertension_strikes(character: &mut Character, rng: &mut dyn RngCore) {
    let toll = rng.gen_range(4..=8);
    character.change_health(-toll);
}

fn hypertension_progress(character: &mut Character, rng: &mut dyn RngCore) -> Progress {
    let toll = rng.gen_range(1..=5);
    character.change_health(-toll);

    let stress = character.career.stress;
    if stress > rng.gen_range(80..=95) && character.stats.health < rng.gen_range(1..=10) {
        if rng.gen_range(1..=3) == 1 {
            return Progress::Fatal(DeathCause::HeartAttack);
        }
    } else if stress < rng.gen_range(25..=60) && rng.gen_range(1..=2) == 1 {
        let relief = rng.gen_range(4..=8);
        character.change_happiness(rng, relief);
        let heal = rng.gen_range(4..=8);
        character.change_health(heal);
        return Progress::Recovered;
    }
    Progress::Ongoing
}
