//! Career System
//!
//! Employment state plus the yearly stress and performance dynamics.
//! Stress and performance only mean something while employed; every mutator
//! is a no-op otherwise, and losing a job zeroes the whole struct.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::Character;
use crate::config::SimConfig;
use crate::narrator::{LifeEvent, Turn};
use crate::stats::{change_stat, round_money, round_stochastic};
use crate::systems::health::{self, Illness};
use crate::tax::TaxPolicy;

pub const STARTING_STRESS: i32 = 45;
pub const STARTING_PERFORMANCE: i32 = 50;

/// Performance below this puts the job at risk.
const FIRING_THRESHOLD: i32 = 15;
const HIGH_STRESS: i32 = 65;
const CRITICAL_STRESS: i32 = 85;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    pub has_job: bool,
    pub salary: i64,
    pub years_worked: u32,
    pub stress: i32,
    pub performance: i32,
}

impl Career {
    /// Start a job. Does nothing if already employed.
    pub fn get_job(&mut self, salary: i64) {
        if self.has_job {
            return;
        }
        self.has_job = true;
        self.salary = salary;
        self.years_worked = 0;
        self.stress = STARTING_STRESS;
        self.performance = STARTING_PERFORMANCE;
    }

    /// Leave the current job. Does nothing if unemployed.
    pub fn lose_job(&mut self) {
        if self.has_job {
            *self = Self::default();
        }
    }

    pub fn change_stress(&mut self, delta: i32) {
        if self.has_job {
            self.stress = change_stat(self.stress, delta);
        }
    }

    pub fn change_performance(&mut self, delta: i32) {
        if self.has_job {
            self.performance = change_stat(self.performance, delta);
        }
    }

    /// Unemployed careers carry no stress, performance, salary or tenure.
    pub fn is_consistent(&self) -> bool {
        self.has_job
            || (self.salary == 0
                && self.years_worked == 0
                && self.stress == 0
                && self.performance == 0)
    }
}

/// Stress wanders and is pulled towards a happiness-derived target: unhappy
/// workers settle at higher stress. Rises are pulled faster than falls.
pub fn stress_drift(character: &mut Character, rng: &mut dyn RngCore) {
    if !character.career.has_job {
        return;
    }
    character.career.change_stress(rng.gen_range(-4..=4));

    let target = 65.0 - character.stats.happiness as f64 * 0.3;
    let diff = target - character.career.stress as f64;
    if diff > 0.0 {
        let cap = round_stochastic(rng, diff / 6.0);
        character.career.change_stress(rng.gen_range(0..=cap));
    } else if diff < 0.0 {
        let cap = round_stochastic(rng, diff.abs() / 10.0);
        character.career.change_stress(-rng.gen_range(0..=cap));
    }
    debug!(stress = character.career.stress, target, "stress drift");
}

/// Pay for the year: tenure, then after-tax salary minus living expenses.
pub fn accrue_income(
    character: &mut Character,
    rng: &mut dyn RngCore,
    tax: &dyn TaxPolicy,
    config: &SimConfig,
) {
    if character.career.has_job {
        character.career.years_worked += 1;
    }
    let salary = character.career.salary;
    if salary > 0 {
        let after_tax = (salary - tax.tax_for(salary)) as f64;
        let kept = rng.gen_range(config.expense_ratio_min..=config.expense_ratio_max);
        character.money += round_money(rng, after_tax * kept);
    }
}

/// Closing career step of the year: this year's mood swing feeds stress,
/// stress feeds performance, then firing and stress consequences.
pub fn end_of_year(
    character: &mut Character,
    rng: &mut dyn RngCore,
    old_happiness: i32,
    turn: &mut Turn<'_>,
) {
    if !character.career.has_job {
        return;
    }

    // Losses beyond 5 points raise stress at full weight, gains lower it at half
    let happy_change = (character.stats.happiness - old_happiness) as f64;
    let diff = if happy_change > 0.0 {
        (happy_change - 5.0).max(0.0) / 2.0
    } else {
        (happy_change + 5.0).min(0.0)
    };
    let stress_delta = -round_stochastic(rng, diff / 4.0);
    character.career.change_stress(stress_delta);

    let pull = round_stochastic(rng, (50 - character.career.stress) as f64 / 20.0);
    character
        .career
        .change_performance(rng.gen_range(-4..=4) + pull);

    evaluate_firing(character, rng, turn);
    stress_consequences(character, rng, turn);
}

/// Low performers are fired with probability `1 / (performance + 1)`.
/// Returns whether the character lost the job.
pub fn evaluate_firing(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
) -> bool {
    let performance = character.career.performance;
    if !character.career.has_job || performance >= FIRING_THRESHOLD {
        return false;
    }
    if rng.gen_range(1..=performance + 1) != 1 {
        return false;
    }

    info!(performance, "fired for performance");
    turn.event(LifeEvent::Fired);
    character.career.lose_job();
    let hit = rng.gen_range(20..=35);
    character.change_happiness(rng, -hit);
    true
}

fn stress_consequences(character: &mut Character, rng: &mut dyn RngCore, turn: &mut Turn<'_>) {
    let stress = character.career.stress;
    if stress <= HIGH_STRESS {
        return;
    }

    let cap = round_stochastic(rng, (stress - HIGH_STRESS) as f64 / 5.0);
    let amount = rng.gen_range(0..=cap);
    character.change_happiness(rng, -amount);

    let critical = stress > CRITICAL_STRESS;
    if critical {
        let toll = round_stochastic(rng, (stress - 80) as f64 / 4.0);
        character.change_health(-toll);
    }

    let odds = if critical { 4 } else { 5 };
    if amount > 0 && rng.gen_range(1..=odds) == 1 {
        turn.event(if critical {
            LifeEvent::NearBurnout
        } else {
            LifeEvent::StressedOut
        });
    }

    health::check_onset(Illness::HighBloodPressure, character, rng, turn);
}
