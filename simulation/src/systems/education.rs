//! Education System
//!
//! Schooling from first grade through university. `grades` doubles as the
//! enrollment flag: it is `Some` exactly while the character is in school or
//! university. Grade mutators are no-ops otherwise.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::Character;
use crate::config::SimConfig;
use crate::narrator::{Answer, LifeEvent, Question, Turn};
use crate::stats::{change_stat, clamp, round_stochastic, STAT_MAX, STAT_MIN};
use crate::traits::Trait;

pub const ELEMENTARY_AGE: u32 = 6;
pub const MIDDLE_AGE: u32 = 12;
pub const HIGH_AGE: u32 = 14;
pub const GRADUATION_AGE: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolStage {
    Elementary,
    Middle,
    High,
}

impl fmt::Display for SchoolStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchoolStage::Elementary => f.write_str("elementary school"),
            SchoolStage::Middle => f.write_str("middle school"),
            SchoolStage::High => f.write_str("high school"),
        }
    }
}

/// How university tuition ended up being paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuitionFunding {
    Scholarship,
    Parents,
    StudentLoan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub grades: Option<i32>,
    pub dropped_out: bool,
    /// Years left at university; zero when not enrolled there.
    pub uv_years: u32,
    /// Loan-funded tuition, turned into `student_loan` when university ends.
    pub chose_student_loan: bool,
    /// Outstanding principal, never negative.
    pub student_loan: i64,
}

impl Education {
    pub fn is_in_school(&self) -> bool {
        self.grades.is_some()
    }

    pub fn in_university(&self) -> bool {
        self.uv_years > 0
    }

    /// Enroll (or re-grade) from smarts plus an offset.
    pub fn calc_grades(&mut self, smarts: i32, offset: i32) {
        self.grades = Some(grades_for(smarts + offset));
    }

    pub fn change_grades(&mut self, delta: i32) {
        if let Some(grades) = &mut self.grades {
            *grades = change_stat(*grades, delta);
        }
    }

    /// Leave grade school for good. University students can't drop out
    /// this way. Returns whether anything changed.
    pub fn drop_out(&mut self) -> bool {
        if !self.is_in_school() || self.in_university() {
            return false;
        }
        self.grades = None;
        self.dropped_out = true;
        true
    }
}

/// `10 * sqrt(score)`, rounded and clamped to [0, 100].
pub fn grades_for(score: i32) -> i32 {
    let raw = (10.0 * (score.max(0) as f64).sqrt()).round() as i32;
    clamp(raw, STAT_MIN, STAT_MAX)
}

/// Grades random-walk, get pulled towards what smarts alone would earn, and
/// follow mood: unhappy students slip faster than happy ones improve.
pub fn schooling_drift(character: &mut Character, rng: &mut dyn RngCore) {
    if !character.education.is_in_school() {
        return;
    }
    character.education.change_grades(rng.gen_range(-3..=3));

    let baseline = grades_for(character.stats.smarts);
    let grades = character.education.grades.unwrap_or(baseline);
    if grades < baseline - 2 {
        character.education.change_grades(rng.gen_range(1..=3));
    } else if grades > baseline + 2 {
        character.education.change_grades(-rng.gen_range(1..=3));
    }

    let mut mood = (character.stats.happiness - 50) as f64 / 10.0;
    if mood > 0.0 {
        mood /= 2.0;
    }
    let nudge = round_stochastic(rng, mood);
    character.education.change_grades(nudge);
}

/// Age-keyed school transitions.
pub fn school_milestones(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    if character.education.dropped_out {
        return;
    }
    match character.age {
        ELEMENTARY_AGE => start_school(character, rng, turn, SchoolStage::Elementary),
        MIDDLE_AGE => start_school(character, rng, turn, SchoolStage::Middle),
        HIGH_AGE => start_school(character, rng, turn, SchoolStage::High),
        GRADUATION_AGE => high_school_graduation(character, rng, turn, config),
        _ => {}
    }
}

fn start_school(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    stage: SchoolStage,
) {
    let (smarts_max, offset) = match stage {
        SchoolStage::Elementary => (2, rng.gen_range(4..=8)),
        SchoolStage::Middle => (3, rng.gen_range(0..=8)),
        SchoolStage::High => (4, rng.gen_range(-8..=8)),
    };
    turn.event(LifeEvent::StartedSchool(stage));
    character.change_smarts(rng.gen_range(1..=smarts_max));
    character
        .education
        .calc_grades(character.stats.smarts, offset);
    debug!(?stage, grades = ?character.education.grades, "school started");
}

/// Leave high school, then optionally apply to university and pick how to
/// fund it.
pub fn high_school_graduation(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    character.education.grades = None;
    turn.event(LifeEvent::HighSchoolGraduated);
    let joy = rng.gen_range(15..=20);
    character.change_happiness(rng, joy);
    character.change_smarts(rng.gen_range(6..=10));
    turn.show_stats(&character.stats);

    if turn.ask(Question::ApplyToUniversity, &[Answer::Yes, Answer::No]) != Answer::Yes {
        return;
    }

    if character.stats.smarts < rng.gen_range(28..=44) {
        turn.event(LifeEvent::UniversityRejected);
        let hit = rng.gen_range(7..=9);
        character.change_happiness(rng, -hit);
        return;
    }

    turn.event(LifeEvent::UniversityAccepted);
    let joy = rng.gen_range(7..=9);
    character.change_happiness(rng, joy);

    let funding = choose_funding(character, rng, turn);
    info!(?funding, "enrolled in university");
    turn.event(LifeEvent::UniversityEnrolled);
    character.education.uv_years = config.university_years;
    let offset = rng.gen_range(-8..=10);
    character
        .education
        .calc_grades(character.stats.smarts, offset);
}

/// Keep asking until a funding option succeeds. Rejected options are taken
/// off the table; the loan can't be refused, so this always ends.
pub fn choose_funding(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
) -> TuitionFunding {
    let mut options = vec![Answer::Scholarship, Answer::StudentLoan, Answer::AskParents];
    let cheerful = character.traits.contains(Trait::Cheerful);

    loop {
        match turn.ask(Question::TuitionFunding, &options) {
            Answer::Scholarship => {
                let bar_floor = rng.gen_range(75..=85);
                if character.stats.smarts >= rng.gen_range(bar_floor..=100) {
                    turn.event(LifeEvent::ScholarshipAwarded);
                    let joy = rng.gen_range(10..=15) + if cheerful { 10 } else { 0 };
                    character.change_happiness(rng, joy);
                    return TuitionFunding::Scholarship;
                }
                turn.event(LifeEvent::ScholarshipRejected);
                let hit = rng.gen_range(7..=9);
                character.change_happiness(rng, -hit);
                options.retain(|a| *a != Answer::Scholarship);
            }
            Answer::AskParents => {
                let chance = parental_funding_chance(character);
                if rng.gen::<f64>() < chance {
                    turn.event(LifeEvent::ParentsPayTuition);
                    let joy = rng.gen_range(7..=9) + if cheerful { 7 } else { 0 };
                    character.change_happiness(rng, joy);
                    return TuitionFunding::Parents;
                }
                turn.event(LifeEvent::ParentsRefuseTuition);
                let hit = rng.gen_range(7..=9);
                character.change_happiness(rng, -hit);
                options.retain(|a| *a != Answer::AskParents);
            }
            _ => {
                turn.event(LifeEvent::StudentLoanTaken);
                character.education.chose_student_loan = true;
                return TuitionFunding::StudentLoan;
            }
        }
    }
}

/// `(mean parental generosity / 100)^4`; zero with no living parents.
pub fn parental_funding_chance(character: &Character) -> f64 {
    let generosity: Vec<i32> = character.parents().filter_map(|p| p.generosity()).collect();
    if generosity.is_empty() {
        return 0.0;
    }
    let mean = generosity.iter().sum::<i32>() as f64 / generosity.len() as f64;
    (mean / 100.0).powi(4)
}

/// One university year: count down, then graduate or risk expulsion.
pub fn university_year(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    if !character.education.in_university() {
        return;
    }
    character.education.uv_years -= 1;

    if character.education.uv_years == 0 {
        character.education.grades = None;
        info!("graduated from university");
        turn.event(LifeEvent::UniversityGraduated);
        let joy = rng.gen_range(14..=20);
        character.change_happiness(rng, joy);
        character.change_smarts(rng.gen_range(10..=15));
        originate_loan(character, rng, turn, config);
        return;
    }

    let grades = character.education.grades.unwrap_or(0);
    if grades < rng.gen_range(10..=45) {
        info!(grades, "expelled from university");
        turn.event(LifeEvent::ExpelledFromUniversity);
        let hit = rng.gen_range(30..=50);
        character.change_happiness(rng, -hit);
        character.education.grades = None;
        character.education.uv_years = 0;
        originate_loan(character, rng, turn, config);
    }
}

fn originate_loan(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    if !character.education.chose_student_loan {
        return;
    }
    let principal = rng.gen_range(config.student_loan_min..=config.student_loan_max);
    character.education.chose_student_loan = false;
    character.education.student_loan = principal;
    turn.event(LifeEvent::LoanRepaymentStarted { principal });
}

/// Yearly repayment: the smallest of three draws, capped by what's left.
pub fn repay_student_loan(
    character: &mut Character,
    rng: &mut dyn RngCore,
    turn: &mut Turn<'_>,
    config: &SimConfig,
) {
    if character.education.student_loan <= 0 {
        return;
    }
    let installment = (0..3)
        .map(|_| rng.gen_range(config.loan_payment_min..=config.loan_payment_max))
        .min()
        .unwrap_or(config.loan_payment_min)
        .min(character.education.student_loan);
    character.money -= installment;
    character.education.student_loan -= installment;
    if character.education.student_loan == 0 {
        info!("student loan paid off");
        turn.event(LifeEvent::LoanPaidOff);
    }
}
