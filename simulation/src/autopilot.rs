//! Autopilot: unattended lives for the batch runner
//!
//! Nobody sits at the prompts here, so an [`AutoNarrator`] answers them at
//! random and the job market is simulated by [`manage_career`]. Lives are
//! independent and run in parallel; each one is still single-threaded.

use std::collections::BTreeMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::character::{Character, DeathCause, Obituary};
use crate::components::Stats;
use crate::config::{RunnerConfig, SimConfig};
use crate::narrator::{Answer, LifeEvent, Narrator, Question};
use crate::persistence::{self, PersistenceError};
use crate::world::{AdvanceOutcome, LifeWorld};

/// ChaCha stream ids, so the engine, the prompts and the job market draw
/// from independent sequences of the same seed.
const NARRATOR_STREAM: u64 = 1;
const MARKET_STREAM: u64 = 2;

// ============================================================================
// Narrator
// ============================================================================

/// Picks a uniformly random answer and logs everything it is shown.
pub struct AutoNarrator<R: RngCore> {
    rng: R,
}

impl<R: RngCore> AutoNarrator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> Narrator for AutoNarrator<R> {
    fn show_event(&mut self, event: &LifeEvent) {
        debug!(%event, "event");
    }

    fn choose(&mut self, question: Question, answers: &[Answer]) -> usize {
        let index = self.rng.gen_range(0..answers.len().max(1));
        debug!(%question, answer = ?answers.get(index), "auto answer");
        index
    }

    fn show_stats(&mut self, stats: &Stats) {
        debug!(?stats, "stats");
    }
}

// ============================================================================
// Job market
// ============================================================================

/// What the job market did this year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerMove {
    Hired { salary: i64 },
    Retired,
}

/// Offer jobs to idle working-age adults and retire everyone at the
/// retirement age.
pub fn manage_career<R: Rng + ?Sized>(
    character: &mut Character,
    rng: &mut R,
    runner: &RunnerConfig,
) -> Option<CareerMove> {
    let age = character.age;
    if age >= runner.retirement_age {
        if !character.career.has_job {
            return None;
        }
        character.career.lose_job();
        info!(age, "retired");
        return Some(CareerMove::Retired);
    }
    if age < runner.working_age
        || character.career.has_job
        || character.education.is_in_school()
        || rng.gen_range(1..=100) > runner.job_offer_percent
    {
        return None;
    }
    let salary = rng.gen_range(runner.salary_min..=runner.salary_max);
    character.career.get_job(salary);
    info!(age, salary, "hired");
    Some(CareerMove::Hired { salary })
}

// ============================================================================
// Runs
// ============================================================================

#[derive(Debug, Clone)]
pub struct LifeSummary {
    pub seed: u64,
    /// None when the life was cut off at the age cap.
    pub obituary: Option<Obituary>,
    pub age: u32,
    pub money: i64,
}

/// Run one life from birth to death (or the age cap).
pub fn simulate_life(
    seed: u64,
    runner: &RunnerConfig,
    sim: &SimConfig,
) -> Result<LifeSummary, PersistenceError> {
    let mut world = LifeWorld::seeded(seed).with_config(sim.clone());
    let mut narrator = AutoNarrator::new(stream(seed, NARRATOR_STREAM));
    let mut market = stream(seed, MARKET_STREAM);
    let save_dir = runner.save_dir.as_deref();

    let obituary = loop {
        if world.character.age >= runner.max_age {
            break None;
        }
        match world.advance(&mut narrator) {
            AdvanceOutcome::Died(obituary) => break Some(obituary),
            AdvanceOutcome::Survived(_) => {
                manage_career(&mut world.character, &mut market, runner);
                if let Some(dir) = save_dir {
                    persistence::save_to_dir(dir, &world.character)?;
                }
            }
        }
    };

    if let (Some(dir), Some(_)) = (save_dir, &obituary) {
        persistence::delete_from_dir(dir, world.character.id)?;
    }
    Ok(LifeSummary {
        seed,
        obituary,
        age: world.character.age,
        money: world.character.money,
    })
}

fn stream(seed: u64, id: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(id);
    rng
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub lives: usize,
    pub deaths: usize,
    pub mean_score: f64,
    pub mean_lifespan: f64,
    pub causes: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn from_lives(lives: &[LifeSummary]) -> Self {
        let obituaries: Vec<&Obituary> = lives.iter().filter_map(|l| l.obituary.as_ref()).collect();
        let deaths = obituaries.len();
        let mut causes = BTreeMap::new();
        for obituary in &obituaries {
            *causes.entry(cause_name(obituary.cause).to_string()).or_insert(0) += 1;
        }
        let mean = |f: &dyn Fn(&Obituary) -> f64| {
            if deaths == 0 {
                0.0
            } else {
                obituaries.iter().map(|o| f(o)).sum::<f64>() / deaths as f64
            }
        };
        Self {
            lives: lives.len(),
            deaths,
            mean_score: mean(&|o| o.score),
            mean_lifespan: mean(&|o| o.age as f64),
            causes,
        }
    }
}

fn cause_name(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::OldAge => "old age",
        DeathCause::Lightning => "lightning",
        DeathCause::HeartAttack => "heart attack",
    }
}

/// Simulate `runner.lives` lives in parallel, seeded consecutively from
/// `runner.base_seed`.
pub fn run_batch(
    runner: &RunnerConfig,
    sim: &SimConfig,
) -> Result<Vec<LifeSummary>, PersistenceError> {
    (0..runner.lives as u64)
        .into_par_iter()
        .map(|i| simulate_life(runner.base_seed.wrapping_add(i), runner, sim))
        .collect()
}
