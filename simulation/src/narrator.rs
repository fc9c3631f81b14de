//! Narrator: the display/prompt collaborator
//!
//! The engine never formats output itself. It hands semantic [`LifeEvent`]s and
//! [`Question`]s to a [`Narrator`], which decides how (and in which language)
//! to present them. The English `Display` impls are a default rendering only.

use std::collections::VecDeque;
use std::fmt;

use crate::character::DeathCause;
use crate::components::Stats;
use crate::systems::education::SchoolStage;
use crate::systems::health::Illness;

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum LifeEvent {
    NewYear { age: u32 },
    Died(DeathCause),

    // Health
    IllnessOnset(Illness),
    IllnessRecovered(Illness),
    StruckByLightning { lucky: bool },

    // Family
    RelativeDied { relative: &'static str, name: String, age: u32 },
    Inherited { amount: i64 },
    SiblingBorn { relative: &'static str, name: String },
    VaccinationVisit,
    StayedCalm,
    ThrewTantrum,
    BitMother,

    // Career
    Fired,
    StressedOut,
    NearBurnout,

    // Schooling
    StartedSchool(SchoolStage),
    HighSchoolGraduated,
    UniversityAccepted,
    UniversityRejected,
    ScholarshipAwarded,
    ScholarshipRejected,
    ParentsPayTuition,
    ParentsRefuseTuition,
    StudentLoanTaken,
    UniversityEnrolled,
    UniversityGraduated,
    ExpelledFromUniversity,
    LoanRepaymentStarted { principal: i64 },
    LoanPaidOff,
}

impl fmt::Display for LifeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeEvent::NewYear { age } => write!(f, "Age {age}"),
            LifeEvent::Died(cause) => write!(f, "{cause}"),
            LifeEvent::IllnessOnset(illness) => {
                write!(f, "You are suffering from {}.", illness.name())
            }
            LifeEvent::IllnessRecovered(illness) => {
                write!(f, "You are no longer suffering from {}.", illness.name())
            }
            LifeEvent::StruckByLightning { .. } => f.write_str("You were struck by lightning!"),
            LifeEvent::RelativeDied { relative, age, .. } => {
                write!(f, "Your {relative} died at the age of {age} due to old age.")
            }
            LifeEvent::Inherited { amount } => write!(f, "You inherited ${amount}"),
            LifeEvent::SiblingBorn { relative, name } => {
                write!(f, "Your parents had a baby! Say hello to your {relative}, {name}.")
            }
            LifeEvent::VaccinationVisit => f.write_str(
                "Your mother is taking you to the doctor's office to get vaccinated.",
            ),
            LifeEvent::StayedCalm => f.write_str("You remained calm."),
            LifeEvent::ThrewTantrum => f.write_str("You threw a tantrum."),
            LifeEvent::BitMother => f.write_str("You bit your mother."),
            LifeEvent::Fired => {
                f.write_str("You have been fired from your job.\nReason: Performance")
            }
            LifeEvent::StressedOut => {
                f.write_str("You're feeling stressed out from all of this work.")
            }
            LifeEvent::NearBurnout => {
                f.write_str("You feel like you're on the verge of burnout from so much work!")
            }
            LifeEvent::StartedSchool(stage) => write!(f, "You are starting {stage}."),
            LifeEvent::HighSchoolGraduated => f.write_str("You graduated from high school."),
            LifeEvent::UniversityAccepted => {
                f.write_str("Your application to university was accepted!")
            }
            LifeEvent::UniversityRejected => {
                f.write_str("Your application to university was rejected.")
            }
            LifeEvent::ScholarshipAwarded => {
                f.write_str("Your scholarship application has been awarded!")
            }
            LifeEvent::ScholarshipRejected => {
                f.write_str("Your scholarship application was rejected.")
            }
            LifeEvent::ParentsPayTuition => {
                f.write_str("Your parents agreed to pay for your university tuition!")
            }
            LifeEvent::ParentsRefuseTuition => {
                f.write_str("Your parents refused to pay for your university tuition.")
            }
            LifeEvent::StudentLoanTaken => {
                f.write_str("You took out a student loan to pay for your university tuition.")
            }
            LifeEvent::UniversityEnrolled => f.write_str("You are now enrolled in university."),
            LifeEvent::UniversityGraduated => f.write_str("You graduated from university."),
            LifeEvent::ExpelledFromUniversity => {
                f.write_str("You were expelled from university after earning bad grades.")
            }
            LifeEvent::LoanRepaymentStarted { principal } => write!(
                f,
                "You now have to start paying back your student loan of ${principal}."
            ),
            LifeEvent::LoanPaidOff => f.write_str("You've fully paid off your student loan."),
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Vaccination,
    ApplyToUniversity,
    TuitionFunding,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::Vaccination => f.write_str("How will you behave?"),
            Question::ApplyToUniversity => f.write_str("Would you like to apply to university?"),
            Question::TuitionFunding => {
                f.write_str("How would you like to pay for your college tuition?")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    StayCalm,
    ThrowTantrum,
    BiteMother,
    Scholarship,
    StudentLoan,
    AskParents,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::StayCalm => "Try to stay calm",
            Answer::ThrowTantrum => "Throw a tantrum",
            Answer::BiteMother => "Bite her",
            Answer::Scholarship => "Scholarship",
            Answer::StudentLoan => "Student Loan",
            Answer::AskParents => "Ask parents to pay",
        };
        f.write_str(text)
    }
}

/// Display and prompt collaborator. `choose` blocks until the player answers
/// and returns an index into `answers`.
pub trait Narrator {
    fn show_event(&mut self, event: &LifeEvent);

    fn choose(&mut self, question: Question, answers: &[Answer]) -> usize;

    fn show_stats(&mut self, _stats: &Stats) {}

    fn press_to_continue(&mut self) {}
}

// ============================================================================
// Per-year sink
// ============================================================================

/// Everything that happened during one survived (or final) year.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearReport {
    pub age: u32,
    pub events: Vec<LifeEvent>,
}

impl YearReport {
    pub fn contains(&self, event: &LifeEvent) -> bool {
        self.events.contains(event)
    }
}

/// Forwards events to the narrator and records them for the year's report.
pub struct Turn<'a> {
    narrator: &'a mut dyn Narrator,
    events: Vec<LifeEvent>,
}

impl<'a> Turn<'a> {
    pub fn new(narrator: &'a mut dyn Narrator) -> Self {
        Self {
            narrator,
            events: Vec::new(),
        }
    }

    pub fn event(&mut self, event: LifeEvent) {
        self.narrator.show_event(&event);
        self.events.push(event);
    }

    /// Ask a question. An out-of-range index from the narrator falls back to
    /// the first answer.
    pub fn ask(&mut self, question: Question, answers: &[Answer]) -> Answer {
        let index = self.narrator.choose(question, answers);
        answers.get(index).copied().unwrap_or(answers[0])
    }

    pub fn show_stats(&mut self, stats: &Stats) {
        self.narrator.show_stats(stats);
    }

    pub fn pause(&mut self) {
        self.narrator.press_to_continue();
    }

    pub fn events(&self) -> &[LifeEvent] {
        &self.events
    }

    pub fn finish(self, age: u32) -> YearReport {
        YearReport {
            age,
            events: self.events,
        }
    }
}

// ============================================================================
// Scripted narrator
// ============================================================================

/// Answers prompts from a queue and records what it was shown. Once the
/// queue is empty (or a queued answer isn't on offer) it picks the first
/// answer.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    answers: VecDeque<Answer>,
    pub events: Vec<LifeEvent>,
    pub prompts: Vec<(Question, Vec<Answer>)>,
    pub stats_shown: usize,
}

impl ScriptedNarrator {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Narrator for ScriptedNarrator {
    fn show_event(&mut self, event: &LifeEvent) {
        self.events.push(event.clone());
    }

    fn choose(&mut self, question: Question, answers: &[Answer]) -> usize {
        self.prompts.push((question, answers.to_vec()));
        self.answers
            .pop_front()
            .and_then(|wanted| answers.iter().position(|a| *a == wanted))
            .unwrap_or(0)
    }

    fn show_stats(&mut self, _stats: &Stats) {
        self.stats_shown += 1;
    }
}
