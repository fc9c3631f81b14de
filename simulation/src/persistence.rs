//! Persistence module for saving and restoring a character
//!
//! Saves are versioned JSON documents. Older versions are migrated field by
//! field on load, and every load repairs broken invariants instead of
//! trusting the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::character::Character;
use crate::components::{ActivityFlags, CharacterId, Sex, Stats};
use crate::relations::Relation;
use crate::stats::{clamp, STAT_MAX, STAT_MIN};
use crate::systems::career::Career;
use crate::systems::education::Education;
use crate::systems::health::{Illness, Illnesses};
use crate::traits::TraitSet;

pub const SAVE_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version: {0}")]
    UnsupportedVersion(u32),
    #[error("invalid save file: {0}")]
    Invalid(String),
}

// ============================================================================
// Save Data Structures
// ============================================================================

/// Current on-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub character: Character,
}

/// First layout: no activity flags or illness list, depression stored as a
/// flag.
#[derive(Debug, Clone, Deserialize)]
struct SaveFileV1 {
    saved_at: Option<DateTime<Utc>>,
    character: CharacterV1,
}

#[derive(Debug, Clone, Deserialize)]
struct CharacterV1 {
    id: CharacterId,
    first_name: String,
    last_name: String,
    sex: Sex,
    age: u32,
    stats: Stats,
    karma: i32,
    money: i64,
    total_happiness: i64,
    #[serde(default)]
    lottery_jackpot: i64,
    #[serde(default)]
    teen_looks_inc: i32,
    #[serde(default)]
    times_meditated: u32,
    traits: TraitSet,
    career: Career,
    education: Education,
    relations: Vec<Relation>,
    #[serde(default)]
    depressed: bool,
}

impl From<CharacterV1> for Character {
    fn from(old: CharacterV1) -> Self {
        let illnesses: Illnesses = old
            .depressed
            .then_some(Illness::Depression)
            .into_iter()
            .collect();
        Character {
            id: old.id,
            first_name: old.first_name,
            last_name: old.last_name,
            sex: old.sex,
            age: old.age,
            stats: old.stats,
            karma: old.karma,
            money: old.money,
            total_happiness: old.total_happiness,
            lottery_jackpot: old.lottery_jackpot,
            teen_looks_inc: old.teen_looks_inc,
            times_meditated: old.times_meditated,
            activities: ActivityFlags::default(),
            traits: old.traits,
            career: old.career,
            education: old.education,
            illnesses,
            relations: old.relations,
        }
    }
}

/// What a load had to fix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repairs {
    pub migrated_from: Option<u32>,
    pub values_clamped: u32,
    pub career_reset: bool,
    pub illnesses_dropped: usize,
    pub traits_dropped: usize,
    pub relations_removed: usize,
}

impl Repairs {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a load
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub character: Character,
    pub saved_at: DateTime<Utc>,
    pub repairs: Repairs,
}

// ============================================================================
// Export / Import
// ============================================================================

pub fn export_save(character: &Character) -> Result<String, PersistenceError> {
    let save = SaveFile {
        version: SAVE_VERSION,
        saved_at: Utc::now(),
        character: character.clone(),
    };
    Ok(serde_json::to_string_pretty(&save)?)
}

pub fn import_save(json: &str) -> Result<LoadResult, PersistenceError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let version = raw
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| PersistenceError::Invalid("missing version".into()))?;

    let (mut character, saved_at, migrated_from) = match version {
        1 => {
            let old: SaveFileV1 = serde_json::from_value(raw)?;
            (old.character.into(), old.saved_at.unwrap_or_else(Utc::now), Some(1))
        }
        2 => {
            let save: SaveFile = serde_json::from_value(raw)?;
            (save.character, save.saved_at, None)
        }
        other => return Err(PersistenceError::UnsupportedVersion(other as u32)),
    };

    let mut repairs = sanitize(&mut character);
    repairs.migrated_from = migrated_from;
    if !repairs.is_clean() {
        warn!(id = %character.id, ?repairs, "save repaired on load");
    }
    Ok(LoadResult {
        character,
        saved_at,
        repairs,
    })
}

/// Bring a loaded character back within every invariant the engine relies on.
pub fn sanitize(character: &mut Character) -> Repairs {
    let mut repairs = Repairs::default();
    let mut fix = |value: &mut i32| {
        let fixed = clamp(*value, STAT_MIN, STAT_MAX);
        if fixed != *value {
            *value = fixed;
            repairs.values_clamped += 1;
        }
    };

    let stats = &mut character.stats;
    for value in [
        &mut stats.happiness,
        &mut stats.health,
        &mut stats.smarts,
        &mut stats.looks,
    ] {
        fix(value);
    }
    fix(&mut character.karma);
    for relation in character.relations.iter_mut() {
        fix(&mut relation.relationship);
    }
    if let Some(grades) = character.education.grades.as_mut() {
        fix(grades);
    }
    if character.career.has_job {
        fix(&mut character.career.stress);
        fix(&mut character.career.performance);
    }

    if !character.career.is_consistent() {
        character.career = Career::default();
        repairs.career_reset = true;
    }
    let education = &mut character.education;
    if education.student_loan < 0 {
        education.student_loan = 0;
        repairs.values_clamped += 1;
    }
    if education.grades.is_none() && education.uv_years > 0 {
        education.uv_years = 0;
        repairs.values_clamped += 1;
    }

    repairs.illnesses_dropped = character.illnesses.dedup();
    repairs.traits_dropped = character.traits.drop_conflicts();

    let before = character.relations.len();
    character.relations.retain(|r| r.alive);
    repairs.relations_removed = before - character.relations.len();
    repairs
}

// ============================================================================
// Save directory
// ============================================================================

pub fn save_path(dir: &Path, id: CharacterId) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Write the save through a temporary file so a crash never leaves a
/// half-written save behind.
pub fn save_to_dir(dir: &Path, character: &Character) -> Result<PathBuf, PersistenceError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, character.id);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, export_save(character)?)?;
    fs::rename(&tmp, &path)?;
    debug!(path = %path.display(), age = character.age, "saved");
    Ok(path)
}

pub fn load_from_dir(dir: &Path, id: CharacterId) -> Result<LoadResult, PersistenceError> {
    let json = fs::read_to_string(save_path(dir, id))?;
    import_save(&json)
}

/// Returns whether a save existed.
pub fn delete_from_dir(dir: &Path, id: CharacterId) -> Result<bool, PersistenceError> {
    match fs::remove_file(save_path(dir, id)) {
        Ok(()) => {
            info!(%id, "save deleted");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
