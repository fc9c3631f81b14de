//! Plain data shared across the character and its relations
//!
//! Nothing in here rolls dice; the systems own the rules.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// Key used by persistence to name a character's save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

impl CharacterId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen())
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// The four headline attributes, each kept in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub happiness: i32,
    pub health: i32,
    pub smarts: i32,
    pub looks: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            happiness: 50,
            health: 100,
            smarts: 50,
            looks: 50,
        }
    }
}

/// Once-per-year activities. Interactive menus outside the engine set these;
/// the engine only clears them when a new year starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityFlags {
    pub meditated: bool,
    pub worked_out: bool,
    pub visited_library: bool,
    pub studied: bool,
    pub tried_to_drop_out: bool,
    pub played: bool,
    pub did_arts_and_crafts: bool,
    pub worked_harder: bool,
    pub listened_to_music: bool,
}

impl ActivityFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_reset() {
        let mut flags = ActivityFlags {
            meditated: true,
            studied: true,
            listened_to_music: true,
            ..ActivityFlags::default()
        };
        flags.reset();
        assert_eq!(flags, ActivityFlags::default());
    }

    #[test]
    fn test_character_id_is_fixed_width_hex() {
        assert_eq!(CharacterId(255).to_string(), "00000000000000ff");
    }
}
