//! Family members tracked alongside the character
//!
//! Each relation ages independently. Their yearly mortality checks are rolled
//! by the family system. Parents also carry generosity and wealth, which feed
//! tuition and inheritance decisions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Sex;
use crate::names;
use crate::stats::{change_stat, STAT_MAX};

/// Parents stop accumulating wealth at this age.
const RETIREMENT_AGE: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    pub fn sex(self) -> Sex {
        match self {
            ParentRole::Mother => Sex::Female,
            ParentRole::Father => Sex::Male,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationKind {
    Parent {
        role: ParentRole,
        /// Willingness to spend on the character, 0..=100.
        generosity: i32,
        /// Wealth index, 0..=100. Sizes inheritances.
        money: i32,
    },
    Sibling,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub age: u32,
    /// How close the character is to this person, 0..=100.
    pub relationship: i32,
    /// Cleared by a failed mortality check. Dead relations are removed in the
    /// same step.
    pub alive: bool,
    pub kind: RelationKind,
}

impl Relation {
    pub fn new_parent<R: Rng + ?Sized>(
        rng: &mut R,
        role: ParentRole,
        last_name: &str,
        age: u32,
    ) -> Self {
        let sex = role.sex();
        Self {
            first_name: names::random_first_name(rng, sex).to_string(),
            last_name: last_name.to_string(),
            sex,
            age,
            relationship: rng.gen_range(70..=100),
            alive: true,
            kind: RelationKind::Parent {
                role,
                generosity: rng.gen_range(0..=100),
                money: rng.gen_range(0..=60),
            },
        }
    }

    /// A newborn brother or sister.
    pub fn new_sibling<R: Rng + ?Sized>(rng: &mut R, last_name: &str) -> Self {
        let sex = Sex::random(rng);
        Self {
            first_name: names::random_first_name(rng, sex).to_string(),
            last_name: last_name.to_string(),
            sex,
            age: 0,
            relationship: rng.gen_range(40..=80),
            alive: true,
            kind: RelationKind::Sibling,
        }
    }

    /// Advance one year: age, and wealth for working-age parents.
    pub fn age_up<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.age += 1;
        if let RelationKind::Parent { money, .. } = &mut self.kind {
            if self.age < RETIREMENT_AGE {
                *money = (*money + rng.gen_range(0..=2)).min(STAT_MAX);
            }
        }
    }

    pub fn change_relationship(&mut self, delta: i32) {
        self.relationship = change_stat(self.relationship, delta);
    }

    pub fn parent_role(&self) -> Option<ParentRole> {
        match self.kind {
            RelationKind::Parent { role, .. } => Some(role),
            _ => None,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.parent_role().is_some()
    }

    pub fn is_sibling(&self) -> bool {
        matches!(self.kind, RelationKind::Sibling)
    }

    pub fn generosity(&self) -> Option<i32> {
        match self.kind {
            RelationKind::Parent { generosity, .. } => Some(generosity),
            _ => None,
        }
    }

    pub fn set_generosity(&mut self, value: i32) {
        if let RelationKind::Parent { generosity, .. } = &mut self.kind {
            *generosity = value.clamp(0, STAT_MAX);
        }
    }

    /// How the character refers to this person ("mother", "brother", ...).
    pub fn label(&self) -> &'static str {
        match (&self.kind, self.sex) {
            (RelationKind::Parent { role: ParentRole::Mother, .. }, _) => "mother",
            (RelationKind::Parent { role: ParentRole::Father, .. }, _) => "father",
            (RelationKind::Sibling, Sex::Male) => "brother",
            (RelationKind::Sibling, Sex::Female) => "sister",
            (RelationKind::Other, _) => "relative",
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parent_wealth_grows_until_retirement() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut mother = Relation::new_parent(&mut rng, ParentRole::Mother, "Marsh", 30);
        if let RelationKind::Parent { money, .. } = &mut mother.kind {
            *money = 99;
        }
        for _ in 0..20 {
            mother.age_up(&mut rng);
        }
        assert_eq!(mother.age, 50);
        assert!(mother.alive);
        match mother.kind {
            RelationKind::Parent { money, .. } => assert!(money <= STAT_MAX),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_change_relationship_clamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sister = Relation::new_sibling(&mut rng, "Webb");
        sister.change_relationship(-500);
        assert_eq!(sister.relationship, 0);
        sister.change_relationship(30);
        assert_eq!(sister.relationship, 30);
        sister.change_relationship(500);
        assert_eq!(sister.relationship, 100);
    }

    #[test]
    fn test_labels() {
        let mut rng = StdRng::seed_from_u64(2);
        let father = Relation::new_parent(&mut rng, ParentRole::Father, "Nash", 33);
        assert_eq!(father.label(), "father");
        assert_eq!(father.sex, Sex::Male);
        assert!(father.is_parent());
        assert!(father.generosity().is_some());

        let sibling = Relation::new_sibling(&mut rng, "Nash");
        assert!(matches!(sibling.label(), "brother" | "sister"));
        assert_eq!(sibling.generosity(), None);
    }
}
