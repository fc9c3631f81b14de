//! Yearly systems - each one owns a slice of the character's rules
//!
//! The world calls these in a fixed order; see [`crate::world`].

pub mod aging;
pub mod career;
pub mod education;
pub mod events;
pub mod family;
pub mod health;
pub mod mortality;
