//! Name Generation for characters and their relatives
//!
//! Names are static data; callers pass in the generator so lifetimes stay
//! reproducible under a fixed seed.

use rand::Rng;

use crate::components::Sex;

const MALE_FIRST_NAMES: &[&str] = &[
    "Aiden", "Arthur", "Benjamin", "Caleb", "Connor", "Daniel", "Declan", "Dominic",
    "Elias", "Ethan", "Felix", "Gabriel", "Henry", "Hugo", "Isaac", "Jack", "Jasper",
    "Julian", "Leo", "Liam", "Lucas", "Marcus", "Mason", "Miles", "Nathan", "Noah",
    "Oliver", "Oscar", "Owen", "Patrick", "Quentin", "Rowan", "Samuel", "Simon",
    "Theo", "Thomas", "Tobias", "Victor", "Wesley", "Xavier", "Zachary",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Abigail", "Alice", "Amelia", "Ava", "Beatrice", "Chloe", "Clara", "Daisy",
    "Eleanor", "Eliza", "Emma", "Evelyn", "Fiona", "Grace", "Hannah", "Harper",
    "Iris", "Isla", "Ivy", "Julia", "Lily", "Lucy", "Maya", "Mia", "Nora", "Olivia",
    "Penelope", "Quinn", "Rose", "Ruby", "Sadie", "Scarlett", "Sophia", "Stella",
    "Tessa", "Violet", "Willow", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bailey", "Barnes", "Bennett", "Brooks", "Carter", "Chavez", "Coleman",
    "Cooper", "Dalton", "Ellis", "Fisher", "Fletcher", "Foster", "Gardner", "Graham",
    "Hayes", "Holland", "Hughes", "Jensen", "Keller", "Lambert", "Lawson", "Marsh",
    "Meyer", "Morgan", "Nash", "Novak", "Ortega", "Palmer", "Porter", "Quinn",
    "Reyes", "Rhodes", "Russo", "Sawyer", "Shaw", "Sullivan", "Tanaka", "Turner",
    "Vance", "Wagner", "Walsh", "Webb", "Wheeler", "Young",
];

/// Generate a random first name based on sex
pub fn random_first_name<R: Rng + ?Sized>(rng: &mut R, sex: Sex) -> &'static str {
    let pool = match sex {
        Sex::Male => MALE_FIRST_NAMES,
        Sex::Female => FEMALE_FIRST_NAMES,
    };
    pool[rng.gen_range(0..pool.len())]
}

/// Generate a random last name
pub fn random_last_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
}
