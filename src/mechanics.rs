//! Heuristic mechanic badges derived from ability text.
//!
//! Pure, stateless classification: case-insensitive substring search over the
//! passive-skill text and link tags. Substrings are chosen to cover multiple
//! inflections ("reviv" matches revive, revival, reviving).

use crate::model::Character;

/// Display badge for a notable gameplay mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanic {
    Revival,
    Transformation,
    Fusion,
}

impl Mechanic {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revival => "Revival",
            Self::Transformation => "Transform",
            Self::Fusion => "Fusion",
        }
    }
}

/// Keyword sets per mechanic. Versioned configuration: extend, don't reorder.
const REVIVAL_KEYWORDS: &[&str] = &["reviv"];
const TRANSFORMATION_KEYWORDS: &[&str] = &["transform"];
const FUSION_KEYWORDS: &[&str] = &["fuse", "fusion", "merg"];

/// Link tag that marks a transforming unit even without passive text.
const TRANSFORMATION_LINK: &str = "Transform";

/// Detect mechanics for one character. Order of the returned badges is
/// fixed; detection itself is order-independent.
pub fn detect(character: &Character) -> Vec<Mechanic> {
    let haystack = format!(
        "{} {}",
        character.passive_skill,
        character.links.join(" ")
    )
    .to_lowercase();

    let mut mechanics = Vec::new();
    if contains_any(&haystack, REVIVAL_KEYWORDS) {
        mechanics.push(Mechanic::Revival);
    }
    if contains_any(&haystack, TRANSFORMATION_KEYWORDS)
        || character.links.iter().any(|l| l == TRANSFORMATION_LINK)
    {
        mechanics.push(Mechanic::Transformation);
    }
    if contains_any(&haystack, FUSION_KEYWORDS) {
        mechanics.push(Mechanic::Fusion);
    }
    mechanics
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
