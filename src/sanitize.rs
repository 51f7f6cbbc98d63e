//! Tolerant decoder from arbitrary JSON values to valid [`Character`] records.
//!
//! The generative backend is free to rename keys, nest stats, emit numbers as
//! strings, or drop fields entirely. The sanitizer accepts any object-shaped
//! input and always returns a fully populated character, fabricating
//! plausible defaults where data is missing. It never fails.
//!
//! The randomness source is injectable so tests can seed it.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::model::{Character, CharacterClass, CharacterType, Rarity, Stats};

/// Field-precedence tables per observed source format. First present key
/// wins. Treat these as versioned configuration: extend at the end, never
/// reorder.
const NAME_KEYS: &[&str] = &["name", "character", "characterName", "unit", "card_name"];
const SUBTITLE_KEYS: &[&str] = &["subtitle", "title", "description", "card_title"];
const LEADER_SKILL_KEYS: &[&str] = &["leaderSkill", "leader_skill", "leader"];
const PASSIVE_SKILL_KEYS: &[&str] = &["passiveSkill", "passive_skill", "passive"];

const FALLBACK_NAME: &str = "Warrior";
const FALLBACK_SUBTITLE: &str = "Fighter";
const FALLBACK_SKILL: &str = "N/A";

/// Default stat bands. Fallback values are randomized inside the band so
/// placeholder characters do not all share identical stats.
const HP_BASE: u32 = 15_000;
const HP_SPREAD: u32 = 5_000;
const ATK_BASE: u32 = 15_000;
const ATK_SPREAD: u32 = 5_000;
const DEF_BASE: u32 = 8_000;
const DEF_SPREAD: u32 = 3_000;

/// HP above this marks an unlabeled card as LR rather than UR.
const LR_HP_THRESHOLD: u32 = 22_000;

const GENERATED_ID_LEN: usize = 6;

/// Stateful sanitizer. One instance per batch keeps generated ids distinct
/// in practice (best-effort, collisions are not checked).
pub struct Sanitizer {
    rng: StdRng,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sanitizer for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sanitize every element of a JSON array. Non-array input yields an
    /// empty batch; non-object elements are still forced into characters.
    pub fn sanitize_batch(&mut self, raw: &Value) -> Vec<Character> {
        match raw.as_array() {
            Some(items) => items.iter().map(|item| self.sanitize(item)).collect(),
            None => Vec::new(),
        }
    }

    /// Convert one arbitrary value into a well-typed character.
    pub fn sanitize(&mut self, raw: &Value) -> Character {
        let name = first_string(raw, NAME_KEYS).unwrap_or_else(|| FALLBACK_NAME.to_string());
        let subtitle =
            first_string(raw, SUBTITLE_KEYS).unwrap_or_else(|| FALLBACK_SUBTITLE.to_string());
        let leader_skill =
            first_string(raw, LEADER_SKILL_KEYS).unwrap_or_else(|| FALLBACK_SKILL.to_string());
        let passive_skill =
            first_string(raw, PASSIVE_SKILL_KEYS).unwrap_or_else(|| FALLBACK_SKILL.to_string());

        let hp = self.stat(raw, "hp", HP_BASE, HP_SPREAD);
        let atk = self.stat(raw, "atk", ATK_BASE, ATK_SPREAD);
        let def = self.stat(raw, "def", DEF_BASE, DEF_SPREAD);

        let character_type = raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(CharacterType::parse)
            .unwrap_or_else(|| self.random_type());

        let class = raw
            .get("class")
            .and_then(Value::as_str)
            .and_then(CharacterClass::parse)
            .unwrap_or(CharacterClass::Super);

        let rarity = raw
            .get("rarity")
            .and_then(Value::as_str)
            .and_then(Rarity::parse)
            .unwrap_or(if hp > LR_HP_THRESHOLD {
                Rarity::Lr
            } else {
                Rarity::Ur
            });

        let id = match raw.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => self.random_id(),
        };

        Character {
            id,
            name,
            subtitle,
            character_type,
            class,
            rarity,
            categories: string_list(raw.get("categories")),
            links: string_list(raw.get("links")),
            leader_skill,
            passive_skill,
            stats: Stats { hp, atk, def },
        }
    }

    /// Resolve one stat, preferring `stats.<key>` over a top-level `<key>`.
    /// Accepts numbers or numeric-looking strings; anything invalid or
    /// non-positive falls back into the band.
    fn stat(&mut self, raw: &Value, key: &str, base: u32, spread: u32) -> u32 {
        let value = raw
            .get("stats")
            .and_then(|stats| stats.get(key))
            .or_else(|| raw.get(key));

        match value {
            Some(Value::Number(n)) => {
                let n = n.as_f64().unwrap_or(0.0);
                if n >= 1.0 && n <= u32::MAX as f64 {
                    n as u32
                } else {
                    self.band_default(base, spread)
                }
            }
            Some(Value::String(s)) => {
                let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                match digits.parse::<u32>() {
                    Ok(parsed) if parsed > 0 => parsed,
                    _ => self.band_default(base, spread),
                }
            }
            _ => self.band_default(base, spread),
        }
    }

    fn band_default(&mut self, base: u32, spread: u32) -> u32 {
        base + self.rng.gen_range(0..spread)
    }

    fn random_type(&mut self) -> CharacterType {
        CharacterType::ALL[self.rng.gen_range(0..CharacterType::ALL.len())]
    }

    fn random_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        raw.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
