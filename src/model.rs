//! Core data model: characters, the 7-slot team, and analysis results.
//!
//! All entities are transient and memory-only. `Character` values are produced
//! exclusively by the sanitizer (see [`crate::sanitize`]); nothing here is ever
//! persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed roster size: 1 leader, 5 subs, 1 friend.
pub const TEAM_SIZE: usize = 7;

/// Elemental type wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterType {
    #[serde(rename = "AGL")]
    Agl,
    #[serde(rename = "TEQ")]
    Teq,
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "STR")]
    Str,
    #[serde(rename = "PHY")]
    Phy,
}

impl CharacterType {
    pub const ALL: [CharacterType; 5] = [Self::Agl, Self::Teq, Self::Int, Self::Str, Self::Phy];

    /// Case-insensitive parse against the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AGL" => Some(Self::Agl),
            "TEQ" => Some(Self::Teq),
            "INT" => Some(Self::Int),
            "STR" => Some(Self::Str),
            "PHY" => Some(Self::Phy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agl => "AGL",
            Self::Teq => "TEQ",
            Self::Int => "INT",
            Self::Str => "STR",
            Self::Phy => "PHY",
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Super vs. Extreme alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Super,
    Extreme,
}

impl CharacterClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "super" => Some(Self::Super),
            "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Super => "Super",
            Self::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "UR")]
    Ur,
    #[serde(rename = "LR")]
    Lr,
    #[serde(rename = "TUR")]
    Tur,
    #[serde(rename = "EZA")]
    Eza,
}

impl Rarity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UR" => Some(Self::Ur),
            "LR" => Some(Self::Lr),
            "TUR" => Some(Self::Tur),
            "EZA" => Some(Self::Eza),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ur => "UR",
            Self::Lr => "LR",
            Self::Tur => "TUR",
            Self::Eza => "EZA",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base stat triple. Always positive after sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
}

/// A fully validated character record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    #[serde(rename = "type")]
    pub character_type: CharacterType,
    pub class: CharacterClass,
    pub rarity: Rarity,
    pub categories: Vec<String>,
    pub links: Vec<String>,
    pub leader_skill: String,
    pub passive_skill: String,
    pub stats: Stats,
}

impl Character {
    /// Search link for this card on the community wiki.
    pub fn wiki_url(&self) -> String {
        format!(
            "https://dokkan.wiki/cards?q={}",
            urlencoding::encode(&self.name)
        )
    }
}

/// Role a slot plays within the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Leader,
    Sub,
    Friend,
}

impl SlotRole {
    pub fn of(index: usize) -> SlotRole {
        match index {
            0 => SlotRole::Leader,
            TEAM_SIZE_MINUS_ONE => SlotRole::Friend,
            _ => SlotRole::Sub,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "Leader",
            Self::Sub => "Sub",
            Self::Friend => "Friend",
        }
    }
}

const TEAM_SIZE_MINUS_ONE: usize = TEAM_SIZE - 1;

/// The fixed 7-slot roster. Slot 0 is the leader, 1-5 are subs, 6 is the
/// friend slot.
#[derive(Debug, Clone, Default)]
pub struct Team {
    slots: [Option<Character>; TEAM_SIZE],
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<Character>; TEAM_SIZE] {
        &self.slots
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Occupied slots in roster order.
    pub fn members(&self) -> impl Iterator<Item = &Character> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    pub fn member_count(&self) -> usize {
        self.members().count()
    }

    /// Place characters into free slots left to right. Returns how many were
    /// actually placed; leftovers are dropped once the roster is full.
    pub fn fill_free_slots(&mut self, characters: Vec<Character>) -> usize {
        let mut placed = 0;
        let mut incoming = characters.into_iter();
        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                match incoming.next() {
                    Some(c) => {
                        *slot = Some(c);
                        placed += 1;
                    }
                    None => break,
                }
            }
        }
        placed
    }

    /// Overwrite the whole roster. Input is truncated to 7; short input leaves
    /// trailing slots empty.
    pub fn replace_all(&mut self, characters: Vec<Character>) {
        self.slots = Default::default();
        for (slot, c) in self.slots.iter_mut().zip(characters.into_iter()) {
            *slot = Some(c);
        }
    }

    /// Empty one slot, returning its previous occupant.
    pub fn remove(&mut self, index: usize) -> Option<Character> {
        self.slots.get_mut(index).and_then(|s| s.take())
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

/// AI-produced critique of a roster. Replaced wholesale on every analysis
/// request and cleared whenever the roster changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamAnalysis {
    pub rating: f64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub rotations: Vec<String>,
}
