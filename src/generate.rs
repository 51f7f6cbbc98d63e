//! Two-phase team generation: grounded search first, schema-constrained
//! fallback second.
//!
//! The pipeline is an explicit two-state sequence (`Grounded` then
//! `Fallback`) rather than nested exception handling, so each transition and
//! its trigger are independently testable. Phase 1 is never retried; phase 2
//! runs at most once. If both phases fail the result is empty, never an
//! error.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::extract::extract_json_array;
use crate::gemini::{GenerateRequest, GenerativeClient};
use crate::model::Character;
use crate::sanitize::Sanitizer;

/// Which phase produced a generation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Grounded search succeeded; sources are attached.
    Grounded,
    /// Schema-constrained fallback succeeded; no sources.
    Fallback,
    /// Both phases came up empty.
    Failed,
}

/// Outcome of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedTeam {
    pub characters: Vec<Character>,
    pub sources: Vec<String>,
    pub phase: Phase,
}

impl GeneratedTeam {
    fn empty() -> Self {
        Self {
            characters: Vec::new(),
            sources: Vec::new(),
            phase: Phase::Failed,
        }
    }
}

/// Minimum sanitized characters for phase 1 to count as a success.
const GROUNDED_ACCEPT_THRESHOLD: usize = 1;

/// Shared two-phase generator. The two public entry points differ only in
/// prompt text, not in control flow.
pub struct TeamGenerator {
    client: Arc<dyn GenerativeClient>,
    language: String,
}

impl TeamGenerator {
    pub fn new(client: Arc<dyn GenerativeClient>, language: impl Into<String>) -> Self {
        Self {
            client,
            language: language.into(),
        }
    }

    /// Look up the specific characters named in free-text input.
    pub async fn from_names(&self, input: &str, sanitizer: &mut Sanitizer) -> GeneratedTeam {
        let grounded = format!(
            "Research and find real Dokkan Battle stats for: {input}. \
             Provide individual specific HP, ATK, and DEF for each unit."
        );
        let fallback = format!(
            "Generate data for these Dokkan units: {input}. \
             Use individual accurate stats for each unit."
        );
        self.generate_with_fallback(grounded, fallback, sanitizer)
            .await
    }

    /// Build a complete optimized 7-unit roster for a named category.
    pub async fn from_category(&self, category: &str, sanitizer: &mut Sanitizer) -> GeneratedTeam {
        let grounded = format!(
            "Build the absolute best Dokkan Battle team for \"{category}\" using the latest \
             units. Need 7 units with unique HP/ATK/DEF. Provide individual specific HP, ATK, \
             and DEF for each of the 7 units."
        );
        let fallback = format!(
            "Create a top-tier 7-unit Dokkan team for \"{category}\". 1 Leader, 5 Subs, \
             1 Friend. List 7 distinct top-tier units with their actual unique game stats."
        );
        self.generate_with_fallback(grounded, fallback, sanitizer)
            .await
    }

    async fn generate_with_fallback(
        &self,
        grounded_prompt: String,
        fallback_prompt: String,
        sanitizer: &mut Sanitizer,
    ) -> GeneratedTeam {
        match self.grounded_phase(&grounded_prompt, sanitizer).await {
            Ok(Some(team)) => {
                info!(
                    characters = team.characters.len(),
                    sources = team.sources.len(),
                    "grounded phase accepted"
                );
                return team;
            }
            Ok(None) => warn!("grounded phase produced no usable characters"),
            Err(err) => warn!(error = %err, "grounded phase failed"),
        }

        match self.fallback_phase(&fallback_prompt, sanitizer).await {
            Ok(team) if !team.characters.is_empty() => {
                info!(characters = team.characters.len(), "fallback phase accepted");
                team
            }
            Ok(_) => {
                warn!("fallback phase produced no characters");
                GeneratedTeam::empty()
            }
            Err(err) => {
                warn!(error = %err, "fallback phase failed");
                GeneratedTeam::empty()
            }
        }
    }

    /// Phase 1: grounded free-text generation with citation sources.
    async fn grounded_phase(
        &self,
        prompt: &str,
        sanitizer: &mut Sanitizer,
    ) -> Result<Option<GeneratedTeam>, crate::gemini::GeminiError> {
        let request = GenerateRequest::grounded(prompt)
            .with_system_instruction(self.system_instruction());
        let response = self.client.generate(&request).await?;

        let cleaned = extract_json_array(&response.text);
        let parsed: Value = match serde_json::from_str(&cleaned) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "grounded response did not parse after extraction");
                return Ok(None);
            }
        };

        let characters = sanitizer.sanitize_batch(&parsed);
        if characters.len() >= GROUNDED_ACCEPT_THRESHOLD {
            Ok(Some(GeneratedTeam {
                characters,
                sources: response.sources,
                phase: Phase::Grounded,
            }))
        } else {
            Ok(None)
        }
    }

    /// Phase 2: schema-constrained generation, guaranteed-parseable body,
    /// no sources.
    async fn fallback_phase(
        &self,
        prompt: &str,
        sanitizer: &mut Sanitizer,
    ) -> Result<GeneratedTeam, crate::gemini::GeminiError> {
        let request = GenerateRequest::structured(prompt, character_array_schema())
            .with_system_instruction(self.system_instruction());
        let response = self.client.generate(&request).await?;

        let parsed: Value = serde_json::from_str(&response.text).unwrap_or(Value::Null);
        Ok(GeneratedTeam {
            characters: sanitizer.sanitize_batch(&parsed),
            sources: Vec::new(),
            phase: Phase::Fallback,
        })
    }

    fn system_instruction(&self) -> String {
        format!(
            "You are a DBZ Dokkan Battle Database API.\n\
             RULES:\n\
             1. Return EXACTLY 7 character objects in a JSON array.\n\
             2. EVERY character must have UNIQUE, REALISTIC stats (HP/ATK between 15,000 and \
             30,000 for LR units).\n\
             3. DO NOT use the same numbers for all characters.\n\
             4. Use the keys: name, subtitle, type, class, rarity, categories, links, \
             leaderSkill, passiveSkill, stats.\n\
             5. Language: {} for skills and titles.",
            self.language
        )
    }
}

/// Declared output schema for the fallback phase: an array of character
/// objects in the upstream schema dialect.
fn character_array_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "subtitle": { "type": "STRING" },
                "type": { "type": "STRING" },
                "class": { "type": "STRING" },
                "rarity": { "type": "STRING" },
                "categories": { "type": "ARRAY", "items": { "type": "STRING" } },
                "links": { "type": "ARRAY", "items": { "type": "STRING" } },
                "leaderSkill": { "type": "STRING" },
                "passiveSkill": { "type": "STRING" },
                "stats": {
                    "type": "OBJECT",
                    "properties": {
                        "hp": { "type": "NUMBER" },
                        "atk": { "type": "NUMBER" },
                        "def": { "type": "NUMBER" }
                    },
                    "required": ["hp", "atk", "def"]
                }
            },
            "required": ["name", "subtitle", "type", "class", "rarity", "stats"]
        }
    })
}
