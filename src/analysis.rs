//! Single-shot synergy analysis of a roster.
//!
//! Unlike team generation this call needs one well-shaped object, not an
//! array, so it runs in schema-constrained mode exclusively: no search, no
//! fallback phase. Failures of any kind degrade to a zero rating with a
//! human-readable message; the caller never sees an error.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::warn;

use crate::gemini::{GenerateRequest, GenerativeClient};
use crate::model::{Team, TeamAnalysis};

const EMPTY_ROSTER_SUMMARY: &str =
    "The roster is empty. Add characters before requesting an analysis.";
const FAILURE_SUMMARY: &str = "The analysis could not be completed. Try again.";

const RATING_MIN: f64 = 0.0;
const RATING_MAX: f64 = 10.0;

pub struct SynergyAnalyzer {
    client: Arc<dyn GenerativeClient>,
    language: String,
}

impl SynergyAnalyzer {
    pub fn new(client: Arc<dyn GenerativeClient>, language: impl Into<String>) -> Self {
        Self {
            client,
            language: language.into(),
        }
    }

    /// Request a structured critique of the occupied slots.
    ///
    /// An empty roster short-circuits without any network call.
    pub async fn analyze(&self, team: &Team) -> TeamAnalysis {
        let members: Vec<_> = team.members().collect();
        if members.is_empty() {
            return TeamAnalysis {
                rating: 0.0,
                summary: EMPTY_ROSTER_SUMMARY.to_string(),
                ..TeamAnalysis::default()
            };
        }

        let description = members
            .iter()
            .map(|c| {
                format!(
                    "{} ({}, {} {}): {}",
                    c.name,
                    c.subtitle,
                    c.character_type,
                    c.class,
                    c.links.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyze the synergy of this Dokkan Battle team ({}):\n{description}",
            self.language
        );
        let request = GenerateRequest::structured(prompt, analysis_schema());

        match self.client.generate(&request).await {
            Ok(response) => match serde_json::from_str::<TeamAnalysis>(&response.text) {
                Ok(mut analysis) => {
                    analysis.rating = analysis.rating.clamp(RATING_MIN, RATING_MAX);
                    analysis
                }
                Err(err) => {
                    warn!(error = %err, "analysis response did not parse");
                    failure_analysis()
                }
            },
            Err(err) => {
                warn!(error = %err, "analysis request failed");
                failure_analysis()
            }
        }
    }
}

fn failure_analysis() -> TeamAnalysis {
    TeamAnalysis {
        rating: 0.0,
        summary: FAILURE_SUMMARY.to_string(),
        ..TeamAnalysis::default()
    }
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "rating": { "type": "NUMBER" },
            "summary": { "type": "STRING" },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "rotations": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::testing::ScriptedClient;
    use crate::model::Team;
    use crate::sanitize::Sanitizer;
    use serde_json::json;

    fn one_member_team() -> Team {
        let mut sanitizer = Sanitizer::with_seed(1);
        let mut team = Team::new();
        let member = sanitizer.sanitize(&json!({
            "name": "Gohan (Beast)",
            "links": ["Fierce Battle", "Legendary Power"]
        }));
        team.fill_free_slots(vec![member]);
        team
    }

    fn analyzer(client: Arc<ScriptedClient>) -> SynergyAnalyzer {
        SynergyAnalyzer::new(client, "Spanish")
    }

    #[tokio::test]
    async fn empty_roster_short_circuits_without_a_call() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let analyzer = analyzer(Arc::clone(&client));

        let analysis = analyzer.analyze(&Team::new()).await;

        assert_eq!(client.call_count(), 0);
        assert_eq!(analysis.rating, 0.0);
        assert!(!analysis.summary.is_empty());
    }

    #[tokio::test]
    async fn well_formed_response_passes_through() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedClient::text(
            r#"{"rating": 8.5, "summary": "Solid core.", "strengths": ["Tanky leads"],
                "weaknesses": ["No healer"], "rotations": ["Gohan + Goku"]}"#,
        )]));
        let analyzer = analyzer(Arc::clone(&client));

        let analysis = analyzer.analyze(&one_member_team()).await;

        assert_eq!(analysis.rating, 8.5);
        assert_eq!(analysis.summary, "Solid core.");
        assert_eq!(analysis.strengths, vec!["Tanky leads"]);
        assert_eq!(analysis.rotations, vec!["Gohan + Goku"]);
    }

    #[tokio::test]
    async fn out_of_band_rating_is_clamped() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedClient::text(
            r#"{"rating": 42, "summary": "over-enthusiastic"}"#,
        )]));
        let analyzer = analyzer(Arc::clone(&client));

        let analysis = analyzer.analyze(&one_member_team()).await;
        assert_eq!(analysis.rating, 10.0);
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_zero_rating() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedClient::failure()]));
        let analyzer = analyzer(Arc::clone(&client));

        let analysis = analyzer.analyze(&one_member_team()).await;
        assert_eq!(analysis.rating, 0.0);
        assert!(!analysis.summary.is_empty());
    }

    #[tokio::test]
    async fn unparsable_body_degrades_to_zero_rating() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedClient::text(
            "not json at all",
        )]));
        let analyzer = analyzer(Arc::clone(&client));

        let analysis = analyzer.analyze(&one_member_team()).await;
        assert_eq!(analysis.rating, 0.0);
    }

    #[tokio::test]
    async fn analysis_request_is_schema_constrained_and_ungrounded() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedClient::text(
            r#"{"rating": 5, "summary": "ok"}"#,
        )]));
        let analyzer = analyzer(Arc::clone(&client));

        analyzer.analyze(&one_member_team()).await;

        let request = &client.requests()[0];
        assert!(!request.grounded);
        assert!(request.response_schema.is_some());
        assert!(request.prompt.contains("Gohan (Beast)"));
    }
}
