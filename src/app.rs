//! Explicit application state for one session.
//!
//! No globals: the driver owns one [`AppState`] and threads it through every
//! user action. Any roster mutation invalidates a previously computed
//! analysis; deeper failures were already absorbed upstream, so the only
//! user-facing errors are the terse notices below.

use crate::generate::GeneratedTeam;
use crate::model::{Character, Team, TeamAnalysis};

/// Quick-select themes offered by the category flow.
pub const POPULAR_CATEGORIES: [&str; 10] = [
    "Pure Saiyans",
    "Movie Heroes",
    "Future Saga",
    "Power of Wishes",
    "Realm of Gods",
    "Majin Buu Saga",
    "Tournament of Power",
    "Super Heroes",
    "Movie Bosses",
    "Terrifying Conquerors",
];

/// Terse blocking notifications shown to the user. Everything deeper
/// (network, parsing) degrades to an empty result instead of surfacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserNotice {
    EmptyInput,
    TeamFull,
    NoCharactersFound,
    NoTeamForCategory,
    EmptyRosterAnalysis,
}

impl UserNotice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Type at least one character name first.",
            Self::TeamFull => "The team is full. Remove a character before adding more.",
            Self::NoCharactersFound => {
                "No characters were found. Try being more specific."
            }
            Self::NoTeamForCategory => "No team could be generated for that category.",
            Self::EmptyRosterAnalysis => "Build a team before analyzing.",
        }
    }
}

/// In-memory session state: the roster, the sources behind the last
/// generation, and the last analysis (if still valid).
#[derive(Debug, Default)]
pub struct AppState {
    team: Team,
    sources: Vec<String>,
    analysis: Option<TeamAnalysis>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn analysis(&self) -> Option<&TeamAnalysis> {
        self.analysis.as_ref()
    }

    /// Preconditions for the manual-add flow.
    pub fn guard_manual_add(&self, input: &str) -> Result<(), UserNotice> {
        if input.trim().is_empty() {
            return Err(UserNotice::EmptyInput);
        }
        if self.team.is_full() {
            return Err(UserNotice::TeamFull);
        }
        Ok(())
    }

    /// Precondition for requesting an analysis.
    pub fn guard_analyze(&self) -> Result<(), UserNotice> {
        if self.team.is_empty() {
            return Err(UserNotice::EmptyRosterAnalysis);
        }
        Ok(())
    }

    /// Manual flow: add generated characters into free slots, left to right.
    /// Returns how many were placed.
    pub fn apply_manual_generation(
        &mut self,
        result: GeneratedTeam,
    ) -> Result<usize, UserNotice> {
        self.analysis = None;
        self.sources = result.sources;
        if result.characters.is_empty() {
            return Err(UserNotice::NoCharactersFound);
        }
        Ok(self.team.fill_free_slots(result.characters))
    }

    /// Auto flow: overwrite the whole roster with the generated team.
    pub fn apply_auto_generation(&mut self, result: GeneratedTeam) -> Result<(), UserNotice> {
        self.analysis = None;
        self.sources = result.sources;
        if result.characters.is_empty() {
            return Err(UserNotice::NoTeamForCategory);
        }
        self.team.replace_all(result.characters);
        Ok(())
    }

    /// Store a freshly computed analysis.
    pub fn set_analysis(&mut self, analysis: TeamAnalysis) {
        self.analysis = Some(analysis);
    }

    /// Empty one slot. Clears the analysis when the roster actually changed.
    pub fn remove_slot(&mut self, index: usize) -> Option<Character> {
        let removed = self.team.remove(index);
        if removed.is_some() {
            self.analysis = None;
        }
        removed
    }

    /// Reset the whole session: roster, sources, and analysis.
    pub fn clear(&mut self) {
        self.team.clear();
        self.sources.clear();
        self.analysis = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::Phase;
    use crate::sanitize::Sanitizer;
    use serde_json::json;

    fn generated(names: &[&str], sources: &[&str]) -> GeneratedTeam {
        let mut sanitizer = Sanitizer::with_seed(1);
        GeneratedTeam {
            characters: names
                .iter()
                .map(|name| sanitizer.sanitize(&json!({ "name": name })))
                .collect(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            phase: Phase::Grounded,
        }
    }

    #[test]
    fn manual_add_fills_free_slots_in_order() {
        let mut state = AppState::new();
        let placed = state
            .apply_manual_generation(generated(&["Goku", "Vegeta"], &["https://a"]))
            .unwrap();
        assert_eq!(placed, 2);
        assert_eq!(state.team().slots()[0].as_ref().unwrap().name, "Goku");
        assert_eq!(state.team().slots()[1].as_ref().unwrap().name, "Vegeta");
        assert_eq!(state.sources(), ["https://a"]);
    }

    #[test]
    fn empty_generation_is_a_notice_not_a_panic() {
        let mut state = AppState::new();
        let err = state
            .apply_manual_generation(generated(&[], &[]))
            .unwrap_err();
        assert_eq!(err, UserNotice::NoCharactersFound);
    }

    #[test]
    fn auto_generation_replaces_the_whole_roster() {
        let mut state = AppState::new();
        state
            .apply_manual_generation(generated(&["Goku"], &[]))
            .unwrap();
        state
            .apply_auto_generation(generated(&["Gohan", "Piccolo"], &[]))
            .unwrap();
        assert_eq!(state.team().member_count(), 2);
        assert_eq!(state.team().slots()[0].as_ref().unwrap().name, "Gohan");
    }

    #[test]
    fn removing_a_slot_clears_a_computed_analysis() {
        let mut state = AppState::new();
        state
            .apply_manual_generation(generated(&["Goku"], &[]))
            .unwrap();
        state.set_analysis(TeamAnalysis {
            rating: 7.0,
            summary: "fine".to_string(),
            ..TeamAnalysis::default()
        });
        assert!(state.analysis().is_some());

        state.remove_slot(0);
        assert!(state.analysis().is_none());
    }

    #[test]
    fn removing_an_empty_slot_keeps_the_analysis() {
        let mut state = AppState::new();
        state
            .apply_manual_generation(generated(&["Goku"], &[]))
            .unwrap();
        state.set_analysis(TeamAnalysis::default());

        state.remove_slot(5);
        assert!(state.analysis().is_some());
    }

    #[test]
    fn new_generation_invalidates_the_analysis() {
        let mut state = AppState::new();
        state
            .apply_manual_generation(generated(&["Goku"], &[]))
            .unwrap();
        state.set_analysis(TeamAnalysis::default());

        state
            .apply_manual_generation(generated(&["Vegeta"], &[]))
            .unwrap();
        assert!(state.analysis().is_none());
    }

    #[test]
    fn guards_cover_the_notice_cases() {
        let mut state = AppState::new();
        assert_eq!(
            state.guard_manual_add("  "),
            Err(UserNotice::EmptyInput)
        );
        assert_eq!(state.guard_analyze(), Err(UserNotice::EmptyRosterAnalysis));

        let full: Vec<&str> = vec!["A", "B", "C", "D", "E", "F", "G"];
        state.apply_auto_generation(generated(&full, &[])).unwrap();
        assert_eq!(
            state.guard_manual_add("Goku"),
            Err(UserNotice::TeamFull)
        );
        assert_eq!(state.guard_analyze(), Ok(()));
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = AppState::new();
        state
            .apply_manual_generation(generated(&["Goku"], &["https://a"]))
            .unwrap();
        state.set_analysis(TeamAnalysis::default());

        state.clear();
        assert!(state.team().is_empty());
        assert!(state.sources().is_empty());
        assert!(state.analysis().is_none());
    }
}
