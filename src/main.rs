//! Interactive CLI driver for the roster builder.
//!
//! Thin shell over the library: reads commands from stdin, runs one request
//! at a time, and renders the roster, sources, and analysis as text. All
//! logic lives in the library modules.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use dokkan_tactician::analysis::SynergyAnalyzer;
use dokkan_tactician::app::{AppState, UserNotice, POPULAR_CATEGORIES};
use dokkan_tactician::config::Config;
use dokkan_tactician::gemini::{GeminiClient, GenerativeClient};
use dokkan_tactician::generate::TeamGenerator;
use dokkan_tactician::mechanics;
use dokkan_tactician::model::{SlotRole, Team};
use dokkan_tactician::sanitize::Sanitizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dokkan_tactician=info")),
        )
        .init();

    let config = Config::from_env()?;
    let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(&config));
    let generator = TeamGenerator::new(Arc::clone(&client), config.language.clone());
    let analyzer = SynergyAnalyzer::new(client, config.language.clone());
    let mut sanitizer = Sanitizer::new();
    let mut state = AppState::new();

    println!("Dokkan Tactician - type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "add" => {
                if let Err(notice) = state.guard_manual_add(rest) {
                    notify(notice);
                    continue;
                }
                println!("Searching...");
                let result = generator.from_names(rest, &mut sanitizer).await;
                match state.apply_manual_generation(result) {
                    Ok(placed) => {
                        println!("Added {placed} character(s).");
                        render_team(state.team());
                        render_sources(state.sources());
                    }
                    Err(notice) => notify(notice),
                }
            }
            "auto" => {
                let category = if rest.is_empty() {
                    POPULAR_CATEGORIES[0]
                } else {
                    rest
                };
                println!("Generating a team for \"{category}\"...");
                let result = generator.from_category(category, &mut sanitizer).await;
                match state.apply_auto_generation(result) {
                    Ok(()) => {
                        render_team(state.team());
                        render_sources(state.sources());
                    }
                    Err(notice) => notify(notice),
                }
            }
            "categories" => {
                for category in POPULAR_CATEGORIES {
                    println!("  {category}");
                }
            }
            "team" => render_team(state.team()),
            "analyze" => {
                if let Err(notice) = state.guard_analyze() {
                    notify(notice);
                    continue;
                }
                println!("Analyzing...");
                let analysis = analyzer.analyze(state.team()).await;
                state.set_analysis(analysis);
                if let Some(analysis) = state.analysis() {
                    render_analysis(analysis);
                }
            }
            "remove" => match rest.parse::<usize>() {
                Ok(index) if index < dokkan_tactician::model::TEAM_SIZE => {
                    match state.remove_slot(index) {
                        Some(removed) => println!("Removed {}.", removed.name),
                        None => println!("Slot {index} is already empty."),
                    }
                }
                _ => println!("Usage: remove <slot 0-6>"),
            },
            "clear" => {
                state.clear();
                println!("Team cleared.");
            }
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  add <names>      search the named characters and fill free slots");
    println!("  auto [category]  generate a full 7-unit team for a category");
    println!("  categories       list popular categories");
    println!("  team             show the current roster");
    println!("  analyze          request a synergy analysis");
    println!("  remove <slot>    empty one slot (0=leader, 1-5=subs, 6=friend)");
    println!("  clear            reset the whole session");
    println!("  quit             exit");
}

fn notify(notice: UserNotice) {
    println!("! {}", notice.message());
}

fn render_team(team: &Team) {
    if team.is_empty() {
        println!("(empty team)");
        return;
    }
    for (index, slot) in team.slots().iter().enumerate() {
        let role = SlotRole::of(index).as_str();
        match slot {
            Some(c) => {
                let badges: Vec<&str> = mechanics::detect(c)
                    .iter()
                    .map(|m| m.label())
                    .collect();
                let badges = if badges.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", badges.join(", "))
                };
                println!(
                    "  {index} {role:<6} {} {} {} - {}{badges}",
                    c.rarity, c.character_type, c.class, c.name
                );
                println!(
                    "      {} | HP {} ATK {} DEF {}",
                    c.subtitle, c.stats.hp, c.stats.atk, c.stats.def
                );
                println!("      {}", c.wiki_url());
            }
            None => println!("  {index} {role:<6} (empty)"),
        }
    }
}

fn render_sources(sources: &[String]) {
    if sources.is_empty() {
        return;
    }
    println!("Sources:");
    for source in sources {
        let host = url::Url::parse(source)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| source.clone());
        println!("  {host} ({source})");
    }
}

fn render_analysis(analysis: &dokkan_tactician::model::TeamAnalysis) {
    println!("Rating: {:.1}/10", analysis.rating);
    println!("\"{}\"", analysis.summary);
    if !analysis.strengths.is_empty() {
        println!("Strengths:");
        for s in &analysis.strengths {
            println!("  + {s}");
        }
    }
    if !analysis.weaknesses.is_empty() {
        println!("Weaknesses:");
        for w in &analysis.weaknesses {
            println!("  - {w}");
        }
    }
    if !analysis.rotations.is_empty() {
        println!("Suggested rotations:");
        for r in &analysis.rotations {
            println!("  * {r}");
        }
    }
}
