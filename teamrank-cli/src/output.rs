/// Output formatting: terminal table, JSON, and the ranking CSV file.
use serde::Serialize;
use std::path::Path;
use teamrank_core::TeamRating;

#[derive(Serialize)]
struct JsonRankedTeam<'a> {
    rank: usize,
    #[serde(flatten)]
    team: &'a TeamRating,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    teams: Vec<JsonRankedTeam<'a>>,
    matches: usize,
    groups: usize,
    skill: &'a str,
}

/// Print standings as a formatted terminal table.
pub fn print_table(standings: &[TeamRating], matches: usize, groups: usize) {
    let name_width = standings
        .iter()
        .map(|r| r.team.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Team"

    println!("  # | {:<name_width$} |  Rating | Games", "Team");
    println!("----|-{}-|---------|------", "-".repeat(name_width));

    for (i, r) in standings.iter().enumerate() {
        println!(
            "{:>3} | {:<name_width$} | {:>7.3} | {:>5}",
            i + 1,
            r.team,
            r.rating,
            r.games_played,
        );
    }

    println!("\n{} teams ranked from {} matches", standings.len(), matches);
    if groups > 1 {
        println!(
            "Note: the matches form {groups} unconnected groups; ratings are only comparable within a group"
        );
    }
}

/// Print standings as JSON.
pub fn print_json(standings: &[TeamRating], matches: usize, groups: usize, skill: &str) {
    println!("{}", render_json(standings, matches, groups, skill));
}

fn render_json(standings: &[TeamRating], matches: usize, groups: usize, skill: &str) -> String {
    let output = JsonOutput {
        teams: standings
            .iter()
            .enumerate()
            .map(|(i, team)| JsonRankedTeam { rank: i + 1, team })
            .collect(),
        matches,
        groups,
        skill,
    };
    serde_json::to_string_pretty(&output).unwrap()
}

/// `rank,team,rating` rows, CRLF terminated, in the given order.
pub fn render_csv(standings: &[TeamRating]) -> String {
    standings
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{},{},{}\r\n", i + 1, r.team, r.rating))
        .collect()
}

pub fn write_csv(path: &Path, standings: &[TeamRating]) -> std::io::Result<()> {
    std::fs::write(path, render_csv(standings))
}
