/// CSV match-result parsing.
///
/// One match per line: `teamA,scoreA,scoreB,teamB[,YYYY-MM-DD]`. Bad rows are
/// skipped with a warning carrying the 1-based line number; the rest of the
/// file is still read.
use chrono::NaiveDate;
use teamrank_core::constants::{MAX_SCORE, MIN_SCORE};
use teamrank_core::Match;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowProblem {
    TooFewColumns(usize),
    InvalidScore,
    EmptyTeam,
    SameTeam,
}

impl std::fmt::Display for RowProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowProblem::TooFewColumns(n) => write!(f, "it only has {n} col(s)"),
            RowProblem::InvalidScore => write!(f, "it has an invalid/missing score"),
            RowProblem::EmptyTeam => write!(f, "a team name is empty"),
            RowProblem::SameTeam => write!(f, "a team cannot play itself"),
        }
    }
}

fn parse_score(field: &str) -> Option<u32> {
    field
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|s| (MIN_SCORE..=MAX_SCORE).contains(s))
}

/// Parse a single non-empty line. A missing or unreadable date becomes `today`.
pub fn parse_row(line: &str, today: NaiveDate) -> Result<Match, RowProblem> {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < 4 {
        return Err(RowProblem::TooFewColumns(cols.len()));
    }

    let (Some(score_a), Some(score_b)) = (parse_score(cols[1]), parse_score(cols[2])) else {
        return Err(RowProblem::InvalidScore);
    };

    let team_a = cols[0].trim();
    let team_b = cols[3].trim();
    if team_a.is_empty() || team_b.is_empty() {
        return Err(RowProblem::EmptyTeam);
    }
    if team_a == team_b {
        return Err(RowProblem::SameTeam);
    }

    let date = cols
        .get(4)
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok())
        .unwrap_or(today);

    Ok(Match::new(date, team_a, team_b, score_a, score_b))
}

/// Parse a whole file. Blank lines are ignored silently.
pub fn parse_matches(content: &str, today: NaiveDate) -> Vec<Match> {
    let mut matches = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line, today) {
            Ok(m) => matches.push(m),
            Err(problem) => {
                tracing::warn!(line = i + 1, "Ignoring CSV line {} since {problem}: {line}", i + 1);
            }
        }
    }
    matches
}
