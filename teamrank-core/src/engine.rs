/// Ranking engine orchestrator.
///
/// Pure computation, no IO. The caller records match results, then asks for
/// ratings. Solving is lazy: the first query after any `add_match` partitions
/// the matches into groups and solves each one; later queries read the cache.
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{RankingError, Result};
use crate::grouping::MatchGroups;
use crate::scoring::{solve_group, SolvedGroup};
use crate::skill::SkillFunction;
use crate::types::{sorted_teams, Match, SolverOptions, TeamRating};

/// Solved groups plus the team → group lookup. Valid until the next mutation.
struct SolvedCache {
    groups: Vec<SolvedGroup>,
    team_group: HashMap<String, usize>,
}

pub struct RankingEngine {
    matches: Vec<Match>,
    skill: SkillFunction,
    options: SolverOptions,
    solved: Option<SolvedCache>,
}

impl RankingEngine {
    pub fn new(skill: SkillFunction, options: SolverOptions) -> Self {
        RankingEngine {
            matches: Vec::new(),
            skill,
            options,
            solved: None,
        }
    }

    pub fn skill(&self) -> SkillFunction {
        self.skill
    }

    /// Record a result. Team order does not matter. Invalidates cached ratings.
    pub fn add_match(
        &mut self,
        date: NaiveDate,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
        score_a: u32,
        score_b: u32,
    ) {
        self.solved = None;
        self.matches.push(Match::new(date, team_a, team_b, score_a, score_b));
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Matches involving `team`. Zero for a team that never played.
    pub fn games_played(&self, team: &str) -> usize {
        self.matches.iter().filter(|m| m.involves(team)).count()
    }

    /// Every team, sorted and duplicate-free.
    pub fn teams(&self) -> Vec<String> {
        sorted_teams(&self.matches)
    }

    /// Partition and solve if nothing is cached.
    pub fn solve(&mut self) -> Result<()> {
        self.cache().map(|_| ())
    }

    fn cache(&mut self) -> Result<&SolvedCache> {
        cached(&mut self.solved, &self.matches, self.skill, &self.options)
    }

    /// Rating of `team` within its match group.
    pub fn rating(&mut self, team: &str) -> Result<f64> {
        let cache = self.cache()?;
        let idx = *cache
            .team_group
            .get(team)
            .ok_or_else(|| RankingError::UnknownTeam(team.to_string()))?;
        cache.groups[idx].rating(team)
    }

    /// Number of independently solved groups.
    pub fn group_count(&mut self) -> Result<usize> {
        Ok(self.cache()?.groups.len())
    }

    pub fn solved_groups(&mut self) -> Result<&[SolvedGroup]> {
        Ok(self.cache()?.groups.as_slice())
    }

    /// Every team with rating and games played, best first. Equal ratings
    /// fall back to name order.
    pub fn standings(&mut self) -> Result<Vec<TeamRating>> {
        let cache = cached(&mut self.solved, &self.matches, self.skill, &self.options)?;
        let mut games: HashMap<&str, usize> = HashMap::new();
        for m in &self.matches {
            *games.entry(m.team_a()).or_insert(0) += 1;
            *games.entry(m.team_b()).or_insert(0) += 1;
        }

        let mut standings = Vec::with_capacity(cache.team_group.len());
        for (group_idx, group) in cache.groups.iter().enumerate() {
            for (team, rating) in group.ratings()? {
                let games_played = games.get(team.as_str()).copied().unwrap_or(0);
                standings.push(TeamRating {
                    team,
                    rating,
                    games_played,
                    group: group_idx,
                });
            }
        }

        standings.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.team.cmp(&b.team))
        });
        Ok(standings)
    }
}

/// The cached solve, computed first if `solved` is empty. Takes the engine's
/// fields separately so callers can keep reading the match list.
fn cached<'a>(
    solved: &'a mut Option<SolvedCache>,
    matches: &[Match],
    skill: SkillFunction,
    options: &SolverOptions,
) -> Result<&'a SolvedCache> {
    let cache = match solved.take() {
        Some(cache) => cache,
        None => solve_all(matches, skill, options)?,
    };
    Ok(solved.insert(cache))
}

fn solve_all(matches: &[Match], skill: SkillFunction, options: &SolverOptions) -> Result<SolvedCache> {
    let partition = MatchGroups::from_matches(matches);
    let match_groups = partition.groups();
    if match_groups.len() > 1 {
        tracing::info!(
            groups = match_groups.len(),
            "matches form more than one group; ratings are only comparable within a group"
        );
    }

    let mut groups = Vec::with_capacity(match_groups.len());
    let mut team_group = HashMap::new();
    for (idx, group_matches) in match_groups.into_iter().enumerate() {
        let solved = solve_group(group_matches, skill, options)?;
        for team in solved.teams() {
            team_group.insert(team.clone(), idx);
        }
        groups.push(solved);
    }

    Ok(SolvedCache { groups, team_group })
}
