/// Pairing aggregation within one match group.
///
/// Every distinct canonical (team_a, team_b) pair becomes one aggregate, and
/// each aggregate becomes one equation in the group's linear system.
use std::collections::HashMap;

use crate::error::Result;
use crate::skill::SkillFunction;
use crate::types::Match;

/// All matches between one exact pair of teams.
#[derive(Debug, Clone)]
pub struct PairingAggregate {
    pub team_a: String,
    pub team_b: String,
    /// Matches in the order they were recorded.
    pub matches: Vec<Match>,
}

impl PairingAggregate {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Positive when `team_a` is assessed stronger.
    pub fn relative_skill(&self, skill: SkillFunction) -> Result<f64> {
        skill.relative_skill(&self.matches)
    }
}

/// Cluster `matches` by canonical team pair.
///
/// Aggregates come out in order of each pair's first appearance, not sorted.
pub fn aggregate_pairings(matches: &[Match]) -> Vec<PairingAggregate> {
    let mut aggregates: Vec<PairingAggregate> = Vec::new();
    let mut pair_to_idx: HashMap<(&str, &str), usize> = HashMap::new();

    for m in matches {
        match pair_to_idx.get(&m.teams()) {
            Some(&idx) => aggregates[idx].matches.push(m.clone()),
            None => {
                pair_to_idx.insert(m.teams(), aggregates.len());
                aggregates.push(PairingAggregate {
                    team_a: m.team_a().to_string(),
                    team_b: m.team_b().to_string(),
                    matches: vec![m.clone()],
                });
            }
        }
    }

    aggregates
}
