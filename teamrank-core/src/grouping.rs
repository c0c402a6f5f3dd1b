/// Partition matches into connected match groups.
///
/// Teams are vertices, matches are edges. Two teams share a group exactly when
/// a chain of matches links them. Groups live in an arena; each team points at
/// a record, and absorbed records point at the record that swallowed them.
/// Lookups follow those links to the root (union-find), compressing the path
/// while the groups are being built.
use std::collections::HashMap;

use crate::types::Match;

struct GroupRecord {
    /// Index of the surviving record; equal to its own index for a root.
    parent: usize,
    /// Matches in the order they joined. Empty once absorbed.
    matches: Vec<Match>,
}

pub struct MatchGroups {
    records: Vec<GroupRecord>,
    team_group: HashMap<String, usize>,
}

impl MatchGroups {
    pub fn new() -> Self {
        MatchGroups {
            records: Vec::new(),
            team_group: HashMap::new(),
        }
    }

    pub fn from_matches(matches: &[Match]) -> Self {
        let mut groups = MatchGroups::new();
        for m in matches {
            groups.add(m.clone());
        }
        groups
    }

    /// Add one match, creating, extending or merging groups.
    pub fn add(&mut self, m: Match) {
        let group_a = self.team_group.get(m.team_a()).copied();
        let group_b = self.team_group.get(m.team_b()).copied();

        match (group_a, group_b) {
            // Neither team seen yet
            (None, None) => {
                let idx = self.records.len();
                self.team_group.insert(m.team_a().to_string(), idx);
                self.team_group.insert(m.team_b().to_string(), idx);
                self.records.push(GroupRecord {
                    parent: idx,
                    matches: vec![m],
                });
            }
            // Exactly one team already belongs to a group
            (Some(known), None) | (None, Some(known)) => {
                let root = self.find_compress(known);
                let newcomer = if group_a.is_none() { m.team_a() } else { m.team_b() };
                self.team_group.insert(newcomer.to_string(), root);
                self.records[root].matches.push(m);
            }
            (Some(a), Some(b)) => {
                let root_a = self.find_compress(a);
                let root_b = self.find_compress(b);
                if root_a == root_b {
                    self.records[root_a].matches.push(m);
                } else {
                    // Larger group survives; on a tie team A's group does.
                    let (survivor, absorbed) =
                        if self.records[root_b].matches.len() > self.records[root_a].matches.len() {
                            (root_b, root_a)
                        } else {
                            (root_a, root_b)
                        };
                    let moved = std::mem::take(&mut self.records[absorbed].matches);
                    self.records[survivor].matches.extend(moved);
                    self.records[survivor].matches.push(m);
                    self.records[absorbed].parent = survivor;
                }
            }
        }
    }

    fn find_compress(&mut self, idx: usize) -> usize {
        let root = self.root(idx);
        let mut current = idx;
        while self.records[current].parent != root {
            let next = self.records[current].parent;
            self.records[current].parent = root;
            current = next;
        }
        root
    }

    fn root(&self, mut idx: usize) -> usize {
        while self.records[idx].parent != idx {
            idx = self.records[idx].parent;
        }
        idx
    }

    /// Index of the group `team` belongs to. Stable until the next `add`.
    pub fn group_index(&self, team: &str) -> Option<usize> {
        self.team_group.get(team).map(|&idx| self.root(idx))
    }

    /// Matches of the group `team` belongs to.
    pub fn group_of(&self, team: &str) -> Option<&[Match]> {
        self.group_index(team).map(|root| self.records[root].matches.as_slice())
    }

    pub fn same_group(&self, team1: &str, team2: &str) -> bool {
        match (self.group_index(team1), self.group_index(team2)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Distinct groups, in order of group creation.
    pub fn groups(&self) -> Vec<&[Match]> {
        self.records
            .iter()
            .enumerate()
            .filter(|(idx, record)| record.parent == *idx)
            .map(|(_, record)| record.matches.as_slice())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .iter()
            .enumerate()
            .filter(|(idx, record)| record.parent == *idx)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn team_count(&self) -> usize {
        self.team_group.len()
    }
}

impl Default for MatchGroups {
    fn default() -> Self {
        Self::new()
    }
}
