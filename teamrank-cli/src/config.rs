/// Config file loading and creation for the teamrank CLI.
///
/// Config lives at ~/.config/teamrank/config.toml.
/// Every key is optional; CLI flags override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TeamrankConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub skill: Option<String>,
    pub max_iterations: Option<usize>,
}

pub const DEFAULT_INPUT: &str = "ranking_input.csv";
pub const DEFAULT_OUTPUT: &str = "ranking_output.csv";

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# teamrank configuration
# All values here can be overridden by CLI flags.

# Match results, one per line: teamA,scoreA,scoreB,teamB[,YYYY-MM-DD]
# input = \"ranking_input.csv\"

# Where the rank,team,rating rows are written
# output = \"ranking_output.csv\"

# Skill function: plain, weighted-goal-difference or win-bonus
# skill = \"weighted-goal-difference\"

# Upper bound on optimizer steps per match group
# max_iterations = 1000000
";

/// Returns the default config path: ~/.config/teamrank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("teamrank").join("config.toml")
}

fn parse_config(content: &str) -> Result<TeamrankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if the file doesn't exist.
pub fn load_config(path: &Path) -> TeamrankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => TeamrankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
