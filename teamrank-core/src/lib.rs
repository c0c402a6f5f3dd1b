//! teamrank-core: Pure-computation team rating engine.
//!
//! Match results → connected match groups → one linear equation per team
//! pairing → coordinate descent on the slack terms → a rating per team,
//! centred at 50 within its group. No IO, no files, no global state.
//!
//! Teams are identified by name. Ratings from different match groups are not
//! comparable: no match links them.
//!
//! # Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use teamrank_core::{RankingEngine, SkillFunction, SolverOptions};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
//! let mut engine = RankingEngine::new(SkillFunction::Plain, SolverOptions::default());
//!
//! engine.add_match(day, "Otters", "Herons", 10, 6);
//! engine.add_match(day, "Herons", "Badgers", 10, 3);
//!
//! let otters = engine.rating("Otters").unwrap();
//! let badgers = engine.rating("Badgers").unwrap();
//! assert!(otters > badgers);
//!
//! for r in engine.standings().unwrap() {
//!     println!("{}: {:.2} ({} games)", r.team, r.rating, r.games_played);
//! }
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod matrix;
pub mod optimizer;
pub mod pairing;
pub mod scoring;
pub mod skill;
pub mod system;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::RankingEngine;
pub use error::{RankingError, Result};
pub use grouping::MatchGroups;
pub use matrix::Matrix;
pub use optimizer::{optimize, Solution, StopReason};
pub use pairing::{aggregate_pairings, PairingAggregate};
pub use scoring::{solve_group, SolvedGroup};
pub use skill::SkillFunction;
pub use system::{build_system, RatingSystem};
pub use types::{Match, SolverOptions, TeamRating};
