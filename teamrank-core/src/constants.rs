/// Mean rating of every solved match group. Ratings are centred here so that
/// a team with no information to separate it from its opponents sits at 50.
pub const CENTRAL_RATING: f64 = 50.0;

/// Tolerance for every "is this effectively zero" decision: pivot detection
/// in the reducer, optimizer convergence, and the post-solve consistency check.
pub const EPSILON: f64 = 1e-11;

/// Coordinate step the optimizer starts with. Halved on every rejected step.
pub const INITIAL_STEP: f64 = 1.0;

/// Hard cap on optimizer iterations. The step-halving rule terminates long
/// before this on any realistic league; the cap only guards numerical stalls.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

/// Accepted score range for a single match (inclusive).
pub const MIN_SCORE: u32 = 0;
pub const MAX_SCORE: u32 = 10;

/// Goal difference at which the weighted skill function starts adding a
/// blow-out bonus.
pub const BLOWOUT_THRESHOLD: f64 = 5.0;

/// Goal difference at which the blow-out bonus reaches `BLOWOUT_BONUS`.
/// Each goal short of it halves the bonus.
pub const BLOWOUT_PIVOT: f64 = 10.0;

/// Blow-out bonus at a goal difference of `BLOWOUT_PIVOT`.
pub const BLOWOUT_BONUS: f64 = 10.0;

/// Scale of the win bonus: 20/9 makes a 10-goal win earn exactly 2.
pub const WIN_BONUS_SCALE: f64 = 20.0 / 9.0;
