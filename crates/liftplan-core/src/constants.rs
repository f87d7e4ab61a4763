// ABOUTME: Validation ranges and default values for strategies, schemes, and progressions
// ABOUTME: Centralizes rep/RPE limits, rounding defaults, and safety caps

//! Constants module
//!
//! Values are grouped by the strategy family that owns them.

/// Rounding defaults
pub mod rounding {
    /// Default rounding increment (pounds or kilograms, unit agnostic)
    pub const DEFAULT_INCREMENT: f64 = 5.0;

    /// Fixed increment used when rounding estimated one-rep maxes
    pub const E1RM_INCREMENT: f64 = 2.5;

    /// Quotients this close to an integer snap to it before floor/ceil
    pub const SNAP_TOLERANCE: f64 = 1e-9;
}

/// Rep and RPE limits shared by RPE charts and RPE-based strategies
pub mod rpe {
    /// Smallest target rep count
    pub const MIN_TARGET_REPS: u32 = 1;

    /// Largest target rep count
    pub const MAX_TARGET_REPS: u32 = 12;

    /// Lowest supported RPE
    pub const MIN_RPE: f64 = 7.0;

    /// Highest supported RPE
    pub const MAX_RPE: f64 = 10.0;

    /// RPE granularity
    pub const RPE_STEP: f64 = 0.5;

    /// Percent-of-1RM values for the standard chart, indexed by
    /// `(reps - 1) * 2 + (10 - rpe) * 2`.
    pub const STANDARD_CHART_PERCENTAGES: [f64; 29] = [
        1.000, 0.978, 0.955, 0.939, 0.922, 0.907, 0.892, 0.878, 0.863, 0.850, 0.837, 0.824,
        0.811, 0.799, 0.786, 0.774, 0.762, 0.751, 0.739, 0.723, 0.707, 0.694, 0.680, 0.667,
        0.653, 0.640, 0.626, 0.613, 0.599,
    ];
}

/// Taper defaults
pub mod taper {
    /// Default `(days_out, multiplier)` tiers, ascending by days out
    pub const DEFAULT_CURVE: [(u32, f64); 5] =
        [(7, 0.5), (14, 0.6), (21, 0.7), (28, 0.8), (35, 0.9)];
}

/// Set scheme defaults
pub mod set_scheme {
    /// Default safety cap on set count for variable schemes
    pub const DEFAULT_MAX_SETS: u32 = 10;

    /// Default global ceiling applied on top of per-scheme caps
    pub const DEFAULT_MAX_VARIABLE_SETS: u32 = 20;

    /// Upper bound on the number of sets any scheme may prescribe
    pub const MAX_PRESCRIBED_SETS: u32 = 100;

    /// Default GreySkull layout: fixed sets, fixed reps, AMRAP sets, AMRAP minimum
    pub const GREYSKULL_DEFAULT: (u32, u32, u32, u32) = (2, 5, 1, 5);
}

/// Progression defaults
pub mod progression {
    /// Consecutive failures before a deload applies
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

    /// Default deload fraction (10%)
    pub const DEFAULT_DELOAD_PERCENT: f64 = 0.10;

    /// Default GreySkull increment
    pub const GREYSKULL_INCREMENT: f64 = 2.5;

    /// Default GreySkull minimum AMRAP reps
    pub const GREYSKULL_MIN_REPS: u32 = 5;

    /// Default GreySkull double-increment threshold
    pub const GREYSKULL_DOUBLE_THRESHOLD: u32 = 10;
}
