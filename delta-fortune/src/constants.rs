//! Centralized scoring constants for the Delta Fortune engine.
//!
//! These values define the deterministic math behind every report. Keeping
//! them together means the rule system can only be adjusted via code changes
//! reviewed in version control, rather than through the reference JSON.

// Calendar ----------------------------------------------------------------
pub(crate) const EPOCH_YEAR: i32 = 1984;
pub(crate) const LUNAR_BASE_YEAR: i32 = 1900;
pub(crate) const LUNAR_MONTHS_PER_YEAR: f64 = 12.368;
pub(crate) const LUNAR_DAYS_PER_MONTH: i64 = 30;
pub(crate) const WRAP_SLOT_START_HOUR: u32 = 23;
pub(crate) const WRAP_SLOT_END_HOUR: u32 = 1;

// Compatibility -----------------------------------------------------------
pub(crate) const COMPAT_GENERATES: f64 = 1.3;
pub(crate) const COMPAT_DESTROYS: f64 = 0.7;
pub(crate) const COMPAT_SAME: f64 = 1.1;
pub(crate) const COMPAT_NEUTRAL: f64 = 1.0;

// Draw ladders ------------------------------------------------------------
pub(crate) const DRAW_RATE_CAP_FACTOR: f64 = 2.0;
pub(crate) const CHARACTER_DRAW_COSTS: [u32; 8] = [1, 3, 5, 10, 15, 20, 25, 30];
pub(crate) const CHARACTER_BASE_RED_RATE: f64 = 0.12;
pub(crate) const WEAPON_PREMIUM_CATEGORY_RATE: f64 = 0.15;
pub(crate) const WEAPON_EXCELLENT_CATEGORY_RATE: f64 = 0.35;
pub(crate) const CHARACTER_EXCELLENT_LUCK: f64 = 0.25;
pub(crate) const CHARACTER_VERY_GOOD_LUCK: f64 = 0.18;
pub(crate) const CHARACTER_GOOD_BONUS: f64 = 1.2;
pub(crate) const PREMIUM_S_EXCELLENT: f64 = 0.08;
pub(crate) const PREMIUM_S_VERY_GOOD: f64 = 0.05;
pub(crate) const PREMIUM_S_GOOD: f64 = 0.03;
pub(crate) const BEST_SLOT_MIN_COMPAT: f64 = 1.2;

// Advice gates ------------------------------------------------------------
pub(crate) const ADVICE_ONE_DRAW_LUCK: f64 = 0.2;
pub(crate) const ADVICE_PREMIUM_S: f64 = 0.06;
pub(crate) const ADVICE_BEFORE_GUARANTEED: f64 = 0.8;
pub(crate) const ADVICE_HARMONY_LUCK: f64 = 1.2;
pub(crate) const ADVICE_CLASH_LUCK: f64 = 0.8;
pub(crate) const CONTAINER_ADVICE_MIN_BONUS: f64 = 1.2;

// Bonus tiers shared by containers and skin qualities ---------------------
pub(crate) const TIER_EXCELLENT: f64 = 1.3;
pub(crate) const TIER_GOOD: f64 = 1.2;
pub(crate) const TIER_DECENT: f64 = 1.1;
pub(crate) const TIER_AVERAGE: f64 = 0.9;

// Map zones ---------------------------------------------------------------
pub(crate) const ZONE_LADDER: [f64; 7] = [2.0, 1.5, 1.2, 0.8, 0.6, 0.4, 0.2];
pub(crate) const ZONE_GREAT_BONUS: f64 = 1.3;
pub(crate) const ZONE_MINOR_BONUS: f64 = 1.1;
pub(crate) const ZONE_NEUTRAL_BONUS: f64 = 0.9;
pub(crate) const ZONE_SAFE_DANGER: u8 = 3;
pub(crate) const ZONE_RANK_LEN: usize = 3;
pub(crate) const CONTAINER_RANK_LEN: usize = 3;

// Divination --------------------------------------------------------------
pub(crate) const CHANGE_LINE_COUNT: i64 = 6;
pub(crate) const PALACE_COUNT: u32 = 9;
pub(crate) const PALACE_LUCKY_BONUS: f64 = 1.3;
pub(crate) const PALACE_PLAIN_BONUS: f64 = 1.0;
pub(crate) const JOY_TIME_BONUS: f64 = 1.1;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
