//! Engine tunables (TDM-52).
//!
//! Every knob is an explicit parameter carried on `EngineConfig`. The engine
//! never reads process environment or global state; the host service decides
//! where the values come from (its own config file, per-tenant rows) and
//! passes them in.

use serde::{Deserialize, Serialize};

/// Tunables for trend windows, resurfacing, and allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Days a candidate stays ineligible after being resurfaced.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,
    /// Size of the top-ranked slice resurfacing samples from.
    #[serde(default = "default_top_slice_size")]
    pub top_slice_size: usize,
    /// Exploration probability for allocation. Expected range 0.0..=1.0;
    /// values outside are clamped at use.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Trailing weeks returned when the caller does not ask for a window.
    #[serde(default = "default_weeks")]
    pub default_weeks: u32,
    /// Smallest trend window a caller may request.
    #[serde(default = "default_min_weeks")]
    pub min_weeks: u32,
    /// Largest trend window a caller may request.
    #[serde(default = "default_max_weeks")]
    pub max_weeks: u32,
    /// First day of the week: 0 = Sunday .. 6 = Saturday.
    #[serde(default = "default_week_start_offset")]
    pub week_start_offset: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            top_slice_size: default_top_slice_size(),
            epsilon: default_epsilon(),
            default_weeks: default_weeks(),
            min_weeks: default_min_weeks(),
            max_weeks: default_max_weeks(),
            week_start_offset: default_week_start_offset(),
        }
    }
}

fn default_cooldown_days() -> i64 {
    30
}

fn default_top_slice_size() -> usize {
    5
}

fn default_epsilon() -> f64 {
    0.08
}

fn default_weeks() -> u32 {
    8
}

fn default_min_weeks() -> u32 {
    4
}

fn default_max_weeks() -> u32 {
    24
}

fn default_week_start_offset() -> u8 {
    1 // Monday
}
