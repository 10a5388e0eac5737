//! Epsilon-greedy variant allocation (TDM-88).
//!
//! Picks which copy variant a user sees next. With probability epsilon the
//! pick is uniform exploration; otherwise arms are drawn proportionally to
//! their smoothed success rate, so a variant with a thin history still gets
//! traffic instead of being starved by an early loser streak. Every pick
//! records an impression before it is returned; successes arrive later
//! through `ArmStore::record_success`.

use rand::seq::IndexedRandom;
use rand::{Rng, RngExt};
use rand_distr::{weighted::WeightedIndex, Distribution};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::store::ArmStore;

/// Allocate one arm within a scope and record its impression.
///
/// Arms are created lazily with zero counters on first sight, so callers
/// can add a variant by simply including its name. An empty arm list is
/// an error rather than a silent no-op.
pub fn allocate<S, R>(
    store: &S,
    scope: &str,
    arms: &[&str],
    config: &EngineConfig,
    rng: &mut R,
) -> Result<String, EngineError>
where
    S: ArmStore,
    R: Rng + ?Sized,
{
    if arms.is_empty() {
        return Err(EngineError::EmptyArmSet);
    }

    store.ensure_arms(scope, arms)?;
    let counters = store.arm_counters(scope, arms)?;

    let epsilon = config.epsilon.clamp(0.0, 1.0);
    let chosen = if rng.random::<f64>() < epsilon {
        arms.choose(rng).copied().unwrap_or(arms[0])
    } else {
        // Counters come back in arm order, so weight i belongs to arms[i].
        let weights: Vec<f64> = counters.iter().map(|arm| arm.smoothed_score()).collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => arms[dist.sample(rng)],
            Err(err) => {
                log::warn!("allocate: falling back to uniform choice: {}", err);
                arms.choose(rng).copied().unwrap_or(arms[0])
            }
        }
    };

    store.record_impression(scope, chosen)?;
    Ok(chosen.to_string())
}
