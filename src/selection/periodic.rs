//! Deterministic period-keyed selection (TDM-52).
//!
//! "Prompt of the week" style picks: every call with the same subject,
//! period, and pool returns the same item, with no stored state and no
//! randomness. Both partners see the same prompt all week because the
//! pick is a pure function of its inputs.

use sha2::{Digest, Sha256};

use crate::period::PeriodKey;

/// Pick the period's item for a subject from an ordered pool.
///
/// The index is the first 8 bytes of `SHA-256("{subject_id}:{period}")`
/// taken modulo the pool size, so picks are stable across processes and
/// machines. Returns None only for an empty pool.
pub fn pick_for_period<'a, T>(subject_id: &str, period: PeriodKey, pool: &'a [T]) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }
    let digest = Sha256::digest(format!("{}:{}", subject_id, period).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let idx = (u64::from_be_bytes(prefix) % pool.len() as u64) as usize;
    pool.get(idx)
}
