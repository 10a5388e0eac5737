//! Cooldown-gated candidate resurfacing (TDM-52).
//!
//! Brings back saved prompts the couple has not seen lately. A candidate
//! is eligible when pinned, never used, or last used strictly before now
//! minus the cooldown. Eligible rows rank pinned first, then least
//! recently used (never-used ahead of everything), then least often used,
//! then newest first by creation; the returned pick is sampled uniformly
//! from the top slice so repeated calls do not become a fixed rotation.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::period;
use crate::store::CandidateStore;
use crate::types::Candidate;

struct Ranked {
    candidate: Candidate,
    last_used: Option<DateTime<Utc>>,
    created: DateTime<Utc>,
}

/// Resurface one candidate for a viewer, bumping its usage counters.
///
/// Returns None when nothing visible is eligible. The store update and
/// the returned `Candidate` reflect the same state: `usage_count` bumped
/// and `last_used_at` set to `now`.
pub fn resurface_candidate<S, R>(
    store: &S,
    subject_id: &str,
    viewer_id: &str,
    now: DateTime<Utc>,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Option<Candidate>, EngineError>
where
    S: CandidateStore,
    R: Rng + ?Sized,
{
    let cutoff = now - chrono::Duration::days(config.cooldown_days);

    let mut ranked: Vec<Ranked> = store
        .candidates_for(subject_id, viewer_id)?
        .into_iter()
        .filter_map(|candidate| {
            // An unparseable last-used timestamp counts as never used.
            let last_used = candidate
                .last_used_at
                .as_deref()
                .and_then(period::parse_instant);
            let eligible = candidate.pinned || last_used.map_or(true, |used| used < cutoff);
            eligible.then(|| {
                let created = period::parse_instant(&candidate.created_at)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                Ranked {
                    last_used,
                    created,
                    candidate,
                }
            })
        })
        .collect();

    if ranked.is_empty() {
        return Ok(None);
    }

    ranked.sort_by(|a, b| {
        b.candidate
            .pinned
            .cmp(&a.candidate.pinned)
            .then_with(|| a.last_used.cmp(&b.last_used))
            .then_with(|| a.candidate.usage_count.cmp(&b.candidate.usage_count))
            .then_with(|| b.created.cmp(&a.created))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    let slice_end = config.top_slice_size.max(1).min(ranked.len());
    let pick = match ranked[..slice_end].choose(rng) {
        Some(pick) => pick,
        None => return Ok(None),
    };

    if !store.mark_resurfaced(&pick.candidate.id, now)? {
        log::warn!(
            "resurface: candidate {} vanished before its usage update",
            pick.candidate.id
        );
        return Ok(None);
    }

    let mut chosen = pick.candidate.clone();
    chosen.usage_count += 1;
    chosen.last_used_at = Some(now.to_rfc3339());
    Ok(Some(chosen))
}
