//! Weekly trend aggregation (TDM-41).
//!
//! Builds the trailing-weeks chart behind the couple dashboard: one point
//! per week, oldest first, with mean and sample standard deviation of that
//! week's check-ins. The store is hit exactly once per call with a range
//! that covers the whole window; bucketing happens in memory against the
//! subject's local civil dates, so a Sunday-night check-in in Denver lands
//! in the week the couple experienced, not the UTC one.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::period;
use crate::store::RatingStore;
use crate::types::TrendPoint;

/// Aggregate the trailing `weeks` of check-ins for one subject.
///
/// `weeks` falls back to `config.default_weeks` and must stay within
/// `config.min_weeks..=config.max_weeks`. The newest point covers the week
/// containing `now`; a subject with no events still gets one null point per
/// week so charts keep their x-axis.
pub fn weekly_trends<S: RatingStore>(
    store: &S,
    subject_id: &str,
    timezone: &str,
    weeks: Option<u32>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<Vec<TrendPoint>, EngineError> {
    let weeks = weeks.unwrap_or(config.default_weeks);
    if weeks < config.min_weeks || weeks > config.max_weeks {
        return Err(EngineError::WindowOutOfRange {
            weeks,
            min: config.min_weeks,
            max: config.max_weeks,
        });
    }

    let tz = period::parse_timezone(timezone)?;
    let span = i64::from(weeks);

    let current_start =
        period::week_start_of(period::day_key_in(now, &tz), config.week_start_offset);
    let earliest = period::add_days(current_start, -7 * (span - 1));
    let end = period::add_days(current_start, 7);

    // Canonical bounds are UTC midnights of civil dates, but an event's UTC
    // timestamp can sit up to a day on either side of its local date. Pad
    // the query by one day each way and let the local-date bucketing below
    // decide membership.
    let events = store.ratings_in_range(
        subject_id,
        period::add_days(earliest, -1).canonical(),
        period::add_days(end, 1).canonical(),
    )?;

    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); weeks as usize];
    for event in &events {
        let Some(instant) = period::parse_instant(&event.recorded_at) else {
            log::warn!(
                "trends: skipping rating {} with unparseable timestamp {}",
                event.id,
                event.recorded_at
            );
            continue;
        };
        let local = period::day_key_in(instant, &tz);
        let day = (local.date() - earliest.date()).num_days();
        if day < 0 || day >= span * 7 {
            continue;
        }
        buckets[(day / 7) as usize].push(f64::from(event.rating));
    }

    let points = buckets
        .iter()
        .enumerate()
        .map(|(i, samples)| {
            let week_start = period::add_days(earliest, 7 * i as i64);
            let count = samples.len();
            let mean = (count > 0).then(|| mean(samples));
            let std_dev = if count >= 2 {
                mean.map(|m| sample_std_dev(samples, m))
            } else {
                None
            };
            TrendPoint {
                week_start,
                mean,
                std_dev,
                count,
            }
        })
        .collect();

    Ok(points)
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample (Bessel-corrected) standard deviation. Callers guarantee n >= 2.
fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    let variance =
        samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}
