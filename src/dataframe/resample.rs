//! # Resampling
//!
//! Carries every requested topic onto one timeline: the sorted union of all
//! their sample timestamps.

use tracing::debug;

use super::projection::{ResamplePolicy, TopicProjection};
use super::table::{AlignedTable, ColumnKey};
use crate::error::{Result, UlgCheckError};
use crate::ulog::{Dataset, ULog};

/// Sorted, de-duplicated union of sample timestamps
pub fn timeline<'a, I>(datasets: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a Dataset>,
{
    let mut timeline: Vec<u64> = datasets
        .into_iter()
        .flat_map(|d| d.timestamps.iter().copied())
        .collect();
    timeline.sort_unstable();
    timeline.dedup();
    timeline
}

/// Resample one field onto `timeline`
///
/// `timestamps` must be sorted and non-empty, with one entry per value;
/// decoded datasets always are.
pub fn resample(
    timestamps: &[u64],
    values: &[f64],
    timeline: &[u64],
    policy: ResamplePolicy,
) -> Vec<f64> {
    timeline
        .iter()
        .map(|&t| {
            // Number of samples at or before t
            let idx = timestamps.partition_point(|&s| s <= t);
            match policy {
                ResamplePolicy::NanFill => {
                    if idx > 0 && timestamps[idx - 1] == t {
                        values[idx - 1]
                    } else {
                        f64::NAN
                    }
                }
                ResamplePolicy::ZeroOrderHold => values[idx.saturating_sub(1)],
                ResamplePolicy::Linear => interpolate(timestamps, values, idx, t),
            }
        })
        .collect()
}

fn interpolate(timestamps: &[u64], values: &[f64], idx: usize, t: u64) -> f64 {
    if idx == 0 {
        return values[0];
    }
    if idx == timestamps.len() {
        return values[idx - 1];
    }

    let (t0, t1) = (timestamps[idx - 1], timestamps[idx]);
    let (v0, v1) = (values[idx - 1], values[idx]);
    if t0 == t || !v0.is_finite() || !v1.is_finite() {
        return v0;
    }

    let fraction = (t - t0) as f64 / (t1 - t0) as f64;
    v0 + (v1 - v0) * fraction
}

/// Build the aligned table for a projection
///
/// # Errors
///
/// Returns error if:
/// - A requested topic was never subscribed ([`UlgCheckError::MissingTopic`])
/// - A requested topic has no samples ([`UlgCheckError::EmptyTopic`])
/// - A required column is not produced ([`UlgCheckError::MissingColumn`])
pub fn align(ulog: &ULog, projection: &TopicProjection) -> Result<AlignedTable> {
    let mut selected: Vec<&Dataset> = Vec::new();

    for topic in &projection.topics {
        let instances: Vec<&Dataset> = ulog.datasets_for(topic).collect();
        if instances.is_empty() {
            return Err(UlgCheckError::MissingTopic(topic.clone()));
        }

        let published: Vec<&Dataset> = instances.into_iter().filter(|d| !d.is_empty()).collect();
        if published.is_empty() {
            return Err(UlgCheckError::EmptyTopic(topic.clone()));
        }
        selected.extend(published);
    }

    let rows = timeline(selected.iter().copied());
    let mut table = AlignedTable::new(rows);

    for dataset in &selected {
        for (field, values) in dataset.columns() {
            let policy = projection.policy(&dataset.name, field);
            let resampled = resample(&dataset.timestamps, values, table.timestamps(), policy);
            table.insert(
                ColumnKey::new(dataset.name.clone(), dataset.multi_id, field),
                resampled,
            )?;
        }
    }

    if let Some(missing) = projection.required.iter().find(|k| !table.contains(k)) {
        return Err(UlgCheckError::MissingColumn(missing.to_string()));
    }

    debug!(
        "Aligned {} topics into {} rows x {} columns",
        projection.topics.len(),
        table.len(),
        table.keys().count()
    );

    Ok(table)
}
