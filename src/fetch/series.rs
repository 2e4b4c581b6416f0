//! Series Aggregator
//!
//! Fetches post counts for several categories at once and aligns them on a
//! single sorted label axis, so every dataset of a line chart has one value
//! per label.

use crate::api::{fetch_post_counts, AnalyticsSource, DisasterCategory, PostCount, SeriesLabel};
use crate::range::QueryString;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Counts of one category, aligned to [`AlignedSeries::labels`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySeries {
    pub category: DisasterCategory,
    pub counts: Vec<u64>,
}

impl CategorySeries {
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

/// Merged multi-category series.
///
/// `labels` is ascending and deduplicated; each entry of `series` has exactly
/// `labels.len()` counts, with 0 wherever that category reported nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlignedSeries {
    pub labels: Vec<SeriesLabel>,
    /// In the order the categories were requested
    pub series: Vec<CategorySeries>,
    /// Categories whose retrieval failed this cycle (all-zero series)
    pub failed: Vec<DisasterCategory>,
}

impl AlignedSeries {
    /// Aligned counts for a category
    pub fn get(&self, category: DisasterCategory) -> Option<&[u64]> {
        self.series
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.counts.as_slice())
    }

    /// Sum of counts per category
    pub fn totals(&self) -> Vec<(DisasterCategory, u64)> {
        self.series.iter().map(|s| (s.category, s.total())).collect()
    }

    /// Whether every retrieval failed
    pub fn all_failed(&self) -> bool {
        !self.series.is_empty() && self.failed.len() == self.series.len()
    }
}

/// Align raw per-category results on the union of their labels.
///
/// `None` marks a failed retrieval. Repeated labels within one category are
/// summed, saturating at `u64::MAX`.
pub fn align_series(raw: Vec<(DisasterCategory, Option<Vec<PostCount>>)>) -> AlignedSeries {
    let mut axis = BTreeSet::new();
    let mut per_category = Vec::with_capacity(raw.len());
    let mut failed = Vec::new();

    for (category, counts) in raw {
        let mut buckets: BTreeMap<SeriesLabel, u64> = BTreeMap::new();
        match counts {
            Some(counts) => {
                for PostCount { timestamp, count } in counts {
                    axis.insert(timestamp.clone());
                    let bucket = buckets.entry(timestamp).or_insert(0);
                    *bucket = bucket.saturating_add(count);
                }
            }
            None => failed.push(category),
        }
        per_category.push((category, buckets));
    }

    let labels: Vec<SeriesLabel> = axis.into_iter().collect();
    let series = per_category
        .into_iter()
        .map(|(category, buckets)| CategorySeries {
            category,
            counts: labels
                .iter()
                .map(|label| buckets.get(label).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    AlignedSeries {
        labels,
        series,
        failed,
    }
}

/// Fetches and aligns post counts for a fixed category list
pub struct SeriesAggregator {
    source: Arc<dyn AnalyticsSource>,
    categories: Vec<DisasterCategory>,
}

impl SeriesAggregator {
    /// Create an aggregator; duplicate categories are ignored
    pub fn new(source: Arc<dyn AnalyticsSource>, categories: &[DisasterCategory]) -> Self {
        let mut unique = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(category) {
                unique.push(*category);
            }
        }

        Self {
            source,
            categories: unique,
        }
    }

    pub fn categories(&self) -> &[DisasterCategory] {
        &self.categories
    }

    /// Fetch every category concurrently and align the results.
    ///
    /// Completes once all requests have settled; a failed category degrades
    /// to zeros without affecting the others.
    pub async fn aggregate(&self, query: &QueryString) -> AlignedSeries {
        let source = self.source.as_ref();
        let requests = self.categories.iter().map(|&category| async move {
            match fetch_post_counts(source, category, query).await {
                Ok(counts) => (category, Some(counts)),
                Err(e) => {
                    tracing::warn!(%category, "Post count fetch failed: {}", e);
                    (category, None)
                }
            }
        });

        let aligned = align_series(join_all(requests).await);
        tracing::debug!(
            labels = aligned.labels.len(),
            failed = aligned.failed.len(),
            "Aggregated post counts"
        );
        aligned
    }
}
