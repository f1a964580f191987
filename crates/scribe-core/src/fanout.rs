//! Concurrent fan-out of independent OCR units.
//!
//! Units run concurrently on the current task; results come back in input
//! order regardless of completion order. Each unit owns its own image and
//! writes only its own result slot, so nothing is shared between units.

use std::future::Future;

use futures::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::error::ScribeResult;

/// Page header written before each page's text in PDF output.
pub fn page_marker(page: u32) -> String {
    format!("--- Page {} ---", page)
}

/// How a batch reacts to a failing unit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatchPolicy {
    /// Every unit runs; failures are reported in their own slot.
    #[default]
    BestEffort,
    /// The first failure (in input order) aborts the batch.
    FailFast,
}

/// Runs units concurrently with an optional concurrency cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOut {
    policy: BatchPolicy,
    max_concurrency: Option<usize>,
}

impl FanOut {
    /// Create a fan-out coordinator. `None` means every unit is in flight at once.
    pub fn new(policy: BatchPolicy, max_concurrency: Option<usize>) -> Self {
        Self {
            policy,
            max_concurrency,
        }
    }

    /// Same cap, different policy.
    pub fn with_policy(self, policy: BatchPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Run all units and collect their results in input order.
    ///
    /// With [`BatchPolicy::BestEffort`] the outer result is always `Ok` and each
    /// slot holds its unit's outcome. With [`BatchPolicy::FailFast`] the first
    /// error by input position is returned and the remaining units are dropped.
    pub async fn run<T, F>(&self, units: Vec<F>) -> ScribeResult<Vec<ScribeResult<T>>>
    where
        F: Future<Output = ScribeResult<T>>,
    {
        let limit = self.max_concurrency.unwrap_or(units.len()).max(1);
        let results = stream::iter(units).buffered(limit);

        match self.policy {
            BatchPolicy::BestEffort => Ok(results.collect().await),
            BatchPolicy::FailFast => {
                let values: Vec<T> = results.try_collect().await?;
                Ok(values.into_iter().map(Ok).collect())
            }
        }
    }
}

/// Join recognized pages into one labeled document, in page order.
pub fn format_pages(pages: &[(u32, String)]) -> String {
    pages
        .iter()
        .map(|(number, text)| format!("{}\n{}", page_marker(*number), text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
