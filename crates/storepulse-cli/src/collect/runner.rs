//! Work-unit orchestration for a collection run.
//!
//! Units are processed strictly in plan order. Repeated reviews are dropped
//! as they arrive, before they take an id. After each unit the full batch is
//! deduplicated and checkpointed, so an interrupted run loses at most the
//! unit in flight. Source failures are absorbed per store; only a failed
//! checkpoint ends the run.

use std::mem;

use storepulse_core::{dedup_reviews, CollectPlan, ReviewContent, ReviewRecord, WorkUnit};
use storepulse_scraper::{normalize_store, Pacer, SourceAdapter};

use super::checkpoint::{Checkpoint, CheckpointError};
use super::context::RunContext;

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub max_reviews: usize,
    /// Pause between consecutive work units.
    pub unit_delay: Pacer,
}

/// What happened to one processed work unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnitOutcome {
    pub unit: String,
    pub stores: usize,
    pub reviews: usize,
    /// Stores that yielded no usable review.
    pub empty_stores: usize,
    /// The browser session died and the remaining stores were skipped.
    pub aborted: bool,
}

#[derive(Debug, Default)]
pub(crate) struct RunReport {
    /// Units already present in the checkpoint when the run started.
    pub skipped_units: Vec<String>,
    pub units: Vec<UnitOutcome>,
    /// Final persisted batch, including resumed rows.
    pub records: Vec<ReviewRecord>,
}

/// Run every pending work unit of `plan` against `adapter`.
///
/// # Errors
///
/// Returns [`CheckpointError`] if the existing output cannot be read or a
/// checkpoint cannot be written. Source failures never surface here.
pub(crate) async fn run_collection(
    adapter: &mut SourceAdapter,
    plan: &CollectPlan,
    checkpoint: &Checkpoint,
    options: &RunOptions,
) -> Result<RunReport, CheckpointError> {
    let resumed = checkpoint.load()?;
    let mut ctx = RunContext::resume_from(&resumed.records);
    let mut report = RunReport::default();

    let pending: Vec<&WorkUnit> = plan
        .work_units
        .iter()
        .filter(|unit| {
            let done = resumed.is_done(&unit.name);
            if done {
                report.skipped_units.push(unit.name.clone());
            }
            !done
        })
        .collect();

    if !resumed.records.is_empty() {
        tracing::info!(
            rows = resumed.records.len(),
            skipped = report.skipped_units.len(),
            pending = pending.len(),
            "resuming from checkpoint"
        );
    }

    let mut batch = resumed.records;
    for (i, unit) in pending.iter().enumerate() {
        let outcome = collect_unit(adapter, plan, unit, &mut ctx, options, &mut batch).await;
        tracing::info!(
            unit = %outcome.unit,
            stores = outcome.stores,
            reviews = outcome.reviews,
            empty_stores = outcome.empty_stores,
            aborted = outcome.aborted,
            "work unit complete"
        );
        report.units.push(outcome);

        batch = dedup_reviews(mem::take(&mut batch));
        checkpoint.save(&batch)?;

        if i + 1 < pending.len() {
            options.unit_delay.pause().await;
        }
    }

    report.records = batch;
    Ok(report)
}

async fn collect_unit(
    adapter: &mut SourceAdapter,
    plan: &CollectPlan,
    unit: &WorkUnit,
    ctx: &mut RunContext,
    options: &RunOptions,
    batch: &mut Vec<ReviewRecord>,
) -> UnitOutcome {
    let mut outcome = UnitOutcome {
        unit: unit.name.clone(),
        stores: 0,
        reviews: 0,
        empty_stores: 0,
        aborted: false,
    };
    let provenance = adapter.kind().provenance();

    let stores = match adapter.open_unit(unit).await {
        Ok(()) => adapter.find_stores(plan, unit).await,
        Err(e) => {
            tracing::warn!(unit = %unit.name, error = %e, "could not open source for unit");
            Vec::new()
        }
    };
    outcome.stores = stores.len();

    for raw in &stores {
        let fetched = match adapter.fetch_reviews(raw, options.max_reviews).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(
                    unit = %unit.name,
                    store = %raw.name,
                    error = %e,
                    "source session lost; skipping rest of unit"
                );
                outcome.aborted = true;
                break;
            }
        };

        let mut store = normalize_store(&fetched.store, String::new(), plan);
        let offered = fetched.reviews.len();
        let fresh: Vec<ReviewContent> = fetched
            .reviews
            .into_iter()
            .filter(|c| ctx.admit(&c.text, &store.name))
            .collect();
        if fresh.len() < offered {
            tracing::debug!(
                store = %store.name,
                duplicates = offered - fresh.len(),
                "dropped repeated reviews"
            );
        }
        if fresh.is_empty() {
            outcome.empty_stores += 1;
            continue;
        }

        // Only stores that contribute rows take a sequential id.
        store.id = ctx.store_id(&fetched.store);
        outcome.reviews += fresh.len();
        for content in fresh {
            batch.push(ReviewRecord::new(
                ctx.next_review_id(),
                content,
                &store,
                provenance,
                &unit.name,
            ));
        }
    }

    adapter.close_unit().await;
    outcome
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
