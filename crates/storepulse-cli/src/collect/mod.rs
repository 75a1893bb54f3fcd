//! The `collect` and `maps` command handlers.
//!
//! Both run the same pipeline; `maps` forces the browser source. Source
//! failures are logged and skipped inside the run. Only configuration and
//! checkpoint faults reach `main` as errors.

mod checkpoint;
mod context;
mod runner;
mod summary;

use anyhow::Context;
use storepulse_core::{load_plan, select_source, AppConfig, SourceKind};
use storepulse_scraper::{BrowserOptions, Pacer, SourceAdapter};

use checkpoint::Checkpoint;
use runner::{run_collection, RunOptions};
use summary::RunSummary;

/// Collect reviews with the source chosen from configuration.
///
/// # Errors
///
/// Returns an error if no source is selectable, the plan cannot be loaded,
/// or the output file cannot be read or written.
pub(crate) async fn run_collect(config: &AppConfig) -> anyhow::Result<()> {
    let kind = select_source(config)?;
    run(config, kind, BrowserOptions::new(true, config.browser_store_delay_ms)).await
}

/// Collect reviews through the browser regardless of configured keys.
///
/// # Errors
///
/// Same as [`run_collect`].
pub(crate) async fn run_maps(
    config: &AppConfig,
    visible: bool,
    max: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(max) = max {
        config.max_reviews_per_store =
            usize::try_from(max).context("--max is too large")?;
    }
    let options = BrowserOptions::new(!visible, config.browser_store_delay_ms);
    run(&config, SourceKind::Browser, options).await
}

async fn run(config: &AppConfig, kind: SourceKind, browser: BrowserOptions) -> anyhow::Result<()> {
    let plan = load_plan(&config.plan_path)
        .with_context(|| format!("loading plan {}", config.plan_path.display()))?;
    let mut adapter = SourceAdapter::from_config(kind, config, &plan, browser)
        .with_context(|| format!("building {kind} source"))?;
    let checkpoint = Checkpoint::new(&config.output_path);
    let options = RunOptions {
        max_reviews: config.max_reviews_per_store,
        unit_delay: Pacer::from_millis(config.unit_delay_ms),
    };

    tracing::info!(
        source = %kind,
        units = plan.work_units.len(),
        max_reviews = options.max_reviews,
        output = %checkpoint.path().display(),
        "starting collection"
    );

    let report = run_collection(&mut adapter, &plan, &checkpoint, &options).await?;

    for unit in &report.units {
        let note = if unit.aborted { " (session lost)" } else { "" };
        println!(
            "{}: {} stores, {} reviews, {} stores without reviews{note}",
            unit.unit, unit.stores, unit.reviews, unit.empty_stores
        );
    }
    let aborted = report.units.iter().filter(|u| u.aborted).count();
    if aborted > 0 {
        tracing::warn!(aborted, "some units were cut short by a lost browser session");
    }
    if !report.skipped_units.is_empty() {
        println!(
            "Resumed: {} unit(s) already collected ({})",
            report.skipped_units.len(),
            report.skipped_units.join(", ")
        );
    }

    if report.records.is_empty() {
        println!("No reviews collected; {} left untouched.", checkpoint.path().display());
        return Ok(());
    }
    print!("{}", RunSummary::from_records(&report.records));
    println!("Saved: {}", checkpoint.path().display());
    Ok(())
}
