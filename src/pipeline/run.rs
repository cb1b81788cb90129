// src/pipeline/run.rs

//! Notification cycle pipeline.
//!
//! One invocation performs exactly one fetch→detect→notify→persist pass;
//! scheduling repeats is the caller's (cron's) job.

use crate::error::Result;
use crate::models::{Config, PromotionRecord, Snapshot};
use crate::pipeline::detect::{dedupe_by_id, detect, expired, ChangeEvent};
use crate::services::{ChangeKind, Notifier, PromotionSource};
use crate::storage::SnapshotStore;

/// Summary of one notification cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Newly listed promotions
    pub new_count: usize,
    /// Tracked promotions whose offer changed
    pub updated_count: usize,
    /// Tracked promotions with no announcement needed
    pub unchanged_count: usize,
    /// Records that left the feed this cycle
    pub removed_count: usize,
    /// Announcements that could not be delivered
    pub delivery_failures: usize,
}

/// Run one full cycle: fetch the feed, classify it against the stored
/// snapshot, announce what changed, persist the merged state.
///
/// A fetch failure aborts before any announcement and leaves the snapshot
/// untouched. A delivery failure is logged and the record still merges, so
/// the next run does not repeat the announcement. A persist failure
/// surfaces after delivery; the next scheduled run re-announces.
pub async fn run_cycle(
    config: &Config,
    source: &dyn PromotionSource,
    notifier: &dyn Notifier,
    store: &dyn SnapshotStore,
) -> Result<CycleOutcome> {
    let previous = store.load().await?;
    log::info!("Loaded snapshot with {} tracked promotions", previous.len());

    let current = source.fetch_free_games().await?;

    let mut outcome = CycleOutcome::default();

    for event in detect(&current, &previous) {
        match event {
            ChangeEvent::New(record) => {
                outcome.new_count += 1;
                deliver(notifier, &record, ChangeKind::New, &mut outcome).await;
            }
            ChangeEvent::Updated {
                record,
                previous_end_time,
            } => {
                outcome.updated_count += 1;
                log::info!(
                    "{}: offer changed, end time {} -> {}",
                    record.title,
                    previous_end_time,
                    record.end_time
                );
                deliver(notifier, &record, ChangeKind::UpdatedExpiration, &mut outcome).await;
            }
            ChangeEvent::Unchanged => outcome.unchanged_count += 1,
        }
    }

    let gone = expired(&current, &previous);
    outcome.removed_count = gone.len();
    if config.announce_removals {
        for record in &gone {
            log::info!("{} is no longer free. Removing from tracking.", record.title);
            deliver(notifier, record, ChangeKind::Removed, &mut outcome).await;
        }
    } else if !gone.is_empty() {
        log::debug!("{} promotions left the feed; dropped from tracking", gone.len());
    }

    let next = Snapshot::from_records(dedupe_by_id(current));
    store.save(&next).await?;

    log::info!(
        "Cycle complete: {} new, {} updated, {} unchanged, {} removed, {} delivery failures",
        outcome.new_count,
        outcome.updated_count,
        outcome.unchanged_count,
        outcome.removed_count,
        outcome.delivery_failures
    );

    Ok(outcome)
}

/// Deliver one announcement; a failure is logged and counted, never fatal.
async fn deliver(
    notifier: &dyn Notifier,
    record: &PromotionRecord,
    kind: ChangeKind,
    outcome: &mut CycleOutcome,
) {
    if let Err(error) = notifier.announce(record, kind).await {
        outcome.delivery_failures += 1;
        log::warn!(
            "Failed to send {} ({}): {}",
            record.title,
            kind.status_label(),
            error
        );
    }
}
