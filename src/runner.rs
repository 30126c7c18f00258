use crate::components::{CalendarSource, Notifier, SnapshotStore, TimeWindow};
use crate::config::Config;
use crate::digest::{diff, normalize, sort_chronologically, DiffSummary, Event, ReportBuilder};
use crate::error::BotResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// How a run ended when nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Fetched events match the snapshot; nothing sent, nothing saved
    NoChanges,
    /// Digest sent and snapshot replaced
    Delivered(DiffSummary),
}

/// One fetch → diff → notify → persist pass
pub struct DigestRunner {
    config: Arc<Config>,
    source: Arc<dyn CalendarSource>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn SnapshotStore>,
}

impl DigestRunner {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn CalendarSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            store,
        }
    }

    /// Run once against the current time
    pub async fn run(&self) -> BotResult<RunOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run once with the window anchored at `now`.
    ///
    /// The snapshot is only written after the message went out, so a failed
    /// delivery reports the same changes again on the next run.
    pub async fn run_at(&self, now: DateTime<Utc>) -> BotResult<RunOutcome> {
        let window = TimeWindow::lookahead(now, self.config.lookahead_days);

        let raw_events = self.source.fetch_raw_events(window).await.map_err(|e| {
            error!("Could not fetch calendar events, stopping: {}", e);
            e
        })?;
        let mut current: Vec<Event> = raw_events.iter().map(normalize).collect();

        let previous = self.store.load_snapshot().await.map_err(|e| {
            error!("Could not load previous snapshot: {}", e);
            e
        })?;

        let changes = diff(&previous, &current);
        if changes.is_empty() {
            info!("No changes since last run, nothing to send");
            return Ok(RunOutcome::NoChanges);
        }

        sort_chronologically(&mut current);
        let report = ReportBuilder::new(&self.config.locale).build(
            &current,
            &changes.added,
            &changes.changed,
            &changes.removed,
        );

        self.notifier.send_message(&report).await.map_err(|e| {
            error!("Could not deliver digest, snapshot left untouched: {}", e);
            e
        })?;

        self.store.save_snapshot(&current).await.map_err(|e| {
            error!("Digest delivered but snapshot could not be saved: {}", e);
            e
        })?;

        let summary = changes.summary();
        info!(
            "Sent digest ({} added / {} changed / {} removed)",
            summary.added, summary.changed, summary.removed
        );
        Ok(RunOutcome::Delivered(summary))
    }
}
