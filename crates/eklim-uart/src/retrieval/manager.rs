//! Fault retriever: count query, paced descending fetch loop, exclusivity

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eklim_core::{FaultError, FaultRecord, FaultResult};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{RetrievalOutcome, RetrievalProgress, RetrievalSummary, SessionState};
use crate::channel::CommandChannel;
use crate::config::RetrievalConfig;
use crate::protocol::{fetch_fault_record, query_total_fault_count};

/// Reads the device fault log over a [`CommandChannel`]
///
/// Only one operation that talks to the device (bulk session, single fetch,
/// count query) runs at a time per retriever; the others fail fast with
/// [`FaultError::SessionBusy`].
pub struct FaultRetriever {
    channel: Arc<dyn CommandChannel>,
    config: RetrievalConfig,
    busy: AtomicBool,
    state: RwLock<SessionState>,
    /// Records of the last session, appended as each slot is fetched
    records: RwLock<Vec<FaultRecord>>,
    progress_tx: watch::Sender<RetrievalProgress>,
    cancel_token: Mutex<Option<CancellationToken>>,
}

/// Holds the channel for one operation; releases it on drop
struct BusyGuard<'a> {
    retriever: &'a FaultRetriever,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let retriever = self.retriever;
        // A session future dropped mid-flight leaves an active state behind
        if retriever.state().is_active() {
            retriever.publish(RetrievalProgress {
                state: SessionState::Cancelled,
                ..retriever.progress()
            });
        }
        retriever.cancel_token.lock().take();
        retriever.busy.store(false, Ordering::SeqCst);
    }
}

/// Working set of one bulk session, dropped when it ends
struct SessionContext {
    total: u32,
    success_count: u32,
    fail_count: u32,
    failed_indices: Vec<u32>,
}

impl SessionContext {
    fn new(total: u32) -> Self {
        Self {
            total,
            success_count: 0,
            fail_count: 0,
            failed_indices: Vec::new(),
        }
    }

    fn progress(&self, state: SessionState) -> RetrievalProgress {
        RetrievalProgress {
            state,
            attempted: self.success_count + self.fail_count,
            total: self.total,
            success_count: self.success_count,
            fail_count: self.fail_count,
        }
    }

    fn into_summary(self) -> RetrievalSummary {
        RetrievalSummary {
            success_count: self.success_count,
            fail_count: self.fail_count,
            total: self.total,
            failed_indices: self.failed_indices,
        }
    }
}

impl FaultRetriever {
    pub fn new(channel: Arc<dyn CommandChannel>, config: RetrievalConfig) -> Self {
        let (progress_tx, _) = watch::channel(RetrievalProgress::default());
        Self {
            channel,
            config,
            busy: AtomicBool::new(false),
            state: RwLock::new(SessionState::Idle),
            records: RwLock::new(Vec::new()),
            progress_tx,
            cancel_token: Mutex::new(None),
        }
    }

    /// Get the retrieval configuration
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Latest published progress snapshot
    pub fn progress(&self) -> RetrievalProgress {
        self.progress_tx.borrow().clone()
    }

    /// Receive a snapshot after every state change and every attempt
    pub fn subscribe_progress(&self) -> watch::Receiver<RetrievalProgress> {
        self.progress_tx.subscribe()
    }

    /// Records of the last session, highest device index first
    pub fn records(&self) -> Vec<FaultRecord> {
        self.records.read().clone()
    }

    /// Whether a device operation is in progress
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run a bulk retrieval session
    ///
    /// Replaces the records of any previous session. Per-record failures are
    /// counted in the summary; only [`FaultError::SessionBusy`] is returned
    /// as an error.
    pub async fn start(&self) -> FaultResult<RetrievalOutcome> {
        let _guard = self.acquire()?;
        let session_id = Uuid::new_v4();
        let span = info_span!("fault_retrieval", %session_id);
        Ok(self.run_session().instrument(span).await)
    }

    /// Request cancellation of the running session
    ///
    /// Takes effect at the next pacing checkpoint. Returns `false` if no
    /// session is running.
    pub fn cancel(&self) -> bool {
        match self.cancel_token.lock().as_ref() {
            Some(token) => {
                info!("Fault retrieval cancellation requested");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop the published records and return to `Idle`
    pub fn clear(&self) -> FaultResult<()> {
        let _guard = self.acquire()?;
        self.records.write().clear();
        self.publish(RetrievalProgress::default());
        debug!("Fault records cleared");
        Ok(())
    }

    /// Fetch and decode a single device slot
    pub async fn fetch_record(&self, index: u32) -> FaultResult<FaultRecord> {
        let max = self.config.max_record_index;
        if index == 0 || index > max {
            return Err(FaultError::InvalidIndex { index, max });
        }
        let _guard = self.acquire()?;
        fetch_fault_record(self.channel.as_ref(), index, &self.config).await
    }

    /// Ask the device how many records it holds (0 when unavailable)
    pub async fn query_count(&self) -> FaultResult<u32> {
        let _guard = self.acquire()?;
        Ok(query_total_fault_count(self.channel.as_ref(), &self.config).await)
    }

    fn acquire(&self) -> FaultResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| FaultError::SessionBusy)?;
        Ok(BusyGuard { retriever: self })
    }

    fn publish(&self, progress: RetrievalProgress) {
        *self.state.write() = progress.state;
        self.progress_tx.send_replace(progress);
    }

    async fn run_session(&self) -> RetrievalOutcome {
        let token = CancellationToken::new();
        *self.cancel_token.lock() = Some(token.clone());
        self.records.write().clear();

        self.publish(RetrievalProgress {
            state: SessionState::CountingTotal,
            ..Default::default()
        });

        let reported = query_total_fault_count(self.channel.as_ref(), &self.config).await;
        let total = if reported > self.config.max_record_index {
            warn!(
                reported,
                max = self.config.max_record_index,
                "Device reports more records than addressable, clamping"
            );
            self.config.max_record_index
        } else {
            reported
        };

        if total == 0 {
            info!("No fault records to retrieve");
            self.publish(RetrievalProgress {
                state: SessionState::NoRecords,
                ..Default::default()
            });
            return RetrievalOutcome::NoRecords;
        }

        info!(total, "Starting fault retrieval");
        let mut session = SessionContext::new(total);
        self.publish(session.progress(SessionState::Fetching));

        let pacing = self.config.pacing_interval();
        let mut cancelled = false;

        for index in (1..=total).rev() {
            // Pacing doubles as the cancellation checkpoint
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(pacing) => {}
            }

            match fetch_fault_record(self.channel.as_ref(), index, &self.config).await {
                Ok(record) => {
                    debug!(index, pin = record.pin_label(), "Fault record fetched");
                    self.records.write().push(record);
                    session.success_count += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "Fault record failed");
                    session.fail_count += 1;
                    session.failed_indices.push(index);
                }
            }

            self.publish(session.progress(SessionState::Fetching));
        }

        let state = if cancelled {
            SessionState::Cancelled
        } else {
            SessionState::Completed
        };
        self.publish(session.progress(state));
        let summary = session.into_summary();

        info!(
            success = summary.success_count,
            failed = summary.fail_count,
            total = summary.total,
            cancelled,
            "Fault retrieval finished"
        );

        if cancelled {
            RetrievalOutcome::Cancelled(summary)
        } else {
            RetrievalOutcome::Completed(summary)
        }
    }
}
