//! Asynchronous responder with a simulated "typing" latency.
//!
//! Wraps the pure [`KnowledgeBase::respond`] in a tokio task that waits a
//! random delay first. The busy flag is raised before the task is spawned
//! and lowered by a drop guard, so it is cleared whether the task completes
//! or is cancelled.

use crate::error::{DeskError, DeskResult};
use crate::ids::IdGenerator;
use crate::knowledge::KnowledgeBase;
use crate::message::Message;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

/// Default lower bound of the simulated latency (inclusive)
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;

/// Default upper bound of the simulated latency (exclusive)
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

/// Latency range in milliseconds, `[min_ms, max_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_DELAY_MS,
            max_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> DeskResult<Self> {
        let range = Self { min_ms, max_ms };
        range.validate()?;
        Ok(range)
    }

    /// No simulated latency at all
    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.min_ms > self.max_ms {
            return Err(DeskError::Config(format!(
                "delay range min ({} ms) is greater than max ({} ms)",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    /// Pick a delay. `min == max` yields exactly `min`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let ms = if self.max_ms > self.min_ms {
            rng.gen_range(self.min_ms..self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(ms)
    }
}

/// Lowers the busy flag when dropped
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to an in-flight response generation
#[derive(Debug)]
pub struct PendingResponse {
    handle: JoinHandle<Message>,
}

impl PendingResponse {
    /// Abandon the generation. The busy flag is cleared once the task is dropped.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Wait for the assistant message
    pub async fn wait(self) -> DeskResult<Message> {
        self.handle.await.map_err(|e| {
            if e.is_cancelled() {
                DeskError::Cancelled
            } else {
                DeskError::Internal(format!("responder task failed: {}", e))
            }
        })
    }
}

/// Scripted responder
#[derive(Debug, Clone)]
pub struct Responder {
    knowledge: Arc<KnowledgeBase>,
    delay: DelayRange,
    ids: Arc<IdGenerator>,
    busy: Arc<AtomicBool>,
}

impl Responder {
    pub fn new(knowledge: KnowledgeBase, delay: DelayRange, ids: Arc<IdGenerator>) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
            delay,
            ids,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pure keyword lookup, no delay and no side effects
    pub fn respond(&self, input: &str) -> &str {
        self.knowledge.respond(input)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// True while a generation is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start generating a reply. Must be called inside a tokio runtime.
    ///
    /// Overlapping calls are not guarded here; callers serialize submissions.
    pub fn spawn(&self, input: impl Into<String>) -> PendingResponse {
        let input = input.into();
        self.busy.store(true, Ordering::SeqCst);
        let guard = BusyGuard(self.busy.clone());

        let delay = self.delay.pick(&mut rand::thread_rng());
        let knowledge = self.knowledge.clone();
        let ids = self.ids.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let matched = knowledge
                .find_match(&input)
                .map(|e| e.keyword.as_str())
                .unwrap_or("default");
            debug!(keyword = matched, delay_ms = delay.as_millis() as u64, "Generated response");

            let content = knowledge.respond(&input).to_string();
            Message::assistant(ids.next_message_id(), content, Utc::now())
        });

        PendingResponse { handle }
    }

    /// Generate a reply and wait for it
    pub async fn get_response(&self, input: impl Into<String>) -> DeskResult<Message> {
        self.spawn(input).wait().await
    }
}
