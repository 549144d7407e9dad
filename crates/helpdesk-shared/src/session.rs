//! Support session controller.
//!
//! Owns the desk state behind a tokio `RwLock`, the responder, and a
//! broadcast channel of [`DeskUpdate`]s that the presentation layer
//! subscribes to. At most one exchange is in flight: `submit` is rejected
//! while the responder is busy. A reply that has started is always applied,
//! even if the user moved to another ticket in the meantime.

use crate::config::DeskConfig;
use crate::desk::{DeskEvent, DeskState, DeskUpdate};
use crate::error::{DeskError, DeskResult};
use crate::ids::IdGenerator;
use crate::message::Message;
use crate::responder::Responder;
use crate::ticket::{Ticket, TicketPriority, TicketStatus};
use crate::UPDATE_CHANNEL_CAPACITY;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

/// Point-in-time copy of everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskSnapshot {
    pub messages: Vec<Message>,
    /// Most recent first
    pub tickets: Vec<Ticket>,
    pub is_typing: bool,
    pub active_ticket_id: Option<String>,
    pub selected_ticket_id: Option<String>,
    pub tickets_visible: bool,
}

/// A submitted message whose reply is still being generated
#[derive(Debug)]
pub struct PendingReply {
    ticket_id: String,
    handle: JoinHandle<DeskResult<Message>>,
    responder_abort: AbortHandle,
}

impl PendingReply {
    /// Ticket the exchange will be recorded on
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    /// Abandon the reply. Nothing is recorded and the typing flag clears.
    pub fn cancel(&self) {
        self.responder_abort.abort();
    }

    /// Wait until the reply has been generated and applied
    pub async fn wait(self) -> DeskResult<Message> {
        self.handle
            .await
            .map_err(|e| DeskError::Internal(format!("reply task failed: {}", e)))?
    }
}

pub struct SupportSession {
    id: Uuid,
    state: Arc<RwLock<DeskState>>,
    responder: Responder,
    updates: broadcast::Sender<DeskUpdate>,
}

impl SupportSession {
    pub fn new(config: &DeskConfig) -> DeskResult<Self> {
        config.validate()?;
        let ids = Arc::new(IdGenerator::new());
        let responder = Responder::new(config.knowledge_base()?, config.delay_range(), ids.clone());
        let state = DeskState::new(ids).with_subject_limit(config.tickets.subject_max_chars);
        Ok(Self::from_parts(state, responder))
    }

    pub fn from_parts(state: DeskState, responder: Responder) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let id = Uuid::new_v4();
        info!(session = %id, keywords = responder.knowledge().len(), "Support session started");
        Self {
            id,
            state: Arc::new(RwLock::new(state)),
            responder,
            updates,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Subscribe to desk updates
    pub fn subscribe(&self) -> broadcast::Receiver<DeskUpdate> {
        self.updates.subscribe()
    }

    /// True while a reply is being generated; input should be disabled
    pub fn is_busy(&self) -> bool {
        self.responder.is_busy()
    }

    /// Submit a user message.
    ///
    /// Blank text is ignored (`Ok(None)`). While a reply is pending the
    /// submission is rejected with [`DeskError::ResponsePending`].
    #[instrument(skip(self, text), fields(session = %self.id))]
    pub async fn submit(&self, text: &str) -> DeskResult<Option<PendingReply>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut state = self.state.write().await;
        // typing stays set until the previous reply has been applied
        if state.is_typing() || self.responder.is_busy() {
            return Err(DeskError::ResponsePending);
        }

        let user = state.new_user_message(text, Utc::now());
        let mut updates = state.apply(DeskEvent::Submitted {
            message: user.clone(),
        });
        let ticket_id = state
            .active_ticket_id()
            .map(str::to_string)
            .ok_or_else(|| DeskError::Internal("no active ticket after submit".to_string()))?;
        updates.extend(state.apply(DeskEvent::TypingChanged(true)));

        // Spawned under the write lock so no second submit slips in first
        let pending = self.responder.spawn(text);
        drop(state);
        self.publish(updates);

        let responder_abort = pending.abort_handle();
        let state = self.state.clone();
        let tx = self.updates.clone();
        let task_ticket = ticket_id.clone();

        let handle = tokio::spawn(
            async move {
                let result = pending.wait().await;
                let mut state = state.write().await;
                let mut updates = state.apply(DeskEvent::TypingChanged(false));
                let result = match result {
                    Ok(reply) => {
                        updates.extend(state.apply(DeskEvent::ReplyReady {
                            ticket_id: task_ticket,
                            user,
                            reply: reply.clone(),
                            at: Utc::now(),
                        }));
                        Ok(reply)
                    }
                    Err(e) => {
                        warn!("Reply not applied: {}", e);
                        Err(e)
                    }
                };
                drop(state);
                for update in updates {
                    let _ = tx.send(update);
                }
                result
            }
            .instrument(info_span!("reply", ticket = %ticket_id)),
        );

        Ok(Some(PendingReply {
            ticket_id,
            handle,
            responder_abort,
        }))
    }

    /// Select a ticket; its history becomes the visible conversation
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn select_ticket(&self, ticket_id: &str) -> Option<Ticket> {
        let mut state = self.state.write().await;
        let ticket = state.select_ticket(ticket_id);
        drop(state);
        if ticket.is_some() {
            self.publish(vec![
                DeskUpdate::Selection(Some(ticket_id.to_string())),
                DeskUpdate::Messages,
            ]);
        }
        ticket
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn close_detail(&self) {
        let updates = self.state.write().await.apply(DeskEvent::DetailClosed);
        self.publish(updates);
    }

    /// Show or hide the ticket list; returns the new visibility
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn toggle_ticket_list(&self) -> bool {
        let mut state = self.state.write().await;
        let visible = state.toggle_ticket_list();
        drop(state);
        self.publish(vec![DeskUpdate::TicketList(visible)]);
        visible
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn set_status(&self, ticket_id: &str, status: TicketStatus) -> DeskResult<()> {
        self.mutate_ticket(
            ticket_id,
            DeskEvent::StatusSet {
                ticket_id: ticket_id.to_string(),
                status,
                at: Utc::now(),
            },
        )
        .await
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn set_priority(&self, ticket_id: &str, priority: TicketPriority) -> DeskResult<()> {
        self.mutate_ticket(
            ticket_id,
            DeskEvent::PrioritySet {
                ticket_id: ticket_id.to_string(),
                priority,
                at: Utc::now(),
            },
        )
        .await
    }

    #[instrument(skip(self, name, email), fields(session = %self.id))]
    pub async fn set_customer(
        &self,
        ticket_id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> DeskResult<()> {
        self.mutate_ticket(
            ticket_id,
            DeskEvent::CustomerSet {
                ticket_id: ticket_id.to_string(),
                name,
                email,
                at: Utc::now(),
            },
        )
        .await
    }

    pub async fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.state.read().await.ticket(ticket_id).cloned()
    }

    /// Ticket detail commands act on: the selected ticket, else the active one
    pub async fn focused_ticket_id(&self) -> Option<String> {
        let state = self.state.read().await;
        state
            .selected_ticket_id()
            .or_else(|| state.active_ticket_id())
            .map(str::to_string)
    }

    pub async fn snapshot(&self) -> DeskSnapshot {
        let state = self.state.read().await;
        DeskSnapshot {
            messages: state.messages().to_vec(),
            tickets: state.tickets().to_vec(),
            is_typing: state.is_typing(),
            active_ticket_id: state.active_ticket_id().map(str::to_string),
            selected_ticket_id: state.selected_ticket_id().map(str::to_string),
            tickets_visible: state.tickets_visible(),
        }
    }

    async fn mutate_ticket(&self, ticket_id: &str, event: DeskEvent) -> DeskResult<()> {
        let updates = self.state.write().await.apply(event);
        if updates.is_empty() {
            return Err(DeskError::TicketNotFound(ticket_id.to_string()));
        }
        info!(ticket = ticket_id, "Updated ticket");
        self.publish(updates);
        Ok(())
    }

    fn publish(&self, updates: Vec<DeskUpdate>) {
        for update in updates {
            // No subscribers is fine
            let _ = self.updates.send(update);
        }
    }
}
