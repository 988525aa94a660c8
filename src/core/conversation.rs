use std::collections::VecDeque;

use tracing::debug;

use crate::api::ChatMessage;
use crate::core::constants::{FALLBACK_REPLY, GREETING, SYSTEM_PREAMBLE};
use crate::core::message::{Message, MessageId, Role};
use crate::core::transport::{NormalizedResponse, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

/// Everything the transport needs for one outbound completion request.
pub struct TurnRequest {
    pub turn_id: u64,
    pub messages: Vec<ChatMessage>,
}

/// Owns the session transcript and the turn state machine.
///
/// History is append-only and insertion-ordered: entries are never edited,
/// reordered, or dropped, and nothing here is persisted. At most one turn is
/// in flight at a time; `Sending` is the only guard.
pub struct ConversationController {
    messages: VecDeque<Message>,
    state: TurnState,
    next_message_id: u64,
    current_turn_id: u64,
}

impl ConversationController {
    pub fn new() -> Self {
        let mut controller = ConversationController {
            messages: VecDeque::new(),
            state: TurnState::Idle,
            next_message_id: 1,
            current_turn_id: 0,
        };
        controller.append(Role::Assistant, GREETING);
        controller
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == TurnState::Sending
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    /// Starts a user turn.
    ///
    /// Returns `None` without touching any state when the text is blank or
    /// another turn is still in flight. Otherwise the text is appended to
    /// history verbatim, the state moves to `Sending`, and the outbound
    /// payload is the system preamble followed by the entire history in
    /// order. The preamble itself never enters history.
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnRequest> {
        if text.trim().is_empty() || self.state == TurnState::Sending {
            return None;
        }

        self.append(Role::User, text);
        self.state = TurnState::Sending;
        self.current_turn_id += 1;

        let mut api_messages = Vec::with_capacity(self.messages.len() + 1);
        api_messages.push(ChatMessage {
            role: Role::System.as_str().to_string(),
            content: SYSTEM_PREAMBLE.to_string(),
        });
        for message in &self.messages {
            api_messages.push(ChatMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }

        Some(TurnRequest {
            turn_id: self.current_turn_id,
            messages: api_messages,
        })
    }

    /// Settles the in-flight turn with exactly one assistant entry.
    ///
    /// Failures become the fixed fallback reply; the error itself is logged
    /// and never re-raised. Outcomes that arrive while idle or under a stale
    /// turn id are dropped.
    pub fn finish_turn(
        &mut self,
        turn_id: u64,
        result: Result<NormalizedResponse, TransportError>,
    ) {
        if self.state != TurnState::Sending || turn_id != self.current_turn_id {
            debug!(turn_id, "dropping outcome for a turn that is not in flight");
            return;
        }

        match result {
            Ok(response) => self.append(Role::Assistant, response.content),
            Err(err) => {
                debug!(error = %err, "completion failed, substituting the fallback reply");
                self.append(Role::Assistant, FALLBACK_REPLY);
            }
        }
        self.state = TurnState::Idle;
    }

    fn append(&mut self, role: Role, content: impl Into<String>) {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id += 1;
        self.messages.push_back(Message::new(id, role, content));
    }
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}
