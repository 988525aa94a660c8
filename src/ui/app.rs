use std::time::Instant;

use tokio::sync::mpsc;

use crate::commands::{process_input, CommandResult};
use crate::core::conversation::ConversationController;
use crate::core::preferences::PreferenceStore;
use crate::core::transport::{ChatTransport, CompletionService, TurnOutcome};
use crate::ui::scroll::ScrollCalculator;
use crate::ui::settings::SettingsOverlay;

/// Everything the event loop and renderer share: the conversation, the
/// preference store, the transport, and transient UI state.
pub struct ChatApp {
    pub conversation: ConversationController,
    pub store: PreferenceStore,
    pub transport: ChatTransport,
    service: CompletionService,
    pub input: String,
    /// Cursor position in the input line, counted in characters.
    pub input_cursor: usize,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub status: Option<String>,
    pub settings: Option<SettingsOverlay>,
    pub pulse_start: Instant,
}

impl ChatApp {
    pub fn new(
        store: PreferenceStore,
        transport: ChatTransport,
    ) -> (Self, mpsc::UnboundedReceiver<TurnOutcome>) {
        let (service, outcomes) = CompletionService::new();
        let app = Self {
            conversation: ConversationController::new(),
            store,
            transport,
            service,
            input: String::new(),
            input_cursor: 0,
            scroll_offset: 0,
            auto_scroll: true,
            status: None,
            settings: None,
            pulse_start: Instant::now(),
        };
        (app, outcomes)
    }

    pub fn is_sending(&self) -> bool {
        self.conversation.is_sending()
    }

    /// Route the current input line: slash commands act locally, anything
    /// else goes out as a chat message. Blank input is left alone.
    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }

        match process_input(&self.store, &self.input) {
            CommandResult::Continue(status) => {
                self.status = status;
                self.clear_input();
            }
            CommandResult::OpenSettings => {
                self.open_settings();
                self.clear_input();
            }
            CommandResult::ProcessAsMessage(text) => {
                self.send_message(&text);
            }
        }
    }

    /// Start a turn for `text`. While a turn is already in flight this does
    /// nothing, and the typed input stays put so nothing is lost.
    pub fn send_message(&mut self, text: &str) {
        let preferences = self.store.get();
        if let Some(request) = self.conversation.begin_turn(text) {
            self.clear_input();
            self.status = None;
            self.auto_scroll = true;
            self.pulse_start = Instant::now();
            self.service
                .spawn_complete(self.transport.clone(), request, preferences);
        }
    }

    pub fn handle_outcome(&mut self, outcome: TurnOutcome) {
        self.conversation.finish_turn(outcome.turn_id, outcome.result);
        self.auto_scroll = true;
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let idx = self.byte_index();
        if idx < self.input.len() {
            self.input.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Byte offset of the character the cursor sits on.
    fn byte_index(&self) -> usize {
        if self.input_cursor == 0 {
            return 0;
        }
        match self.input.char_indices().nth(self.input_cursor) {
            Some((idx, _)) => idx,
            None => self.input.len(),
        }
    }

    pub fn scroll_up(&mut self, amount: u16, terminal_width: u16, available_height: u16) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll_offset(terminal_width, available_height);
            self.auto_scroll = false;
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16, terminal_width: u16, available_height: u16) {
        let max = self.max_scroll_offset(terminal_width, available_height);
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(max);
        // Back at the bottom, resume following new messages
        if self.scroll_offset >= max {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn max_scroll_offset(&self, terminal_width: u16, available_height: u16) -> u16 {
        ScrollCalculator::calculate_max_scroll_offset(
            self.conversation.messages(),
            terminal_width,
            available_height,
        )
    }

    pub fn open_settings(&mut self) {
        self.settings = Some(SettingsOverlay::new(self.store.get()));
    }

    pub fn apply_settings(&mut self) {
        if let Some(overlay) = self.settings.take() {
            self.status = Some(format!(
                "Settings applied: {} @ {}",
                overlay.draft.model, overlay.draft.temperature
            ));
            self.store.set(overlay.draft);
        }
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
    }
}
