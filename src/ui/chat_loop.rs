//! Terminal lifecycle and the main event loop.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tokio::sync::{mpsc, watch};

use crate::core::preferences::{PreferenceStore, Preferences};
use crate::core::transport::{ChatTransport, TurnOutcome};
use crate::ui::app::ChatApp;
use crate::ui::renderer::ui;

pub async fn run_chat(base_url: String) -> Result<(), Box<dyn Error>> {
    let store = PreferenceStore::open();
    let transport = ChatTransport::new(&base_url);
    let (mut app, mut outcomes) = ChatApp::new(store, transport);
    let mut prefs_rx = app.store.subscribe();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut outcomes, &mut prefs_rx).await;

    // Restore the terminal before surfacing any error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
    outcomes: &mut mpsc::UnboundedReceiver<TurnOutcome>,
    prefs_rx: &mut watch::Receiver<Preferences>,
) -> Result<(), Box<dyn Error>> {
    let mut request_redraw = true;

    loop {
        // Redraw on demand, and continuously while the pulse indicator runs
        if request_redraw || app.is_sending() {
            terminal.draw(|f| ui(f, app))?;
            request_redraw = false;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let (width, height) = viewport(terminal);
                    if handle_key(app, key, width, height) {
                        return Ok(());
                    }
                    request_redraw = true;
                }
                Event::Mouse(mouse) => {
                    let (width, height) = viewport(terminal);
                    match mouse.kind {
                        MouseEventKind::ScrollUp => {
                            app.scroll_up(3, width, height);
                            request_redraw = true;
                        }
                        MouseEventKind::ScrollDown => {
                            app.scroll_down(3, width, height);
                            request_redraw = true;
                        }
                        _ => {}
                    }
                }
                Event::Resize(_, _) => {
                    request_redraw = true;
                }
                _ => {}
            }
        }

        while let Ok(outcome) = outcomes.try_recv() {
            app.handle_outcome(outcome);
            request_redraw = true;
        }

        // Another handle changed the preferences, refresh the title bar
        if prefs_rx.has_changed().unwrap_or(false) {
            prefs_rx.borrow_and_update();
            request_redraw = true;
        }
    }
}

/// Transcript viewport dimensions: full width, height minus the input box
/// and the title row.
fn viewport(terminal: &Terminal<CrosstermBackend<io::Stdout>>) -> (u16, u16) {
    let size = terminal.size().unwrap_or_default();
    (size.width, size.height.saturating_sub(3).saturating_sub(1))
}

/// Apply one key event. Returns true when the app should quit.
fn handle_key(app: &mut ChatApp, key: KeyEvent, width: u16, height: u16) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.settings.is_some() {
        match key.code {
            KeyCode::Up => {
                if let Some(overlay) = app.settings.as_mut() {
                    overlay.select_previous();
                }
            }
            KeyCode::Down => {
                if let Some(overlay) = app.settings.as_mut() {
                    overlay.select_next();
                }
            }
            KeyCode::Left => {
                if let Some(overlay) = app.settings.as_mut() {
                    overlay.lower_temperature();
                }
            }
            KeyCode::Right => {
                if let Some(overlay) = app.settings.as_mut() {
                    overlay.raise_temperature();
                }
            }
            KeyCode::Enter => app.apply_settings(),
            KeyCode::Esc => app.close_settings(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::Up => app.scroll_up(1, width, height),
        KeyCode::Down => app.scroll_down(1, width, height),
        KeyCode::PageUp => app.scroll_up(height.max(1), width, height),
        KeyCode::PageDown => app.scroll_down(height.max(1), width, height),
        KeyCode::Esc => app.scroll_to_bottom(),
        _ => {}
    }

    false
}
