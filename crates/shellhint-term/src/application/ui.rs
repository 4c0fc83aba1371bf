use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::render::render;
use crate::domain::models::Action;
use crate::domain::models::CommandReport;
use crate::domain::models::Event;
use crate::domain::services::AppState;
use crate::domain::services::EventsService;

/// Draws, waits for the next event, applies it. Returns the commands run
/// during the session once the user quits.
pub async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<Vec<CommandReport>> {
    let mut app_state = AppState::new();
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| render(frame, &app_state))?;

        let event = events.next().await?;
        app_state.handle_event(event, &tx)?;

        if app_state.should_quit {
            break;
        }
    }

    return Ok(app_state.finished);
}

/// Takes over the terminal for the duration of the session and hands it back
/// afterwards, whether or not the loop failed.
pub async fn start_ui(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<Vec<CommandReport>> {
    let mut stdout = io::stdout();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let result = start_loop(&mut terminal, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return result;
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        cursor::Show
    );
}
