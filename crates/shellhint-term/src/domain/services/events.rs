#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

/// How often the busy indicator advances.
pub const TICK_RATE: Duration = Duration::from_millis(100);

pub fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => {
            return Some(Event::KeyboardPaste(text));
        }
        CrosstermEvent::Key(keyevent) => {
            if keyevent.kind == KeyEventKind::Release {
                return None;
            }

            let key = match keyevent.code {
                crossterm::event::KeyCode::Char(c) => Key::Char(c),
                crossterm::event::KeyCode::Enter => Key::Enter,
                crossterm::event::KeyCode::Left => Key::Left,
                crossterm::event::KeyCode::Right => Key::Right,
                crossterm::event::KeyCode::Up => Key::Up,
                crossterm::event::KeyCode::Down => Key::Down,
                crossterm::event::KeyCode::Home => Key::Home,
                crossterm::event::KeyCode::End => Key::End,
                crossterm::event::KeyCode::Delete => Key::Delete,
                crossterm::event::KeyCode::Backspace => Key::Backspace,
                crossterm::event::KeyCode::Esc => Key::Esc,
                _ => return None,
            };

            let input = Input {
                key,
                ctrl: keyevent
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::CONTROL),
                alt: keyevent
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::ALT),
                shift: keyevent
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::SHIFT),
            };
            match input {
                Input { key: Key::Up, .. } => {
                    return Some(Event::KeyboardUp);
                }
                Input { key: Key::Down, .. } => {
                    return Some(Event::KeyboardDown);
                }
                Input {
                    key: Key::Char('c'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLC);
                }
                Input {
                    key: Key::Enter, ..
                } => {
                    return Some(Event::KeyboardEnter);
                }
                input => {
                    return Some(Event::KeyboardCharInput(input));
                }
            }
        }
        _ => return None,
    }
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
    ticker: time::Interval,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        let mut ticker = time::interval(TICK_RATE);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        return EventsService {
            crossterm_events: EventStream::new(),
            events,
            ticker,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => Some(event),
                    None => bail!("background services stopped"),
                },
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => handle_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "failed to read terminal event");
                        None
                    }
                    None => None
                },
                _ = self.ticker.tick() => Some(Event::UITick)
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
