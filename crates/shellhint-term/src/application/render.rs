#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use crate::domain::models::Banner;
use crate::domain::models::BannerKind;
use crate::domain::models::MenuAction;
use crate::domain::services::AppState;
use crate::domain::services::Phase;
use crate::domain::services::Review;

pub const PRIMARY: Color = Color::Rgb(0x64, 0x6E, 0xE4);
pub const SECONDARY: Color = Color::Rgb(0xFF, 0x53, 0xD8);
pub const DANGER: Color = Color::Rgb(0xFF, 0x53, 0x70);
pub const SUCCESS: Color = Color::Rgb(0x00, 0xCD, 0xB8);
pub const CONTENT: Color = Color::White;

const INPUT_MAX_WIDTH: u16 = 60;
const RESPONSE_MAX_WIDTH: u16 = 40;
const ACTIONS_MAX_WIDTH: u16 = 20;
// Border plus padding on each side.
const FRAME_SIZE: u16 = 4;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    return Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
}

fn text_width(text: &str) -> u16 {
    return u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX);
}

fn wrapped_height(text: &str, width: u16) -> u16 {
    return text_width(text).max(1).div_ceil(width.max(1));
}

fn panel<'a>() -> Block<'a> {
    return Block::bordered()
        .border_type(BorderType::QuadrantInside)
        .border_style(Style::default().fg(PRIMARY))
        .padding(Padding::uniform(1))
        .style(Style::default().bg(PRIMARY).fg(CONTENT));
}

fn banner_style(banner: &Banner) -> Style {
    let bg = match banner.kind {
        BannerKind::Info => SUCCESS,
        BannerKind::Warning => DANGER,
    };

    return Style::default().bg(bg).fg(CONTENT);
}

fn banner_height(banner: Option<&Banner>, width: u16) -> u16 {
    return match banner {
        Some(banner) => wrapped_height(&banner.text, width.saturating_sub(2)),
        None => 0,
    };
}

fn render_banner(frame: &mut Frame, banner: Option<&Banner>, area: Rect) {
    let Some(banner) = banner else {
        return;
    };

    frame.render_widget(
        Paragraph::new(banner.text.as_str())
            .style(banner_style(banner))
            .block(Block::default().padding(Padding::horizontal(1)))
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Splits a centred box into the banner row(s) and the content below it.
fn place(frame: &Frame, banner: Option<&Banner>, width: u16, content_height: u16) -> (Rect, Rect) {
    let area = frame.area();
    let width = width.min(area.width);
    let banner_height = banner_height(banner, width);
    let outer = centered(area, width, banner_height.saturating_add(content_height));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(content_height),
        ])
        .split(outer);

    return (rows[0], rows[1]);
}

fn render_editing(frame: &mut Frame, state: &AppState) {
    let width = INPUT_MAX_WIDTH.min(frame.area().width);
    let (banner_area, content_area) = place(frame, state.banner.as_ref(), width, 2 + FRAME_SIZE);
    render_banner(frame, state.banner.as_ref(), banner_area);

    let block = panel();
    let inner = block.inner(content_area);
    frame.render_widget(block, content_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(Paragraph::new("Input:"), rows[0]);

    let mut input = state.input.clone();
    input.set_style(Style::default().bg(PRIMARY).fg(CONTENT));
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_style(
        Style::default()
            .bg(PRIMARY)
            .fg(CONTENT)
            .add_modifier(Modifier::DIM),
    );
    frame.render_widget(&input, rows[1]);
}

fn render_awaiting(frame: &mut Frame, state: &AppState) {
    let spinner = state.spinner_frame();
    let banner = state.banner.as_ref();
    let width = banner
        .map(|e| text_width(&e.text).saturating_add(2))
        .unwrap_or(0)
        .max(text_width(spinner));
    let area = centered(frame.area(), width, banner_height(banner, width).saturating_add(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(spinner)
            .style(Style::default().fg(PRIMARY))
            .alignment(Alignment::Center),
        rows[0],
    );
    render_banner(frame, banner, rows[1]);
}

fn render_reviewing(frame: &mut Frame, state: &AppState, review: &Review) {
    let area = frame.area();
    let suggestion = &review.suggestion;
    let parts = [
        "Suggested command:",
        suggestion.command.as_str(),
        "Description:",
        suggestion.description.as_str(),
    ];

    let widest = parts.iter().map(|e| text_width(e)).max().unwrap_or(0);
    let response_width = widest.min(RESPONSE_MAX_WIDTH).min(area.width / 2).max(1);
    let actions_width = (area.width / 3).min(ACTIONS_MAX_WIDTH).max(1);

    // Very long text on a narrow terminal must clamp, not overflow.
    let response_lines = parts
        .iter()
        .map(|e| wrapped_height(e, response_width))
        .fold(0u16, |acc, e| acc.saturating_add(e));
    let actions_lines = u16::try_from(MenuAction::all().len()).unwrap_or(u16::MAX);
    let content_height = response_lines.max(actions_lines).saturating_add(FRAME_SIZE);
    let total_width = response_width + actions_width + 2 * FRAME_SIZE;

    let (banner_area, content_area) = place(frame, state.banner.as_ref(), total_width, content_height);
    render_banner(frame, state.banner.as_ref(), banner_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(response_width + FRAME_SIZE),
            Constraint::Length(actions_width + FRAME_SIZE),
        ])
        .split(content_area);

    let label = Style::default()
        .add_modifier(Modifier::ITALIC)
        .add_modifier(Modifier::DIM);
    let response = vec![
        Line::from(Span::styled(parts[0], label)),
        Line::from(parts[1]),
        Line::from(Span::styled(parts[2], label)),
        Line::from(parts[3]),
    ];
    frame.render_widget(
        Paragraph::new(response)
            .block(panel())
            .wrap(Wrap { trim: false }),
        columns[0],
    );

    let menu: Vec<Line> = MenuAction::all()
        .into_iter()
        .map(|action| {
            let mut style = Style::default();
            if action == review.selected {
                style = style.bg(SECONDARY).fg(CONTENT);
            }
            let label = format!("{:<width$}", action.label(), width = actions_width as usize);
            return Line::from(Span::styled(label, style));
        })
        .collect();
    frame.render_widget(Paragraph::new(menu).block(panel()), columns[1]);
}

/// Draws the current state. Pure with respect to `state`.
pub fn render(frame: &mut Frame, state: &AppState) {
    match &state.phase {
        Phase::Editing => render_editing(frame, state),
        Phase::Awaiting => render_awaiting(frame, state),
        Phase::Reviewing(review) => render_reviewing(frame, state, review),
    }
}
