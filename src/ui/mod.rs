pub mod card_list;
pub mod widgets;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HELP: &str =
    "j/k move  enter open  l like  r retweet  c reply  d delete  esc back  q quit";

fn split(screen: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(screen);
    (chunks[0], chunks[1], chunks[2])
}

/// Where the card list is drawn for a given screen size.
pub fn body_area(screen: Rect) -> Rect {
    split(screen).1
}

pub fn draw(frame: &mut Frame, app: &App) {
    let (header, body, footer) = split(frame.area());

    render_header(frame, header, app);
    app.current().render(frame, body);
    render_footer(frame, footer, app);

    if let Some(card) = app.current().modal_card() {
        card.render_dialogs(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            " tweetcard ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.route().path(), Style::default().fg(Color::White)),
        Span::styled(
            format!("  @{}", app.store().state().user.username),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.store().state().status {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            format!(" {}", HELP),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
