pub mod list;
pub mod statusbar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::git::Repository;

pub const TITLE: &str = "gitadd: interactive add/reset";

pub fn render<R: Repository>(f: &mut Frame, app: &App<R>) {
    let size = f.area();

    let error_height = if app.error_message.is_some() { 1 } else { 0 };
    let footer_height = if app.show_legend { 2 } else { 1 };

    // title / list / error overlay / footer
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(error_height),
            Constraint::Length(footer_height),
        ])
        .split(size);

    render_title(f, app, vert[0]);
    list::render(f, app, vert[1]);
    if let Some(ref err) = app.error_message {
        let widget = Paragraph::new(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(widget, vert[2]);
    }
    statusbar::render(f, app, vert[3]);
}

fn render_title<R: Repository>(f: &mut Frame, app: &App<R>, area: ratatui::layout::Rect) {
    let mut spans = vec![Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !app.filter.is_empty() {
        spans.push(Span::styled(
            format!("  filter: \"{}\" ({}/{})", app.filter, app.visible.len(), app.files.len()),
            Style::default().fg(Color::Cyan),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
