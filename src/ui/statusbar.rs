use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppMode};
use crate::git::Repository;

const KEYS: &str =
    "↑/↓ move  •  ← unstage  •  → stage  •  a stage all  •  u unstage all  •  / filter  •  r refresh  •  q quit";
const LEGEND: &str = "[Index|Work] legend: M=modified, A=added, D=deleted, R=renamed, C=copied, U=updated, ?=untracked, -=clean  •  counts show total +adds/-dels";

pub fn render<R: Repository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let mut lines = vec![first_line(app)];
    if app.show_legend {
        lines.push(Line::from(Span::styled(
            LEGEND,
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn first_line<R: Repository>(app: &App<R>) -> Line<'static> {
    if app.mode == AppMode::Filtering {
        return Line::from(vec![
            Span::styled(
                " FILTER ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" /{}▏", app.filter)),
            Span::styled(
                "  Enter apply  Esc clear",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
    }

    if let Some(ref msg) = app.status_message {
        return Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(Span::styled(
        KEYS,
        Style::default().add_modifier(Modifier::DIM),
    ))
}
