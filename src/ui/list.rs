use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::git::reconcile::FileChange;
use crate::git::Repository;

const INDEX_COLOR: Color = Color::Green;
const WORKTREE_COLOR: Color = Color::Red;

pub fn render<R: Repository>(f: &mut Frame, app: &App<R>, area: Rect) {
    if app.visible.is_empty() {
        let hint = if app.files.is_empty() {
            "Nothing to stage: working tree clean."
        } else {
            "No paths match the filter."
        };
        let para = Paragraph::new(format!("   {}", hint)).style(Style::default().fg(Color::DarkGray));
        f.render_widget(para, area);
        return;
    }

    let items: Vec<ListItem> = app
        .visible_files()
        .enumerate()
        .map(|(display_idx, file)| ListItem::new(row(file, display_idx == app.cursor)))
        .collect();

    let list = List::new(items);
    let mut list_state = ListState::default();
    list_state.select(app.selected());

    f.render_stateful_widget(list, area, &mut list_state);
}

/// One row: arrows for staged/unstaged presence, the path, then the stats.
fn row(file: &FileChange, is_selected: bool) -> Line<'static> {
    let mut icons: Vec<&str> = Vec::new();
    let mut color = INDEX_COLOR;
    if !file.index.is_clean() {
        icons.push(" -›");
    }
    if !file.worktree.is_clean() {
        color = WORKTREE_COLOR;
        icons.push("‹- ");
    }

    let mut label = file.path.clone();
    if !icons.is_empty() {
        label = format!("{} {}", icons.join(" "), label);
    }

    // Focused row is bold, colour unchanged
    let mut style = Style::default().fg(color);
    let marker = if is_selected {
        style = style.add_modifier(Modifier::BOLD);
        "*"
    } else {
        " "
    };

    let mut spans = vec![
        Span::raw(format!("   {}", marker)),
        Span::styled(label, style),
    ];
    spans.extend(stat_spans(file));
    Line::from(spans)
}

fn stat_spans(file: &FileChange) -> Vec<Span<'static>> {
    if file.binary {
        return vec![Span::styled(
            " (bin)",
            Style::default().add_modifier(Modifier::DIM),
        )];
    }

    let mut spans = Vec::new();
    if file.added > 0 {
        spans.push(Span::styled(
            format!(" +{}", file.added),
            Style::default().fg(INDEX_COLOR),
        ));
    }
    if file.deleted > 0 {
        spans.push(Span::styled(
            format!(" -{}", file.deleted),
            Style::default().fg(WORKTREE_COLOR),
        ));
    }
    spans
}
