//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The feed layout is a three-row split: an error banner (only while the
//!   last fetch failed), the scrollable row list, and a one-line status bar.
//! * The login route replaces the whole frame.
//! * Each displayable [`RowContent`] variant has its own `*_item` function.
//!   [`row_item`] returns `None` for placeholder rows, which is what keeps
//!   them off screen.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::dispatch::FetchPosts;
use crate::navigation::Route;
use crate::rows::{Row, RowContent};
use crate::screen::FeedScreen;
use crate::source::Preview;

/// Draw the complete UI for one frame.
pub fn draw<D: FetchPosts>(app: &mut App<D>, frame: &mut Frame) {
    let area = frame.area();
    match app.navigator.current() {
        Route::Login => draw_login(app, frame, area),
        Route::Feed => draw_feed(app, frame),
    }
}

fn draw_feed<D: FetchPosts>(app: &mut App<D>, frame: &mut Frame) {
    let banner_height = if app.state.posts_error.is_some() { 3 } else { 0 };
    let [banner_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(banner_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if let Some(error) = &app.state.posts_error {
        draw_error_banner(error, frame, banner_area);
    }
    draw_feed_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_error_banner(error: &str, frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(error.to_string())
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Error "));
    frame.render_widget(banner, area);
}

/// Render the scrollable row list.
fn draw_feed_list<D: FetchPosts>(app: &mut App<D>, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app.screen.rows().iter().filter_map(row_item).collect();

    let mut title = format!(" r/{} ", app.screen.topic());
    if FeedScreen::is_refreshing(&app.state) {
        title.push_str("⟳ refreshing ");
    }

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.screen.list_state);
}

fn row_item(row: &Row) -> Option<ListItem<'static>> {
    let item = match &row.content {
        RowContent::Comment {
            body,
            subreddit,
            author,
        } => comment_item(body, subreddit, author),
        RowContent::Link {
            title,
            subreddit,
            preview,
        } => link_item(title, subreddit, preview.as_ref()),
        RowContent::Placeholder { .. } => return None,
    };
    Some(item)
}

fn comment_item(body: &str, subreddit: &str, author: &str) -> ListItem<'static> {
    let first_line = body.lines().next().unwrap_or_default().to_string();
    ListItem::new(vec![
        Line::from(Span::styled(first_line, Style::default().fg(Color::White))),
        Line::from(vec![
            Span::styled(format!("  u/{author}"), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(" in r/{subreddit}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ])
}

fn link_item(title: &str, subreddit: &str, preview: Option<&Preview>) -> ListItem<'static> {
    let mut meta = vec![Span::styled(
        format!("  r/{subreddit}"),
        Style::default().fg(Color::Cyan),
    )];
    if let Some((width, height)) = preview.and_then(Preview::dimensions) {
        meta.push(Span::styled(
            format!("  [preview {width}x{height}]"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
    ])
}

/// Render the bottom status bar.
fn draw_status_bar<D: FetchPosts>(app: &App<D>, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} posts", app.screen.visible_len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  r: refresh  L: log out  ↑/↓: scroll  Home/End: jump"),
    ]));
    frame.render_widget(status, area);
}

fn draw_login<D: FetchPosts>(app: &App<D>, frame: &mut Frame, area: Rect) {
    let [_, form_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .areas(area);

    let masked = "•".repeat(app.login.char_count());
    let form = Paragraph::new(vec![
        Line::from("Paste a Reddit OAuth token:"),
        Line::from(Span::styled(
            format!("> {masked}"),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "Enter: log in  Esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().title(" Log in ").borders(Borders::ALL));

    frame.render_widget(form, form_area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
