//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, and the
//! hit areas the event loop uses to turn mouse clicks into intents.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::catalog::Catalog;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::controller::PlaybackSession;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("f", "fullscreen");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// Screen regions that accept mouse clicks, as laid out by the last draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitAreas {
    /// Rows of the library list (inside its border).
    pub library: Rect,
    /// Catalog index rendered on the first library row.
    pub library_start: usize,
    /// Number of catalog rows actually rendered.
    pub library_rows: usize,
    pub progress: Rect,
}

impl HitAreas {
    /// Catalog index under a click at (`column`, `row`), if any.
    pub fn library_index(&self, column: u16, row: u16) -> Option<usize> {
        if !contains(self.library, column, row) {
            return None;
        }
        let offset = (row - self.library.y) as usize;
        (offset < self.library_rows).then(|| self.library_start + offset)
    }

    /// Click offset and bar width for a click on the progress bar.
    pub fn progress_offset(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if !contains(self.progress, column, row) {
            return None;
        }
        Some((
            f64::from(column - self.progress.x),
            f64::from(self.progress.width),
        ))
    }
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && column >= r.x
        && column < r.x.saturating_add(r.width)
        && row >= r.y
        && row < r.y.saturating_add(r.height)
}

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_step_percent: u8) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "f", "K", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}%", seek_step_percent))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the progress bar label (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> String {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .map(|f| match (f, total) {
            (TimeField::Elapsed, _) => format_mmss(elapsed),
            (TimeField::Total, Some(t)) => format_mmss(t),
            (TimeField::Remaining, Some(t)) => {
                format!("-{}", format_mmss(t.saturating_sub(elapsed)))
            }
            (_, None) => "--:--".to_string(),
        })
        .collect();
    parts.join(&ui.now_playing_time_separator)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }
    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
}

/// Player panel: now playing, notice, progress bar and transport legend.
/// Returns the progress bar area.
fn draw_player(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    catalog: &Catalog,
    session: &PlaybackSession,
    ui: &UiSettings,
) -> Rect {
    let block = padded_block(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let now_playing = match session.selected.as_ref().and_then(|id| catalog.get(id).ok()) {
        Some(track) => {
            let state = if session.is_playing { "Playing" } else { "Paused" };
            format!("{}: {}", state, track.title)
        }
        None => "Select a song to play".to_string(),
    };
    frame.render_widget(Paragraph::new(now_playing).bold(), rows[0]);

    if let Some(notice) = &app.notice {
        frame.render_widget(
            Paragraph::new(format!("! {notice}")).style(Style::default().fg(Color::Yellow)),
            rows[1],
        );
    }

    let label = if session.selected.is_some() {
        now_playing_time_text(session.position, session.duration, ui)
    } else {
        String::new()
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(session.progress())
        .label(label);
    frame.render_widget(gauge, rows[2]);

    let play_label = if session.is_playing { "Pause" } else { "Play" };
    let transport = format!("[h] Prev   [space] {play_label}   [l] Next   [f] Fullscreen");
    frame.render_widget(Paragraph::new(transport).alignment(Alignment::Center), rows[3]);

    rows[2]
}

/// Library list. Returns (first rendered index, rendered rows, inner area).
fn draw_library(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    catalog: &Catalog,
    session: &PlaybackSession,
) -> (usize, usize, Rect) {
    let block = Block::default().borders(Borders::ALL).title(" library ");
    let inner = block.inner(area);

    // Center the cursor when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = catalog.len();
    let list_height = inner.height as usize;
    let cursor = app.cursor.min(total.saturating_sub(1));
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let start = cursor.saturating_sub(half).min(total - list_height);
        (start, start + list_height)
    };

    let items: Vec<ListItem> = catalog
        .iter()
        .skip(start)
        .take(end - start)
        .map(|track| {
            if session.is_selected(&track.id) {
                ListItem::new(format!("♪ {}", track.display))
                    .style(Style::default().fg(Color::Cyan))
            } else {
                ListItem::new(format!("  {}", track.display))
            }
        })
        .collect();

    if !app.has_tracks() {
        let empty = Paragraph::new("No audio files found")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return (0, 0, inner);
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(cursor - start));
    }
    frame.render_stateful_widget(list, area, &mut state);

    (start, end - start, inner)
}

fn draw_metadata(frame: &mut Frame, area: Rect, app: &App, catalog: &Catalog) {
    // Keep the popup inside `area` so it doesn't cover the footer.
    let popup_area = centered_rect_sized(72, 10, area);
    frame.render_widget(Clear, popup_area);

    let meta = match catalog.get_index(app.cursor) {
        Some(track) => format!(
            "Id: {}\nTitle: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nSource: {}\nArtwork: {}",
            track.id,
            track.title,
            track.artist.as_deref().unwrap_or("-"),
            track.album.as_deref().unwrap_or("-"),
            format_duration_mmss_ceil(track.duration),
            track.source.display(),
            track.artwork.as_deref().unwrap_or("-"),
        ),
        None => "No track selected".to_string(),
    };
    let paragraph = Paragraph::new(meta)
        .block(padded_block(" metadata (K closes) "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Render the entire UI into the provided `frame` and return the clickable areas.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    catalog: &Catalog,
    session: &PlaybackSession,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> HitAreas {
    let mut hits = HitAreas::default();

    let (player_area, body_area, footer_area) = if app.fullscreen {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(4)])
            .split(frame.area());
        (chunks[0], None, chunks[1])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(1),
                Constraint::Length(4),
            ])
            .split(frame.area());

        let mut header_text = ui_settings.header_text.clone();
        if let Some(origin) = &app.library_origin {
            header_text.push_str(&format!(" • {} tracks from {}", catalog.len(), origin));
        }
        let header = Paragraph::new(header_text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
        frame.render_widget(header, chunks[0]);
        (chunks[1], Some(chunks[2]), chunks[3])
    };

    hits.progress = draw_player(frame, player_area, app, catalog, session, ui_settings);

    if let Some(body) = body_area {
        let (start, rows, inner) = draw_library(frame, body, app, catalog, session);
        hits.library = inner;
        hits.library_start = start;
        hits.library_rows = rows;
    }

    if app.metadata_window {
        draw_metadata(frame, body_area.unwrap_or(player_area), app, catalog);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_step_percent))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, footer_area);

    hits
}
