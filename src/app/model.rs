//! View model for the terminal UI: library cursor, fullscreen and popups.

use crate::controller::Notice;

/// The main view model.
#[derive(Debug, Default)]
pub struct App {
    /// Highlighted row in the library list.
    pub cursor: usize,
    /// Number of rows in the library list.
    pub len: usize,
    /// Player panel takes the whole terminal.
    pub fullscreen: bool,
    pub metadata_window: bool,
    /// Cursor jumps to the playing track when playback moves.
    pub follow_playback: bool,
    /// Most recent non-fatal notice from the controller.
    pub notice: Option<Notice>,
    /// Where the catalog came from, shown in the status line.
    pub library_origin: Option<String>,
}

impl App {
    /// Create a new `App` over a library of `len` rows.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            follow_playback: true,
            ..Self::default()
        }
    }

    pub fn has_tracks(&self) -> bool {
        self.len > 0
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Record the library origin in the app state.
    pub fn set_library_origin(&mut self, origin: String) {
        self.library_origin = Some(origin);
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Move the cursor to `idx` if it is a valid row.
    pub fn set_cursor(&mut self, idx: usize) {
        if idx < self.len {
            self.cursor = idx;
        }
    }

    /// Move the cursor to the next row, wrapping to the first.
    pub fn cursor_next(&mut self) {
        if self.len > 0 {
            self.cursor = (self.cursor + 1) % self.len;
        }
    }

    /// Move the cursor to the previous row, wrapping to the last.
    pub fn cursor_prev(&mut self) {
        if self.len > 0 {
            self.cursor = match self.cursor {
                0 => self.len - 1,
                c => c.min(self.len) - 1,
            };
        }
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.len.saturating_sub(1);
    }

    /// Keep the cursor on the playing row while following playback.
    pub fn follow(&mut self, playing_index: Option<usize>) {
        if self.follow_playback {
            if let Some(idx) = playing_index {
                self.set_cursor(idx);
            }
        }
    }
}
