//! Scroll and navigation state of the page around the toasts.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// One display frame; scroll-driven highlighting runs at most once per frame.
pub const FRAME: Duration = Duration::from_millis(16);

/// Delay after load before the first active-link highlight.
pub const INITIAL_HIGHLIGHT_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderPosition {
    Shown,
    Hidden,
}

impl HeaderPosition {
    #[must_use]
    pub const fn transform(self) -> &'static str {
        match self {
            Self::Shown => "translateY(0)",
            Self::Hidden => "translateY(-100%)",
        }
    }
}

/// Hides the header while scrolling down past a threshold, shows it otherwise.
#[derive(Clone, Debug)]
pub struct HeaderTracker {
    hide_after: f64,
    last_top: f64,
}

impl HeaderTracker {
    #[must_use]
    pub const fn new(hide_after: f64) -> Self {
        Self {
            hide_after,
            last_top: 0.0,
        }
    }

    pub fn on_scroll(&mut self, top: f64) -> HeaderPosition {
        let position = if top > self.last_top && top > self.hide_after {
            HeaderPosition::Hidden
        } else {
            HeaderPosition::Shown
        };
        self.last_top = top.max(0.0);
        position
    }
}

impl Default for HeaderTracker {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Section under `scroll_y + offset`; the last match wins.
#[must_use]
pub fn active_section(sections: &[Section], scroll_y: f64, offset: f64) -> Option<&str> {
    let marker = scroll_y + offset;
    sections
        .iter()
        .rev()
        .find(|s| marker >= s.top && marker < s.top + s.height)
        .map(|s| s.id.as_str())
}

/// The highlighted navigation link.
///
/// Only a hit moves the highlight: while the reading line sits in a gap between
/// sections the previous link stays active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveNav {
    current: Option<String>,
}

impl ActiveNav {
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Marks `id` as the active link. Returns `true` if the highlight moved.
    pub fn select(&mut self, id: &str) -> bool {
        if self.current.as_deref() == Some(id) {
            return false;
        }
        debug!(from = ?self.current, to = id, "active nav updated");
        self.current = Some(id.to_owned());
        true
    }

    /// Highlights the section under the reading line, if any, and returns the active link.
    pub fn track(&mut self, sections: &[Section], scroll_y: f64, offset: f64) -> Option<&str> {
        if let Some(id) = active_section(sections, scroll_y, offset) {
            self.select(id);
        }
        self.current()
    }
}

/// Coalesces bursts of events into at most one update per frame.
///
/// An event inside the current frame is remembered and released by
/// [`flush`](Self::flush) once the frame is over.
#[derive(Clone, Debug)]
pub struct FrameGate {
    frame: Duration,
    next_frame: Option<Instant>,
    pending: bool,
}

impl FrameGate {
    #[must_use]
    pub const fn new(frame: Duration) -> Self {
        Self {
            frame,
            next_frame: None,
            pending: false,
        }
    }

    /// Records an event at `now`. Returns `true` if the update may run right away.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.next_frame.is_some_and(|at| now < at) {
            self.pending = true;
            return false;
        }
        self.open_frame(now);
        true
    }

    /// Returns `true` once for a deferred update whose frame has passed.
    pub fn flush(&mut self, now: Instant) -> bool {
        if !self.pending || self.next_frame.is_some_and(|at| now < at) {
            return false;
        }
        self.open_frame(now);
        true
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    fn open_frame(&mut self, now: Instant) {
        self.pending = false;
        self.next_frame = now.checked_add(self.frame);
    }
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new(FRAME)
    }
}

/// Document offset to scroll to so a section lands below the fixed header.
#[must_use]
pub fn scroll_target(section_viewport_top: f64, page_offset: f64, header_height: f64) -> f64 {
    section_viewport_top + page_offset - header_height
}

/// Mobile navigation menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuClick {
    Toggle,
    Menu,
    Elsewhere,
}

impl NavMenu {
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        debug!(open = self.open, "mobile menu toggled");
        self.open
    }

    /// Following a link closes the menu.
    pub fn navigate(&mut self) {
        self.open = false;
    }

    /// Page-wide click handling: anything outside the toggle and the menu closes it.
    pub fn on_click(&mut self, click: MenuClick) {
        match click {
            MenuClick::Toggle => {
                self.toggle();
            }
            MenuClick::Menu => {}
            MenuClick::Elsewhere => self.open = false,
        }
    }
}
