//! What the game needs from the page it runs on
//!
//! The orchestrator never touches the DOM. Scrolling, style overrides,
//! listener wiring, animation frames and timeouts all go through these two
//! traits so the whole game can run against a headless page in tests.

use std::time::Duration;

use glam::Vec2;

/// Current window geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Page scroll offset (scrollX, scrollY)
    pub scroll: Vec2,
    /// Viewport height (innerHeight)
    pub height: f32,
    /// Full scrollable document width
    pub document_width: f32,
}

impl Viewport {
    /// Convert a page-space y into viewport space
    #[inline]
    pub fn to_viewport_y(&self, page_y: f32) -> f32 {
        page_y - self.scroll.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Page-level side effects
pub trait HostEffects {
    fn viewport(&self) -> Viewport;

    /// Scroll vertically by `dy` pixels
    fn scroll_by(&mut self, dy: f32);

    /// Scroll so the page's vertical offset is `top`
    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior);

    /// While enabled, the page's smooth-scroll easing is forced off so
    /// per-frame scrolling lands immediately
    fn set_scroll_override(&mut self, enabled: bool);

    /// Page-wide "game mode" marker (e.g. a body class)
    fn set_game_mode(&mut self, enabled: bool);

    /// Start or stop forwarding key events to the game
    fn set_keyboard_capture(&mut self, enabled: bool);
}

/// Handle to one requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Deferred work, handed back to [`crate::Game::fire_timer`] when due.
///
/// Each timer carries the activation generation it was scheduled in and does
/// nothing if the game has been deactivated or restarted since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Turn the smooth-scroll override back on after centering a card
    RestoreScrollOverride { generation: u64, trigger: u64 },
    /// Drop the highlight from `card` if it is still the highlighted one
    ClearHighlight { generation: u64, card: String },
}

/// Cooperative single-threaded scheduling
pub trait Scheduler {
    /// Ask for [`crate::Game::frame`] to be called on the next display frame
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Hand `timer` back after `delay`
    fn schedule(&mut self, delay: Duration, timer: Timer);
}
