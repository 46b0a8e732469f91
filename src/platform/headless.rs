//! In-memory page for tests and the native demo
//!
//! Models just enough of a browser: a scrollable document with clamped
//! scrolling, elements whose client rect moves as the page scrolls, a
//! virtual millisecond clock with a timeout queue, and one-shot animation
//! frame requests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;

use crate::catalog::{SurfaceCatalog, SurfaceHandle};
use crate::game::{FrameHandle, Game, HostEffects, ScrollBehavior, Scheduler, Timer, Viewport};
use crate::sim::Rect;

/// One display frame at ~60 Hz
pub const FRAME: Duration = Duration::from_millis(16);

/// A laid-out element on the headless page
#[derive(Debug, Clone)]
pub struct HeadlessElement {
    page_rect: Rc<Cell<Option<Rect>>>,
    scroll: Rc<Cell<Vec2>>,
}

impl HeadlessElement {
    /// Reflow to a new page-space rect
    pub fn move_to(&self, rect: Rect) {
        self.page_rect.set(Some(rect));
    }

    /// Remove from the document; the handle stays registered but reports nothing
    pub fn detach(&self) {
        self.page_rect.set(None);
    }
}

impl SurfaceHandle for HeadlessElement {
    fn client_rect(&self) -> Option<Rect> {
        let rect = self.page_rect.get()?;
        Some(rect.translate(-self.scroll.get()))
    }
}

#[derive(Debug)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    timer: Timer,
}

#[derive(Debug)]
pub struct HeadlessPage {
    scroll: Rc<Cell<Vec2>>,
    pub viewport_height: f32,
    pub document_width: f32,
    pub document_height: f32,
    now: Duration,
    timers: Vec<PendingTimer>,
    next_timer_seq: u64,
    next_frame_id: u64,
    pending_frame: Option<FrameHandle>,
    pub scroll_override: bool,
    pub game_mode: bool,
    pub keyboard_captured: bool,
    /// Every `scroll_to` call, in order
    pub scroll_log: Vec<(f32, ScrollBehavior)>,
}

impl HeadlessPage {
    pub fn new(viewport_height: f32, document_width: f32, document_height: f32) -> Self {
        Self {
            scroll: Rc::new(Cell::new(Vec2::ZERO)),
            viewport_height,
            document_width,
            document_height,
            now: Duration::ZERO,
            timers: Vec::new(),
            next_timer_seq: 0,
            next_frame_id: 0,
            pending_frame: None,
            scroll_override: false,
            game_mode: false,
            keyboard_captured: false,
            scroll_log: Vec::new(),
        }
    }

    /// Create an element at `rect` in page coordinates
    pub fn element(&self, rect: Rect) -> HeadlessElement {
        HeadlessElement {
            page_rect: Rc::new(Cell::new(Some(rect))),
            scroll: self.scroll.clone(),
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll.get().y
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame_pending(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn max_scroll_y(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    fn set_scroll_y(&mut self, y: f32) {
        let mut scroll = self.scroll.get();
        scroll.y = y.clamp(0.0, self.max_scroll_y());
        self.scroll.set(scroll);
    }

    /// Move the clock forward and return every timer that came due, oldest first
    pub fn advance(&mut self, dt: Duration) -> Vec<Timer> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;

        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.timer).collect()
    }

    /// Move the clock forward and deliver due timers to `game`, without
    /// running a frame
    pub fn advance_and_fire(&mut self, game: &mut Game, dt: Duration) {
        for timer in self.advance(dt) {
            game.fire_timer(timer, self);
        }
    }

    /// One turn of the event loop: timers first, then the animation frame
    /// if one was requested. Returns whether a frame ran.
    pub fn step<S: SurfaceHandle>(
        &mut self,
        game: &mut Game,
        catalog: &SurfaceCatalog<S>,
        dt: Duration,
    ) -> bool {
        self.advance_and_fire(game, dt);
        if self.pending_frame.take().is_some() {
            game.frame(catalog, self);
            true
        } else {
            false
        }
    }
}

impl HostEffects for HeadlessPage {
    fn viewport(&self) -> Viewport {
        Viewport {
            scroll: self.scroll.get(),
            height: self.viewport_height,
            document_width: self.document_width,
        }
    }

    fn scroll_by(&mut self, dy: f32) {
        self.set_scroll_y(self.scroll_y() + dy);
    }

    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        // No easing here: smooth scrolls land at once
        self.scroll_log.push((top, behavior));
        self.set_scroll_y(top);
    }

    fn set_scroll_override(&mut self, enabled: bool) {
        self.scroll_override = enabled;
    }

    fn set_game_mode(&mut self, enabled: bool) {
        self.game_mode = enabled;
    }

    fn set_keyboard_capture(&mut self, enabled: bool) {
        self.keyboard_captured = enabled;
    }
}

impl Scheduler for HeadlessPage {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame_id += 1;
        let handle = FrameHandle(self.next_frame_id);
        self.pending_frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.next_timer_seq += 1;
        self.timers.push(PendingTimer {
            due: self.now + delay,
            seq: self.next_timer_seq,
            timer,
        });
    }
}
