//! Game orchestrator
//!
//! Owns the activation lifecycle, held keys, the per-frame loop, camera
//! follow and card triggers. The ball itself is owned by [`BallPhysics`];
//! this module only feeds it input and surfaces and reads back where it went.
//!
//! Lifecycle is two states: inactive and active. `activate` enters the
//! active state, `deactivate` or Escape leaves it.

pub mod host;
pub mod input;
pub mod scroll;

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;

pub use host::{FrameHandle, HostEffects, ScrollBehavior, Scheduler, Timer, Viewport};
pub use input::{Direction, KeyAction, KeyState};
pub use scroll::{auto_scroll_delta, center_scroll_target};

use crate::catalog::{SurfaceCatalog, SurfaceHandle};
use crate::settings::Settings;
use crate::sim::{BallPhysics, Surface};

/// Observable changes, drained by the host to update its UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Activated,
    Deactivated,
    /// Card the ball currently overlaps
    TouchingChanged(Option<String>),
    /// Card flagged for emphasis
    HighlightChanged(Option<String>),
    /// A new contact with a card fired the trigger
    CardHit(String),
}

type CardHitCallback = Box<dyn FnMut(&str)>;

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// The page ball game.
///
/// Hosts should call [`Game::drain_events`] after driving it. Events nobody
/// drains are kept up to [`MAX_PENDING_EVENTS`], oldest dropped first.
pub struct Game {
    settings: Settings,
    physics: BallPhysics,
    active: bool,
    keys: KeyState,
    touching: Option<String>,
    highlighted: Option<String>,
    /// Suppresses re-triggering while the ball stays on the same card
    last_triggered: Option<String>,
    frame: Option<FrameHandle>,
    /// Bumped on every activate and deactivate; deferred timers from an
    /// older generation are ignored
    generation: u64,
    /// Bumped on every card trigger
    trigger_seq: u64,
    on_card_hit: Option<CardHitCallback>,
    events: VecDeque<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        Self {
            physics: BallPhysics::new(settings.physics),
            settings,
            active: false,
            keys: KeyState::default(),
            touching: None,
            highlighted: None,
            last_triggered: None,
            frame: None,
            generation: 0,
            trigger_seq: 0,
            on_card_hit: None,
            events: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace tuning; takes effect on the next frame
    pub fn set_settings(&mut self, settings: Settings) {
        self.physics.set_params(settings.physics);
        self.settings = settings;
    }

    /// Start (or restart) the game with the ball at page coordinates `(x, y)`
    pub fn activate<H: HostEffects + Scheduler>(&mut self, x: f32, y: f32, host: &mut H) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }

        self.active = true;
        self.generation += 1;

        self.physics.init(x, y);
        self.physics
            .set_world_bounds(0.0, host.viewport().document_width);

        host.set_game_mode(true);
        host.set_scroll_override(true);
        host.set_keyboard_capture(true);

        self.keys.reset();
        self.last_triggered = None;
        self.set_touching(None);
        self.set_highlighted(None);

        self.frame = Some(host.request_frame());
        self.push_event(GameEvent::Activated);
        log::info!("Ball game activated at ({:.0}, {:.0})", x, y);
    }

    /// Stop the game. Safe to call when already inactive.
    pub fn deactivate<H: HostEffects + Scheduler>(&mut self, host: &mut H) {
        if !self.active {
            return;
        }

        self.active = false;
        self.generation += 1;

        host.set_game_mode(false);
        host.set_scroll_override(false);
        host.set_keyboard_capture(false);

        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }

        self.keys.reset();
        self.last_triggered = None;
        self.set_highlighted(None);
        self.set_touching(None);

        self.push_event(GameEvent::Deactivated);
        log::info!("Ball game deactivated");
    }

    /// Key press. Returns true if the page's default handling (scrolling)
    /// should be suppressed.
    pub fn key_down<H: HostEffects + Scheduler>(&mut self, key: &str, host: &mut H) -> bool {
        if !self.active {
            return false;
        }

        match KeyAction::from_key(key) {
            Some(KeyAction::Move(dir)) => {
                self.keys.set(dir, true);
                true
            }
            Some(KeyAction::Exit) => {
                self.deactivate(host);
                false
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if !self.active {
            return;
        }

        if let Some(KeyAction::Move(dir)) = KeyAction::from_key(key) {
            self.keys.set(dir, false);
        }
    }

    /// One display frame: measure, simulate, follow, trigger, reschedule
    pub fn frame<S, H>(&mut self, catalog: &SurfaceCatalog<S>, host: &mut H)
    where
        S: SurfaceHandle,
        H: HostEffects + Scheduler,
    {
        if !self.active {
            return;
        }
        self.frame = None;

        let surfaces = catalog.rects(host.viewport().scroll);
        self.physics.set_platforms(surfaces.clone());

        let (dx, dy) = self.keys.axis();
        self.physics.set_input(dx, dy);

        self.physics.tick();

        self.follow_ball(host);
        self.check_card_contact(&surfaces, host);

        self.frame = Some(host.request_frame());
    }

    /// Run a deferred effect that has come due
    pub fn fire_timer<H: HostEffects>(&mut self, timer: Timer, host: &mut H) {
        match timer {
            Timer::RestoreScrollOverride {
                generation,
                trigger,
            } => {
                if generation == self.generation && trigger == self.trigger_seq {
                    host.set_scroll_override(true);
                } else {
                    log::debug!("Skipping stale scroll override restore");
                }
            }
            Timer::ClearHighlight { generation, card } => {
                if generation == self.generation && self.highlighted.as_deref() == Some(card.as_str()) {
                    self.set_highlighted(None);
                } else {
                    log::debug!("Skipping stale highlight clear for {}", card);
                }
            }
        }
    }

    /// Register the card hit callback, replacing any previous one
    pub fn set_on_card_hit(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_card_hit = Some(Box::new(callback));
    }

    pub fn clear_on_card_hit(&mut self) {
        self.on_card_hit = None;
    }

    pub fn position(&self) -> Vec2 {
        self.physics.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.physics.velocity()
    }

    pub fn physics(&self) -> &BallPhysics {
        &self.physics
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn touching_card(&self) -> Option<&str> {
        self.touching.as_deref()
    }

    pub fn highlighted_card(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn keys(&self) -> KeyState {
        self.keys
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn follow_ball<H: HostEffects>(&self, host: &mut H) {
        let viewport = host.viewport();
        let y = viewport.to_viewport_y(self.physics.position().y);
        let dy = auto_scroll_delta(y, viewport.height, &self.settings.scroll);
        if dy != 0.0 {
            host.scroll_by(dy);
        }
    }

    fn check_card_contact<H>(&mut self, surfaces: &[Surface], host: &mut H)
    where
        H: HostEffects + Scheduler,
    {
        let pos = self.physics.position();
        let radius = self.physics.radius();

        // First overlapping card in catalog order wins
        let current = surfaces
            .iter()
            .filter(|s| s.is_card())
            .find(|s| s.rect.overlaps_circle(pos, radius));

        let current_id = current.map(|s| s.id.as_str());
        if current_id != self.touching.as_deref() {
            self.set_touching(current_id.map(str::to_owned));

            if let Some(card) = current {
                if self.last_triggered.as_deref() != Some(card.id.as_str()) {
                    self.trigger_card(card, host);
                }
            }
        }

        if current.is_none() {
            self.last_triggered = None;
        }
    }

    fn trigger_card<H: HostEffects + Scheduler>(&mut self, card: &Surface, host: &mut H) {
        self.trigger_seq += 1;
        self.last_triggered = Some(card.id.clone());
        self.set_highlighted(Some(card.id.clone()));
        log::debug!("Card hit: {}", card.id);

        let target = center_scroll_target(card.rect.center_y(), host.viewport().height);
        let timing = self.settings.timing;
        if self.settings.reduced_motion {
            host.scroll_to(target, ScrollBehavior::Instant);
        } else {
            // Let the page ease toward the card, then pin scrolling back to instant
            host.set_scroll_override(false);
            host.scroll_to(target, ScrollBehavior::Smooth);
            host.schedule(
                millis(timing.smooth_scroll_restore_ms),
                Timer::RestoreScrollOverride {
                    generation: self.generation,
                    trigger: self.trigger_seq,
                },
            );
        }

        host.schedule(
            millis(timing.highlight_clear_ms),
            Timer::ClearHighlight {
                generation: self.generation,
                card: card.id.clone(),
            },
        );

        self.push_event(GameEvent::CardHit(card.id.clone()));
        if let Some(callback) = self.on_card_hit.as_mut() {
            callback(card.id.as_str());
        }
    }

    fn set_touching(&mut self, card: Option<String>) {
        if self.touching != card {
            self.touching = card.clone();
            self.push_event(GameEvent::TouchingChanged(card));
        }
    }

    fn set_highlighted(&mut self, card: Option<String>) {
        if self.highlighted != card {
            self.highlighted = card.clone();
            self.push_event(GameEvent::HighlightChanged(card));
        }
    }
}

#[inline]
fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}
