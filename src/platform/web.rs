//! Browser host (wasm32)
//!
//! Binds the game to the real page: element geometry via
//! `getBoundingClientRect`, scrolling via `window.scrollBy/scrollTo`, the
//! smooth-scroll override as an injected `<style>`, frames via
//! `requestAnimationFrame` and deferred work via `setTimeout`.
//!
//! JavaScript drives everything through [`BallGame`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, KeyboardEvent, ScrollToOptions, Window};

use crate::catalog::{SurfaceCatalog, SurfaceHandle};
use crate::game::{FrameHandle, Game, GameEvent, HostEffects, ScrollBehavior, Scheduler, Timer, Viewport};
use crate::settings::Settings;
use crate::sim::{Rect, SurfaceKind};

const SCROLL_OVERRIDE_CSS: &str = "html { scroll-behavior: auto !important; }";
const GAME_MODE_CLASS: &str = "game-mode";

impl SurfaceHandle for Element {
    fn client_rect(&self) -> Option<Rect> {
        if !self.is_connected() {
            return None;
        }
        let r = self.get_bounding_client_rect();
        Some(Rect::from_origin_size(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }
}

type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

/// Everything one page's game needs, shared between JS callbacks
struct Runtime {
    game: Game,
    host: WebHost,
    catalog: SurfaceCatalog<Element>,
    on_card_hit: Option<js_sys::Function>,
    on_change: Option<js_sys::Function>,
}

/// Run `f` against the runtime, then notify JS of anything that changed.
///
/// JS callbacks run after the borrow is released so they may call back
/// into [`BallGame`].
fn enter<R>(
    runtime: &Rc<RefCell<Runtime>>,
    f: impl FnOnce(&mut Game, &mut WebHost, &SurfaceCatalog<Element>) -> R,
) -> R {
    let (result, events, on_card_hit, on_change) = {
        let mut guard = runtime.borrow_mut();
        let Runtime {
            game,
            host,
            catalog,
            on_card_hit,
            on_change,
        } = &mut *guard;
        let result = f(game, host, catalog);
        (
            result,
            game.drain_events(),
            on_card_hit.clone(),
            on_change.clone(),
        )
    };

    if events.is_empty() {
        return result;
    }

    for event in &events {
        if let (GameEvent::CardHit(id), Some(callback)) = (event, &on_card_hit) {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(id));
        }
    }
    if let Some(callback) = &on_change {
        let _ = callback.call0(&JsValue::NULL);
    }

    result
}

fn enter_weak<R>(
    runtime: &Weak<RefCell<Runtime>>,
    f: impl FnOnce(&mut Game, &mut WebHost, &SurfaceCatalog<Element>) -> R,
) -> Option<R> {
    runtime.upgrade().map(|rt| enter(&rt, f))
}

/// DOM implementation of the game's host traits
struct WebHost {
    window: Window,
    document: Document,
    runtime: Weak<RefCell<Runtime>>,
    style_el: Option<Element>,
    // Kept alive for the page's lifetime; only attached while capturing
    key_down: KeyListener,
    key_up: KeyListener,
    keys_attached: bool,
}

impl WebHost {
    fn new(window: Window, document: Document, runtime: Weak<RefCell<Runtime>>) -> Self {
        let key_down = {
            let runtime = runtime.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let suppress = enter_weak(&runtime, |game, host, _| game.key_down(&key, host));
                if suppress == Some(true) {
                    event.prevent_default();
                }
            })
        };
        let key_up = {
            let runtime = runtime.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                enter_weak(&runtime, |game, _, _| game.key_up(&key));
            })
        };

        Self {
            window,
            document,
            runtime,
            style_el: None,
            key_down,
            key_up,
            keys_attached: false,
        }
    }
}

impl HostEffects for WebHost {
    fn viewport(&self) -> Viewport {
        let scroll_x = self.window.scroll_x().unwrap_or(0.0) as f32;
        let scroll_y = self.window.scroll_y().unwrap_or(0.0) as f32;
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0) as f32;
        let document_width = self
            .document
            .document_element()
            .map(|el| el.scroll_width() as f32)
            .unwrap_or(f32::INFINITY);

        Viewport {
            scroll: glam::Vec2::new(scroll_x, scroll_y),
            height,
            document_width,
        }
    }

    fn scroll_by(&mut self, dy: f32) {
        self.window.scroll_by_with_x_and_y(0.0, dy as f64);
    }

    fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top as f64);
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn set_scroll_override(&mut self, enabled: bool) {
        if !enabled {
            if let Some(el) = self.style_el.take() {
                el.remove();
            }
            return;
        }
        if self.style_el.is_some() {
            return;
        }

        let Some(head) = self.document.head() else {
            return;
        };
        if let Ok(el) = self.document.create_element("style") {
            el.set_text_content(Some(SCROLL_OVERRIDE_CSS));
            if head.append_child(&el).is_ok() {
                self.style_el = Some(el);
            }
        }
    }

    fn set_game_mode(&mut self, enabled: bool) {
        if let Some(body) = self.document.body() {
            let classes = body.class_list();
            let _ = if enabled {
                classes.add_1(GAME_MODE_CLASS)
            } else {
                classes.remove_1(GAME_MODE_CLASS)
            };
        }
    }

    fn set_keyboard_capture(&mut self, enabled: bool) {
        if enabled == self.keys_attached {
            return;
        }
        let down = self.key_down.as_ref().unchecked_ref();
        let up = self.key_up.as_ref().unchecked_ref();
        if enabled {
            let _ = self.document.add_event_listener_with_callback("keydown", down);
            let _ = self.document.add_event_listener_with_callback("keyup", up);
        } else {
            let _ = self.document.remove_event_listener_with_callback("keydown", down);
            let _ = self.document.remove_event_listener_with_callback("keyup", up);
        }
        self.keys_attached = enabled;
    }
}

impl Scheduler for WebHost {
    fn request_frame(&mut self) -> FrameHandle {
        let runtime = self.runtime.clone();
        let closure = Closure::once(move |_time: f64| {
            enter_weak(&runtime, |game, host, catalog| game.frame(catalog, host));
        });
        let id = self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .unwrap_or(0);
        closure.forget();
        FrameHandle(id as u64)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0 as i32);
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        let runtime = self.runtime.clone();
        let closure = Closure::once(move || {
            enter_weak(&runtime, |game, host, _| game.fire_timer(timer, host));
        });
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay.as_millis().min(i32::MAX as u128) as i32,
            );
        closure.forget();
    }
}

/// The ball game, as seen from JavaScript
#[wasm_bindgen]
pub struct BallGame {
    runtime: Rc<RefCell<Runtime>>,
}

#[wasm_bindgen]
impl BallGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BallGame, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = Settings::load();
        let runtime = Rc::new_cyclic(|weak| {
            RefCell::new(Runtime {
                game: Game::new(settings),
                host: WebHost::new(window, document, weak.clone()),
                catalog: SurfaceCatalog::new(),
                on_card_hit: None,
                on_change: None,
            })
        });

        Ok(BallGame { runtime })
    }

    /// Add or replace a collidable element. `kind` is "solid" or "card".
    pub fn register(&self, id: &str, element: Option<Element>, kind: &str) {
        self.runtime
            .borrow_mut()
            .catalog
            .register(id, element, SurfaceKind::from_tag(kind));
    }

    pub fn unregister(&self, id: &str) {
        self.runtime.borrow_mut().catalog.unregister(id);
    }

    pub fn clear(&self) {
        self.runtime.borrow_mut().catalog.clear();
    }

    /// Start at page coordinates `(x, y)`
    pub fn activate(&self, x: f32, y: f32) {
        enter(&self.runtime, |game, host, _| game.activate(x, y, host));
    }

    pub fn deactivate(&self) {
        enter(&self.runtime, |game, host, _| game.deactivate(host));
    }

    /// `[x, y]` in page coordinates
    pub fn position(&self) -> Vec<f32> {
        self.runtime.borrow().game.position().to_array().to_vec()
    }

    /// `[vx, vy]` in pixels per frame
    pub fn velocity(&self) -> Vec<f32> {
        self.runtime.borrow().game.velocity().to_array().to_vec()
    }

    #[wasm_bindgen(getter = isActive)]
    pub fn is_active(&self) -> bool {
        self.runtime.borrow().game.is_active()
    }

    #[wasm_bindgen(getter = highlightedCard)]
    pub fn highlighted_card(&self) -> Option<String> {
        self.runtime
            .borrow()
            .game
            .highlighted_card()
            .map(str::to_owned)
    }

    #[wasm_bindgen(getter = touchingCard)]
    pub fn touching_card(&self) -> Option<String> {
        self.runtime
            .borrow()
            .game
            .touching_card()
            .map(str::to_owned)
    }

    /// `callback(cardId)` on every new card contact; `null` removes it
    #[wasm_bindgen(js_name = setOnCardHit)]
    pub fn set_on_card_hit(&self, callback: Option<js_sys::Function>) {
        self.runtime.borrow_mut().on_card_hit = callback;
    }

    /// `callback()` whenever `isActive`, `touchingCard` or `highlightedCard` may have changed
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        self.runtime.borrow_mut().on_change = callback;
    }

    /// Current tuning as JSON
    pub fn settings(&self) -> Result<String, JsValue> {
        self.runtime
            .borrow()
            .game
            .settings()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace tuning from JSON (missing fields take defaults) and persist it.
    /// Applies from the next frame.
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.runtime.borrow_mut().game.set_settings(settings);
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Page Ball loaded");
}
