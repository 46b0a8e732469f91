//! Page Ball entry point
//!
//! On the web the library's `BallGame` binding is the entry point. Natively
//! this runs a scripted session against the headless page and logs what the
//! ball bumps into.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Page Ball (native) starting...");
    log::info!("Native mode plays a scripted demo - serve the wasm build for the real page");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's `start`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use page_ball::platform::headless::{FRAME, HeadlessPage};
    use page_ball::sim::{Rect, SurfaceKind};
    use page_ball::{Game, GameEvent, Settings, SurfaceCatalog};

    /// Keys held for a number of frames
    const SCRIPT: &[(&str, usize)] = &[("s", 90), ("d", 40), ("s", 120), ("a", 60), ("w", 150)];

    pub fn run() {
        let mut page = HeadlessPage::new(800.0, 1280.0, 4000.0);
        let mut catalog = SurfaceCatalog::new();

        catalog.register(
            "header",
            Some(page.element(Rect::new(0.0, 0.0, 1280.0, 60.0))),
            SurfaceKind::Solid,
        );
        for i in 0..4 {
            let top = 300.0 + i as f32 * 420.0;
            catalog.register(
                format!("post-{}", i + 1),
                Some(page.element(Rect::from_origin_size(340.0, top, 600.0, 320.0))),
                SurfaceKind::Card,
            );
        }
        // A card that is registered but not rendered yet
        catalog.register(
            "post-draft",
            Some(page.element(Rect::default())),
            SurfaceKind::Card,
        );

        let mut game = Game::new(Settings::load());
        let hits = Rc::new(RefCell::new(Vec::new()));
        {
            let hits = hits.clone();
            game.set_on_card_hit(move |id| hits.borrow_mut().push(id.to_string()));
        }

        game.activate(640.0, 120.0, &mut page);

        for &(key, frames) in SCRIPT {
            game.key_down(key, &mut page);
            for _ in 0..frames {
                page.step(&mut game, &catalog, FRAME);
                for event in game.drain_events() {
                    match event {
                        GameEvent::CardHit(id) => log::info!("hit {}", id),
                        GameEvent::HighlightChanged(card) => log::debug!("highlight {:?}", card),
                        _ => {}
                    }
                }
            }
            game.key_up(key);
        }

        let pos = game.position();
        log::info!(
            "Ball at ({:.1}, {:.1}), page scrolled to {:.0}",
            pos.x,
            pos.y,
            page.scroll_y()
        );

        game.key_down("Escape", &mut page);
        println!("Cards hit: {:?}", hits.borrow());
        println!("✓ Demo finished after {} ms", page.now().as_millis());
    }
}
