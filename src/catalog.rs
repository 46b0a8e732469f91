//! Registry of collidable page surfaces
//!
//! Page elements register themselves as they mount and drop out as they
//! unmount, independently of whether the game is running. Geometry is never
//! cached: every call to [`SurfaceCatalog::rects`] measures each handle again,
//! because layout reflows underneath us all the time.

use glam::Vec2;
use indexmap::IndexMap;

use crate::sim::{Rect, Surface, SurfaceKind};

/// Something on the page that can report where it is on screen
pub trait SurfaceHandle {
    /// Current bounding rect relative to the viewport, or `None` if the
    /// element is gone
    fn client_rect(&self) -> Option<Rect>;
}

#[derive(Debug, Clone)]
struct Entry<H> {
    handle: Option<H>,
    kind: SurfaceKind,
}

/// Surfaces keyed by id, iterated in insertion order
#[derive(Debug, Clone)]
pub struct SurfaceCatalog<H> {
    entries: IndexMap<String, Entry<H>>,
}

impl<H> Default for SurfaceCatalog<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SurfaceCatalog<H> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert or replace. A replaced entry keeps its place in the order.
    pub fn register(&mut self, id: impl Into<String>, handle: Option<H>, kind: SurfaceKind) {
        self.entries.insert(id.into(), Entry { handle, kind });
    }

    pub fn unregister(&mut self, id: &str) {
        self.entries.shift_remove(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: SurfaceHandle> SurfaceCatalog<H> {
    /// Measure every surface and convert it to page coordinates.
    ///
    /// Missing handles and zero-size elements are skipped: they are simply
    /// not on screen right now.
    pub fn rects(&self, scroll: Vec2) -> Vec<Surface> {
        self.entries
            .iter()
            .filter_map(|(id, entry)| {
                let rect = entry.handle.as_ref()?.client_rect()?;
                if rect.is_empty() {
                    return None;
                }
                Some(Surface::new(id.clone(), entry.kind, rect.translate(scroll)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Handle whose geometry can change between reads
    #[derive(Clone)]
    struct Probe(Rc<Cell<Option<Rect>>>);

    impl Probe {
        fn at(rect: Rect) -> Self {
            Self(Rc::new(Cell::new(Some(rect))))
        }
    }

    impl SurfaceHandle for Probe {
        fn client_rect(&self) -> Option<Rect> {
            self.0.get()
        }
    }

    fn ids(surfaces: &[Surface]) -> Vec<&str> {
        surfaces.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_rects_in_page_space() {
        let mut catalog = SurfaceCatalog::new();
        catalog.register(
            "nav",
            Some(Probe::at(Rect::new(0.0, 10.0, 100.0, 20.0))),
            SurfaceKind::Solid,
        );
        let rects = catalog.rects(Vec2::new(5.0, 300.0));
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].rect, Rect::new(5.0, 310.0, 105.0, 320.0));
        assert_eq!(rects[0].kind, SurfaceKind::Solid);
    }

    #[test]
    fn test_geometry_read_live() {
        let probe = Probe::at(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut catalog = SurfaceCatalog::new();
        catalog.register("card-1", Some(probe.clone()), SurfaceKind::Card);

        probe.0.set(Some(Rect::new(0.0, 50.0, 10.0, 60.0)));
        assert_eq!(catalog.rects(Vec2::ZERO)[0].rect.top, 50.0);
    }

    #[test]
    fn test_skips_missing_and_empty() {
        let mut catalog = SurfaceCatalog::new();
        catalog.register("absent", None::<Probe>, SurfaceKind::Solid);
        catalog.register("detached", Some(Probe(Rc::new(Cell::new(None)))), SurfaceKind::Solid);
        catalog.register("hidden", Some(Probe::at(Rect::default())), SurfaceKind::Card);
        catalog.register(
            "rule",
            Some(Probe::at(Rect::new(0.0, 5.0, 100.0, 5.0))),
            SurfaceKind::Solid,
        );
        assert_eq!(catalog.len(), 4);
        assert_eq!(ids(&catalog.rects(Vec2::ZERO)), vec!["rule"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut catalog = SurfaceCatalog::new();
        catalog.register("a", Some(Probe::at(r)), SurfaceKind::Solid);
        catalog.register("b", Some(Probe::at(r)), SurfaceKind::Solid);
        catalog.register("a", Some(Probe::at(r)), SurfaceKind::Card);

        let rects = catalog.rects(Vec2::ZERO);
        assert_eq!(ids(&rects), vec!["a", "b"]);
        assert_eq!(rects[0].kind, SurfaceKind::Card);
    }

    #[test]
    fn test_unregister_and_clear() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut catalog = SurfaceCatalog::new();
        for id in ["a", "b", "c"] {
            catalog.register(id, Some(Probe::at(r)), SurfaceKind::Solid);
        }
        catalog.unregister("b");
        catalog.unregister("missing");
        assert_eq!(ids(&catalog.rects(Vec2::ZERO)), vec!["a", "c"]);

        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.rects(Vec2::ZERO).is_empty());
    }
}
