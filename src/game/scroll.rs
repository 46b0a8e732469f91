//! Camera follow
//!
//! Proportional control: inside the dead zone nothing happens, outside it
//! the page scrolls at a speed that grows linearly toward the viewport edge.

use crate::settings::ScrollParams;

/// Scroll delta for this frame given the ball's y in viewport space.
/// Negative scrolls up.
pub fn auto_scroll_delta(viewport_y: f32, viewport_height: f32, params: &ScrollParams) -> f32 {
    let margin_top = viewport_height * params.margin_top;
    let margin_bottom = viewport_height * params.margin_bottom;
    let zone_bottom = viewport_height - margin_bottom;

    // Urgency tops out at 1 so a ball above or below the viewport scrolls at
    // max_speed rather than proportionally faster
    if viewport_y < margin_top && margin_top > 0.0 {
        let urgency = (1.0 - viewport_y / margin_top).min(1.0);
        -urgency * params.max_speed
    } else if viewport_y > zone_bottom && margin_bottom > 0.0 {
        let urgency = ((viewport_y - zone_bottom) / margin_bottom).min(1.0);
        urgency * params.max_speed
    } else {
        0.0
    }
}

/// Page offset that puts a band's vertical center in the middle of the viewport
#[inline]
pub fn center_scroll_target(center_y: f32, viewport_height: f32) -> f32 {
    center_y - viewport_height / 2.0
}
