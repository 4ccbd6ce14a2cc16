use constants::viewer::{ZOOM_DISTANCE_FACTOR, ZOOM_SCALE_EXPONENT};

use crate::tools::viewer::state::ViewerSettings;

/// Next zoom factor for `increment`, or `None` when the clamped change is
/// within the deadband.
pub fn next_zoom(current: f32, increment: f32, settings: &ViewerSettings) -> Option<f32> {
    let zoom = (current + increment * settings.zoom_multiplier).clamp(settings.min_zoom, settings.max_zoom);
    ((zoom - current).abs() > settings.zoom_deadband).then_some(zoom)
}

pub fn scale_curve(zoom: f32) -> f32 {
    zoom.powf(ZOOM_SCALE_EXPONENT)
}

/// Forward offset that keeps a zoomed model comfortably framed.
pub fn forward_offset(zoom: f32) -> f32 {
    (1.0 - scale_curve(zoom)) * ZOOM_DISTANCE_FACTOR
}

/// Frame-rate independent blend factor for exponential smoothing.
pub fn smoothing(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_changes_are_ignored() {
        let settings = ViewerSettings::default();
        assert_eq!(next_zoom(1.0, 0.001, &settings), None);
        assert_eq!(next_zoom(settings.max_zoom, 5.0, &settings), None);
        assert!(next_zoom(1.0, 0.01, &settings).is_some());
    }

    #[test]
    fn unit_zoom_has_no_offset() {
        assert_eq!(scale_curve(1.0), 1.0);
        assert_eq!(forward_offset(1.0), 0.0);
        assert!(forward_offset(0.1) > 0.0);
        assert!(forward_offset(4.0) < 0.0);
    }

    #[test]
    fn smoothing_stays_in_unit_range() {
        assert_eq!(smoothing(8.0, 0.0), 0.0);
        let k = smoothing(8.0, 1.0 / 60.0);
        assert!(k > 0.0 && k < 1.0);
        assert!(smoothing(4.0, 10.0) > 0.999);
    }
}
