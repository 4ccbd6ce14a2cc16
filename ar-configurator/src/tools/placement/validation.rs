use crate::engine::host::{Surface, SurfaceAlignment, TrackingState};
use crate::tools::placement::error::Rejection;

/// Accept only tracked, upward-facing planes of at least `min_area` m².
pub fn validate_surface(surface: &Surface, min_area: f32) -> Result<(), Rejection> {
    if surface.alignment != SurfaceAlignment::HorizontalUp {
        return Err(Rejection::Alignment(surface.alignment));
    }
    if surface.size.x <= 0.0 || surface.size.y <= 0.0 {
        return Err(Rejection::DegenerateExtents);
    }
    let area = surface.area();
    if area < min_area {
        return Err(Rejection::TooSmall {
            area,
            required: min_area,
        });
    }
    if surface.tracking != TrackingState::Tracking {
        return Err(Rejection::NotTracking(surface.tracking));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::host::SurfaceId;
    use bevy::prelude::*;

    fn floor(size: Vec2) -> Surface {
        Surface {
            id: SurfaceId(7),
            normal: Vec3::Y,
            alignment: SurfaceAlignment::HorizontalUp,
            size,
            tracking: TrackingState::Tracking,
        }
    }

    #[test]
    fn small_floor_is_rejected() {
        let result = validate_surface(&floor(Vec2::new(0.25, 0.2)), 0.1);
        assert!(matches!(result, Err(Rejection::TooSmall { .. })));
    }

    #[test]
    fn validity_is_monotonic_in_area() {
        let mut was_valid = false;
        for step in 1..=40 {
            let side = step as f32 * 0.025;
            let valid = validate_surface(&floor(Vec2::splat(side)), 0.1).is_ok();
            assert!(!was_valid || valid, "side {side} flipped back to invalid");
            was_valid = valid;
        }
        assert!(was_valid);
    }

    #[test]
    fn walls_and_lost_planes_are_rejected() {
        let mut wall = floor(Vec2::ONE);
        wall.alignment = SurfaceAlignment::Vertical;
        assert_eq!(
            validate_surface(&wall, 0.1),
            Err(Rejection::Alignment(SurfaceAlignment::Vertical))
        );

        let mut limited = floor(Vec2::ONE);
        limited.tracking = TrackingState::Limited;
        assert_eq!(
            validate_surface(&limited, 0.1),
            Err(Rejection::NotTracking(TrackingState::Limited))
        );

        assert_eq!(
            validate_surface(&floor(Vec2::new(0.0, 3.0)), 0.1),
            Err(Rejection::DegenerateExtents)
        );
    }
}
