//! Classifies one frame of pointer input into a single viewer gesture.
//!
//! The number of fingers down decides the gesture: four starts emergency
//! placement, three pans, two pinch-zoom, one rotates (or pans in movement
//! mode). With no touches the mouse and wheel are read instead.

use bevy::prelude::*;

use crate::engine::input::{PointerFrame, TouchPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerGesture {
    /// Screen-space drag, y down.
    Drag { delta: Vec2, source: PointerSource },
    /// Three-finger pan.
    MultiPan { delta: Vec2 },
    /// Pinch distance change normalised by the screen diagonal.
    Pinch { normalized_delta: f32 },
    Scroll { lines: f32 },
    ToggleMovement,
    Emergency,
}

/// Pointer history needed between frames.
#[derive(Debug, Default, Clone)]
pub struct GestureTracker {
    last_touch: Option<Vec2>,
    last_pinch: Option<f32>,
}

impl GestureTracker {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn classify(&mut self, frame: &PointerFrame, screen_diagonal: f32) -> Option<ViewerGesture> {
        let touches = &frame.touches;
        if touches.len() != 2 {
            self.last_pinch = None;
        }
        if touches.len() != 1 {
            self.last_touch = None;
        }

        match touches.len() {
            0 => self.classify_mouse(frame),
            1 => self.classify_single_touch(frame),
            2 => {
                let (a, b) = (touches[0], touches[1]);
                let distance = a.position.distance(b.position);
                let gesture = self.last_pinch.map(|last| ViewerGesture::Pinch {
                    normalized_delta: (distance - last) / screen_diagonal.max(1.0),
                });
                self.last_pinch = if a.phase.is_finished() || b.phase.is_finished() {
                    None
                } else {
                    Some(distance)
                };
                gesture
            }
            3 => Some(ViewerGesture::MultiPan {
                delta: touches[0].delta,
            }),
            4 if touches[0].phase == TouchPhase::Began => Some(ViewerGesture::Emergency),
            _ => None,
        }
    }

    fn classify_single_touch(&mut self, frame: &PointerFrame) -> Option<ViewerGesture> {
        let touch = frame.touches[0];
        match touch.phase {
            TouchPhase::Began => {
                self.last_touch = Some(touch.position);
                (touch.tap_count >= 2).then_some(ViewerGesture::ToggleMovement)
            }
            TouchPhase::Moved | TouchPhase::Stationary => {
                let last = self.last_touch.replace(touch.position)?;
                let delta = touch.position - last;
                (delta != Vec2::ZERO).then_some(ViewerGesture::Drag {
                    delta,
                    source: PointerSource::Touch,
                })
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                self.last_touch = None;
                None
            }
        }
    }

    fn classify_mouse(&self, frame: &PointerFrame) -> Option<ViewerGesture> {
        let mouse = frame.mouse;
        if mouse.pressed && !mouse.just_pressed && mouse.delta != Vec2::ZERO {
            return Some(ViewerGesture::Drag {
                delta: mouse.delta,
                source: PointerSource::Mouse,
            });
        }
        (frame.scroll != 0.0).then_some(ViewerGesture::Scroll { lines: frame.scroll })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::TouchPoint;

    fn touch(id: u64, x: f32, phase: TouchPhase) -> TouchPoint {
        TouchPoint::new(id, Vec2::new(x, 500.0), Vec2::new(4.0, 0.0), phase)
    }

    #[test]
    fn single_touch_drag_uses_position_history() {
        let mut tracker = GestureTracker::default();
        let began = PointerFrame::single_touch(Vec2::new(100.0, 100.0), Vec2::ZERO, TouchPhase::Began);
        assert_eq!(tracker.classify(&began, 2000.0), None);

        let moved = PointerFrame::single_touch(Vec2::new(130.0, 90.0), Vec2::ZERO, TouchPhase::Moved);
        assert_eq!(
            tracker.classify(&moved, 2000.0),
            Some(ViewerGesture::Drag {
                delta: Vec2::new(30.0, -10.0),
                source: PointerSource::Touch
            })
        );
    }

    #[test]
    fn resting_finger_is_not_a_drag() {
        let mut tracker = GestureTracker::default();
        let at = Vec2::new(200.0, 300.0);
        tracker.classify(&PointerFrame::single_touch(at, Vec2::ZERO, TouchPhase::Began), 2000.0);

        let resting = PointerFrame::single_touch(at, Vec2::ZERO, TouchPhase::Stationary);
        assert_eq!(tracker.classify(&resting, 2000.0), None);

        let moved = PointerFrame::single_touch(at + Vec2::new(5.0, 0.0), Vec2::ZERO, TouchPhase::Moved);
        assert_eq!(
            tracker.classify(&moved, 2000.0),
            Some(ViewerGesture::Drag {
                delta: Vec2::new(5.0, 0.0),
                source: PointerSource::Touch
            })
        );
    }

    #[test]
    fn pinch_needs_a_previous_distance() {
        let mut tracker = GestureTracker::default();
        let mut frame = PointerFrame {
            touches: vec![touch(0, 100.0, TouchPhase::Began), touch(1, 300.0, TouchPhase::Began)],
            ..default()
        };
        assert_eq!(tracker.classify(&frame, 1000.0), None);

        frame.touches[1] = touch(1, 400.0, TouchPhase::Moved);
        assert_eq!(
            tracker.classify(&frame, 1000.0),
            Some(ViewerGesture::Pinch { normalized_delta: 0.1 })
        );
    }

    #[test]
    fn cardinality_picks_the_gesture() {
        let mut tracker = GestureTracker::default();
        let three = PointerFrame {
            touches: (0..3).map(|i| touch(i, 10.0 * i as f32, TouchPhase::Moved)).collect(),
            ..default()
        };
        assert_eq!(
            tracker.classify(&three, 1000.0),
            Some(ViewerGesture::MultiPan { delta: Vec2::new(4.0, 0.0) })
        );

        let four = PointerFrame {
            touches: (0..4).map(|i| touch(i, 10.0 * i as f32, TouchPhase::Began)).collect(),
            ..default()
        };
        assert_eq!(tracker.classify(&four, 1000.0), Some(ViewerGesture::Emergency));
    }

    #[test]
    fn double_tap_toggles_movement() {
        let mut tracker = GestureTracker::default();
        let mut frame = PointerFrame::single_touch(Vec2::ZERO, Vec2::ZERO, TouchPhase::Began);
        frame.touches[0].tap_count = 2;
        assert_eq!(tracker.classify(&frame, 1000.0), Some(ViewerGesture::ToggleMovement));
    }
}
