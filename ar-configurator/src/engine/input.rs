//! Per-frame pointer snapshot.
//!
//! Engine input (mouse, touches, wheel, keys) is folded into one
//! [`PointerFrame`] before any controller runs, so the controllers see a
//! stable sample and tests can build frames by hand.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Seconds between two touch starts that count as a double tap.
pub const DOUBLE_TAP_TIME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

impl TouchPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Ended | Self::Canceled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    /// Screen position, origin top-left, pixels.
    pub position: Vec2,
    pub delta: Vec2,
    pub phase: TouchPhase,
    pub tap_count: u32,
}

impl TouchPoint {
    pub fn new(id: u64, position: Vec2, delta: Vec2, phase: TouchPhase) -> Self {
        Self {
            id,
            position,
            delta,
            phase,
            tap_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseSample {
    pub position: Option<Vec2>,
    pub delta: Vec2,
    pub just_pressed: bool,
    pub pressed: bool,
    pub just_released: bool,
}

/// Desktop shortcuts pressed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyCommands {
    pub toggle_movement: bool,
    pub center: bool,
    pub guaranteed: bool,
    pub emergency: bool,
    pub reset: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    /// WASD / arrows, x right, y up.
    pub move_axis: Vec2,
}

/// Where the primary pointer is in its press lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPhase {
    Pressed,
    Held,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryPointer {
    pub phase: PressPhase,
    pub position: Vec2,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    pub touches: Vec<TouchPoint>,
    pub mouse: MouseSample,
    /// Wheel travel in lines, positive away from the user.
    pub scroll: f32,
    pub keys: KeyCommands,
}

impl PointerFrame {
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    pub fn has_input(&self) -> bool {
        !self.touches.is_empty()
            || self.mouse.just_pressed
            || self.mouse.pressed
            || self.scroll.abs() > f32::EPSILON
    }

    /// First touch if any finger is down, otherwise the left mouse button.
    pub fn primary(&self) -> Option<PrimaryPointer> {
        if let Some(touch) = self.touches.first() {
            let phase = match touch.phase {
                TouchPhase::Began => PressPhase::Pressed,
                TouchPhase::Moved | TouchPhase::Stationary => PressPhase::Held,
                TouchPhase::Ended | TouchPhase::Canceled => PressPhase::Released,
            };
            return Some(PrimaryPointer {
                phase,
                position: touch.position,
            });
        }

        let position = self.mouse.position?;
        let phase = if self.mouse.just_pressed {
            PressPhase::Pressed
        } else if self.mouse.just_released {
            PressPhase::Released
        } else if self.mouse.pressed {
            PressPhase::Held
        } else {
            return None;
        };
        Some(PrimaryPointer { phase, position })
    }

    pub fn single_touch(position: Vec2, delta: Vec2, phase: TouchPhase) -> Self {
        Self {
            touches: vec![TouchPoint::new(0, position, delta, phase)],
            ..default()
        }
    }

    pub fn mouse_press(position: Vec2) -> Self {
        Self {
            mouse: MouseSample {
                position: Some(position),
                just_pressed: true,
                pressed: true,
                ..default()
            },
            ..default()
        }
    }

    pub fn mouse_drag(position: Vec2, delta: Vec2) -> Self {
        Self {
            mouse: MouseSample {
                position: Some(position),
                delta,
                pressed: true,
                ..default()
            },
            ..default()
        }
    }

    pub fn mouse_release(position: Vec2) -> Self {
        Self {
            mouse: MouseSample {
                position: Some(position),
                just_released: true,
                ..default()
            },
            ..default()
        }
    }

    pub fn scroll(lines: f32) -> Self {
        Self {
            scroll: lines,
            ..default()
        }
    }
}

/// Fold this frame's engine input into the [`PointerFrame`] resource.
pub fn gather_pointer_frame(
    touches: Res<Touches>,
    buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut last_tap: Local<Option<f32>>,
    mut frame: ResMut<PointerFrame>,
) {
    let now = time.elapsed_secs();

    let mut points: Vec<TouchPoint> = Vec::new();
    for touch in touches.iter() {
        let phase = if touches.just_pressed(touch.id()) {
            TouchPhase::Began
        } else if touch.delta() == Vec2::ZERO {
            TouchPhase::Stationary
        } else {
            TouchPhase::Moved
        };
        let mut point = TouchPoint::new(touch.id(), touch.position(), touch.delta(), phase);
        if phase == TouchPhase::Began {
            if last_tap.is_some_and(|t| now - t <= DOUBLE_TAP_TIME) {
                point.tap_count = 2;
            }
            *last_tap = Some(now);
        }
        points.push(point);
    }
    for touch in touches.iter_just_released() {
        points.push(TouchPoint::new(touch.id(), touch.position(), touch.delta(), TouchPhase::Ended));
    }
    for touch in touches.iter_just_canceled() {
        points.push(TouchPoint::new(touch.id(), touch.position(), touch.delta(), TouchPhase::Canceled));
    }
    points.sort_by_key(|p| p.id);

    let scroll: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    let mut move_axis = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) { move_axis.y += 1.0; }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) { move_axis.y -= 1.0; }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) { move_axis.x -= 1.0; }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) { move_axis.x += 1.0; }

    *frame = PointerFrame {
        touches: points,
        mouse: MouseSample {
            position: windows.single().ok().and_then(|w| w.cursor_position()),
            delta: motion.read().map(|m| m.delta).sum(),
            just_pressed: buttons.just_pressed(MouseButton::Left),
            pressed: buttons.pressed(MouseButton::Left),
            just_released: buttons.just_released(MouseButton::Left),
        },
        scroll,
        keys: KeyCommands {
            toggle_movement: keyboard.just_pressed(KeyCode::KeyM),
            center: keyboard.just_pressed(KeyCode::KeyC),
            guaranteed: keyboard.just_pressed(KeyCode::KeyG),
            emergency: keyboard.just_pressed(KeyCode::KeyE),
            reset: keyboard.just_pressed(KeyCode::KeyR),
            zoom_in: keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]),
            zoom_out: keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]),
            move_axis,
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_wins_over_mouse_for_primary() {
        let mut frame = PointerFrame::mouse_press(Vec2::new(5.0, 5.0));
        frame.touches.push(TouchPoint::new(3, Vec2::new(10.0, 20.0), Vec2::ZERO, TouchPhase::Moved));
        let primary = frame.primary().unwrap();
        assert_eq!(primary.phase, PressPhase::Held);
        assert_eq!(primary.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn idle_mouse_has_no_primary() {
        let frame = PointerFrame {
            mouse: MouseSample {
                position: Some(Vec2::ONE),
                ..default()
            },
            ..default()
        };
        assert!(frame.primary().is_none());
    }
}
