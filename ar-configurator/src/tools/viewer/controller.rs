use bevy::prelude::*;

use constants::viewer::{
    FALLBACK_MODEL_POSITION, MAX_VIEW_DISTANCE, MIN_VIEW_DISTANCE, MODEL_HOLDER_DROP,
    ORIGINAL_ZOOM, REFERENCE_SCREEN_HEIGHT,
};

use crate::engine::camera::CameraRig;
use crate::engine::input::PointerFrame;
use crate::engine::timeline::Timeline;
use crate::tools::viewer::gestures::{GestureTracker, PointerSource, ViewerGesture};
use crate::tools::viewer::spawn_points::SpawnPoints;
use crate::tools::viewer::state::{
    ViewerPhase, ViewerSettings, ViewerSnapshot, ViewerState, VisibilityDiagnostic,
};
use crate::tools::viewer::visibility::{VisibilityStrategy, facing_camera};
use crate::tools::viewer::zoom::{forward_offset, next_zoom, scale_curve, smoothing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ViewerSequence {
    Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibilityCheck;

/// Camera-relative inspection of one model: rotate, pan, zoom, and an exact
/// reset to the placement snapshot.
#[derive(Resource)]
pub struct ViewerController {
    settings: ViewerSettings,
    state: ViewerState,
    model: Transform,
    model_name: String,
    tracker: GestureTracker,
    timeline: Timeline<ViewerSequence, VisibilityCheck>,
    visibility_attempts: u32,
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl ViewerController {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            settings,
            state: ViewerState::default(),
            model: Transform::IDENTITY,
            model_name: String::new(),
            tracker: GestureTracker::default(),
            timeline: Timeline::new(),
            visibility_attempts: 0,
        }
    }

    /// Place `model_name` for inspection and start the visibility check.
    ///
    /// A named spawn point wins; otherwise the model sits in front of the
    /// camera, slightly below eye level, facing it.
    pub fn load(
        &mut self,
        model_name: &str,
        preferred_scale: Option<f32>,
        spawn_points: &SpawnPoints,
        camera: Option<&CameraRig>,
    ) {
        if self.state.phase == ViewerPhase::Destroyed {
            warn!("Viewer is destroyed, ignoring load of {model_name:?}");
            return;
        }

        let (position, rotation) = match (spawn_points.lookup(model_name), camera) {
            (Some(point), _) => {
                debug!("Using spawn point {:?} for {model_name:?}", point.name);
                (point.position, point.rotation)
            }
            (None, Some(camera)) => {
                let distance = (5.0 / camera.fov_degrees()).clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE);
                let mut position = camera.position() + camera.forward() * distance;
                position.y = camera.position().y - MODEL_HOLDER_DROP;
                (position, facing_camera(camera))
            }
            (None, None) => {
                warn!("No camera for {model_name:?}, using fallback position");
                (FALLBACK_MODEL_POSITION, Quat::from_rotation_y(std::f32::consts::PI))
            }
        };
        let scale = Vec3::splat(preferred_scale.unwrap_or(self.settings.default_model_scale));

        self.model_name = model_name.to_string();
        self.model = Transform {
            translation: position,
            rotation,
            scale,
        };
        self.adopt_snapshot();
        self.state.movement_mode = false;
        self.state.phase = ViewerPhase::Placed;
        self.state.hint_timer = self.settings.hint_fade_time;
        self.state.diagnostic = None;
        self.tracker.reset();

        self.visibility_attempts = 0;
        self.timeline.supersede(ViewerSequence::Visibility);
        self.timeline.schedule(
            ViewerSequence::Visibility,
            VisibilityCheck,
            self.settings.visibility_first_check_delay,
        );
        info!("Loaded {model_name:?} at {position} with scale {scale}");
    }

    /// Current model transform becomes the reset target.
    fn adopt_snapshot(&mut self) {
        self.state.snapshot = ViewerSnapshot::from_transform(&self.model);
        self.state.zoom = ORIGINAL_ZOOM;
        self.state.scale_target = self.model.scale;
        self.state.offset_target = 0.0;
        self.state.applied_offset = 0.0;
    }

    pub fn tick(&mut self, dt: f32, frame: &PointerFrame, camera: &CameraRig) {
        if !self.state.phase.accepts_input() {
            return;
        }

        for (_, VisibilityCheck) in self.timeline.advance(dt) {
            self.check_visibility(camera);
        }

        self.state.phase = ViewerPhase::Placed;
        self.handle_key_commands(frame, camera);

        let gesture = self.tracker.classify(frame, camera.screen_diagonal());
        if let Some(gesture) = gesture {
            self.apply_gesture(gesture, dt, camera);
        }
        // At most one manipulation per frame; the pointer gesture wins.
        if self.state.phase == ViewerPhase::Placed {
            self.handle_key_manipulation(frame, dt, camera);
        }

        if self.state.hint_timer > 0.0 {
            self.state.hint_timer = (self.state.hint_timer - dt).max(0.0);
        }
        if frame.has_input() {
            self.state.hint_timer = 0.0;
        }

        self.ease_toward_targets(dt, camera);
    }

    fn handle_key_commands(&mut self, frame: &PointerFrame, camera: &CameraRig) {
        let keys = frame.keys;
        if keys.toggle_movement {
            self.toggle_movement_mode();
        }
        if keys.center {
            self.center_in_front(camera);
        }
        if keys.guaranteed {
            self.guaranteed_placement(camera);
        }
        if keys.emergency {
            self.emergency_placement(camera);
        }
        if keys.reset {
            self.reset();
        }
    }

    fn handle_key_manipulation(&mut self, frame: &PointerFrame, dt: f32, camera: &CameraRig) {
        let keys = frame.keys;
        let step = match (keys.zoom_in, keys.zoom_out) {
            (true, false) => self.settings.key_zoom_step,
            (false, true) => -self.settings.key_zoom_step,
            _ => 0.0,
        };
        if step != 0.0 && self.apply_zoom(step) {
            return;
        }
        if keys.move_axis != Vec2::ZERO {
            let direction = camera.right() * keys.move_axis.x + camera.up() * keys.move_axis.y;
            self.pan(direction * self.settings.key_move_speed * dt);
        }
    }

    fn apply_gesture(&mut self, gesture: ViewerGesture, dt: f32, camera: &CameraRig) {
        match gesture {
            ViewerGesture::Drag { delta, source } if self.state.movement_mode => {
                let speed = match source {
                    PointerSource::Mouse => self.settings.mouse_move_speed,
                    PointerSource::Touch => self.settings.touch_move_speed,
                };
                self.pan(screen_to_world(delta, camera) * speed);
            }
            ViewerGesture::Drag {
                delta,
                source: PointerSource::Mouse,
            } => {
                let speed = self.settings.mouse_rotation_speed * camera.viewport.y / REFERENCE_SCREEN_HEIGHT;
                self.rotate(-delta.x * speed * dt, -delta.y * speed * dt);
            }
            ViewerGesture::Drag {
                delta,
                source: PointerSource::Touch,
            } => {
                let base = self.settings.touch_rotation_sensitivity;
                let yaw = -delta.x * base * (1.0 + delta.x.abs() * 0.01);
                let pitch = -delta.y * base * (1.0 + delta.y.abs() * 0.01);
                self.rotate(yaw, pitch);
            }
            ViewerGesture::MultiPan { delta } => {
                let speed = self.settings.touch_move_speed * self.settings.three_finger_pan_boost;
                self.pan(screen_to_world(delta, camera) * speed);
            }
            ViewerGesture::Pinch { normalized_delta } => {
                self.apply_zoom(-normalized_delta * self.settings.pinch_zoom_speed);
            }
            ViewerGesture::Scroll { lines } => {
                self.apply_zoom(lines * self.settings.scroll_zoom_speed);
            }
            ViewerGesture::ToggleMovement => {
                self.toggle_movement_mode();
            }
            ViewerGesture::Emergency => {
                self.emergency_placement(camera);
            }
        }
    }

    /// Yaw about world up, then pitch about world right, in degrees.
    pub fn rotate(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        if !self.state.phase.accepts_input() {
            return;
        }
        let yaw = Quat::from_axis_angle(Vec3::Y, yaw_degrees.to_radians());
        let pitch = Quat::from_axis_angle(Vec3::X, pitch_degrees.to_radians());
        self.model.rotation = (pitch * yaw * self.model.rotation).normalize();
        self.state.phase = ViewerPhase::Rotating;
    }

    /// Translate the model by a world-space offset.
    pub fn pan(&mut self, offset: Vec3) {
        if !self.state.phase.accepts_input() {
            return;
        }
        self.model.translation += offset;
        self.state.phase = ViewerPhase::Panning;
    }

    /// Accumulate a zoom increment. Returns `false` when the change fell
    /// inside the deadband and was ignored.
    pub fn apply_zoom(&mut self, increment: f32) -> bool {
        if !self.state.phase.accepts_input() {
            return false;
        }
        let Some(zoom) = next_zoom(self.state.zoom, increment, &self.settings) else {
            return false;
        };
        self.state.zoom = zoom;
        self.state.scale_target = self.state.snapshot.scale * scale_curve(zoom);
        self.state.offset_target = forward_offset(zoom);
        self.state.phase = ViewerPhase::Zooming;
        debug!(
            "Zoom: {zoom:.2} | Scale: {:.2} | Range: {:.3}-{:.0}",
            scale_curve(zoom),
            self.settings.min_zoom,
            self.settings.max_zoom
        );
        true
    }

    fn ease_toward_targets(&mut self, dt: f32, camera: &CameraRig) {
        let scale_k = smoothing(self.settings.scale_smoothing_rate, dt);
        self.model.scale = self.model.scale.lerp(self.state.scale_target, scale_k);

        let position_k = smoothing(self.settings.position_smoothing_rate, dt);
        let offset = self.state.applied_offset
            + (self.state.offset_target - self.state.applied_offset) * position_k;
        let step = offset - self.state.applied_offset;
        if step != 0.0 {
            self.model.translation += camera.forward() * step;
            self.state.applied_offset = offset;
        }
    }

    pub fn toggle_movement_mode(&mut self) -> bool {
        self.state.movement_mode = !self.state.movement_mode;
        info!(
            "Movement mode {}",
            if self.state.movement_mode { "enabled" } else { "disabled" }
        );
        self.state.movement_mode
    }

    /// Restore the snapshot exactly and cancel pending sequences.
    pub fn reset(&mut self) {
        if !self.state.phase.accepts_input() {
            return;
        }
        self.timeline.supersede(ViewerSequence::Visibility);
        self.model = self.state.snapshot.to_transform();
        self.state.zoom = ORIGINAL_ZOOM;
        self.state.scale_target = self.state.snapshot.scale;
        self.state.offset_target = 0.0;
        self.state.applied_offset = 0.0;
        self.state.movement_mode = false;
        self.state.phase = ViewerPhase::Placed;
        self.tracker.reset();
        info!(
            "View reset to {} / {} / {}",
            self.state.snapshot.position, self.state.snapshot.rotation, self.state.snapshot.scale
        );
    }

    pub fn destroy(&mut self) {
        self.timeline.supersede(ViewerSequence::Visibility);
        self.state.phase = ViewerPhase::Destroyed;
        info!("Viewer for {:?} destroyed", self.model_name);
    }

    pub fn center_in_front(&mut self, camera: &CameraRig) {
        self.place_with(VisibilityStrategy::CenterInFront, camera);
    }

    pub fn guaranteed_placement(&mut self, camera: &CameraRig) {
        self.place_with(VisibilityStrategy::Guaranteed, camera);
    }

    pub fn emergency_placement(&mut self, camera: &CameraRig) {
        self.place_with(VisibilityStrategy::Emergency, camera);
    }

    fn place_with(&mut self, strategy: VisibilityStrategy, camera: &CameraRig) {
        if !self.state.phase.accepts_input() {
            return;
        }
        self.model = strategy.placement(camera).to_transform();
        self.adopt_snapshot();
        info!("{strategy:?} placement at {}", self.model.translation);
    }

    fn check_visibility(&mut self, camera: &CameraRig) {
        if camera.sees_box(&self.model, self.settings.model_half_extents) {
            info!("Model visibility confirmed after {} attempts", self.visibility_attempts);
            return;
        }

        if self.visibility_attempts >= self.settings.max_visibility_attempts {
            let diagnostic = VisibilityDiagnostic {
                attempts: self.visibility_attempts,
                model_position: self.model.translation,
                model_scale: self.model.scale,
                camera_position: camera.position(),
                camera_forward: camera.forward(),
            };
            error!("All visibility attempts failed: {diagnostic:?}");
            self.state.diagnostic = Some(diagnostic);
            return;
        }

        self.visibility_attempts += 1;
        let strategy = VisibilityStrategy::for_attempt(self.visibility_attempts);
        info!(
            "Model not visible, attempt {} of {}: {strategy:?}",
            self.visibility_attempts, self.settings.max_visibility_attempts
        );
        self.place_with(strategy, camera);
        self.timeline.schedule(
            ViewerSequence::Visibility,
            VisibilityCheck,
            self.settings.visibility_recheck_delay,
        );
    }

    pub fn transform(&self) -> &Transform {
        &self.model
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn phase(&self) -> ViewerPhase {
        self.state.phase
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn hints_visible(&self) -> bool {
        self.state.hint_timer > 0.0
    }

    pub fn visibility_pending(&self) -> bool {
        self.timeline.is_pending(ViewerSequence::Visibility)
    }
}

/// Screen delta (y down) to a camera-plane offset, so content follows the pointer.
fn screen_to_world(delta: Vec2, camera: &CameraRig) -> Vec3 {
    camera.right() * delta.x - camera.up() * delta.y
}
