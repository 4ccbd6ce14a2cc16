//! Touch-driven placement of objects on tracked surfaces.
//!
//! A press on empty space starts a placement sequence: after a short settle
//! delay the touch point is hit-tested, retried on misses, and the first
//! valid surface receives an object. A cooldown follows every sequence. A
//! press held on a placed object selects it instead, and horizontal movement
//! then spins it about its surface normal.

use bevy::prelude::*;

use constants::placement::{DRAG_ROTATION_PIXELS, PICK_MAX_DISTANCE, SCANNING_LOG_INTERVAL};

use crate::engine::camera::CameraRig;
use crate::engine::host::{AnchorService, Pose, SurfaceSource};
use crate::engine::input::{PressPhase, PrimaryPointer};
use crate::engine::timeline::Timeline;
use crate::tools::placement::error::PlacementError;
use crate::tools::placement::pool::ObjectPool;
use crate::tools::placement::ray::nearest_hit;
use crate::tools::placement::scaling::{align_to_surface, responsive_scale};
use crate::tools::placement::state::{
    AnchorBinding, ObjectId, PlacedObjectRecord, PlacementEvent, PlacementSettings,
};
use crate::tools::placement::validation::validate_surface;

/// Host capabilities borrowed for one controller call.
pub struct PlacementHost<'a> {
    pub surfaces: &'a mut dyn SurfaceSource,
    pub anchors: &'a mut dyn AnchorService,
    pub camera: &'a CameraRig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Sequence {
    Placement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlacementStep {
    Attempt { screen: Vec2, attempt: u32 },
    CooldownOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencePhase {
    #[default]
    Idle,
    Resolving,
    CoolingDown,
}

#[derive(Debug, Clone, Copy)]
struct HoldState {
    started_at: f64,
    position: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    object: ObjectId,
    start_x: f32,
    last_angle: f32,
}

#[derive(Resource)]
pub struct PlacementController {
    settings: PlacementSettings,
    records: Vec<PlacedObjectRecord>,
    pool: ObjectPool,
    timeline: Timeline<Sequence, PlacementStep>,
    phase: SequencePhase,
    hold: Option<HoldState>,
    drag: Option<DragState>,
    events: Vec<PlacementEvent>,
    surface_count: usize,
    frames_without_surfaces: u64,
    active: bool,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new(PlacementSettings::default())
    }
}

impl PlacementController {
    pub fn new(settings: PlacementSettings) -> Self {
        let pool = ObjectPool::new(settings.pooling, settings.pool_size());
        Self {
            settings,
            records: Vec::new(),
            pool,
            timeline: Timeline::new(),
            phase: SequencePhase::Idle,
            hold: None,
            drag: None,
            events: Vec::new(),
            surface_count: 0,
            frames_without_surfaces: 0,
            active: true,
        }
    }

    /// Start a placement sequence at `screen`.
    ///
    /// A sequence already resolving is superseded. During the post-sequence
    /// cooldown the request is refused.
    pub fn request_placement(&mut self, screen: Vec2) -> Result<(), PlacementError> {
        if !self.active {
            return Err(PlacementError::Inactive);
        }
        if self.phase == SequencePhase::CoolingDown {
            return Err(PlacementError::CoolingDown);
        }
        if self.settings.allow_multiple && self.records.len() >= self.settings.max_objects {
            return Err(PlacementError::CapacityReached);
        }

        if self.phase == SequencePhase::Resolving {
            self.timeline.supersede(Sequence::Placement);
            debug!("Placement sequence superseded by touch at {screen}");
        }
        self.timeline.schedule(
            Sequence::Placement,
            PlacementStep::Attempt { screen, attempt: 1 },
            self.settings.settle_delay,
        );
        self.phase = SequencePhase::Resolving;
        Ok(())
    }

    /// Advance one frame: due sequence steps, then pointer handling, then
    /// anchored records following their anchors.
    pub fn tick(&mut self, dt: f32, pointer: Option<PrimaryPointer>, host: &mut PlacementHost) {
        if !self.active {
            return;
        }
        self.observe_surfaces(host.surfaces.surface_count());

        for (_, step) in self.timeline.advance(dt) {
            self.run_step(step, host);
        }

        if let Some(pointer) = pointer {
            self.handle_pointer(pointer, host);
        }

        self.follow_anchors(host.anchors);
    }

    fn observe_surfaces(&mut self, count: usize) {
        if count > 0 && self.surface_count == 0 {
            info!("Surfaces detected: {count}");
        }
        if count == 0 {
            if self.frames_without_surfaces % SCANNING_LOG_INTERVAL == 0 {
                info!("Scanning for surfaces...");
            }
            self.frames_without_surfaces += 1;
        } else {
            self.frames_without_surfaces = 0;
        }
        self.surface_count = count;
    }

    fn run_step(&mut self, step: PlacementStep, host: &mut PlacementHost) {
        match step {
            PlacementStep::Attempt { screen, attempt } => match self.try_place(screen, attempt, host) {
                Ok(_) => self.begin_cooldown(),
                Err(PlacementError::NoSurface) if attempt < self.settings.max_retries => {
                    debug!(
                        "No surface at {screen}, retrying (attempt {}/{})",
                        attempt + 1,
                        self.settings.max_retries
                    );
                    self.timeline.schedule(
                        Sequence::Placement,
                        PlacementStep::Attempt {
                            screen,
                            attempt: attempt + 1,
                        },
                        self.settings.retry_delay,
                    );
                }
                Err(PlacementError::NoSurface) => {
                    info!("Placement failed after {attempt} attempts");
                    self.events.push(PlacementEvent::GaveUp { attempts: attempt });
                    self.begin_cooldown();
                }
                Err(error) => {
                    info!("Placement rejected: {error}");
                    self.events.push(PlacementEvent::Rejected { error });
                    self.begin_cooldown();
                }
            },
            PlacementStep::CooldownOver => {
                self.phase = SequencePhase::Idle;
            }
        }
    }

    fn begin_cooldown(&mut self) {
        self.phase = SequencePhase::CoolingDown;
        self.timeline.schedule(
            Sequence::Placement,
            PlacementStep::CooldownOver,
            self.settings.confirmation_delay,
        );
    }

    fn try_place(
        &mut self,
        screen: Vec2,
        attempt: u32,
        host: &mut PlacementHost,
    ) -> Result<ObjectId, PlacementError> {
        if self.settings.allow_multiple && self.records.len() >= self.settings.max_objects {
            return Err(PlacementError::CapacityReached);
        }

        let hit = host
            .surfaces
            .raycast(screen)
            .into_iter()
            .next()
            .ok_or(PlacementError::NoSurface)?;
        let surface = host
            .surfaces
            .surface(hit.surface)
            .ok_or(PlacementError::NoSurface)?;
        validate_surface(&surface, self.settings.min_surface_area)?;

        if !self.settings.allow_multiple {
            while !self.records.is_empty() {
                self.remove_at(0, host.anchors);
            }
        }

        let object = self.pool.acquire();
        let scale = responsive_scale(Some(&surface), &self.settings);
        let rotation = if self.settings.align_rotation {
            align_to_surface(hit.pose.rotation, surface.normal, host.camera.forward())
        } else {
            hit.pose.rotation
        };
        let pose = Pose::new(hit.pose.position, rotation);

        let anchor = if self.settings.use_anchors {
            match host.anchors.create(pose) {
                Some(id) => {
                    let mut binding = AnchorBinding::at(id, host.anchors.pose(id).unwrap_or(pose));
                    binding.rebind(pose);
                    Some(binding)
                }
                None => {
                    warn!("Anchor creation failed, object {object:?} placed without anchor");
                    None
                }
            }
        } else {
            None
        };
        let anchored = anchor.is_some();

        let transform = pose.to_transform().with_scale(scale);
        self.records.push(PlacedObjectRecord {
            object,
            surface: surface.id,
            original_position: pose.position,
            original_rotation: pose.rotation,
            locked: self.settings.lock_on_place,
            anchor,
            transform,
        });

        info!(
            "Placed {object:?} at {} on {:?} (attempt {attempt}, scale {})",
            pose.position, surface.id, scale
        );
        self.events.push(PlacementEvent::Placed {
            object,
            transform,
            anchored,
            attempt,
        });
        if self.settings.use_anchors && !anchored {
            self.events.push(PlacementEvent::AnchorDegraded { object });
        }
        Ok(object)
    }

    fn handle_pointer(&mut self, pointer: PrimaryPointer, host: &mut PlacementHost) {
        let clock = self.timeline.clock();
        match pointer.phase {
            PressPhase::Pressed => {
                self.hold = Some(HoldState {
                    started_at: clock,
                    position: pointer.position,
                });
                if self.drag.is_some() {
                    return;
                }
                if self.settings.require_surfaces && self.surface_count == 0 {
                    debug!("Touch ignored, no surfaces tracked yet");
                    return;
                }
                if self.pick(pointer.position, host.camera).is_some() {
                    return;
                }
                if let Err(error) = self.request_placement(pointer.position) {
                    debug!("Touch ignored: {error}");
                }
            }
            PressPhase::Held => {
                let Some(hold) = self.hold.as_mut() else {
                    return;
                };
                hold.position = pointer.position;
                let held_for = clock - hold.started_at;

                if self.drag.is_none()
                    && self.phase == SequencePhase::Idle
                    && held_for >= f64::from(self.settings.hold_time)
                {
                    self.try_select(pointer.position, host.camera);
                }
                self.continue_drag(pointer.position, host.surfaces);
            }
            PressPhase::Released => {
                if self.drag.is_some() {
                    self.continue_drag(pointer.position, host.surfaces);
                    self.end_drag();
                }
                self.hold = None;
            }
        }
    }

    fn pick(&self, screen: Vec2, camera: &CameraRig) -> Option<ObjectId> {
        let ray = camera.screen_to_ray(screen)?;
        nearest_hit(
            &ray,
            self.records.iter().map(|r| (r.object, r.transform)),
            self.settings.pick_half_extents,
            PICK_MAX_DISTANCE,
        )
        .map(|(object, _)| object)
    }

    fn try_select(&mut self, screen: Vec2, camera: &CameraRig) {
        let Some(object) = self.pick(screen, camera) else {
            return;
        };
        let start_x = self.hold.map_or(screen.x, |h| h.position.x);
        self.drag = Some(DragState {
            object,
            start_x,
            last_angle: 0.0,
        });
        debug!("Selected {object:?} for rotation");
    }

    fn continue_drag(&mut self, screen: Vec2, surfaces: &dyn SurfaceSource) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(record) = self.records.iter_mut().find(|r| r.object == drag.object) else {
            self.drag = None;
            return;
        };
        if record.locked {
            return;
        }

        let angle = ((screen.x - drag.start_x) / DRAG_ROTATION_PIXELS) * self.settings.rotation_speed;
        let delta = angle - drag.last_angle;
        drag.last_angle = angle;
        if delta == 0.0 {
            return;
        }

        let axis = surfaces
            .surface(record.surface)
            .and_then(|s| s.normal.try_normalize())
            .unwrap_or(Vec3::Y);
        record.transform.rotation =
            Quat::from_axis_angle(axis, delta.to_radians()) * record.transform.rotation;
        record.original_rotation = record.transform.rotation;
        if let Some(binding) = record.anchor.as_mut() {
            binding.rebind(Pose::from(record.transform));
        }

        self.events.push(PlacementEvent::Moved {
            object: record.object,
            transform: record.transform,
        });
    }

    fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!("Ended rotation of {:?}", drag.object);
        }
    }

    fn follow_anchors(&mut self, anchors: &dyn AnchorService) {
        for record in &mut self.records {
            let Some(binding) = record.anchor.as_mut() else {
                continue;
            };
            let Some(pose) = anchors.pose(binding.id) else {
                continue;
            };
            if pose == binding.pose {
                continue;
            }
            binding.pose = pose;
            let world = binding.world_pose();
            record.transform.translation = world.position;
            record.transform.rotation = world.rotation;
            self.events.push(PlacementEvent::Moved {
                object: record.object,
                transform: record.transform,
            });
        }
    }

    /// Remove the record at `index`, releasing its anchor before the object
    /// goes back to the pool.
    pub fn remove_at(&mut self, index: usize, anchors: &mut dyn AnchorService) -> Option<ObjectId> {
        if index >= self.records.len() {
            return None;
        }
        let record = self.records.remove(index);
        if let Some(binding) = record.anchor {
            anchors.release(binding.id);
        }
        if self.drag.is_some_and(|d| d.object == record.object) {
            self.drag = None;
        }
        self.pool.release(record.object);
        self.events.push(PlacementEvent::Removed {
            object: record.object,
        });
        Some(record.object)
    }

    pub fn remove_all(&mut self, anchors: &mut dyn AnchorService) {
        for index in (0..self.records.len()).rev() {
            self.remove_at(index, anchors);
        }
        info!("All placed objects removed");
    }

    pub fn remove_last(&mut self, anchors: &mut dyn AnchorService) -> Option<ObjectId> {
        let last = self.records.len().checked_sub(1)?;
        self.remove_at(last, anchors)
    }

    /// Flip multi-object mode; returns the new setting.
    pub fn toggle_multiple(&mut self) -> bool {
        self.settings.allow_multiple = !self.settings.allow_multiple;
        info!(
            "Multiple objects {}",
            if self.settings.allow_multiple { "enabled" } else { "disabled" }
        );
        self.settings.allow_multiple
    }

    pub fn set_locked(&mut self, object: ObjectId, locked: bool) -> bool {
        match self.records.iter_mut().find(|r| r.object == object) {
            Some(record) => {
                record.locked = locked;
                true
            }
            None => false,
        }
    }

    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: PlacementSettings) {
        self.pool.reconfigure(settings.pooling, settings.pool_size());
        self.settings = settings;
        info!("Placement settings applied: {:?}", self.settings);
    }

    pub fn surfaces_detected(&self) -> bool {
        self.surface_count > 0
    }

    pub fn surface_count(&self) -> usize {
        self.surface_count
    }

    pub fn placed_count(&self) -> usize {
        self.records.len()
    }

    pub fn can_place_more(&self) -> bool {
        if self.settings.allow_multiple {
            self.records.len() < self.settings.max_objects
        } else {
            self.records.is_empty()
        }
    }

    pub fn last_placed(&self) -> Option<&PlacedObjectRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[PlacedObjectRecord] {
        &self.records
    }

    pub fn record(&self, object: ObjectId) -> Option<&PlacedObjectRecord> {
        self.records.iter().find(|r| r.object == object)
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.drag.map(|d| d.object)
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn drain_events(&mut self) -> Vec<PlacementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel any sequence, release every anchor and empty the pool. The
    /// controller ignores input afterwards.
    pub fn shutdown(&mut self, anchors: &mut dyn AnchorService) {
        self.timeline.supersede(Sequence::Placement);
        self.phase = SequencePhase::Idle;
        self.hold = None;
        self.drag = None;
        self.remove_all(anchors);
        self.pool.drain();
        self.active = false;
    }
}
