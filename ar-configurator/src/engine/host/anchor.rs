use super::surface::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

/// Host-managed anchors. `create` may fail; callers keep working without one.
pub trait AnchorService {
    fn create(&mut self, pose: Pose) -> Option<AnchorId>;

    fn release(&mut self, anchor: AnchorId);

    /// Current pose of a live anchor. The host may move it to correct drift.
    fn pose(&self, anchor: AnchorId) -> Option<Pose>;
}
