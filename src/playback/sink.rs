use crate::pose::model::Pose;

/// Consumer of sampled poses, typically a 3D model that maps joint names to its own bones.
///
/// The player never reaches into the consumer; this is the whole contract.
pub trait PoseSink {
    /// Overlay `pose` onto the consumer's current state. Joints not mentioned stay as they are.
    fn apply_pose(&mut self, pose: &Pose);

    /// Put the consumer back into its default (bind) pose.
    fn reset_to_default(&mut self);
}

/// Sink that records every applied pose; handy for headless playback and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Poses in application order.
    pub applied: Vec<Pose>,
    /// Number of `reset_to_default` calls.
    pub resets: usize,
}

impl RecordingSink {
    /// Most recently applied pose.
    pub fn last(&self) -> Option<&Pose> {
        self.applied.last()
    }
}

impl PoseSink for RecordingSink {
    fn apply_pose(&mut self, pose: &Pose) {
        self.applied.push(pose.clone());
    }

    fn reset_to_default(&mut self) {
        self.resets += 1;
    }
}
