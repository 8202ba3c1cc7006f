//! Interpolation driver: maps an input signal to a blend between two poses

use crate::blend::blend_into;
use crate::pose::SkeletonPose;
use crate::skeleton::{PoseId, SkeletonConfig};

/// `x / extent` clamped to `[0, 1]`.
///
/// A non-positive or non-finite extent (minimized window) maps to 0.
pub fn normalized_pointer(x: f64, extent: f64) -> f32 {
    if !(extent.is_finite() && extent > 0.0) || !x.is_finite() {
        return 0.0;
    }
    (x / extent).clamp(0.0, 1.0) as f32
}

/// Which two reference poses are blended, and by how much.
///
/// `factor` weights the right-hand pose; `1 - factor` weights the left-hand
/// one. The result is continuous and monotonic in `factor`, and the endpoints
/// reproduce the reference poses exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendDriver {
    left: PoseId,
    right: PoseId,
    factor: f32,
}

impl BlendDriver {
    pub fn new(left: PoseId, right: PoseId) -> Self {
        Self {
            left,
            right,
            factor: 0.0,
        }
    }

    /// Default pairing: first two authored poses after the bind pose, falling
    /// back to the bind pose when the configuration has fewer.
    pub fn for_config(config: &SkeletonConfig) -> Self {
        let last = config.len().saturating_sub(1);
        let left = PoseId(1.min(last));
        let right = PoseId(2.min(last));
        Self::new(left, right)
    }

    #[inline]
    pub fn left(&self) -> PoseId {
        self.left
    }

    #[inline]
    pub fn right(&self) -> PoseId {
        self.right
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn set_left(&mut self, id: PoseId) {
        self.left = id;
    }

    pub fn set_right(&mut self, id: PoseId) {
        self.right = id;
    }

    /// Set the blend factor, clamped to `[0, 1]`. NaN resets to 0.
    pub fn set_factor(&mut self, factor: f32) {
        self.factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
    }

    /// Horizontal pointer position over a viewport of `width` pixels.
    pub fn set_pointer(&mut self, x: f64, width: f64) {
        self.set_factor(normalized_pointer(x, width));
    }

    /// Advance the left-hand pose to the next authored (non-bind) pose.
    pub fn cycle_left(&mut self, config: &SkeletonConfig) {
        self.left = next_authored(self.left, config);
    }

    /// Advance the right-hand pose to the next authored (non-bind) pose.
    pub fn cycle_right(&mut self, config: &SkeletonConfig) {
        self.right = next_authored(self.right, config);
    }

    /// Recompute the Current Pose in place.
    pub fn evaluate(&self, config: &SkeletonConfig, current: &mut SkeletonPose) {
        blend_into(
            config.pose(self.left),
            config.pose(self.right),
            self.factor,
            current,
        );
    }
}

fn next_authored(id: PoseId, config: &SkeletonConfig) -> PoseId {
    let authored = config.len().saturating_sub(1);
    if authored == 0 {
        return crate::BIND_POSE;
    }
    // Authored poses occupy slots 1..=authored
    PoseId(id.0 % authored + 1)
}
