//! Joint pose model

use glam::{Vec2, Vec4};

/// One joint's pose inside a [`crate::SkeletonPose`].
///
/// `parent` is an index into the owning pose's joint array, so copying or
/// blending a pose never needs to re-target parent links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    /// Parent joint index, `None` for a root
    pub parent: Option<usize>,
    /// RGBA debug color, also blended into skinned vertex colors
    pub color: Vec4,
    /// Offset in the parent's local space
    pub translation: Vec2,
    /// Angle in degrees about the out-of-plane (z) axis
    pub rotation: f32,
    /// Uniform scale, 1.0 means unscaled
    pub scale: f32,
}

impl JointPose {
    /// Rest joint: no parent, no offset, no rotation, unit scale, white.
    pub const IDENTITY: Self = Self {
        parent: None,
        color: Vec4::ONE,
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    /// Root joint placed directly in model space.
    pub fn root(translation: Vec2, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Joint attached to `parent`.
    pub fn child(parent: usize, translation: Vec2, rotation: f32) -> Self {
        Self {
            parent: Some(parent),
            translation,
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Default for JointPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let joint = JointPose::default();
        assert!(joint.is_root());
        assert_eq!(joint.translation, Vec2::ZERO);
        assert_eq!(joint.rotation, 0.0);
        assert_eq!(joint.scale, 1.0);
    }

    #[test]
    fn test_child_builder() {
        let joint = JointPose::child(2, Vec2::new(0.25, 0.0), 15.0)
            .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with_scale(0.5);
        assert_eq!(joint.parent, Some(2));
        assert!(!joint.is_root());
        assert_eq!(joint.color.x, 1.0);
        assert_eq!(joint.scale, 0.5);
    }
}
