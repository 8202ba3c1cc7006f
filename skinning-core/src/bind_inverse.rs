//! Bind-pose inverse cache
//!
//! Each entry maps a bind-space (model-space) point into the local frame of
//! its joint as the joint sits in the bind pose. Built once from the bind pose
//! and immutable afterwards.

use glam::Mat4;

use crate::JOINT_COUNT;
use crate::error::ConfigError;
use crate::pose::SkeletonPose;
use crate::transform::model_transforms;

/// Determinant of the 2D linear part (upper-left 2x2 block).
///
/// The full 4x4 determinant also carries the scale applied to z, which the
/// 2D joints never use.
fn planar_determinant(model: &Mat4) -> f32 {
    model.x_axis.x * model.y_axis.y - model.x_axis.y * model.y_axis.x
}

/// Inverse bind matrix of every joint, indexed by joint ID.
#[derive(Debug, Clone, PartialEq)]
pub struct BindPoseInverses {
    matrices: [Mat4; JOINT_COUNT],
}

impl BindPoseInverses {
    /// Invert every joint's bind-pose model transform.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SingularBindTransform`] for the first joint whose
    /// model transform cannot be inverted (e.g. zero scale on it or an ancestor).
    pub fn build(bind_pose: &SkeletonPose) -> Result<Self, ConfigError> {
        let models = model_transforms(bind_pose);
        let mut matrices = [Mat4::IDENTITY; JOINT_COUNT];

        for (joint, model) in models.iter().enumerate() {
            let determinant = planar_determinant(model);
            if !determinant.is_finite() || determinant == 0.0 {
                return Err(ConfigError::SingularBindTransform { joint, determinant });
            }
            let inverse = model.inverse();
            if !inverse.is_finite() {
                return Err(ConfigError::SingularBindTransform { joint, determinant });
            }
            matrices[joint] = inverse;
        }

        tracing::debug!("Built inverse bind matrices for {} joints", JOINT_COUNT);

        Ok(Self { matrices })
    }

    /// Panics if `joint >= JOINT_COUNT`.
    #[inline]
    pub fn get(&self, joint: usize) -> Mat4 {
        self.matrices[joint]
    }

    #[inline]
    pub fn matrices(&self) -> &[Mat4; JOINT_COUNT] {
        &self.matrices
    }
}
