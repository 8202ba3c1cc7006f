//! Transform evaluator
//!
//! Converts joint pose parameters into 4×4 column-vector matrices.
//! A joint's local matrix is `T · R · S`: a point is scaled first, then
//! rotated about z, then translated into the parent's space.

use glam::{Mat4, Vec2, Vec3};

use crate::JOINT_COUNT;
use crate::joint::JointPose;
use crate::pose::SkeletonPose;

/// Local-to-parent matrix of a single joint.
pub fn local_transform(joint: &JointPose) -> Mat4 {
    let mut matrix = Mat4::from_translation(joint.translation.extend(0.0));

    // Skipping the identity factors must not change the result.
    if joint.rotation != 0.0 {
        matrix *= Mat4::from_rotation_z(joint.rotation.to_radians());
    }
    if joint.scale != 1.0 {
        matrix *= Mat4::from_scale(Vec3::splat(joint.scale));
    }

    matrix
}

/// Local-to-model matrix of `joint`, composing every ancestor.
///
/// Recursion depth is bounded by [`JOINT_COUNT`] because [`SkeletonPose`]
/// rejects cyclic hierarchies at construction.
pub fn model_transform(pose: &SkeletonPose, joint: usize) -> Mat4 {
    let local = local_transform(pose.joint(joint));
    match pose.joint(joint).parent {
        Some(parent) => model_transform(pose, parent) * local,
        None => local,
    }
}

/// Model matrices of every joint, indexed by joint ID.
pub fn model_transforms(pose: &SkeletonPose) -> [Mat4; JOINT_COUNT] {
    std::array::from_fn(|joint| model_transform(pose, joint))
}

/// Model-space position of a joint's frame origin.
pub fn joint_origin(pose: &SkeletonPose, joint: usize) -> Vec2 {
    model_transform(pose, joint).transform_point3(Vec3::ZERO).truncate()
}
