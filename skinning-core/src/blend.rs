//! Pose blender
//!
//! Linear interpolation between two reference poses sharing one hierarchy.
//! Rotation is a plain scalar lerp in degrees: 170° → -170° passes through 0°
//! instead of taking the 20° short path.

use glam::{Vec2, Vec4};

use crate::pose::SkeletonPose;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

#[inline]
fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

#[inline]
fn lerp_vec4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    Vec4::new(
        lerp(a.x, b.x, t),
        lerp(a.y, b.y, t),
        lerp(a.z, b.z, t),
        lerp(a.w, b.w, t),
    )
}

/// Blend `a` towards `b` by `t`, writing into `out`.
///
/// `t = 0` reproduces `a` and `t = 1` reproduces `b` exactly. Parent links are
/// copied from `a`; both poses must share the same topology, which
/// [`crate::SkeletonConfig`] checks once at construction.
pub fn blend_into(a: &SkeletonPose, b: &SkeletonPose, t: f32, out: &mut SkeletonPose) {
    debug_assert!(a.same_topology(b), "blending poses with different hierarchies");

    for ((dst, ja), jb) in out.joints_mut().iter_mut().zip(a.joints()).zip(b.joints()) {
        dst.parent = ja.parent;
        dst.color = lerp_vec4(ja.color, jb.color, t);
        dst.translation = lerp_vec2(ja.translation, jb.translation, t);
        dst.rotation = lerp(ja.rotation, jb.rotation, t);
        dst.scale = lerp(ja.scale, jb.scale, t);
    }
}

/// Blend `a` towards `b` by `t` into a fresh pose.
pub fn blend(a: &SkeletonPose, b: &SkeletonPose, t: f32) -> SkeletonPose {
    let mut out = *a;
    blend_into(a, b, t, &mut out);
    out
}
