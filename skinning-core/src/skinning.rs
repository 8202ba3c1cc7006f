//! Linear blend skinning, host side
//!
//! For a vertex with bind-space position `p`, joints `i[k]` and weights `w[k]`:
//!
//! ```text
//! position = Σ w[k] · (current_pose[i[k]] · bind_pose_inverse[i[k]] · (p, 0, 1))
//! color    = Σ w[k] · current_pose_colors[i[k]]
//! ```
//!
//! The vertex stage generated by [`crate::shader::skinning_shader`] evaluates
//! the same sum from [`SkinningUniforms`]; [`skin_vertex`] evaluates it here
//! for the debug overlay and for tests. Zero-weight slots are still multiplied,
//! matching the branch-free shader.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

use crate::bind_inverse::BindPoseInverses;
use crate::mesh::Vertex;
use crate::pose::SkeletonPose;
use crate::transform::model_transforms;
use crate::{INFLUENCES_PER_VERTEX, JOINT_COUNT};

/// Per-joint model matrices and colors of one evaluated pose.
///
/// This is the per-frame driver step: recomputed from the Current Pose for
/// every joint before any skinning is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct PosePalette {
    pub model: [Mat4; JOINT_COUNT],
    pub colors: [Vec4; JOINT_COUNT],
}

impl PosePalette {
    pub fn from_pose(pose: &SkeletonPose) -> Self {
        Self {
            model: model_transforms(pose),
            colors: std::array::from_fn(|joint| pose.joint(joint).color),
        }
    }

    /// Refresh in place from a new pose.
    pub fn update(&mut self, pose: &SkeletonPose) {
        *self = Self::from_pose(pose);
    }

    /// `current · bind_inverse` for one joint: bind space → current pose space.
    #[inline]
    pub fn skinning_matrix(&self, inverses: &BindPoseInverses, joint: usize) -> Mat4 {
        self.model[joint] * inverses.get(joint)
    }
}

/// Skinned vertex output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: Vec2,
    pub color: Vec4,
}

/// Skin one vertex against the current palette.
///
/// Joint indices are clamped into range the same way the GPU clamps uniform
/// array reads; vertices from a validated [`crate::MeshData`] never need it.
pub fn skin_vertex(
    vertex: &Vertex,
    palette: &PosePalette,
    inverses: &BindPoseInverses,
) -> SkinnedVertex {
    let bind_position = vertex.position.extend(0.0).extend(1.0);
    let mut position = Vec4::ZERO;
    let mut color = Vec4::ZERO;

    for k in 0..INFLUENCES_PER_VERTEX {
        let joint = (vertex.joint_indices[k] as usize).min(JOINT_COUNT - 1);
        let weight = vertex.joint_weights[k];
        position += weight * (palette.model[joint] * inverses.get(joint) * bind_position);
        color += weight * palette.colors[joint];
    }

    SkinnedVertex {
        position: position.truncate().truncate(),
        color,
    }
}

/// Skin every vertex of a mesh.
pub fn skin_vertices(
    vertices: &[Vertex],
    palette: &PosePalette,
    inverses: &BindPoseInverses,
) -> Vec<SkinnedVertex> {
    vertices
        .iter()
        .map(|v| skin_vertex(v, palette, inverses))
        .collect()
}

/// Uniform block consumed by the skinning vertex stage.
///
/// Field order and sizes match `SkinningUniforms` in the generated WGSL:
/// column-major `mat4x4<f32>` (64 bytes) and `vec4<f32>` (16 bytes) arrays,
/// no implicit padding.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SkinningUniforms {
    /// Model space → clip space
    pub view: [[f32; 4]; 4],
    pub bind_pose_inverse: [[[f32; 4]; 4]; JOINT_COUNT],
    pub current_pose: [[[f32; 4]; 4]; JOINT_COUNT],
    pub current_pose_colors: [[f32; 4]; JOINT_COUNT],
}

impl SkinningUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(view: Mat4, palette: &PosePalette, inverses: &BindPoseInverses) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            bind_pose_inverse: std::array::from_fn(|j| inverses.get(j).to_cols_array_2d()),
            current_pose: std::array::from_fn(|j| palette.model[j].to_cols_array_2d()),
            current_pose_colors: std::array::from_fn(|j| palette.colors[j].to_array()),
        }
    }

    /// Replace the per-frame parts, keeping the bind inverses.
    pub fn set_pose(&mut self, view: Mat4, palette: &PosePalette) {
        self.view = view.to_cols_array_2d();
        for joint in 0..JOINT_COUNT {
            self.current_pose[joint] = palette.model[joint].to_cols_array_2d();
            self.current_pose_colors[joint] = palette.colors[joint].to_array();
        }
    }
}
