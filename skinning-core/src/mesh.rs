//! Skinned mesh data and the per-vertex attribute table
//!
//! [`VERTEX_ATTRIBUTES`] is the single description of the vertex layout. The
//! GPU vertex buffer layout and the generated WGSL vertex inputs are both
//! derived from it.

use std::collections::BTreeSet;
use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::error::ConfigError;
use crate::{INFLUENCES_PER_VERTEX, JOINT_COUNT};

/// Tolerance when checking that joint weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Bind-pose vertex with up to three joint influences.
///
/// A zero weight disables that slot, but its index is still read by the
/// shader and must name a valid joint.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in bind-pose model space
    pub position: Vec2,
    pub joint_indices: [u32; INFLUENCES_PER_VERTEX],
    pub joint_weights: [f32; INFLUENCES_PER_VERTEX],
}

impl Vertex {
    pub const fn new(
        position: Vec2,
        joint_indices: [u32; INFLUENCES_PER_VERTEX],
        joint_weights: [f32; INFLUENCES_PER_VERTEX],
    ) -> Self {
        Self {
            position,
            joint_indices,
            joint_weights,
        }
    }

    /// Vertex fully bound to one joint. Unused slots point at joint 0.
    pub const fn rigid(position: Vec2, joint: u32) -> Self {
        Self::new(position, [joint, 0, 0], [1.0, 0.0, 0.0])
    }

    pub fn weight_sum(&self) -> f32 {
        self.joint_weights.iter().sum()
    }
}

/// Scalar type of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float32x2,
    Uint32,
    Float32,
}

impl AttributeKind {
    pub const fn size(self) -> u64 {
        match self {
            AttributeKind::Float32x2 => 8,
            AttributeKind::Uint32 | AttributeKind::Float32 => 4,
        }
    }

    pub const fn wgsl_type(self) -> &'static str {
        match self {
            AttributeKind::Float32x2 => "vec2<f32>",
            AttributeKind::Uint32 => "u32",
            AttributeKind::Float32 => "f32",
        }
    }
}

/// Location, name, type and byte offset of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    pub location: u32,
    pub name: &'static str,
    pub kind: AttributeKind,
    pub offset: u64,
}

const fn attr(
    location: u32,
    name: &'static str,
    kind: AttributeKind,
    offset: usize,
) -> VertexAttributeDesc {
    VertexAttributeDesc {
        location,
        name,
        kind,
        offset: offset as u64,
    }
}

const INDICES: usize = offset_of!(Vertex, joint_indices);
const WEIGHTS: usize = offset_of!(Vertex, joint_weights);

/// The seven per-vertex attributes, in shader location order.
pub static VERTEX_ATTRIBUTES: [VertexAttributeDesc; 1 + 2 * INFLUENCES_PER_VERTEX] = [
    attr(0, "position", AttributeKind::Float32x2, offset_of!(Vertex, position)),
    attr(1, "joint_index_0", AttributeKind::Uint32, INDICES),
    attr(2, "joint_index_1", AttributeKind::Uint32, INDICES + 4),
    attr(3, "joint_index_2", AttributeKind::Uint32, INDICES + 8),
    attr(4, "joint_weight_0", AttributeKind::Float32, WEIGHTS),
    attr(5, "joint_weight_1", AttributeKind::Float32, WEIGHTS + 4),
    attr(6, "joint_weight_2", AttributeKind::Float32, WEIGHTS + 8),
];

/// Stride of [`Vertex`] in a vertex buffer.
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

/// Validated vertices plus triangle-list indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl MeshData {
    /// Validate authored vertices and triangle indices.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Result<Self, ConfigError> {
        if vertices.len() > u16::MAX as usize + 1 {
            return Err(ConfigError::TooManyVertices(vertices.len()));
        }

        for (index, vertex) in vertices.iter().enumerate() {
            validate_vertex(index, vertex)?;
        }

        if indices.len() % 3 != 0 {
            return Err(ConfigError::IncompleteTriangle(indices.len()));
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertices.len())
        {
            return Err(ConfigError::TriangleIndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self { vertices, indices })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique undirected triangle edges, smaller index first.
    pub fn edges(&self) -> Vec<(u16, u16)> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.into_iter().collect()
    }
}

fn validate_vertex(index: usize, vertex: &Vertex) -> Result<(), ConfigError> {
    if let Some(&joint) = vertex
        .joint_indices
        .iter()
        .find(|&&j| j as usize >= JOINT_COUNT)
    {
        return Err(ConfigError::JointIndexOutOfRange {
            vertex: index,
            joint,
            joint_count: JOINT_COUNT,
        });
    }

    if vertex.joint_weights.iter().any(|w| *w < 0.0) {
        return Err(ConfigError::NegativeWeight { vertex: index });
    }

    let sum = vertex.weight_sum();
    if sum.is_nan() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::WeightSum {
            vertex: index,
            weights: vertex.joint_weights,
        });
    }

    Ok(())
}
