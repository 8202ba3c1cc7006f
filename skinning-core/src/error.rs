//! Error types for skeleton configuration and shader generation
//!
//! Both are startup-only failures. Once a [`crate::SkeletonConfig`] and a
//! [`crate::MeshData`] exist, per-frame evaluation cannot fail.

/// Invalid authored skeleton or mesh data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("joint {joint} references parent {parent}, outside 0..{joint_count}")]
    ParentOutOfRange {
        joint: usize,
        parent: usize,
        joint_count: usize,
    },

    #[error("joint {joint} is its own parent")]
    SelfParent { joint: usize },

    #[error("joint hierarchy contains a cycle through joint {joint}")]
    HierarchyCycle { joint: usize },

    #[error("skeleton pose has no root joint")]
    NoRoot,

    #[error("bind pose transform of joint {joint} is singular (determinant {determinant})")]
    SingularBindTransform { joint: usize, determinant: f32 },

    #[error("pose '{pose}' joint {joint} has a different parent than the bind pose")]
    TopologyMismatch { pose: String, joint: usize },

    #[error("skeleton configuration needs at least a bind pose")]
    NoBindPose,

    #[error("duplicate pose name '{0}'")]
    DuplicatePoseName(String),

    #[error("unknown pose '{0}'")]
    UnknownPose(String),

    #[error("vertex {vertex} references joint {joint}, outside 0..{joint_count}")]
    JointIndexOutOfRange {
        vertex: usize,
        joint: u32,
        joint_count: usize,
    },

    #[error("vertex {vertex} joint weights {weights:?} do not sum to 1.0")]
    WeightSum { vertex: usize, weights: [f32; 3] },

    #[error("vertex {vertex} has a negative joint weight")]
    NegativeWeight { vertex: usize },

    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("triangle index {index} at position {position} exceeds vertex count {vertex_count}")]
    TriangleIndexOutOfRange {
        position: usize,
        index: u16,
        vertex_count: usize,
    },

    #[error("mesh has {0} vertices, more than 16-bit indices can address")]
    TooManyVertices(usize),
}

/// WGSL parse or validation failure, carrying the rendered diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to parse shader '{label}':\n{log}")]
    Parse { label: String, log: String },

    #[error("failed to validate shader '{label}':\n{log}")]
    Validation { label: String, log: String },
}
