//! Skeletal pose evaluation and linear blend skinning
//!
//! Host-side half of the skinning demo. Everything here is pure CPU math with
//! no window or GPU dependency:
//!
//! - [`JointPose`] / [`SkeletonPose`]: joint hierarchy with index-based parents
//! - [`transform`]: local (T·R·S) and model-space joint matrices
//! - [`BindPoseInverses`]: per-joint inverse bind matrices, built once
//! - [`blend`]: two-pose linear blending into a Current Pose
//! - [`BlendDriver`]: pointer position → blend factor policy
//! - [`skinning`]: host evaluation of the skinning formula and the GPU uniform block
//! - [`shader`]: WGSL generated from the same constants and attribute table
//!
//! # Data flow
//!
//! ```text
//! SkeletonConfig (bind pose + named poses)
//!     ├─► BindPoseInverses            (once, at startup)
//!     └─► BlendDriver::evaluate       (per pointer event)
//!             └─► Current Pose ─► PosePalette ─► SkinningUniforms (GPU)
//!                                      └──────► skin_vertex        (debug overlay)
//! ```

pub mod bind_inverse;
pub mod blend;
pub mod driver;
pub mod error;
pub mod joint;
pub mod mesh;
pub mod pose;
pub mod reference;
pub mod shader;
pub mod skeleton;
pub mod skinning;
pub mod transform;

pub use bind_inverse::BindPoseInverses;
pub use blend::{blend, blend_into};
pub use driver::{BlendDriver, normalized_pointer};
pub use error::{ConfigError, ShaderError};
pub use joint::JointPose;
pub use mesh::{AttributeKind, MeshData, VERTEX_ATTRIBUTES, Vertex, VertexAttributeDesc};
pub use pose::SkeletonPose;
pub use shader::{debug_line_shader, skinning_shader, validate_wgsl};
pub use skeleton::{PoseId, SkeletonConfig};
pub use skinning::{PosePalette, SkinnedVertex, SkinningUniforms, skin_vertex, skin_vertices};
pub use transform::{joint_origin, local_transform, model_transform, model_transforms};

/// Number of joints in every skeleton pose.
pub const JOINT_COUNT: usize = 7;

/// Maximum joints influencing a single vertex.
pub const INFLUENCES_PER_VERTEX: usize = 3;

/// Reserved slot of the bind pose inside a [`SkeletonConfig`].
pub const BIND_POSE: PoseId = PoseId(0);
