//! Reference skeleton and mesh shipped with the demo
//!
//! Seven joints: a five-joint spine rising from (0, -0.75), and two arms
//! branching from joint 2.
//!
//! ```text
//!           4  (head)
//!           |
//!           3
//!           |
//!    5 ---- 2 ---- 6
//!           |
//!           1
//!           |
//!           0  (root)
//! ```

use glam::{Vec2, Vec4};

use crate::error::ConfigError;
use crate::joint::JointPose;
use crate::mesh::{MeshData, Vertex};
use crate::pose::SkeletonPose;
use crate::skeleton::SkeletonConfig;

/// Distance between consecutive spine joints.
const SEGMENT: f32 = 0.25;
/// Half width of the spine ribbon.
const HALF_WIDTH: f32 = 0.1;
/// Half height of the arm ribbons.
const ARM_HALF_HEIGHT: f32 = 0.05;

const JOINT_COLORS: [Vec4; 7] = [
    Vec4::new(0.85, 0.85, 0.85, 1.0),
    Vec4::new(0.90, 0.25, 0.20, 1.0),
    Vec4::new(0.95, 0.55, 0.15, 1.0),
    Vec4::new(0.95, 0.85, 0.20, 1.0),
    Vec4::new(0.30, 0.80, 0.35, 1.0),
    Vec4::new(0.20, 0.75, 0.90, 1.0),
    Vec4::new(0.80, 0.35, 0.85, 1.0),
];

/// Per-pose deviation from the bind pose.
struct PoseParams {
    root: Vec2,
    /// Rotation of spine joints 1..=4, degrees
    spine: [f32; 4],
    /// Rotation offset of the left and right arm, degrees
    arms: [f32; 2],
    head_scale: f32,
    /// Blended towards white by this amount
    fade: f32,
}

const BIND: PoseParams = PoseParams {
    root: Vec2::new(0.0, -0.75),
    spine: [0.0; 4],
    arms: [0.0; 2],
    head_scale: 1.0,
    fade: 0.0,
};

fn build_pose(params: &PoseParams) -> Result<SkeletonPose, ConfigError> {
    let color = |joint: usize| JOINT_COLORS[joint].lerp(Vec4::ONE, params.fade);
    let [s1, s2, s3, s4] = params.spine;
    let [left, right] = params.arms;

    SkeletonPose::new([
        JointPose::root(params.root, 90.0).with_color(color(0)),
        JointPose::child(0, Vec2::new(SEGMENT, 0.0), s1).with_color(color(1)),
        JointPose::child(1, Vec2::new(SEGMENT, 0.0), s2).with_color(color(2)),
        JointPose::child(2, Vec2::new(SEGMENT, 0.0), s3).with_color(color(3)),
        JointPose::child(3, Vec2::new(SEGMENT, 0.0), s4)
            .with_color(color(4))
            .with_scale(params.head_scale),
        // Arm frames sit on the ribbon edge and point outwards along model x
        JointPose::child(2, Vec2::new(0.0, HALF_WIDTH), 90.0 + left).with_color(color(5)),
        JointPose::child(2, Vec2::new(0.0, -HALF_WIDTH), -90.0 + right).with_color(color(6)),
    ])
}

/// Bind pose plus four authored poses.
pub fn skeleton() -> Result<SkeletonConfig, ConfigError> {
    let poses = [
        ("bind", BIND),
        (
            "curl_left",
            PoseParams {
                spine: [20.0; 4],
                arms: [20.0, 20.0],
                ..BIND
            },
        ),
        (
            "curl_right",
            PoseParams {
                spine: [-20.0; 4],
                arms: [-20.0, -20.0],
                ..BIND
            },
        ),
        (
            "wave",
            PoseParams {
                spine: [25.0, -25.0, 25.0, -25.0],
                arms: [-45.0, 45.0],
                fade: 0.25,
                ..BIND
            },
        ),
        (
            "shrug",
            PoseParams {
                root: Vec2::new(0.0, -0.7),
                arms: [-30.0, 30.0],
                head_scale: 1.3,
                fade: 0.1,
                ..BIND
            },
        ),
    ];

    let named = poses
        .iter()
        .map(|(name, params)| Ok((name.to_string(), build_pose(params)?)))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    SkeletonConfig::new(named)
}

/// Spine levels: model-space y and the (joint, weight) influences.
fn spine_levels() -> [(f32, [u32; 3], [f32; 3]); 6] {
    [
        (-0.75, [0, 0, 0], [1.0, 0.0, 0.0]),
        (-0.50, [0, 1, 0], [0.5, 0.5, 0.0]),
        (-0.25, [1, 2, 3], [0.25, 0.5, 0.25]),
        (0.00, [2, 3, 0], [0.5, 0.5, 0.0]),
        (0.25, [3, 4, 0], [0.3, 0.7, 0.0]),
        (0.45, [4, 0, 0], [1.0, 0.0, 0.0]),
    ]
}

/// Ribbon following the spine, plus one ribbon per arm.
pub fn mesh() -> Result<MeshData, ConfigError> {
    let mut vertices = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    // Spine: two vertices per level, a quad between consecutive levels
    for (y, joints, weights) in spine_levels() {
        vertices.push(Vertex::new(Vec2::new(-HALF_WIDTH, y), joints, weights));
        vertices.push(Vertex::new(Vec2::new(HALF_WIDTH, y), joints, weights));
    }
    for level in 0..spine_levels().len() as u16 - 1 {
        let (bl, br, tl, tr) = (2 * level, 2 * level + 1, 2 * level + 2, 2 * level + 3);
        indices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
    }

    // Arms: columns outwards from the spine edge, shoulder blended with joint 2
    let arm_y = -0.25;
    for (side, joint) in [(1.0f32, 6u32), (-1.0, 5)] {
        let base = vertices.len() as u16;
        let columns = [
            (HALF_WIDTH, [2, joint, 0], [0.5, 0.5, 0.0]),
            (0.25, [joint, 0, 0], [1.0, 0.0, 0.0]),
            (0.45, [joint, 0, 0], [1.0, 0.0, 0.0]),
        ];
        for (x, joints, weights) in columns {
            let x = side * x;
            vertices.push(Vertex::new(Vec2::new(x, arm_y - ARM_HALF_HEIGHT), joints, weights));
            vertices.push(Vertex::new(Vec2::new(x, arm_y + ARM_HALF_HEIGHT), joints, weights));
        }
        for column in 0..columns.len() as u16 - 1 {
            let b = base + 2 * column;
            indices.extend_from_slice(&[b, b + 2, b + 3, b, b + 3, b + 1]);
        }
    }

    MeshData::new(vertices, indices)
}
