//! Immediate-mode debug lines, rebuilt from host-side math every frame
//!
//! Bones run from each parent's origin to its child's origin, joints get a
//! small cross in their own color, and the optional wireframe traces the mesh
//! triangles as skinned on the host.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use skinning_core::{JOINT_COUNT, MeshData, PosePalette, SkeletonPose, SkinnedVertex};

/// Half extent of a joint cross, in model units
const JOINT_MARKER_SIZE: f32 = 0.03;
const WIREFRAME_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.35);

/// Line list vertex: position + RGBA color (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: Vec2, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Which overlays to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugOptions {
    pub bones: bool,
    pub wireframe: bool,
}

#[derive(Debug, Default)]
pub struct DebugLines {
    vertices: Vec<LineVertex>,
}

impl DebugLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, from_color: Vec4, to_color: Vec4) {
        self.vertices.push(LineVertex::new(from, from_color));
        self.vertices.push(LineVertex::new(to, to_color));
    }

    pub fn cross(&mut self, center: Vec2, size: f32, color: Vec4) {
        self.line(center - Vec2::X * size, center + Vec2::X * size, color, color);
        self.line(center - Vec2::Y * size, center + Vec2::Y * size, color, color);
    }

    /// Parent → child segments, shaded from parent color to child color.
    pub fn bones(&mut self, pose: &SkeletonPose, palette: &PosePalette) {
        for joint in 0..JOINT_COUNT {
            if let Some(parent) = pose.joint(joint).parent {
                self.line(
                    origin(palette, parent),
                    origin(palette, joint),
                    palette.colors[parent],
                    palette.colors[joint],
                );
            }
        }
    }

    pub fn joints(&mut self, palette: &PosePalette) {
        for joint in 0..JOINT_COUNT {
            self.cross(
                origin(palette, joint),
                JOINT_MARKER_SIZE,
                palette.colors[joint],
            );
        }
    }

    /// Unique triangle edges of the host-skinned mesh.
    pub fn wireframe(&mut self, mesh: &MeshData, skinned: &[SkinnedVertex]) {
        for (a, b) in mesh.edges() {
            let (a, b) = (skinned[a as usize].position, skinned[b as usize].position);
            self.line(a, b, WIREFRAME_COLOR, WIREFRAME_COLOR);
        }
    }

    /// Rebuild all enabled overlays.
    pub fn rebuild(
        &mut self,
        options: DebugOptions,
        pose: &SkeletonPose,
        palette: &PosePalette,
        mesh: &MeshData,
        skinned: impl FnOnce() -> Vec<SkinnedVertex>,
    ) {
        self.clear();
        if options.wireframe {
            self.wireframe(mesh, &skinned());
        }
        if options.bones {
            self.bones(pose, palette);
            self.joints(palette);
        }
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Model-space origin of a joint frame in the evaluated palette.
fn origin(palette: &PosePalette, joint: usize) -> Vec2 {
    palette.model[joint].w_axis.truncate().truncate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinning_core::{joint_origin, reference, skin_vertices};

    #[test]
    fn test_line_vertex_layout() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
    }

    #[test]
    fn test_bones_connect_joint_origins() {
        let config = reference::skeleton().unwrap();
        let pose = config.pose(config.resolve("wave").unwrap());
        let palette = PosePalette::from_pose(pose);

        let mut lines = DebugLines::new();
        lines.bones(pose, &palette);

        // Every non-root joint contributes one bone
        assert_eq!(lines.vertices().len(), 2 * (JOINT_COUNT - 1));
        let head_bone = &lines.vertices()[2 * 3..2 * 3 + 2];
        let tip = Vec2::from_array(head_bone[1].position);
        assert!(tip.abs_diff_eq(joint_origin(pose, 4), 1e-5));
        assert_eq!(head_bone[1].color, palette.colors[4].to_array());
    }

    #[test]
    fn test_joint_crosses() {
        let config = reference::skeleton().unwrap();
        let palette = PosePalette::from_pose(config.bind_pose());
        let mut lines = DebugLines::new();
        lines.joints(&palette);
        assert_eq!(lines.vertex_count() as usize, 4 * JOINT_COUNT);

        // Horizontal stroke of joint 0 is centred on its origin
        let left = Vec2::from_array(lines.vertices()[0].position);
        let right = Vec2::from_array(lines.vertices()[1].position);
        assert!(((left + right) * 0.5).abs_diff_eq(Vec2::new(0.0, -0.75), 1e-5));
    }

    #[test]
    fn test_wireframe_uses_skinned_positions() {
        let config = reference::skeleton().unwrap();
        let mesh = reference::mesh().unwrap();
        let palette = PosePalette::from_pose(config.pose(config.resolve("curl_left").unwrap()));
        let skinned = skin_vertices(mesh.vertices(), &palette, config.bind_inverses());

        let mut lines = DebugLines::new();
        lines.wireframe(&mesh, &skinned);
        assert_eq!(lines.vertices().len(), 2 * mesh.edges().len());

        let (a, _) = mesh.edges()[0];
        assert_eq!(
            Vec2::from_array(lines.vertices()[0].position),
            skinned[a as usize].position
        );
    }

    #[test]
    fn test_rebuild_respects_options() {
        let config = reference::skeleton().unwrap();
        let mesh = reference::mesh().unwrap();
        let pose = config.bind_pose();
        let palette = PosePalette::from_pose(pose);
        let skin = || skin_vertices(mesh.vertices(), &palette, config.bind_inverses());

        let mut lines = DebugLines::new();
        lines.rebuild(
            DebugOptions {
                bones: false,
                wireframe: false,
            },
            pose,
            &palette,
            &mesh,
            skin,
        );
        assert!(lines.vertices().is_empty());

        lines.rebuild(
            DebugOptions {
                bones: true,
                wireframe: true,
            },
            pose,
            &palette,
            &mesh,
            skin,
        );
        let expected = 2 * mesh.edges().len() + 2 * (JOINT_COUNT - 1) + 4 * JOINT_COUNT;
        assert_eq!(lines.vertices().len(), expected);
    }
}
