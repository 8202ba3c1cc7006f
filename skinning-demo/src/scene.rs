//! Window-independent viewer state
//!
//! Owns the skeleton configuration, the mesh and the Current Pose, and keeps
//! the pose palette and uniform block in step with pointer input. Nothing here
//! touches the GPU.

use glam::{Mat4, Vec3};
use skinning_core::{
    BlendDriver, ConfigError, MeshData, PosePalette, SkeletonConfig, SkeletonPose, SkinnedVertex,
    SkinningUniforms, skin_vertices,
};

use crate::config::BlendConfig;

pub struct Scene {
    skeleton: SkeletonConfig,
    mesh: MeshData,
    driver: BlendDriver,
    current: SkeletonPose,
    palette: PosePalette,
    uniforms: SkinningUniforms,
    view: Mat4,
}

impl Scene {
    /// Resolve the configured pose names and evaluate the first Current Pose.
    pub fn new(
        skeleton: SkeletonConfig,
        mesh: MeshData,
        blend: &BlendConfig,
    ) -> Result<Self, ConfigError> {
        let mut driver = BlendDriver::for_config(&skeleton);
        if let Some(name) = &blend.left {
            driver.set_left(skeleton.resolve(name)?);
        }
        if let Some(name) = &blend.right {
            driver.set_right(skeleton.resolve(name)?);
        }
        driver.set_factor(blend.factor);

        let current = *skeleton.bind_pose();
        let palette = PosePalette::from_pose(&current);
        let uniforms = SkinningUniforms::new(Mat4::IDENTITY, &palette, skeleton.bind_inverses());

        let mut scene = Self {
            skeleton,
            mesh,
            driver,
            current,
            palette,
            uniforms,
            view: Mat4::IDENTITY,
        };
        scene.refresh();
        Ok(scene)
    }

    /// Recompute the Current Pose, the palette and the uniforms.
    fn refresh(&mut self) {
        self.driver.evaluate(&self.skeleton, &mut self.current);
        self.palette.update(&self.current);
        self.uniforms.set_pose(self.view, &self.palette);
    }

    /// Pointer moved to `x` over a surface `width` pixels wide.
    ///
    /// Returns true if the pose changed.
    pub fn pointer_moved(&mut self, x: f64, width: f64) -> bool {
        let before = self.driver.factor();
        self.driver.set_pointer(x, width);
        if self.driver.factor() == before {
            return false;
        }
        self.refresh();
        true
    }

    pub fn cycle_left(&mut self) {
        self.driver.cycle_left(&self.skeleton);
        self.refresh();
        tracing::info!("Left pose: {}", self.skeleton.name(self.driver.left()));
    }

    pub fn cycle_right(&mut self) {
        self.driver.cycle_right(&self.skeleton);
        self.refresh();
        tracing::info!("Right pose: {}", self.skeleton.name(self.driver.right()));
    }

    /// Surface resized. Keeps the unit square visible and undistorted.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.view = view_matrix(width, height);
        self.uniforms.set_pose(self.view, &self.palette);
    }

    pub fn skeleton(&self) -> &SkeletonConfig {
        &self.skeleton
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    #[cfg(test)]
    pub fn driver(&self) -> &BlendDriver {
        &self.driver
    }

    pub fn current_pose(&self) -> &SkeletonPose {
        &self.current
    }

    pub fn palette(&self) -> &PosePalette {
        &self.palette
    }

    pub fn uniforms(&self) -> &SkinningUniforms {
        &self.uniforms
    }

    /// Mesh skinned on the host with the same formula as the vertex stage.
    pub fn skinned_vertices(&self) -> Vec<SkinnedVertex> {
        skin_vertices(
            self.mesh.vertices(),
            &self.palette,
            self.skeleton.bind_inverses(),
        )
    }

    /// e.g. `curl_left <0.42> curl_right`
    pub fn describe(&self) -> String {
        format!(
            "{} <{:.2}> {}",
            self.skeleton.name(self.driver.left()),
            self.driver.factor(),
            self.skeleton.name(self.driver.right())
        )
    }
}

/// Model space → clip space, fitting [-1, 1]² into the shorter axis.
pub fn view_matrix(width: u32, height: u32) -> Mat4 {
    if width == 0 || height == 0 {
        return Mat4::IDENTITY;
    }
    let aspect = width as f32 / height as f32;
    if aspect >= 1.0 {
        Mat4::from_scale(Vec3::new(1.0 / aspect, 1.0, 1.0))
    } else {
        Mat4::from_scale(Vec3::new(1.0, aspect, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use skinning_core::reference;

    fn scene(blend: BlendConfig) -> Scene {
        Scene::new(
            reference::skeleton().unwrap(),
            reference::mesh().unwrap(),
            &blend,
        )
        .unwrap()
    }

    #[test]
    fn test_default_selection() {
        let scene = scene(BlendConfig::default());
        assert_eq!(scene.describe(), "curl_left <0.00> curl_right");
        assert_eq!(
            scene.current_pose(),
            scene.skeleton().pose(scene.driver().left())
        );
    }

    #[test]
    fn test_named_selection() {
        let scene = scene(BlendConfig {
            left: Some("wave".into()),
            right: Some("shrug".into()),
            factor: 1.0,
        });
        let shrug = scene.skeleton().resolve("shrug").unwrap();
        assert_eq!(scene.current_pose(), scene.skeleton().pose(shrug));
    }

    #[test]
    fn test_unknown_pose_rejected() {
        let result = Scene::new(
            reference::skeleton().unwrap(),
            reference::mesh().unwrap(),
            &BlendConfig {
                left: Some("moonwalk".into()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ConfigError::UnknownPose(name)) if name == "moonwalk"));
    }

    #[test]
    fn test_pointer_updates_pose_and_uniforms() {
        let mut scene = scene(BlendConfig::default());
        assert!(scene.pointer_moved(640.0, 640.0));

        let right = scene.skeleton().pose(scene.driver().right());
        assert_eq!(scene.current_pose(), right);
        let palette = PosePalette::from_pose(right);
        assert_eq!(
            scene.uniforms().current_pose[4],
            palette.model[4].to_cols_array_2d()
        );
    }

    #[test]
    fn test_pointer_at_same_factor_is_noop() {
        let mut scene = scene(BlendConfig::default());
        assert!(scene.pointer_moved(320.0, 640.0));
        assert!(!scene.pointer_moved(320.0, 640.0));
        // Beyond the edge clamps to the same factor as the edge
        assert!(scene.pointer_moved(640.0, 640.0));
        assert!(!scene.pointer_moved(900.0, 640.0));
    }

    #[test]
    fn test_cycle_changes_pair() {
        let mut scene = scene(BlendConfig::default());
        scene.cycle_right();
        assert_eq!(Some(scene.driver().right()), scene.skeleton().find("wave"));
        assert_eq!(scene.describe(), "curl_left <0.00> wave");
    }

    #[test]
    fn test_view_matrix_keeps_aspect() {
        let wide = view_matrix(1280, 640);
        let p = wide.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);

        let tall = view_matrix(400, 800);
        let p = tall.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);

        assert_eq!(view_matrix(0, 720), Mat4::IDENTITY);
    }

    #[test]
    fn test_resize_writes_view_into_uniforms() {
        let mut scene = scene(BlendConfig::default());
        scene.resize(1280, 640);
        assert_eq!(
            scene.uniforms().view,
            view_matrix(1280, 640).to_cols_array_2d()
        );
    }

    #[test]
    fn test_bind_only_scene_skins_in_place() {
        let skeleton = reference::skeleton().unwrap();
        let bind = *skeleton.bind_pose();
        let single = SkeletonConfig::new(vec![("bind".into(), bind)]).unwrap();
        let scene = Scene::new(single, reference::mesh().unwrap(), &BlendConfig::default()).unwrap();

        for (vertex, skinned) in scene.mesh().vertices().iter().zip(scene.skinned_vertices()) {
            assert!(skinned.position.abs_diff_eq(vertex.position, 1e-5));
            assert!(skinned.color.cmpge(Vec4::ZERO).all());
        }
    }
}
