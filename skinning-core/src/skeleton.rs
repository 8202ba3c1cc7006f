//! Skeleton configuration: the bind pose, named reference poses and the
//! inverse bind cache derived from them.
//!
//! Replaces process-wide pose tables with one value owned by whoever drives
//! the render loop. Building it enforces the initialization order: the bind
//! pose exists before its inverse cache, and every reference pose is checked
//! against the bind pose topology before anything can blend it.

use crate::bind_inverse::BindPoseInverses;
use crate::error::ConfigError;
use crate::pose::SkeletonPose;

/// Index of a named pose inside a [`SkeletonConfig`].
///
/// Only obtainable from [`SkeletonConfig::find`], [`SkeletonConfig::resolve`]
/// or [`crate::BIND_POSE`], so an id always addresses a pose of the
/// configuration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoseId(pub(crate) usize);

impl PoseId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SkeletonConfig {
    names: Vec<String>,
    poses: Vec<SkeletonPose>,
    bind_inverses: BindPoseInverses,
}

impl SkeletonConfig {
    /// Build from named poses; the first entry is the bind pose.
    pub fn new(named_poses: Vec<(String, SkeletonPose)>) -> Result<Self, ConfigError> {
        let (names, poses): (Vec<String>, Vec<SkeletonPose>) = named_poses.into_iter().unzip();

        let bind_pose = poses.first().ok_or(ConfigError::NoBindPose)?;

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ConfigError::DuplicatePoseName(name.clone()));
            }
        }

        for (name, pose) in names.iter().zip(&poses).skip(1) {
            if let Some(joint) = pose.topology_mismatch(bind_pose) {
                return Err(ConfigError::TopologyMismatch {
                    pose: name.clone(),
                    joint,
                });
            }
        }

        let bind_inverses = BindPoseInverses::build(bind_pose)?;

        tracing::info!(
            "Skeleton configured with {} poses: {}",
            poses.len(),
            names.join(", ")
        );

        Ok(Self {
            names,
            poses,
            bind_inverses,
        })
    }

    /// Panics if `id` did not come from this configuration.
    #[inline]
    pub fn pose(&self, id: PoseId) -> &SkeletonPose {
        &self.poses[id.0]
    }

    #[inline]
    pub fn bind_pose(&self) -> &SkeletonPose {
        &self.poses[crate::BIND_POSE.0]
    }

    #[inline]
    pub fn bind_inverses(&self) -> &BindPoseInverses {
        &self.bind_inverses
    }

    pub fn name(&self, id: PoseId) -> &str {
        &self.names[id.0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn find(&self, name: &str) -> Option<PoseId> {
        self.names.iter().position(|n| n == name).map(PoseId)
    }

    pub fn resolve(&self, name: &str) -> Result<PoseId, ConfigError> {
        self.find(name)
            .ok_or_else(|| ConfigError::UnknownPose(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JOINT_COUNT;
    use crate::joint::JointPose;
    use glam::Vec2;

    fn chain(bend: f32) -> SkeletonPose {
        SkeletonPose::new(std::array::from_fn(|i| {
            if i == 0 {
                JointPose::root(Vec2::ZERO, 90.0)
            } else {
                JointPose::child(i - 1, Vec2::new(0.2, 0.0), bend)
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let config = SkeletonConfig::new(vec![
            ("bind".into(), chain(0.0)),
            ("bent".into(), chain(20.0)),
        ])
        .unwrap();

        assert_eq!(config.len(), 2);
        assert_eq!(config.find("bent"), Some(PoseId(1)));
        assert_eq!(config.name(PoseId(1)), "bent");
        assert_eq!(config.bind_pose(), &chain(0.0));
        assert_eq!(
            config.resolve("missing").unwrap_err(),
            ConfigError::UnknownPose("missing".into())
        );
    }

    #[test]
    fn test_resolved_ids_address_poses() {
        let config = SkeletonConfig::new(vec![
            ("bind".into(), chain(0.0)),
            ("bent".into(), chain(20.0)),
            ("curled".into(), chain(-35.0)),
        ])
        .unwrap();

        for name in config.names() {
            let id = config.resolve(name).unwrap();
            assert!(id.index() < config.len());
            assert_eq!(config.name(id), name);
        }
        assert_eq!(crate::BIND_POSE.index(), 0);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            SkeletonConfig::new(Vec::new()).unwrap_err(),
            ConfigError::NoBindPose
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = SkeletonConfig::new(vec![
            ("bind".into(), chain(0.0)),
            ("bind".into(), chain(10.0)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicatePoseName("bind".into())
        );
    }

    #[test]
    fn test_topology_mismatch_rejected() {
        let mut joints = *chain(0.0).joints();
        joints[JOINT_COUNT - 1].parent = Some(0);
        let other = SkeletonPose::new(joints).unwrap();

        let result = SkeletonConfig::new(vec![("bind".into(), chain(0.0)), ("odd".into(), other)]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::TopologyMismatch {
                pose: "odd".into(),
                joint: JOINT_COUNT - 1
            }
        );
    }

    #[test]
    fn test_singular_bind_pose_rejected() {
        let mut joints = *chain(0.0).joints();
        joints[0].scale = 0.0;
        let bind = SkeletonPose::new(joints).unwrap();
        assert!(matches!(
            SkeletonConfig::new(vec![("bind".into(), bind)]).unwrap_err(),
            ConfigError::SingularBindTransform { joint: 0, .. }
        ));
    }
}
