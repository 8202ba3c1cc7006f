//! Skeleton pose: a fixed-size, validated set of joint poses

use crate::JOINT_COUNT;
use crate::error::ConfigError;
use crate::joint::JointPose;

/// One pose of the whole skeleton, indexed by joint ID.
///
/// Construction through [`SkeletonPose::new`] guarantees every parent index is
/// in range and the hierarchy is acyclic, so recursive transform evaluation is
/// bounded by [`JOINT_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonPose {
    joints: [JointPose; JOINT_COUNT],
}

impl SkeletonPose {
    /// Validate and wrap an authored joint array.
    pub fn new(joints: [JointPose; JOINT_COUNT]) -> Result<Self, ConfigError> {
        validate_hierarchy(&joints)?;
        Ok(Self { joints })
    }

    #[inline]
    pub fn joints(&self) -> &[JointPose; JOINT_COUNT] {
        &self.joints
    }

    /// Mutable joint access for blending and authoring.
    ///
    /// Only the interpolated fields may be changed through this; parent links
    /// are fixed once the pose has been validated.
    #[inline]
    pub(crate) fn joints_mut(&mut self) -> &mut [JointPose; JOINT_COUNT] {
        &mut self.joints
    }

    /// Panics if `index >= JOINT_COUNT`.
    #[inline]
    pub fn joint(&self, index: usize) -> &JointPose {
        &self.joints[index]
    }

    /// Parent index of every joint.
    pub fn parents(&self) -> [Option<usize>; JOINT_COUNT] {
        std::array::from_fn(|i| self.joints[i].parent)
    }

    /// True when both poses share the same parent/child shape.
    pub fn same_topology(&self, other: &SkeletonPose) -> bool {
        self.parents() == other.parents()
    }

    /// First joint whose parent differs from `other`, if any.
    pub fn topology_mismatch(&self, other: &SkeletonPose) -> Option<usize> {
        (0..JOINT_COUNT).find(|&i| self.joints[i].parent != other.joints[i].parent)
    }
}

fn validate_hierarchy(joints: &[JointPose; JOINT_COUNT]) -> Result<(), ConfigError> {
    for (joint, pose) in joints.iter().enumerate() {
        match pose.parent {
            Some(parent) if parent >= JOINT_COUNT => {
                return Err(ConfigError::ParentOutOfRange {
                    joint,
                    parent,
                    joint_count: JOINT_COUNT,
                });
            }
            Some(parent) if parent == joint => return Err(ConfigError::SelfParent { joint }),
            _ => {}
        }
    }

    if joints.iter().all(|j| j.parent.is_some()) {
        return Err(ConfigError::NoRoot);
    }

    // Any chain longer than JOINT_COUNT links must revisit a joint.
    for start in 0..JOINT_COUNT {
        let mut current = joints[start].parent;
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if steps > JOINT_COUNT {
                return Err(ConfigError::HierarchyCycle { joint: start });
            }
            current = joints[parent].parent;
        }
    }

    Ok(())
}

impl Default for SkeletonPose {
    /// Every joint is an unparented identity joint.
    fn default() -> Self {
        Self {
            joints: [JointPose::IDENTITY; JOINT_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn chain() -> [JointPose; JOINT_COUNT] {
        std::array::from_fn(|i| {
            if i == 0 {
                JointPose::root(Vec2::ZERO, 0.0)
            } else {
                JointPose::child(i - 1, Vec2::new(0.25, 0.0), 0.0)
            }
        })
    }

    #[test]
    fn test_chain_is_valid() {
        let pose = SkeletonPose::new(chain()).unwrap();
        assert_eq!(pose.joint(0).parent, None);
        assert_eq!(pose.joint(6).parent, Some(5));
    }

    #[test]
    fn test_parent_out_of_range() {
        let mut joints = chain();
        joints[3].parent = Some(JOINT_COUNT);
        assert_eq!(
            SkeletonPose::new(joints).unwrap_err(),
            ConfigError::ParentOutOfRange {
                joint: 3,
                parent: JOINT_COUNT,
                joint_count: JOINT_COUNT
            }
        );
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut joints = chain();
        joints[2].parent = Some(2);
        assert_eq!(
            SkeletonPose::new(joints).unwrap_err(),
            ConfigError::SelfParent { joint: 2 }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        // 0 stays a root; 1 -> 3 -> 2 -> 1 loops
        let mut joints = chain();
        joints[1].parent = Some(3);
        assert!(matches!(
            SkeletonPose::new(joints).unwrap_err(),
            ConfigError::HierarchyCycle { .. }
        ));
    }

    #[test]
    fn test_all_parented_has_no_root() {
        let mut joints = chain();
        joints[0].parent = Some(6);
        assert_eq!(SkeletonPose::new(joints).unwrap_err(), ConfigError::NoRoot);
    }

    #[test]
    fn test_topology_comparison() {
        let a = SkeletonPose::new(chain()).unwrap();
        let mut joints = chain();
        joints[4].parent = Some(0);
        let b = SkeletonPose::new(joints).unwrap();

        assert!(a.same_topology(&a));
        assert!(!a.same_topology(&b));
        assert_eq!(a.topology_mismatch(&b), Some(4));
    }

    #[test]
    fn test_multiple_roots_allowed() {
        let mut joints = chain();
        joints[4].parent = None;
        assert!(SkeletonPose::new(joints).is_ok());
    }
}
