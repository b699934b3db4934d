//! # Rig Tables
//!
//! The figure is data: a list of [`PartSpec`] rows, each naming its parent
//! and describing how to get from the parent's frame to its own.
//!
//! For every part the poser computes
//!
//! ```text
//! frame = parent_frame * pose ops          (handed to children)
//! model = frame * detail ops * scale       (drawn)
//! ```
//!
//! so a parent's scale, and anything in its detail ops, never leaks into its
//! children. [`Rig::new`] validates the table once and resolves parent names
//! to indices; parents must be listed before their children so a single
//! forward pass resolves the whole tree.

use std::collections::HashMap;

use super::joints::{Joint, PoseParameters};
use crate::error::RigError;

/// Rotation amount for a [`Op::Rotate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Angle {
    Fixed(f32),
    /// `scale * params[joint]` degrees
    Joint { joint: Joint, scale: f32 },
}

impl Angle {
    pub fn degrees(&self, params: &PoseParameters) -> f32 {
        match *self {
            Angle::Fixed(degrees) => degrees,
            Angle::Joint { joint, scale } => scale * params[joint],
        }
    }
}

/// One local transform step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Translate([f32; 3]),
    Rotate(Angle, [f32; 3]),
    /// Translate by `params[joint] * direction`
    Slide(Joint, [f32; 3]),
}

pub const X: [f32; 3] = [1.0, 0.0, 0.0];
pub const Y: [f32; 3] = [0.0, 1.0, 0.0];
pub const Z: [f32; 3] = [0.0, 0.0, 1.0];

/// A cube-shaped part of the figure
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub pose: Vec<Op>,
    pub detail: Vec<Op>,
    pub scale: [f32; 3],
    /// Adds `params[joint] * factors` to `scale`
    pub stretch: Option<(Joint, [f32; 3])>,
    pub color: [f32; 4],
    /// Drawn only while `params[joint]` exceeds [`VISIBILITY_EPSILON`]
    pub visible_when: Option<Joint>,
}

pub const VISIBILITY_EPSILON: f32 = 0.001;

impl PartSpec {
    pub fn root(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            pose: Vec::new(),
            detail: Vec::new(),
            scale: [1.0; 3],
            stretch: None,
            color: [1.0; 4],
            visible_when: None,
        }
    }

    pub fn child(name: &'static str, parent: &'static str) -> Self {
        Self {
            parent: Some(parent),
            ..Self::root(name)
        }
    }

    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.pose.push(Op::Translate([x, y, z]));
        self
    }

    pub fn rotate(mut self, degrees: f32, axis: [f32; 3]) -> Self {
        self.pose.push(Op::Rotate(Angle::Fixed(degrees), axis));
        self
    }

    /// Rotates by `scale * params[joint]` degrees
    pub fn joint(mut self, joint: Joint, scale: f32, axis: [f32; 3]) -> Self {
        self.pose.push(Op::Rotate(Angle::Joint { joint, scale }, axis));
        self
    }

    pub fn slide(mut self, joint: Joint, direction: [f32; 3]) -> Self {
        self.pose.push(Op::Slide(joint, direction));
        self
    }

    /// Joint rotation applied to this part only, after its frame is captured
    pub fn detail_joint(mut self, joint: Joint, scale: f32, axis: [f32; 3]) -> Self {
        self.detail.push(Op::Rotate(Angle::Joint { joint, scale }, axis));
        self
    }

    pub fn size(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn stretch(mut self, joint: Joint, factors: [f32; 3]) -> Self {
        self.stretch = Some((joint, factors));
        self
    }

    pub fn color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn visible_when(mut self, joint: Joint) -> Self {
        self.visible_when = Some(joint);
        self
    }

    /// Final scale for the current parameters
    pub fn extent(&self, params: &PoseParameters) -> [f32; 3] {
        match self.stretch {
            None => self.scale,
            Some((joint, factors)) => {
                let amount = params[joint];
                [
                    self.scale[0] + amount * factors[0],
                    self.scale[1] + amount * factors[1],
                    self.scale[2] + amount * factors[2],
                ]
            }
        }
    }

    pub fn is_visible(&self, params: &PoseParameters) -> bool {
        self.visible_when
            .map_or(true, |joint| params[joint] > VISIBILITY_EPSILON)
    }
}

/// A validated part table with parents resolved to indices
#[derive(Debug, Clone)]
pub struct Rig {
    parts: Vec<PartSpec>,
    parents: Vec<Option<usize>>,
}

impl Rig {
    pub fn new(parts: Vec<PartSpec>) -> Result<Self, RigError> {
        let mut index: HashMap<&'static str, usize> = HashMap::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            if index.insert(part.name, i).is_some() {
                return Err(RigError::DuplicateName(part.name.to_string()));
            }
        }

        let parents = parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let Some(parent) = part.parent else {
                    return Ok(None);
                };
                match index.get(parent) {
                    None => Err(RigError::UnknownParent {
                        part: part.name.to_string(),
                        parent: parent.to_string(),
                    }),
                    Some(&p) if p >= i => Err(RigError::ParentAfterChild {
                        part: part.name.to_string(),
                        parent: parent.to_string(),
                    }),
                    Some(&p) => Ok(Some(p)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { parts, parents })
    }

    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parts.iter().position(|part| part.name == name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Joints any part of this rig reads
    pub fn joints(&self) -> Vec<Joint> {
        let mut joints = Vec::new();
        let mut push = |joint: Joint| {
            if !joints.contains(&joint) {
                joints.push(joint);
            }
        };
        for part in &self.parts {
            for op in part.pose.iter().chain(&part.detail) {
                match op {
                    Op::Rotate(Angle::Joint { joint, .. }, _) | Op::Slide(joint, _) => push(*joint),
                    _ => {}
                }
            }
            if let Some((joint, _)) = part.stretch {
                push(joint);
            }
            if let Some(joint) = part.visible_when {
                push(joint);
            }
        }
        joints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_resolve_to_indices() {
        let rig = Rig::new(vec![
            PartSpec::root("body"),
            PartSpec::child("head", "body"),
            PartSpec::child("ear", "head"),
        ])
        .unwrap();
        assert_eq!(rig.parent_of(0), None);
        assert_eq!(rig.parent_of(2), Some(1));
        assert_eq!(rig.index_of("ear"), Some(2));
    }

    #[test]
    fn test_table_errors() {
        assert_eq!(
            Rig::new(vec![PartSpec::root("a"), PartSpec::root("a")]).unwrap_err(),
            RigError::DuplicateName("a".into())
        );
        assert_eq!(
            Rig::new(vec![PartSpec::child("a", "ghost")]).unwrap_err(),
            RigError::UnknownParent {
                part: "a".into(),
                parent: "ghost".into()
            }
        );
        assert_eq!(
            Rig::new(vec![PartSpec::child("a", "b"), PartSpec::root("b")]).unwrap_err(),
            RigError::ParentAfterChild {
                part: "a".into(),
                parent: "b".into()
            }
        );
        assert!(matches!(
            Rig::new(vec![PartSpec::child("a", "a")]),
            Err(RigError::ParentAfterChild { .. })
        ));
    }

    #[test]
    fn test_stretch_and_visibility_follow_parameters() {
        let part = PartSpec::root("tongue")
            .size(0.003, 0.01, 0.03)
            .stretch(Joint::TongueOut, [0.06, 0.0, 0.0])
            .visible_when(Joint::TongueOut);
        let mut params = PoseParameters::rest();
        assert!(!part.is_visible(&params));
        assert_eq!(part.extent(&params), [0.003, 0.01, 0.03]);

        params[Joint::TongueOut] = 0.0005;
        assert!(!part.is_visible(&params));
        params[Joint::TongueOut] = 1.0;
        assert!(part.is_visible(&params));
        assert!((part.extent(&params)[0] - 0.063).abs() < 1e-6);
    }

    #[test]
    fn test_joint_angles_are_scaled() {
        let mut params = PoseParameters::rest();
        params[Joint::Head] = 10.0;
        let angle = Angle::Joint {
            joint: Joint::Head,
            scale: -1.0,
        };
        assert_eq!(angle.degrees(&params), -10.0);
        assert_eq!(Angle::Fixed(45.0).degrees(&params), 45.0);
    }
}
