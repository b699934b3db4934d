//! Resolves a [`Rig`] into world matrices for one set of parameters.

use cgmath::{Matrix4, SquareMatrix};

use super::joints::PoseParameters;
use super::rig::{Op, PartSpec, Rig};
use crate::gfx::transform::{rotation, scale, translation};

/// A part ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PosedPart {
    pub name: &'static str,
    pub model: Matrix4<f32>,
    pub color: [f32; 4],
}

fn apply(matrix: Matrix4<f32>, op: &Op, params: &PoseParameters) -> Matrix4<f32> {
    match op {
        Op::Translate(offset) => matrix * translation(*offset),
        Op::Rotate(angle, axis) => matrix * rotation(angle.degrees(params), (*axis).into()),
        Op::Slide(joint, direction) => {
            let amount = params[*joint];
            matrix * translation([direction[0] * amount, direction[1] * amount, direction[2] * amount])
        }
    }
}

fn apply_all(matrix: Matrix4<f32>, ops: &[Op], params: &PoseParameters) -> Matrix4<f32> {
    ops.iter().fold(matrix, |m, op| apply(m, op, params))
}

/// Frame a part hands to its children
pub fn part_frame(parent: Matrix4<f32>, part: &PartSpec, params: &PoseParameters) -> Matrix4<f32> {
    apply_all(parent, &part.pose, params)
}

/// Computes every part's frame top-down, one entry per rig part.
///
/// Frames are plain values: a child copies its parent's entry and builds on
/// the copy, so nothing a child does can reach back into the parent.
pub fn resolve_frames(rig: &Rig, root: Matrix4<f32>, params: &PoseParameters) -> Vec<Matrix4<f32>> {
    let mut frames: Vec<Matrix4<f32>> = Vec::with_capacity(rig.len());
    for (i, part) in rig.parts().iter().enumerate() {
        let parent = rig.parent_of(i).map_or(root, |p| frames[p]);
        frames.push(part_frame(parent, part, params));
    }
    frames
}

/// Poses the rig, skipping parts whose visibility gate is closed
pub fn pose(rig: &Rig, root: Matrix4<f32>, params: &PoseParameters) -> Vec<PosedPart> {
    let frames = resolve_frames(rig, root, params);
    rig.parts()
        .iter()
        .zip(frames)
        .filter(|(part, _)| part.is_visible(params))
        .map(|(part, frame)| PosedPart {
            name: part.name,
            model: apply_all(frame, &part.detail, params) * scale(part.extent(params)),
            color: part.color,
        })
        .collect()
}

/// Identity-rooted pose, for inspection
pub fn pose_at_origin(rig: &Rig, params: &PoseParameters) -> Vec<PosedPart> {
    pose(rig, Matrix4::identity(), params)
}
