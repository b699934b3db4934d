//! The chihuahua part table.
//!
//! Units are world units at figure scale; every part is a unit cube spanning
//! `[0, 1]` that its scale stretches from the part's corner. Sides are named
//! from the dog's point of view: it faces +x, its right side is at low z.

use super::joints::Joint;
use super::rig::{PartSpec, Rig, X, Y, Z};
use crate::error::RigError;

pub const FUR: [f32; 4] = [0.898, 0.827, 0.702, 1.0];
pub const DARK_FUR: [f32; 4] = [0.824, 0.706, 0.549, 1.0];
pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const TONGUE: [f32; 4] = [0.95, 0.4, 0.55, 1.0];

fn part(name: &'static str, parent: &'static str) -> PartSpec {
    PartSpec::child(name, parent).color(FUR)
}

pub fn rig() -> Result<Rig, RigError> {
    let mut parts = Vec::with_capacity(96);
    parts.extend(front_body());
    parts.extend(middle_body());
    parts.extend(back_body());
    parts.extend(tail());
    parts.extend(head());
    parts.extend(legs());
    Rig::new(parts)
}

fn front_body() -> Vec<PartSpec> {
    vec![
        PartSpec::root("front_body")
            .color(FUR)
            .joint(Joint::FrontBody, 1.0, Y)
            .size(0.18, 0.18, 0.28),
        part("front_body_front", "front_body")
            .translate(0.18, 0.015, 0.0375)
            .size(0.02, 0.1, 0.2),
        part("front_body_front_2", "front_body_front")
            .translate(0.02, 0.01, 0.025)
            .size(0.02, 0.08, 0.15),
        part("chest", "front_body_front_2")
            .color(WHITE)
            .translate(0.01, 0.008, 0.025)
            .size(0.02, 0.05, 0.1),
        part("front_body_top", "front_body")
            .translate(0.001, 0.18, 0.065)
            .size(0.1, 0.008, 0.15),
        part("front_body_underbelly", "front_body")
            .translate(0.0, -0.025, 0.05)
            .size(0.1, 0.025, 0.2),
        part("front_body_right", "front_body")
            .translate(0.0, 0.015, -0.01)
            .size(0.15, 0.15, 0.01),
        part("front_body_right_2", "front_body_right")
            .translate(0.0, 0.015, -0.01)
            .size(0.1, 0.12, 0.01),
        part("front_body_right_3", "front_body_right_2")
            .translate(0.0, 0.01, -0.015)
            .size(0.07, 0.09, 0.01),
        part("front_body_left", "front_body")
            .translate(0.0, 0.015, 0.3)
            .size(0.15, 0.15, 0.01),
        part("front_body_left_2", "front_body_left")
            .translate(0.0, 0.015, 0.01)
            .size(0.1, 0.12, 0.01),
        part("front_body_left_3", "front_body_left_2")
            .translate(0.0, 0.01, 0.015)
            .size(0.07, 0.09, 0.01),
    ]
}

fn middle_body() -> Vec<PartSpec> {
    vec![
        part("middle_body", "front_body")
            .translate(-0.2, -0.005, 0.0)
            .joint(Joint::MiddleBody, 1.0, Y)
            .size(0.2, 0.2, 0.3),
        part("middle_body_top", "middle_body")
            .translate(0.025, 0.2, 0.05)
            .size(0.15, 0.015, 0.2),
        part("middle_body_underbelly", "middle_body")
            .translate(0.0, -0.03, 0.05)
            .size(0.2, 0.03, 0.2),
        part("middle_body_underbelly_2", "middle_body_underbelly")
            .translate(0.01, -0.015, 0.01)
            .size(0.15, 0.015, 0.15),
        part("middle_body_right", "middle_body")
            .translate(0.0, 0.015, -0.01)
            .size(0.2, 0.175, 0.01),
        part("middle_body_right_2", "middle_body_right")
            .translate(0.0, 0.015, -0.01)
            .size(0.2, 0.15, 0.01),
        part("middle_body_right_3", "middle_body_right_2")
            .translate(0.0, 0.01, -0.015)
            .size(0.2, 0.1, 0.01),
        part("middle_body_right_4", "middle_body_right_3")
            .translate(0.025, 0.008, -0.02)
            .size(0.13, 0.08, 0.01),
        part("middle_body_left", "middle_body")
            .translate(0.0, 0.015, 0.3)
            .size(0.2, 0.175, 0.01),
        part("middle_body_left_2", "middle_body_left")
            .translate(0.0, 0.015, 0.01)
            .size(0.2, 0.15, 0.01),
        part("middle_body_left_3", "middle_body_left_2")
            .translate(0.0, 0.01, 0.015)
            .size(0.2, 0.1, 0.01),
        part("middle_body_left_4", "middle_body_left_3")
            .translate(0.025, 0.008, 0.02)
            .size(0.13, 0.08, 0.01),
    ]
}

fn back_body() -> Vec<PartSpec> {
    vec![
        part("back_body", "middle_body")
            .joint(Joint::BackBody, 1.0, Y)
            .translate(-0.15, 0.0, 0.03)
            .size(0.15, 0.15, 0.25),
        part("haunch_left", "back_body")
            .translate(-0.01, 0.035, 0.15)
            .size(0.01, 0.075, 0.075),
        part("haunch_left_2", "haunch_left")
            .translate(-0.005, 0.015, 0.015)
            .size(0.005, 0.05, 0.05),
        part("haunch_left_3", "haunch_left_2")
            .translate(-0.004, 0.01, 0.01)
            .size(0.008, 0.03, 0.03),
        part("haunch_right", "back_body")
            .translate(-0.01, 0.035, 0.009)
            .size(0.01, 0.075, 0.075),
        part("haunch_right_2", "haunch_right")
            .translate(-0.005, 0.015, 0.015)
            .size(0.005, 0.05, 0.05),
        part("haunch_right_3", "haunch_right_2")
            .translate(-0.004, 0.01, 0.01)
            .size(0.008, 0.03, 0.03),
        part("back_body_right", "back_body")
            .translate(0.015, 0.015, -0.02)
            .size(0.125, 0.125, 0.03),
        part("back_body_right_2", "back_body_right")
            .translate(0.025, 0.015, -0.01)
            .size(0.11, 0.1, 0.02),
        part("back_body_right_3", "back_body_right_2")
            .translate(0.01, 0.01, -0.005)
            .size(0.1, 0.08, 0.01),
        part("back_body_left", "back_body")
            .translate(0.015, 0.015, 0.25)
            .size(0.125, 0.125, 0.03),
        part("back_body_left_2", "back_body_left")
            .translate(0.025, 0.015, 0.015)
            .size(0.11, 0.1, 0.02),
        part("back_body_left_3", "back_body_left_2")
            .translate(0.01, 0.01, 0.022)
            .size(0.1, 0.08, 0.01),
        part("back_body_underbelly", "back_body")
            .translate(0.05, -0.02, 0.0)
            .size(0.1, 0.02, 0.25),
        part("back_body_top", "back_body")
            .translate(0.025, 0.15, 0.0)
            .size(0.15, 0.015, 0.25),
        part("back_body_top_2", "back_body_top")
            .translate(0.025, 0.015, 0.02)
            .size(0.1, 0.015, 0.2),
    ]
}

fn tail() -> Vec<PartSpec> {
    vec![
        part("tail_base", "back_body")
            .translate(-0.05, 0.1, 0.1)
            .joint(Joint::Tail, 1.0, X)
            .translate(0.03, -0.02, -0.03)
            .size(0.05, 0.05, 0.075),
        part("tail_2", "tail_base")
            .color(DARK_FUR)
            .translate(-0.02, 0.02, 0.01)
            .size(0.02, 0.04, 0.06),
        part("tail_3", "tail_2")
            .color(DARK_FUR)
            .translate(-0.02, 0.01, 0.005)
            .size(0.02, 0.05, 0.05),
        part("tail_4", "tail_3")
            .color(DARK_FUR)
            .translate(-0.006, 0.02, 0.005)
            .size(0.02, 0.07, 0.03),
        part("tail_5", "tail_4")
            .color(WHITE)
            .translate(-0.01, 0.03, 0.002)
            .size(0.02, 0.08, 0.02),
        part("tail_tip", "tail_5")
            .color(WHITE)
            .translate(0.003, 0.062, 0.001)
            .rotate(-40.0, Z)
            .size(0.02, 0.05, 0.015),
    ]
}

/// One ear: four stacked pieces, each counter-rotated against the head yaw
fn ear(names: [&'static str; 4], offsets: [[f32; 3]; 4]) -> Vec<PartSpec> {
    let sizes = [
        [0.06, 0.03, 0.06],
        [0.045, 0.03, 0.045],
        [0.035, 0.025, 0.035],
        [0.025, 0.02, 0.025],
    ];

    (0..4)
        .map(|i| {
            let parent = if i == 0 { "head" } else { names[i - 1] };
            let [x, y, z] = offsets[i];
            let [sx, sy, sz] = sizes[i];
            part(names[i], parent)
                .color(if i == 3 { WHITE } else { FUR })
                .translate(x, y, z)
                .detail_joint(Joint::Head, -1.0, Y)
                .size(sx, sy, sz)
        })
        .collect()
}

fn head() -> Vec<PartSpec> {
    let mut parts = vec![part("head", "front_body")
        .translate(0.13, 0.1, 0.05)
        .joint(Joint::Head, -1.0, Y)
        .size(0.18, 0.18, 0.18)];

    parts.extend(ear(
        ["ear_right", "ear_right_2", "ear_right_3", "ear_right_tip"],
        [
            [0.1, 0.185, 0.005],
            [0.001, 0.03, 0.0],
            [0.004, 0.03, 0.0],
            [0.003, 0.02, 0.0],
        ],
    ));
    parts.extend(ear(
        ["ear_left", "ear_left_2", "ear_left_3", "ear_left_tip"],
        [
            [0.1, 0.185, 0.12],
            [0.001, 0.03, 0.019],
            [0.004, 0.03, 0.019],
            [0.003, 0.02, 0.01],
        ],
    ));

    parts.extend([
        part("head_back", "head")
            .translate(-0.01, 0.08, 0.014)
            .size(0.01, 0.09, 0.15),
        part("head_back_2", "head_back")
            .translate(-0.01, 0.01, 0.025)
            .size(0.008, 0.07, 0.1),
        part("head_back_3", "head_back_2")
            .translate(-0.005, 0.008, 0.015)
            .size(0.005, 0.05, 0.07),
        part("face", "head")
            .translate(0.18, 0.015, 0.015)
            .size(0.01, 0.15, 0.15),
        part("face_2", "face")
            .translate(0.01, 0.015, 0.025)
            .size(0.008, 0.12, 0.1),
        part("eye_left", "face_2")
            .color(BLACK)
            .translate(0.005, 0.09, 0.09)
            .size(0.02, 0.03, 0.03),
        part("eye_right", "face_2")
            .color(BLACK)
            .translate(0.005, 0.09, -0.002)
            .size(0.02, 0.03, 0.03),
        part("upper_jaw", "face_2")
            .color(DARK_FUR)
            .translate(0.001, 0.025, 0.0025)
            .size(0.05, 0.05, 0.1),
        part("tongue", "upper_jaw")
            .color(TONGUE)
            .translate(0.05, -0.01, 0.04)
            .slide(Joint::TongueWiggle, Z)
            .size(0.003, 0.01, 0.03)
            .stretch(Joint::TongueOut, [0.06, 0.0, 0.0])
            .visible_when(Joint::TongueOut),
        part("nose", "upper_jaw")
            .color(BLACK)
            .translate(0.05, 0.015, 0.04)
            .size(0.02, 0.02, 0.02),
        part("lower_jaw", "face_2")
            .color(DARK_FUR)
            .translate(0.001, -0.005, 0.005)
            .size(0.05, 0.045, 0.09),
        part("head_right", "head")
            .translate(0.015, 0.015, -0.012)
            .size(0.15, 0.15, 0.02),
        part("head_right_2", "head_right")
            .translate(0.025, 0.015, -0.01)
            .size(0.1, 0.12, 0.01),
        part("head_right_3", "head_right_2")
            .translate(0.015, 0.01, -0.005)
            .size(0.07, 0.09, 0.01),
        part("head_left", "head")
            .translate(0.015, 0.015, 0.18)
            .size(0.15, 0.15, 0.02),
        part("head_left_2", "head_left")
            .translate(0.025, 0.015, 0.02)
            .size(0.1, 0.12, 0.01),
        part("head_left_3", "head_left_2")
            .translate(0.015, 0.01, 0.01)
            .size(0.07, 0.09, 0.01),
        part("head_top", "head")
            .translate(0.015, 0.18, 0.015)
            .size(0.15, 0.01, 0.15),
        part("head_top_2", "head_top")
            .translate(0.025, 0.01, 0.025)
            .size(0.1, 0.01, 0.1),
        part("head_top_3", "head_top_2")
            .translate(0.015, 0.01, 0.015)
            .size(0.07, 0.01, 0.07),
    ]);
    parts
}

/// Names and joints of one leg chain
struct Leg {
    upper: &'static str,
    lower: &'static str,
    paw: &'static str,
    shoulder: Joint,
    knee: Joint,
    paw_joint: Joint,
}

fn leg_chain(leg: Leg, upper: PartSpec) -> [PartSpec; 3] {
    [
        upper,
        part(leg.lower, leg.upper)
            .color(DARK_FUR)
            .joint(leg.knee, 1.0, Z)
            .translate(0.0, -0.05, 0.0)
            .size(0.05, 0.07, 0.05),
        part(leg.paw, leg.lower)
            .color(WHITE)
            .joint(leg.paw_joint, 1.0, Z)
            .translate(0.0, -0.02, 0.0)
            .size(0.07, 0.02, 0.05),
    ]
}

fn back_leg(leg: Leg, z: f32) -> [PartSpec; 3] {
    let upper = part(leg.upper, "back_body_underbelly")
        .color(DARK_FUR)
        .translate(0.0, -0.043, z)
        .joint(leg.shoulder, 1.0, Z)
        .translate(0.0, 0.001, 0.0)
        .size(0.05, 0.04, 0.05);
    leg_chain(leg, upper)
}

fn front_leg(leg: Leg, z: f32) -> [PartSpec; 3] {
    let upper = part(leg.upper, "front_body")
        .color(DARK_FUR)
        .translate(0.1, -0.06, z)
        .joint(leg.shoulder, 1.0, Z)
        .size(0.05, 0.08, 0.05);
    leg_chain(leg, upper)
}

fn legs() -> Vec<PartSpec> {
    let mut parts = Vec::with_capacity(12);
    parts.extend(back_leg(
        Leg {
            upper: "back_right_thigh",
            lower: "back_right_shin",
            paw: "back_right_paw",
            shoulder: Joint::RightBackShoulder,
            knee: Joint::RightBackKnee,
            paw_joint: Joint::RightBackPaw,
        },
        0.0,
    ));
    parts.extend(back_leg(
        Leg {
            upper: "back_left_thigh",
            lower: "back_left_shin",
            paw: "back_left_paw",
            shoulder: Joint::LeftBackShoulder,
            knee: Joint::LeftBackKnee,
            paw_joint: Joint::LeftBackPaw,
        },
        0.2,
    ));
    parts.extend(front_leg(
        Leg {
            upper: "front_left_upper",
            lower: "front_left_lower",
            paw: "front_left_paw",
            shoulder: Joint::LeftFrontShoulder,
            knee: Joint::LeftFrontKnee,
            paw_joint: Joint::LeftFrontPaw,
        },
        0.2,
    ));
    parts.extend(front_leg(
        Leg {
            upper: "front_right_upper",
            lower: "front_right_lower",
            paw: "front_right_paw",
            shoulder: Joint::RightFrontShoulder,
            knee: Joint::RightFrontKnee,
            paw_joint: Joint::RightFrontPaw,
        },
        0.025,
    ));
    parts
}
