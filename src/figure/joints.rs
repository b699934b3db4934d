//! Named pose parameters of the quadruped.

use std::ops::{Index, IndexMut};

/// Every animatable parameter of the figure.
///
/// Angles are in degrees. `TongueOut` is an extension amount in `[0, 1]`
/// and `TongueWiggle` a lateral offset in model units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    FrontBody,
    MiddleBody,
    BackBody,
    Head,
    Tail,
    LeftFrontShoulder,
    RightFrontShoulder,
    LeftBackShoulder,
    RightBackShoulder,
    LeftFrontKnee,
    RightFrontKnee,
    LeftBackKnee,
    RightBackKnee,
    LeftFrontPaw,
    RightFrontPaw,
    LeftBackPaw,
    RightBackPaw,
    TongueOut,
    TongueWiggle,
}

impl Joint {
    pub const COUNT: usize = 19;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::FrontBody,
        Joint::MiddleBody,
        Joint::BackBody,
        Joint::Head,
        Joint::Tail,
        Joint::LeftFrontShoulder,
        Joint::RightFrontShoulder,
        Joint::LeftBackShoulder,
        Joint::RightBackShoulder,
        Joint::LeftFrontKnee,
        Joint::RightFrontKnee,
        Joint::LeftBackKnee,
        Joint::RightBackKnee,
        Joint::LeftFrontPaw,
        Joint::RightFrontPaw,
        Joint::LeftBackPaw,
        Joint::RightBackPaw,
        Joint::TongueOut,
        Joint::TongueWiggle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Joint::FrontBody => "front body",
            Joint::MiddleBody => "middle body",
            Joint::BackBody => "back body",
            Joint::Head => "head",
            Joint::Tail => "tail",
            Joint::LeftFrontShoulder => "left front shoulder",
            Joint::RightFrontShoulder => "right front shoulder",
            Joint::LeftBackShoulder => "left back shoulder",
            Joint::RightBackShoulder => "right back shoulder",
            Joint::LeftFrontKnee => "left front knee",
            Joint::RightFrontKnee => "right front knee",
            Joint::LeftBackKnee => "left back knee",
            Joint::RightBackKnee => "right back knee",
            Joint::LeftFrontPaw => "left front paw",
            Joint::RightFrontPaw => "right front paw",
            Joint::LeftBackPaw => "left back paw",
            Joint::RightBackPaw => "right back paw",
            Joint::TongueOut => "tongue out",
            Joint::TongueWiggle => "tongue wiggle",
        }
    }
}

/// One value per [`Joint`], all zero at rest.
///
/// The animation driver writes a fresh set every frame and hands it to the
/// poser by reference; nothing else mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseParameters {
    values: [f32; Joint::COUNT],
}

impl PoseParameters {
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: Joint) -> f32 {
        self.values[joint as usize]
    }

    pub fn set(&mut self, joint: Joint, value: f32) {
        self.values[joint as usize] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, f32)> + '_ {
        Joint::ALL.iter().map(|&joint| (joint, self.get(joint)))
    }
}

impl Index<Joint> for PoseParameters {
    type Output = f32;

    fn index(&self, joint: Joint) -> &f32 {
        &self.values[joint as usize]
    }
}

impl IndexMut<Joint> for PoseParameters {
    fn index_mut(&mut self, joint: Joint) -> &mut f32 {
        &mut self.values[joint as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_joint_in_order() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(*joint as usize, i);
        }
    }

    #[test]
    fn test_parameters_start_at_rest() {
        let params = PoseParameters::rest();
        assert!(params.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn test_index_and_set_agree() {
        let mut params = PoseParameters::rest();
        params[Joint::Tail] = 30.0;
        params.set(Joint::TongueOut, 0.5);
        assert_eq!(params.get(Joint::Tail), 30.0);
        assert_eq!(params[Joint::TongueOut], 0.5);
        assert_eq!(params[Joint::Head], 0.0);
    }
}
