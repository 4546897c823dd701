use crate::geometry::{distance, Point3};

/// ボーンカタログで使用する22関節
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum JointName {
    Pelvis = 0,
    Spine1 = 1,
    Spine2 = 2,
    Spine3 = 3,
    Neck = 4,
    Head = 5,
    LeftCollar = 6,
    LeftShoulder = 7,
    LeftElbow = 8,
    LeftWrist = 9,
    RightCollar = 10,
    RightShoulder = 11,
    RightElbow = 12,
    RightWrist = 13,
    LeftHip = 14,
    LeftKnee = 15,
    LeftAnkle = 16,
    LeftFoot = 17,
    RightHip = 18,
    RightKnee = 19,
    RightAnkle = 20,
    RightFoot = 21,
}

impl JointName {
    pub const COUNT: usize = 22;

    pub const ALL: [JointName; Self::COUNT] = [
        Self::Pelvis,
        Self::Spine1,
        Self::Spine2,
        Self::Spine3,
        Self::Neck,
        Self::Head,
        Self::LeftCollar,
        Self::LeftShoulder,
        Self::LeftElbow,
        Self::LeftWrist,
        Self::RightCollar,
        Self::RightShoulder,
        Self::RightElbow,
        Self::RightWrist,
        Self::LeftHip,
        Self::LeftKnee,
        Self::LeftAnkle,
        Self::LeftFoot,
        Self::RightHip,
        Self::RightKnee,
        Self::RightAnkle,
        Self::RightFoot,
    ];

    /// CSVヘッダで使われる関節名
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pelvis => "PELVIS",
            Self::Spine1 => "SPINE1",
            Self::Spine2 => "SPINE2",
            Self::Spine3 => "SPINE3",
            Self::Neck => "NECK",
            Self::Head => "HEAD",
            Self::LeftCollar => "LEFT_COLLAR",
            Self::LeftShoulder => "LEFT_SHOULDER",
            Self::LeftElbow => "LEFT_ELBOW",
            Self::LeftWrist => "LEFT_WRIST",
            Self::RightCollar => "RIGHT_COLLAR",
            Self::RightShoulder => "RIGHT_SHOULDER",
            Self::RightElbow => "RIGHT_ELBOW",
            Self::RightWrist => "RIGHT_WRIST",
            Self::LeftHip => "LEFT_HIP",
            Self::LeftKnee => "LEFT_KNEE",
            Self::LeftAnkle => "LEFT_ANKLE",
            Self::LeftFoot => "LEFT_FOOT",
            Self::RightHip => "RIGHT_HIP",
            Self::RightKnee => "RIGHT_KNEE",
            Self::RightAnkle => "RIGHT_ANKLE",
            Self::RightFoot => "RIGHT_FOOT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.as_str() == name)
    }
}

impl std::fmt::Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 観測された単一関節
#[derive(Debug, Clone, PartialEq)]
pub struct PosePoint {
    pub name: String,
    pub position: Point3,
}

impl PosePoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            position: Point3::new(x, y, z),
        }
    }

    pub fn distance_to(&self, other: &PosePoint) -> f64 {
        distance(&self.position, &other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_count() {
        assert_eq!(JointName::ALL.len(), JointName::COUNT);
        for (i, joint) in JointName::ALL.iter().enumerate() {
            assert_eq!(*joint as usize, i);
        }
    }

    #[test]
    fn test_joint_name_roundtrip() {
        for joint in JointName::ALL {
            assert_eq!(JointName::from_name(joint.as_str()), Some(joint));
        }
        assert_eq!(JointName::from_name("LEFT_EYE"), None);
        assert_eq!(JointName::from_name("pelvis"), None);
    }

    #[test]
    fn test_pose_point_distance() {
        let a = PosePoint::new("HEAD", 0.0, 0.0, 5.0);
        let b = PosePoint::new("PELVIS", 0.0, 0.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }
}
