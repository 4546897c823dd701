use super::joint::JointName;

/// ボーンカタログの名前（宣言順 = カタログ順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoneName {
    PelvisToSpine1,
    Spine1ToSpine2,
    Spine2ToSpine3,
    Spine3ToNeck,
    NeckToHead,
    LeftCollarToLeftShoulder,
    LeftShoulderToLeftElbow,
    LeftElbowToLeftWrist,
    RightCollarToRightShoulder,
    RightShoulderToRightElbow,
    RightElbowToRightWrist,
    LeftHipToLeftKnee,
    LeftKneeToLeftAnkle,
    LeftAnkleToLeftFoot,
    RightHipToRightKnee,
    RightKneeToRightAnkle,
    RightAnkleToRightFoot,
    LeftHipToRightHip,
    LeftShoulderToRightShoulder,
    PelvisToLeftHip,
    PelvisToRightHip,
}

/// カタログ1件: 名前と両端の関節
#[derive(Debug, Clone, Copy)]
pub struct BoneDef {
    pub name: BoneName,
    pub start: JointName,
    pub end: JointName,
}

const fn def(name: BoneName, start: JointName, end: JointName) -> BoneDef {
    BoneDef { name, start, end }
}

/// 固定ボーンカタログ
pub static BONE_CATALOG: [BoneDef; 21] = {
    use self::BoneName as B;
    use self::JointName as J;
    [
        // 脊柱
        def(B::PelvisToSpine1, J::Pelvis, J::Spine1),
        def(B::Spine1ToSpine2, J::Spine1, J::Spine2),
        def(B::Spine2ToSpine3, J::Spine2, J::Spine3),
        def(B::Spine3ToNeck, J::Spine3, J::Neck),
        def(B::NeckToHead, J::Neck, J::Head),
        // 腕
        def(B::LeftCollarToLeftShoulder, J::LeftCollar, J::LeftShoulder),
        def(B::LeftShoulderToLeftElbow, J::LeftShoulder, J::LeftElbow),
        def(B::LeftElbowToLeftWrist, J::LeftElbow, J::LeftWrist),
        def(B::RightCollarToRightShoulder, J::RightCollar, J::RightShoulder),
        def(B::RightShoulderToRightElbow, J::RightShoulder, J::RightElbow),
        def(B::RightElbowToRightWrist, J::RightElbow, J::RightWrist),
        // 脚
        def(B::LeftHipToLeftKnee, J::LeftHip, J::LeftKnee),
        def(B::LeftKneeToLeftAnkle, J::LeftKnee, J::LeftAnkle),
        def(B::LeftAnkleToLeftFoot, J::LeftAnkle, J::LeftFoot),
        def(B::RightHipToRightKnee, J::RightHip, J::RightKnee),
        def(B::RightKneeToRightAnkle, J::RightKnee, J::RightAnkle),
        def(B::RightAnkleToRightFoot, J::RightAnkle, J::RightFoot),
        // 左右をまたぐボーン
        def(B::LeftHipToRightHip, J::LeftHip, J::RightHip),
        def(B::LeftShoulderToRightShoulder, J::LeftShoulder, J::RightShoulder),
        def(B::PelvisToLeftHip, J::Pelvis, J::LeftHip),
        def(B::PelvisToRightHip, J::Pelvis, J::RightHip),
    ]
};

/// 身長推定で合計する脊柱チェーン
pub const SPINE_CHAIN: [BoneName; 5] = [
    BoneName::PelvisToSpine1,
    BoneName::Spine1ToSpine2,
    BoneName::Spine2ToSpine3,
    BoneName::Spine3ToNeck,
    BoneName::NeckToHead,
];

pub const LEFT_LEG: [BoneName; 3] = [
    BoneName::LeftHipToLeftKnee,
    BoneName::LeftKneeToLeftAnkle,
    BoneName::LeftAnkleToLeftFoot,
];

pub const RIGHT_LEG: [BoneName; 3] = [
    BoneName::RightHipToRightKnee,
    BoneName::RightKneeToRightAnkle,
    BoneName::RightAnkleToRightFoot,
];

impl BoneName {
    /// `LEFT_HIP_TO_LEFT_KNEE` 形式の名前
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PelvisToSpine1 => "PELVIS_TO_SPINE1",
            Self::Spine1ToSpine2 => "SPINE1_TO_SPINE2",
            Self::Spine2ToSpine3 => "SPINE2_TO_SPINE3",
            Self::Spine3ToNeck => "SPINE3_TO_NECK",
            Self::NeckToHead => "NECK_TO_HEAD",
            Self::LeftCollarToLeftShoulder => "LEFT_COLLAR_TO_LEFT_SHOULDER",
            Self::LeftShoulderToLeftElbow => "LEFT_SHOULDER_TO_LEFT_ELBOW",
            Self::LeftElbowToLeftWrist => "LEFT_ELBOW_TO_LEFT_WRIST",
            Self::RightCollarToRightShoulder => "RIGHT_COLLAR_TO_RIGHT_SHOULDER",
            Self::RightShoulderToRightElbow => "RIGHT_SHOULDER_TO_RIGHT_ELBOW",
            Self::RightElbowToRightWrist => "RIGHT_ELBOW_TO_RIGHT_WRIST",
            Self::LeftHipToLeftKnee => "LEFT_HIP_TO_LEFT_KNEE",
            Self::LeftKneeToLeftAnkle => "LEFT_KNEE_TO_LEFT_ANKLE",
            Self::LeftAnkleToLeftFoot => "LEFT_ANKLE_TO_LEFT_FOOT",
            Self::RightHipToRightKnee => "RIGHT_HIP_TO_RIGHT_KNEE",
            Self::RightKneeToRightAnkle => "RIGHT_KNEE_TO_RIGHT_ANKLE",
            Self::RightAnkleToRightFoot => "RIGHT_ANKLE_TO_RIGHT_FOOT",
            Self::LeftHipToRightHip => "LEFT_HIP_TO_RIGHT_HIP",
            Self::LeftShoulderToRightShoulder => "LEFT_SHOULDER_TO_RIGHT_SHOULDER",
            Self::PelvisToLeftHip => "PELVIS_TO_LEFT_HIP",
            Self::PelvisToRightHip => "PELVIS_TO_RIGHT_HIP",
        }
    }

    /// カタログに無い名前は None
    pub fn from_name(name: &str) -> Option<Self> {
        BONE_CATALOG
            .iter()
            .map(|d| d.name)
            .find(|b| b.as_str() == name)
    }
}

impl std::fmt::Display for BoneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// フレーム内で両端が観測されたボーン
///
/// 関節はフレームが所有し、ここでは名前で参照する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSegment {
    pub name: BoneName,
    pub start: JointName,
    pub end: JointName,
    pub length: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_enum() {
        for (i, def) in BONE_CATALOG.iter().enumerate() {
            assert_eq!(def.name as usize, i);
        }
    }

    #[test]
    fn test_bone_name_matches_endpoints() {
        for def in BONE_CATALOG.iter() {
            let expected = format!("{}_TO_{}", def.start.as_str(), def.end.as_str());
            assert_eq!(def.name.as_str(), expected);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            BoneName::from_name("LEFT_HIP_TO_LEFT_KNEE"),
            Some(BoneName::LeftHipToLeftKnee)
        );
        // 逆向きはカタログに存在しない
        assert_eq!(BoneName::from_name("RIGHT_HIP_TO_LEFT_HIP"), None);
    }
}
