use std::collections::BTreeMap;

use serde::Serialize;

use super::bone::{BoneName, BoneSegment, BONE_CATALOG, LEFT_LEG, RIGHT_LEG, SPINE_CHAIN};
use super::joint::{JointName, PosePoint};

/// 胴体長の算出方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TorsoMethod {
    /// 脊柱5ボーンの合計
    SpineChain,
    /// PELVIS-HEAD の直線距離
    PelvisToHead,
    /// 胴体長を算出できない
    Unavailable,
}

/// 身長推定の算出方法（フォールバック順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeightMethod {
    TorsoAndLegs,
    HeadToLeftFoot,
    HeadToRightFoot,
    Unknown,
}

/// 1フレーム分の骨格モデル
///
/// 構築時にボーンと推定身長を一度だけ計算し、以後は変更しない。
#[derive(Debug, Clone)]
pub struct SkeletonFrame {
    frame_id: i64,
    joints: BTreeMap<String, Option<PosePoint>>,
    bones: BTreeMap<BoneName, BoneSegment>,
    torso_method: TorsoMethod,
    height_method: HeightMethod,
    estimated_height: f64,
}

impl SkeletonFrame {
    /// 関節名 → 座標（未観測なら None）から構築
    pub fn new<I, S>(frame_id: i64, pose_data: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<[f64; 3]>)>,
        S: Into<String>,
    {
        let joints: BTreeMap<String, Option<PosePoint>> = pose_data
            .into_iter()
            .map(|(name, coords)| {
                let name = name.into();
                let point = coords.map(|[x, y, z]| PosePoint::new(name.clone(), x, y, z));
                (name, point)
            })
            .collect();

        let bones = build_bones(&joints);

        let lookup = |j: JointName| joints.get(j.as_str()).and_then(|p| p.as_ref());
        let (torso, torso_method) = torso_length(&bones, lookup(JointName::Pelvis), lookup(JointName::Head));
        let leg = leg_length(&bones);
        let (estimated_height, height_method) = estimate_height(
            torso,
            leg,
            lookup(JointName::Head),
            lookup(JointName::LeftFoot),
            lookup(JointName::RightFoot),
        );

        log::debug!(
            "frame {}: {} bones, torso={:.3} ({:?}), leg={:.3}, height={:.3} ({:?})",
            frame_id,
            bones.len(),
            torso,
            torso_method,
            leg,
            estimated_height,
            height_method
        );

        Self {
            frame_id,
            joints,
            bones,
            torso_method,
            height_method,
            estimated_height,
        }
    }

    pub fn frame_id(&self) -> i64 {
        self.frame_id
    }

    /// 観測済みの関節
    pub fn joint(&self, name: JointName) -> Option<&PosePoint> {
        self.joint_by_name(name.as_str())
    }

    pub fn joint_by_name(&self, name: &str) -> Option<&PosePoint> {
        self.joints.get(name).and_then(|p| p.as_ref())
    }

    /// ヘッダに存在した関節か（観測有無は問わない）
    pub fn has_joint_slot(&self, name: &str) -> bool {
        self.joints.contains_key(name)
    }

    /// 全関節（未観測は None）
    pub fn joints(&self) -> impl Iterator<Item = (&str, Option<&PosePoint>)> {
        self.joints.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn bone(&self, name: BoneName) -> Option<&BoneSegment> {
        self.bones.get(&name)
    }

    /// 存在するボーン（カタログ順）
    pub fn bones(&self) -> impl Iterator<Item = &BoneSegment> {
        self.bones.values()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 推定身長。0.0 は推定不能
    pub fn estimated_height(&self) -> f64 {
        self.estimated_height
    }

    pub fn height_method(&self) -> HeightMethod {
        self.height_method
    }

    pub fn torso_method(&self) -> TorsoMethod {
        self.torso_method
    }
}

fn build_bones(joints: &BTreeMap<String, Option<PosePoint>>) -> BTreeMap<BoneName, BoneSegment> {
    let lookup = |j: JointName| joints.get(j.as_str()).and_then(|p| p.as_ref());

    BONE_CATALOG
        .iter()
        .filter_map(|def| {
            let start = lookup(def.start)?;
            let end = lookup(def.end)?;
            let segment = BoneSegment {
                name: def.name,
                start: def.start,
                end: def.end,
                length: start.distance_to(end),
            };
            Some((def.name, segment))
        })
        .collect()
}

/// 脊柱5本が揃っていれば合計、無ければ PELVIS-HEAD
fn torso_length(
    bones: &BTreeMap<BoneName, BoneSegment>,
    pelvis: Option<&PosePoint>,
    head: Option<&PosePoint>,
) -> (f64, TorsoMethod) {
    let chain: Option<f64> = SPINE_CHAIN
        .iter()
        .map(|name| bones.get(name).map(|b| b.length))
        .sum();

    if let Some(total) = chain {
        return (total, TorsoMethod::SpineChain);
    }
    match (pelvis, head) {
        (Some(p), Some(h)) => (p.distance_to(h), TorsoMethod::PelvisToHead),
        _ => (0.0, TorsoMethod::Unavailable),
    }
}

/// 左右の脚長。両方あれば平均、片方のみならそちら
fn leg_length(bones: &BTreeMap<BoneName, BoneSegment>) -> f64 {
    let side_total = |segments: &[BoneName]| -> f64 {
        segments
            .iter()
            .filter_map(|name| bones.get(name))
            .map(|b| b.length)
            .sum()
    };

    let left = side_total(&LEFT_LEG);
    let right = side_total(&RIGHT_LEG);

    if left > 0.0 && right > 0.0 {
        (left + right) / 2.0
    } else if left > 0.0 {
        left
    } else if right > 0.0 {
        right
    } else {
        0.0
    }
}

fn estimate_height(
    torso: f64,
    leg: f64,
    head: Option<&PosePoint>,
    left_foot: Option<&PosePoint>,
    right_foot: Option<&PosePoint>,
) -> (f64, HeightMethod) {
    if torso > 0.0 && leg > 0.0 {
        return (torso + leg, HeightMethod::TorsoAndLegs);
    }
    match (head, left_foot, right_foot) {
        (Some(h), Some(f), _) => (h.distance_to(f), HeightMethod::HeadToLeftFoot),
        (Some(h), None, Some(f)) => (h.distance_to(f), HeightMethod::HeadToRightFoot),
        _ => (0.0, HeightMethod::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::fixtures::{standing_frame, standing_joints};
    use approx::assert_relative_eq;

    fn frame_without(names: &[&str]) -> SkeletonFrame {
        let joints = standing_joints()
            .into_iter()
            .map(|(n, c)| if names.contains(&n) { (n, None) } else { (n, c) });
        SkeletonFrame::new(0, joints)
    }

    #[test]
    fn test_standing_frame_height() {
        let frame = standing_frame();
        assert_eq!(frame.torso_method(), TorsoMethod::SpineChain);
        assert_eq!(frame.height_method(), HeightMethod::TorsoAndLegs);
        assert_relative_eq!(frame.estimated_height(), 9.0);
    }

    #[test]
    fn test_bones_only_when_both_endpoints_present() {
        let frame = standing_frame();
        for def in BONE_CATALOG.iter() {
            let both = frame.joint(def.start).is_some() && frame.joint(def.end).is_some();
            assert_eq!(frame.bone(def.name).is_some(), both, "{}", def.name);
        }
        // 足首-足は FOOT が無いので存在しない
        assert!(frame.bone(BoneName::LeftAnkleToLeftFoot).is_none());
        assert_relative_eq!(frame.bone(BoneName::LeftHipToLeftKnee).unwrap().length, 2.0);
    }

    #[test]
    fn test_absent_joint_keeps_slot() {
        let frame = frame_without(&["NECK"]);
        assert!(frame.has_joint_slot("NECK"));
        assert!(frame.joint(JointName::Neck).is_none());
        assert!(!frame.has_joint_slot("LEFT_EYE"));
        assert!(frame.bone(BoneName::Spine3ToNeck).is_none());
        assert!(frame.bone(BoneName::NeckToHead).is_none());
    }

    #[test]
    fn test_spine_chain_preferred_over_shortcut() {
        // SPINE2 を横にずらすと、チェーン合計 > 直線距離
        let joints = standing_joints().into_iter().map(|(n, c)| {
            if n == "SPINE2" {
                (n, Some([1.0, 0.0, 2.0]))
            } else {
                (n, c)
            }
        });
        let frame = SkeletonFrame::new(0, joints);
        let chain: f64 = SPINE_CHAIN.iter().map(|b| frame.bone(*b).unwrap().length).sum();
        assert!(chain > 5.0);
        assert_eq!(frame.torso_method(), TorsoMethod::SpineChain);
        assert_relative_eq!(frame.estimated_height(), chain + 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_torso_falls_back_to_pelvis_head() {
        let frame = frame_without(&["SPINE2"]);
        assert_eq!(frame.torso_method(), TorsoMethod::PelvisToHead);
        assert_relative_eq!(frame.estimated_height(), 9.0);
    }

    #[test]
    fn test_single_leg_used_when_other_missing() {
        let frame = frame_without(&["RIGHT_HIP", "RIGHT_KNEE", "RIGHT_ANKLE"]);
        assert_relative_eq!(frame.estimated_height(), 9.0);
    }

    #[test]
    fn test_legs_averaged() {
        // 右足首を上げて右脚を短くする
        let joints = standing_joints().into_iter().map(|(n, c)| {
            if n == "RIGHT_ANKLE" {
                (n, Some([0.5, 0.0, -3.0]))
            } else {
                (n, c)
            }
        });
        let frame = SkeletonFrame::new(0, joints);
        // 左 4.0, 右 3.0 → 平均 3.5
        assert_relative_eq!(frame.estimated_height(), 8.5);
    }

    #[test]
    fn test_head_to_foot_fallback_order() {
        let joints = vec![
            ("HEAD", Some([0.0, 0.0, 5.0])),
            ("LEFT_FOOT", Some([0.0, 0.0, -3.0])),
            ("RIGHT_FOOT", Some([0.0, 0.0, -4.0])),
        ];
        let frame = SkeletonFrame::new(1, joints);
        assert_eq!(frame.height_method(), HeightMethod::HeadToLeftFoot);
        assert_relative_eq!(frame.estimated_height(), 8.0);

        let joints = vec![
            ("HEAD", Some([0.0, 0.0, 5.0])),
            ("LEFT_FOOT", None),
            ("RIGHT_FOOT", Some([0.0, 0.0, -4.0])),
        ];
        let frame = SkeletonFrame::new(2, joints);
        assert_eq!(frame.height_method(), HeightMethod::HeadToRightFoot);
        assert_relative_eq!(frame.estimated_height(), 9.0);
    }

    #[test]
    fn test_torso_without_legs_uses_head_foot() {
        // 脚ボーンが無く胴体のみ → HEAD-FOOT へ
        let joints = vec![
            ("PELVIS", Some([0.0, 0.0, 0.0])),
            ("HEAD", Some([0.0, 0.0, 5.0])),
            ("LEFT_FOOT", Some([0.0, 0.0, -4.0])),
        ];
        let frame = SkeletonFrame::new(3, joints);
        assert_eq!(frame.torso_method(), TorsoMethod::PelvisToHead);
        assert_eq!(frame.height_method(), HeightMethod::HeadToLeftFoot);
        assert_relative_eq!(frame.estimated_height(), 9.0);
    }

    #[test]
    fn test_unknown_height_is_zero() {
        let frame = frame_without(&["HEAD", "PELVIS"]);
        assert_eq!(frame.torso_method(), TorsoMethod::Unavailable);
        assert_eq!(frame.height_method(), HeightMethod::Unknown);
        assert_eq!(frame.estimated_height(), 0.0);

        let empty = SkeletonFrame::new(9, Vec::<(String, Option<[f64; 3]>)>::new());
        assert_eq!(empty.estimated_height(), 0.0);
        assert_eq!(empty.bone_count(), 0);
    }

    #[test]
    fn test_bones_iterate_in_catalog_order() {
        let frame = standing_frame();
        let names: Vec<BoneName> = frame.bones().map(|b| b.name).collect();
        let expected: Vec<BoneName> = BONE_CATALOG
            .iter()
            .map(|d| d.name)
            .filter(|n| frame.bone(*n).is_some())
            .collect();
        assert_eq!(names, expected);
        assert_eq!(names.first(), Some(&BoneName::PelvisToSpine1));
        for (key, point) in frame.joints() {
            if let Some(point) = point {
                assert_eq!(point.name, key);
            }
        }
    }
}
