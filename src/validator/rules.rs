//! 解剖学的ルールの固定テーブル
//!
//! 値は定数。実行時設定では変更しない。

/// 身長に対する標準的なボーン長の比率（表示用）
#[derive(Debug, Clone, Copy)]
pub struct StandardRatio {
    pub name: &'static str,
    pub fraction: f64,
}

pub const STANDARD_BONE_RATIOS: [StandardRatio; 6] = [
    StandardRatio { name: "Shoulder Elbow", fraction: 0.18 },
    StandardRatio { name: "Elbow Wrist", fraction: 0.14 },
    StandardRatio { name: "Hip Knee", fraction: 0.24 },
    StandardRatio { name: "Knee Ankle", fraction: 0.22 },
    StandardRatio { name: "Neck Head", fraction: 0.12 },
    StandardRatio { name: "Torso", fraction: 0.25 },
];

/// 同じ側の上位/下位セグメントの長さ比
#[derive(Debug, Clone, Copy)]
pub struct RatioRule {
    pub name: &'static str,
    /// "Shoulder Elbow" のような論理ラベル
    pub upper: &'static str,
    pub lower: &'static str,
    pub expected: f64,
}

pub const INTRA_SEGMENT_RATIOS: [RatioRule; 2] = [
    RatioRule { name: "Arm", upper: "Shoulder Elbow", lower: "Elbow Wrist", expected: 1.28 },
    RatioRule { name: "Leg", upper: "Hip Knee", lower: "Knee Ankle", expected: 1.09 },
];

/// 左右で長さが揃うべきボーンの組（左, 右）
pub const SYMMETRIC_BONE_PAIRS: [(&str, &str); 7] = [
    ("LEFT_SHOULDER_TO_LEFT_ELBOW", "RIGHT_SHOULDER_TO_RIGHT_ELBOW"),
    ("LEFT_ELBOW_TO_LEFT_WRIST", "RIGHT_ELBOW_TO_RIGHT_WRIST"),
    ("LEFT_HIP_TO_LEFT_KNEE", "RIGHT_HIP_TO_RIGHT_KNEE"),
    ("LEFT_KNEE_TO_LEFT_ANKLE", "RIGHT_KNEE_TO_RIGHT_ANKLE"),
    ("LEFT_ANKLE_TO_LEFT_FOOT", "RIGHT_ANKLE_TO_RIGHT_FOOT"),
    ("LEFT_COLLAR_TO_LEFT_SHOULDER", "RIGHT_COLLAR_TO_RIGHT_SHOULDER"),
    // RIGHT_HIP_TO_LEFT_HIP はカタログに無いため、構築時に警告して除外される
    ("LEFT_HIP_TO_RIGHT_HIP", "RIGHT_HIP_TO_LEFT_HIP"),
];

/// 比率ルールの許容誤差（期待値に対する割合）
pub const RATIO_TOLERANCE: f64 = 0.20;

/// 左右差の許容誤差（長い方に対する割合）
pub const SYMMETRY_TOLERANCE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    fn prefix(self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }
}

/// 論理ラベルと左右から、カタログのボーン名を組み立てる
///
/// `(Left, "Hip Knee")` → `LEFT_HIP_TO_LEFT_KNEE`。
/// ラベルが2語でなければ None。
pub fn side_bone_name(side: Side, label: &str) -> Option<String> {
    let mut words = label.split_whitespace();
    let from = words.next()?;
    let to = words.next()?;
    if words.next().is_some() {
        return None;
    }
    let prefix = side.prefix();
    Some(format!(
        "{}_{}_TO_{}_{}",
        prefix,
        from.to_ascii_uppercase(),
        prefix,
        to.to_ascii_uppercase()
    ))
}
