pub mod rules;

use std::fmt;

use crate::skeleton::{BoneName, HeightMethod, SkeletonFrame};

pub use rules::{
    side_bone_name, RatioRule, Side, StandardRatio, INTRA_SEGMENT_RATIOS, RATIO_TOLERANCE,
    STANDARD_BONE_RATIOS, SYMMETRIC_BONE_PAIRS, SYMMETRY_TOLERANCE,
};

/// ルール違反1件
#[derive(Debug, Clone, PartialEq)]
pub enum Discrepancy {
    /// 同じ側の上位/下位セグメント比が期待値から外れている
    Ratio {
        upper: BoneName,
        lower: BoneName,
        actual: f64,
        expected: f64,
    },
    /// 左右のボーン長が揃っていない
    Symmetry {
        left: BoneName,
        right: BoneName,
        left_length: f64,
        right_length: f64,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::Ratio { upper, lower, actual, .. } => {
                write!(f, "{} : {} {:.1} : 1 (WRONG - invalid ratio)", upper, lower, actual)
            }
            Discrepancy::Symmetry { left, right, left_length, right_length } => write!(
                f,
                "{} # {} (invalid symmetric match: {:.2} vs {:.2})",
                left, right, left_length, right_length
            ),
        }
    }
}

/// 1フレームの検証結果
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_id: i64,
    pub estimated_height: f64,
    pub height_method: HeightMethod,
    pub ratio: Vec<Discrepancy>,
    pub symmetry: Vec<Discrepancy>,
}

impl FrameReport {
    pub fn has_discrepancies(&self) -> bool {
        !self.ratio.is_empty() || !self.symmetry.is_empty()
    }

    pub fn discrepancy_count(&self) -> usize {
        self.ratio.len() + self.symmetry.len()
    }

    /// 比率 → 左右対称 の順のメッセージ
    pub fn messages(&self) -> Vec<String> {
        self.ratio
            .iter()
            .chain(self.symmetry.iter())
            .map(ToString::to_string)
            .collect()
    }
}

/// 左右ごとに展開済みの比率ルール
#[derive(Debug, Clone, Copy)]
struct SideRatioRule {
    upper: BoneName,
    lower: BoneName,
    expected: f64,
}

/// 骨格の比率・左右対称チェック
///
/// ルールテーブルは構築時に一度だけカタログ名へ解決し、以後は読み取り専用。
#[derive(Debug, Clone)]
pub struct SkeletonValidator {
    ratio_rules: Vec<SideRatioRule>,
    symmetric_pairs: Vec<(BoneName, BoneName)>,
    ratio_tolerance: f64,
    symmetry_tolerance: f64,
}

impl Default for SkeletonValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonValidator {
    pub fn new() -> Self {
        let mut ratio_rules = Vec::with_capacity(INTRA_SEGMENT_RATIOS.len() * 2);
        for rule in INTRA_SEGMENT_RATIOS.iter() {
            for side in Side::BOTH {
                let upper = resolve_side_bone(side, rule.upper);
                let lower = resolve_side_bone(side, rule.lower);
                match (upper, lower) {
                    (Some(upper), Some(lower)) => ratio_rules.push(SideRatioRule {
                        upper,
                        lower,
                        expected: rule.expected,
                    }),
                    _ => log::warn!(
                        "ratio rule {} ({:?}) references bones outside the catalog: {:?} / {:?}",
                        rule.name,
                        side,
                        rule.upper,
                        rule.lower
                    ),
                }
            }
        }

        let symmetric_pairs = SYMMETRIC_BONE_PAIRS
            .iter()
            .filter_map(|(left, right)| {
                match (BoneName::from_name(left), BoneName::from_name(right)) {
                    (Some(l), Some(r)) => Some((l, r)),
                    _ => {
                        log::warn!(
                            "symmetric pair {} # {} is not in the bone catalog; skipped",
                            left,
                            right
                        );
                        None
                    }
                }
            })
            .collect();

        Self {
            ratio_rules,
            symmetric_pairs,
            ratio_tolerance: RATIO_TOLERANCE,
            symmetry_tolerance: SYMMETRY_TOLERANCE,
        }
    }

    /// 表示用の標準比率テーブル
    pub fn standard_ratios(&self) -> &'static [StandardRatio] {
        &STANDARD_BONE_RATIOS
    }

    /// 実際に評価される左右対称ペア
    pub fn symmetric_pairs(&self) -> &[(BoneName, BoneName)] {
        &self.symmetric_pairs
    }

    /// 上位/下位セグメント比のチェック
    ///
    /// 推定身長が 0 のフレームは基準が無いので何も返さない。
    pub fn validate_ratio(&self, frame: &SkeletonFrame) -> Vec<Discrepancy> {
        if frame.estimated_height() == 0.0 {
            return Vec::new();
        }

        self.ratio_rules
            .iter()
            .filter_map(|rule| {
                let upper = frame.bone(rule.upper)?;
                let lower = frame.bone(rule.lower)?;
                if lower.length <= 0.0 {
                    return None;
                }
                let actual = upper.length / lower.length;
                let deviation = (actual - rule.expected).abs() / rule.expected;
                (deviation > self.ratio_tolerance).then_some(Discrepancy::Ratio {
                    upper: rule.upper,
                    lower: rule.lower,
                    actual,
                    expected: rule.expected,
                })
            })
            .collect()
    }

    /// 左右対称チェック。片方でも欠けているペアは対象外
    pub fn validate_symmetry(&self, frame: &SkeletonFrame) -> Vec<Discrepancy> {
        self.symmetric_pairs
            .iter()
            .filter_map(|&(left_name, right_name)| {
                let left = frame.bone(left_name)?;
                let right = frame.bone(right_name)?;
                let max_len = left.length.max(right.length);
                if max_len <= 0.0 {
                    return None;
                }
                let diff = (left.length - right.length).abs() / max_len;
                (diff > self.symmetry_tolerance).then_some(Discrepancy::Symmetry {
                    left: left_name,
                    right: right_name,
                    left_length: left.length,
                    right_length: right.length,
                })
            })
            .collect()
    }

    /// 両チェックを実行
    pub fn validate(&self, frame: &SkeletonFrame) -> FrameReport {
        log::trace!(
            "frame {}: joints [{}], bones [{}]",
            frame.frame_id(),
            frame
                .joints()
                .filter_map(|(_, p)| p.map(|p| p.name.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            frame.bones().map(|b| b.name.as_str()).collect::<Vec<_>>().join(", ")
        );
        FrameReport {
            frame_id: frame.frame_id(),
            estimated_height: frame.estimated_height(),
            height_method: frame.height_method(),
            ratio: self.validate_ratio(frame),
            symmetry: self.validate_symmetry(frame),
        }
    }
}

fn resolve_side_bone(side: Side, label: &str) -> Option<BoneName> {
    side_bone_name(side, label).and_then(|name| BoneName::from_name(&name))
}
