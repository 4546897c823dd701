use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;

use crate::report::ReportSink;
use crate::skeleton::SkeletonFrame;
use crate::validator::{FrameReport, SkeletonValidator};

/// 実行全体の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    /// 全フレームで問題なし
    Clear,
    /// 1フレーム以上で違反あり
    Discrepancies,
    /// 入力フレームが無い
    NoData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub frames_checked: usize,
    pub frames_with_discrepancies: usize,
    pub total_discrepancies: usize,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    /// 違反のあったフレームのみ（入力順）
    pub reports: Vec<FrameReport>,
    pub summary: BatchSummary,
    pub outcome: RunOutcome,
}

/// 全フレームを検証する
///
/// `parallel` の場合は rayon で並列に検証するが、結果は入力順を保つ。
pub fn validate_frames(
    validator: &SkeletonValidator,
    frames: &[SkeletonFrame],
    parallel: bool,
) -> BatchResult {
    let all: Vec<FrameReport> = if parallel {
        frames.par_iter().map(|f| validator.validate(f)).collect()
    } else {
        frames.iter().map(|f| validator.validate(f)).collect()
    };

    let reports: Vec<FrameReport> = all.into_iter().filter(FrameReport::has_discrepancies).collect();

    let summary = BatchSummary {
        frames_checked: frames.len(),
        frames_with_discrepancies: reports.len(),
        total_discrepancies: reports.iter().map(FrameReport::discrepancy_count).sum(),
    };

    let outcome = if frames.is_empty() {
        RunOutcome::NoData
    } else if reports.is_empty() {
        RunOutcome::Clear
    } else {
        RunOutcome::Discrepancies
    };

    log::info!(
        "checked {} frames: {} with discrepancies ({} total)",
        summary.frames_checked,
        summary.frames_with_discrepancies,
        summary.total_discrepancies
    );

    BatchResult { reports, summary, outcome }
}

/// 検証して結果をシンクへ出力する
///
/// フレームが無ければ比率表は出さず、終了通知のみ行う。
pub fn run<S: ReportSink + ?Sized>(
    validator: &SkeletonValidator,
    frames: &[SkeletonFrame],
    parallel: bool,
    sink: &mut S,
) -> Result<BatchResult> {
    let result = validate_frames(validator, frames, parallel);

    if result.outcome != RunOutcome::NoData {
        sink.standard_ratios(validator.standard_ratios())?;
        for report in &result.reports {
            sink.frame(report)?;
        }
    }
    sink.finish(result.outcome, &result.summary)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::load_frames;
    use crate::skeleton::fixtures::{standing_frame, standing_frame_with};
    use crate::validator::StandardRatio;

    fn frame_with_id(id: i64, right_knee_z: f64) -> SkeletonFrame {
        let base = standing_frame_with(&[("RIGHT_KNEE", Some([0.5, 0.0, right_knee_z]))]);
        let joints: Vec<(String, Option<[f64; 3]>)> = base
            .joints()
            .map(|(n, p)| {
                let coords = p.map(|p| [p.position.x, p.position.y, p.position.z]);
                (n.to_string(), coords)
            })
            .collect();
        SkeletonFrame::new(id, joints)
    }

    #[derive(Default)]
    struct Recorder {
        ratios: usize,
        frames: Vec<(i64, Vec<String>)>,
        outcome: Option<RunOutcome>,
    }

    impl ReportSink for Recorder {
        fn standard_ratios(&mut self, ratios: &[StandardRatio]) -> Result<()> {
            self.ratios = ratios.len();
            Ok(())
        }

        fn frame(&mut self, report: &FrameReport) -> Result<()> {
            self.frames.push((report.frame_id, report.messages()));
            Ok(())
        }

        fn finish(&mut self, outcome: RunOutcome, _summary: &BatchSummary) -> Result<()> {
            self.outcome = Some(outcome);
            Ok(())
        }
    }

    #[test]
    fn test_all_clear() {
        let validator = SkeletonValidator::new();
        let frames = vec![standing_frame(), standing_frame()];
        let result = validate_frames(&validator, &frames, false);
        assert_eq!(result.outcome, RunOutcome::Clear);
        assert!(result.reports.is_empty());
        assert_eq!(result.summary.frames_checked, 2);
    }

    #[test]
    fn test_reports_only_bad_frames_in_order() {
        let validator = SkeletonValidator::new();
        let frames = vec![
            frame_with_id(10, -1.0),
            frame_with_id(11, -2.0),
            frame_with_id(12, -1.0),
        ];
        let result = validate_frames(&validator, &frames, false);
        assert_eq!(result.outcome, RunOutcome::Discrepancies);
        let ids: Vec<i64> = result.reports.iter().map(|r| r.frame_id).collect();
        assert_eq!(ids, [10, 12]);
        // 1フレームあたり 比率1件 + 左右対称2件
        assert_eq!(result.summary.total_discrepancies, 6);
        assert_eq!(result.summary.frames_with_discrepancies, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let validator = SkeletonValidator::new();
        let frames: Vec<SkeletonFrame> = (0..64)
            .map(|i| frame_with_id(i, if i % 3 == 0 { -1.0 } else { -2.0 }))
            .collect();
        let seq = validate_frames(&validator, &frames, false);
        let par = validate_frames(&validator, &frames, true);
        assert_eq!(seq.reports, par.reports);
        assert_eq!(seq.summary, par.summary);
    }

    #[test]
    fn test_run_sends_ratios_then_frames() {
        let validator = SkeletonValidator::new();
        let frames = vec![frame_with_id(1, -2.0), frame_with_id(2, -1.0)];
        let mut sink = Recorder::default();
        run(&validator, &frames, false, &mut sink).unwrap();
        assert_eq!(sink.ratios, 6);
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].0, 2);
        assert!(sink.frames[0].1[0].contains("WRONG"));
        assert_eq!(sink.outcome, Some(RunOutcome::Discrepancies));
    }

    #[test]
    fn test_missing_input_reports_no_data() {
        let validator = SkeletonValidator::new();
        let frames = load_frames("no/such/input.csv");
        let mut sink = Recorder::default();
        let result = run(&validator, &frames, false, &mut sink).unwrap();
        assert_eq!(result.outcome, RunOutcome::NoData);
        assert_eq!(sink.ratios, 0);
        assert_eq!(sink.outcome, Some(RunOutcome::NoData));
    }
}
