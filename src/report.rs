//! 検証結果の出力（テキスト / JSON）

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::batch::{BatchSummary, RunOutcome};
use crate::skeleton::HeightMethod;
use crate::validator::{FrameReport, StandardRatio};

/// 検証結果の受け手
pub trait ReportSink {
    /// 標準比率テーブル（実行開始時に1回）
    fn standard_ratios(&mut self, ratios: &[StandardRatio]) -> Result<()>;
    /// 違反のあったフレーム
    fn frame(&mut self, report: &FrameReport) -> Result<()>;
    /// 実行終了
    fn finish(&mut self, outcome: RunOutcome, summary: &BatchSummary) -> Result<()>;
}

/// 人が読むためのテキスト出力
pub struct TextReport<W: Write> {
    out: W,
    show_standard_ratios: bool,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W, show_standard_ratios: bool) -> Self {
        Self {
            out,
            show_standard_ratios,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn standard_ratios(&mut self, ratios: &[StandardRatio]) -> Result<()> {
        if !self.show_standard_ratios {
            return Ok(());
        }
        for ratio in ratios {
            writeln!(self.out, "{} {:.0}%", ratio.name, ratio.fraction * 100.0)?;
        }
        Ok(())
    }

    fn frame(&mut self, report: &FrameReport) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "--- Error in {} ---", report.frame_id)?;
        for message in report.messages() {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn finish(&mut self, outcome: RunOutcome, summary: &BatchSummary) -> Result<()> {
        match outcome {
            RunOutcome::Clear => {
                writeln!(self.out)?;
                writeln!(self.out, "CLEAR")?;
            }
            RunOutcome::Discrepancies => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "{} of {} frames with discrepancies",
                    summary.frames_with_discrepancies, summary.frames_checked
                )?;
            }
            RunOutcome::NoData => writeln!(self.out, "Data not found or error.")?,
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct JsonRatio {
    name: &'static str,
    percent: String,
}

#[derive(Debug, Serialize)]
struct JsonFrame {
    frame: i64,
    estimated_height: f64,
    height_method: HeightMethod,
    discrepancies: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    status: RunOutcome,
    standard_ratios: &'a [JsonRatio],
    frames: &'a [JsonFrame],
    summary: &'a BatchSummary,
}

/// 実行終了時に1つのJSONドキュメントを書き出す
pub struct JsonReport<W: Write> {
    out: W,
    ratios: Vec<JsonRatio>,
    frames: Vec<JsonFrame>,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ratios: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn standard_ratios(&mut self, ratios: &[StandardRatio]) -> Result<()> {
        self.ratios = ratios
            .iter()
            .map(|r| JsonRatio {
                name: r.name,
                percent: format!("{:.0}", r.fraction * 100.0),
            })
            .collect();
        Ok(())
    }

    fn frame(&mut self, report: &FrameReport) -> Result<()> {
        self.frames.push(JsonFrame {
            frame: report.frame_id,
            estimated_height: report.estimated_height,
            height_method: report.height_method,
            discrepancies: report.messages(),
        });
        Ok(())
    }

    fn finish(&mut self, outcome: RunOutcome, summary: &BatchSummary) -> Result<()> {
        let doc = JsonDocument {
            status: outcome,
            standard_ratios: &self.ratios,
            frames: &self.frames,
            summary,
        };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
