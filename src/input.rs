//! CSV入力: `frame` 列と `<JOINT>_X/_Y/_Z` 列からフレームを読み込む

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::skeleton::SkeletonFrame;

const FRAME_COLUMN: &str = "frame";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("input has no header line")]
    EmptyInput,
    #[error("header has no `frame` column")]
    MissingFrameColumn,
    #[error("line {line}: invalid frame id {value:?}")]
    InvalidFrameId { line: u64, value: String },
}

/// 関節1つ分の列位置（ヘッダに無い軸は None）
#[derive(Debug, Clone, PartialEq, Eq)]
struct JointColumns {
    name: String,
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
}

/// ヘッダから導出した列レイアウト
#[derive(Debug, Clone)]
pub struct CsvLayout {
    frame: usize,
    joints: Vec<JointColumns>,
}

impl CsvLayout {
    pub fn from_header(header: &StringRecord) -> Result<Self, InputError> {
        let columns: Vec<&str> = header
            .iter()
            .enumerate()
            .map(|(i, c)| if i == 0 { c.trim_start_matches('\u{feff}').trim() } else { c })
            .collect();
        let index: HashMap<&str, usize> = columns.iter().enumerate().map(|(i, c)| (*c, i)).collect();

        let frame = *index.get(FRAME_COLUMN).ok_or(InputError::MissingFrameColumn)?;

        // `<JOINT>_<AXIS>` → JOINT（最後の `_` で分割）
        let names: BTreeSet<&str> = columns
            .iter()
            .filter(|c| **c != FRAME_COLUMN)
            .filter_map(|c| c.rsplit_once('_').map(|(joint, _)| joint))
            .collect();

        let joints = names
            .into_iter()
            .map(|name| JointColumns {
                name: name.to_string(),
                x: index.get(format!("{}_X", name).as_str()).copied(),
                y: index.get(format!("{}_Y", name).as_str()).copied(),
                z: index.get(format!("{}_Z", name).as_str()).copied(),
            })
            .collect();

        Ok(Self { frame, joints })
    }

    /// ヘッダ由来の関節名（ソート済み）
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }

    /// 1行をフレームに変換。座標が読めない関節は未観測として扱う
    pub fn parse_row(&self, line_no: u64, record: &StringRecord) -> Result<SkeletonFrame, InputError> {
        let raw_id = record.get(self.frame).unwrap_or("");
        let frame_id: i64 = raw_id.parse().map_err(|_| InputError::InvalidFrameId {
            line: line_no,
            value: raw_id.to_string(),
        })?;

        let cell = |col: Option<usize>| -> Option<f64> {
            let value: f64 = record.get(col?)?.parse().ok()?;
            value.is_finite().then_some(value)
        };

        let pose_data = self.joints.iter().map(|j| {
            let coords = match (cell(j.x), cell(j.y), cell(j.z)) {
                (Some(x), Some(y), Some(z)) => Some([x, y, z]),
                _ => None,
            };
            (j.name.clone(), coords)
        });

        Ok(SkeletonFrame::new(frame_id, pose_data))
    }
}

/// 空白のみの行
fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}

/// 任意のリーダーから全フレームを読み込む
///
/// 引用符付きフィールドは RFC 4180 に従って解釈する。短い行は末尾の列が欠けたものとして扱う。
pub fn parse_frames<R: Read>(reader: R) -> Result<Vec<SkeletonFrame>, InputError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = reader.records();

    let layout = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if !is_blank(&record) {
                    break CsvLayout::from_header(&record)?;
                }
            }
            None => return Err(InputError::EmptyInput),
        }
    };
    log::debug!("header joints: {:?}", layout.joint_names().collect::<Vec<_>>());

    let mut frames = Vec::new();
    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        frames.push(layout.parse_row(line, &record)?);
    }

    log::info!("loaded {} frames", frames.len());
    Ok(frames)
}

/// ファイルから全フレームを読み込む
pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<SkeletonFrame>, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Io(e),
    })?;
    parse_frames(file)
}

/// 読み込みに失敗した場合はエラーを表示して空リストを返す
pub fn load_frames<P: AsRef<Path>>(path: P) -> Vec<SkeletonFrame> {
    match read_frames(path.as_ref()) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Error: {}", e);
            Vec::new()
        }
    }
}
