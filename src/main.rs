use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use skeleton_check::batch::{run, RunOutcome};
use skeleton_check::config::{Config, ReportFormat};
use skeleton_check::input::load_frames;
use skeleton_check::report::{JsonReport, ReportSink, TextReport};
use skeleton_check::validator::SkeletonValidator;

const CONFIG_PATH: &str = "config.toml";

/// 違反があった場合の終了コード（--strict 時）
const EXIT_DISCREPANCIES: u8 = 2;

/// 3D関節データの骨格妥当性チェック
#[derive(Parser, Debug)]
#[command(name = "skeleton-check", version = env!("SKELETON_CHECK_VERSION"), about)]
struct Args {
    /// 入力CSV（省略時は設定ファイルの input.path）
    input: Option<PathBuf>,

    /// 設定ファイル（省略時は ./config.toml があれば使用）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 出力形式: text / json
    #[arg(long)]
    format: Option<ReportFormat>,

    /// フレームを並列に検証
    #[arg(long)]
    parallel: bool,

    /// 違反があれば終了コード 2
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default(CONFIG_PATH),
    };

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.input.path));
    let format = args.format.unwrap_or(config.report.format);
    let parallel = args.parallel || config.batch.parallel;
    log::info!("input: {} (format={:?}, parallel={})", input.display(), format, parallel);

    let frames = load_frames(&input);
    let validator = SkeletonValidator::new();

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn ReportSink> = match format {
        ReportFormat::Text => Box::new(TextReport::new(stdout, config.report.show_standard_ratios)),
        ReportFormat::Json => Box::new(JsonReport::new(stdout)),
    };
    let result = run(&validator, &frames, parallel, sink.as_mut())?;

    if args.strict && result.outcome == RunOutcome::Discrepancies {
        return Ok(ExitCode::from(EXIT_DISCREPANCIES));
    }
    Ok(ExitCode::SUCCESS)
}
