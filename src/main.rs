//! jsorter - JSON SORTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

use jsorter::{
    cli::Args,
    collect_json_files,
    config::SortConfig,
    sort_files, FileFilter, FileOutcome, FsTransfer, ProcessResult, SortReport, Statistics,
};

fn main() -> Result<()> {
    let args = Args::parse_grouped();

    init_tracing(args.verbose);

    // 설정 검증 (파일 처리 전에 모든 설정 에러 보고)
    let config = SortConfig::from_args(&args)?;
    let filter = FileFilter::new(config.pattern.as_deref())?;

    print_header(&config);

    let json_files = collect_json_files(&config, &filter);

    if json_files.is_empty() {
        println!("{}", "⚠️ 처리할 JSON 파일이 없습니다.".yellow());
        return Ok(());
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        json_files.len().to_string().bright_green()
    );

    run(&config, json_files)
}

/// RUST_LOG 환경 변수 기반 진단 로그 초기화 (stderr)
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,jsorter=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 헤더 출력
fn print_header(config: &SortConfig) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🗂️  JSON SORTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 원본 폴더: {:?}", "📂".bright_cyan(), config.source);
    println!("  {} 대상 폴더: {:?}", "📁".bright_green(), config.destination);
    println!("  {} 모드: {}", "⚙️".bright_yellow(), config.spec.mode_name());
    println!(
        "  {} 전송: {} (충돌 시 {})",
        "🚚".bright_white(),
        config.transfer,
        config.on_conflict
    );

    if let Some(ref format) = config.format {
        println!("  {} 폴더 형식: {}", "🏷️".bright_magenta(), format);
    }

    if let Some(ref pattern) = config.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    println!("  {} 최대 깊이: {}", "📏".bright_white(), config.max_depth);

    if config.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 이동 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 분류 실행
fn run(config: &SortConfig, json_files: Vec<PathBuf>) -> Result<()> {
    let stats = Statistics::new(json_files.len());
    let transfer = FsTransfer::new(config.transfer, config.on_conflict);

    let pb = if config.dry_run {
        ProgressBar::hidden()
    } else {
        create_progress_bar(json_files.len())
    };

    println!("\n{}", "⚡ 분류 중...".bright_cyan());

    let report = sort_files(config, json_files, &transfer, &stats, |result| {
        pb.inc(1);

        if !config.verbose {
            return;
        }

        // 드라이런의 숨김 진행률 표시줄에서도 출력되도록 println 대신 suspend
        if let Some(line) = verbose_line(result) {
            pb.suspend(|| println!("{}", line));
        }
    });

    pb.finish_with_message("완료!");

    if config.dry_run {
        print_dry_run(&report);
    }

    print_errors(&report.errors, config.verbose);

    if let Some(ref log_path) = config.log {
        write_error_log(log_path, &report.errors)?;
    }

    let action = if config.dry_run {
        "이동 예정".to_string()
    } else {
        config.transfer.to_string()
    };
    stats.print_summary(&action);

    println!("\n{} 분류 완료: {:?}\n", "✅".bright_green(), config.destination);

    Ok(())
}

/// 진행률 바 생성
/// 파일 하나의 상세 출력 줄 (실패는 마지막 오류 목록에서 출력)
fn verbose_line(result: &ProcessResult) -> Option<String> {
    let name = result.path.file_name().unwrap_or_default();
    match &result.outcome {
        FileOutcome::Matched {
            destination_name,
            matched_on,
        } => Some(format!(
            "  {} {:?} → {} ({})",
            "✓".green(),
            name,
            destination_name.bright_white(),
            matched_on.join(", ").dimmed()
        )),
        FileOutcome::Unmatched => Some(format!("  {} {:?}", "·".dimmed(), name)),
        FileOutcome::Failed(_) => None,
    }
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 드라이런 결과 출력
fn print_dry_run(report: &SortReport) {
    println!("\n{}", "📋 분류 예정 목록:".bright_cyan());
    for (i, placement) in report.placements.iter().enumerate() {
        println!(
            "  {}. {:?} → {:?}",
            i + 1,
            placement.source.file_name().unwrap_or_default(),
            placement.destination_dir
        );
    }
    println!(
        "\n{} 총 {} 개의 파일이 분류될 예정입니다.",
        "ℹ️".bright_blue(),
        report.placements.len().to_string().bright_green()
    );
}

/// 에러 목록 출력
fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 오류 발생 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)
        .with_context(|| format!("에러 로그 파일을 만들 수 없습니다: {:?}", log_path))?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    writeln!(log_file, "jsorter 에러 로그")?;
    writeln!(log_file, "생성 시간: Unix timestamp: {}", timestamp)?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}
