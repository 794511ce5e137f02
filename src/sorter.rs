//! 분류 실행 모듈
//!
//! 파일 수집 → 파싱/매칭 → 이동 순서로 한 파일씩 순차 처리합니다.
//! 파일 단위 에러는 실행을 중단하지 않고 보고서에 모입니다.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SortConfig;
use crate::error::SortError;
use crate::filter::FileFilter;
use crate::processor::{process_file, FileOutcome, ProcessOptions, ProcessResult};
use crate::stats::Statistics;
use crate::transfer::{FileTransfer, TransferOutcome};

/// 매칭된 파일 하나의 배치 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    pub matched_on: Vec<String>,
    /// 드라이런이면 None
    pub outcome: Option<TransferOutcome>,
}

/// 실행 보고서
#[derive(Debug, Default)]
pub struct SortReport {
    pub placements: Vec<Placement>,
    pub errors: Vec<(PathBuf, String)>,
}

/// 원본 폴더에서 처리할 JSON 파일 수집
///
/// 대상 폴더가 원본 폴더 안에 있어도 그 안은 탐색하지 않습니다.
pub fn collect_json_files(config: &SortConfig, filter: &FileFilter) -> Vec<PathBuf> {
    let destination = fs::canonicalize(&config.destination).ok();
    let is_destination = |path: &Path| {
        path == config.destination
            || destination
                .as_deref()
                .is_some_and(|d| fs::canonicalize(path).ok().as_deref() == Some(d))
    };

    WalkDir::new(&config.source)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_destination(e.path())))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| filter.accepts(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// 파일 목록을 순서대로 분류
///
/// `on_file`은 파일 하나를 처리할 때마다 호출됩니다 (진행률 표시용).
///
/// 하위 폴더의 같은 이름 파일이 한 실행 안에서 같은 대상 경로로 모이면
/// 먼저 처리된 파일만 전송하고, 나머지는 `DestinationExists` 에러로 남깁니다.
pub fn sort_files<T, F>(
    config: &SortConfig,
    files: Vec<PathBuf>,
    transfer: &T,
    stats: &Statistics,
    mut on_file: F,
) -> SortReport
where
    T: FileTransfer + ?Sized,
    F: FnMut(&ProcessResult),
{
    let options = ProcessOptions::new();
    let mut report = SortReport::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for path in files {
        let result = process_file(path, &config.spec, config.format.as_ref(), &options);
        on_file(&result);

        match result.outcome {
            FileOutcome::Matched {
                destination_name,
                matched_on,
            } => {
                let destination_dir = config.destination.join(&destination_name);
                let target = destination_dir.join(result.path.file_name().unwrap_or_default());

                if !claimed.insert(target.clone()) {
                    let e = SortError::DestinationExists { path: target };
                    tracing::warn!(file = %result.path.display(), error = %e, "target already used in this run");
                    stats.increment_error();
                    report.errors.push((result.path, e.to_string()));
                    continue;
                }

                if config.dry_run {
                    stats.increment_transferred();
                    report.placements.push(Placement {
                        source: result.path,
                        destination_dir,
                        matched_on,
                        outcome: None,
                    });
                    continue;
                }

                match transfer.transfer(&result.path, &destination_dir) {
                    Ok(outcome) => {
                        match &outcome {
                            TransferOutcome::Transferred { bytes, .. } => {
                                stats.increment_transferred();
                                stats.add_bytes_transferred(*bytes);
                            }
                            TransferOutcome::SkippedExisting { target } => {
                                tracing::info!(path = %target.display(), "destination exists, skipped");
                                stats.increment_existing();
                            }
                        }
                        report.placements.push(Placement {
                            source: result.path,
                            destination_dir,
                            matched_on,
                            outcome: Some(outcome),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(file = %result.path.display(), error = %e, "transfer failed");
                        stats.increment_error();
                        report.errors.push((result.path, e.to_string()));
                    }
                }
            }
            FileOutcome::Unmatched => stats.increment_unmatched(),
            FileOutcome::Failed(reason) => {
                stats.increment_error();
                report.errors.push((result.path, reason));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConflictPolicy;
    use crate::config::build_match_spec;
    use crate::error::Result;
    use crate::transfer::TransferMode;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// 실제로 옮기지 않고 호출만 기록하는 전송기
    #[derive(Default)]
    struct RecordingTransfer {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
        fail: bool,
    }

    impl FileTransfer for RecordingTransfer {
        fn transfer(&self, source: &Path, destination_dir: &Path) -> Result<TransferOutcome> {
            self.calls
                .borrow_mut()
                .push((source.to_path_buf(), destination_dir.to_path_buf()));
            if self.fail {
                return Err(SortError::CreateDirError {
                    path: destination_dir.to_path_buf(),
                    reason: "read-only".to_string(),
                });
            }
            Ok(TransferOutcome::Transferred {
                target: destination_dir.join(source.file_name().unwrap()),
                bytes: 1,
            })
        }
    }

    fn config(source: &Path, find: &[&str]) -> SortConfig {
        SortConfig {
            source: source.to_path_buf(),
            destination: source.join("categorized_files"),
            spec: build_match_spec(&[], find, &[]).unwrap(),
            format: None,
            transfer: TransferMode::Move,
            on_conflict: ConflictPolicy::Overwrite,
            pattern: None,
            max_depth: 1,
            dry_run: false,
            verbose: false,
            log: None,
        }
    }

    fn setup() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json"), r#"{"country": "Italy"}"#).unwrap();
        fs::write(temp_dir.path().join("b.json"), r#"{"country": "Spain"}"#).unwrap();
        fs::write(temp_dir.path().join("c.json"), r#"{"country": "#).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not json").unwrap();
        temp_dir
    }

    #[test]
    fn test_collect_skips_destination_and_depth() {
        let temp_dir = setup();
        let config = config(temp_dir.path(), &["country=Italy"]);

        let sorted = config.destination.join("country-Italy");
        fs::create_dir_all(&sorted).unwrap();
        fs::write(sorted.join("old.json"), "{}").unwrap();

        let nested = temp_dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.json"), "{}").unwrap();

        let files = collect_json_files(&config, &FileFilter::new(None).unwrap());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.json"]);

        let mut deep = config.clone();
        deep.max_depth = 3;
        let files = collect_json_files(&deep, &FileFilter::new(None).unwrap());
        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|p| !p.starts_with(&deep.destination)));
    }

    #[test]
    fn test_sort_files_counts_outcomes() {
        let temp_dir = setup();
        let config = config(temp_dir.path(), &["country=Italy"]);
        let files = collect_json_files(&config, &FileFilter::new(None).unwrap());
        let stats = Statistics::new(files.len());
        let transfer = RecordingTransfer::default();

        let mut seen = 0;
        let report = sort_files(&config, files, &transfer, &stats, |_| seen += 1);

        assert_eq!(seen, 3);
        assert_eq!(stats.get_transferred_count(), 1);
        assert_eq!(stats.get_unmatched_count(), 1);
        assert_eq!(stats.get_error_count(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].0.ends_with("c.json"));

        let calls = transfer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, config.destination.join("country-Italy"));
        assert_eq!(report.placements[0].matched_on, vec!["country=Italy"]);
    }

    #[test]
    fn test_dry_run_never_transfers() {
        let temp_dir = setup();
        let mut config = config(temp_dir.path(), &["country=Italy", "country=Spain"]);
        config.dry_run = true;
        let files = collect_json_files(&config, &FileFilter::new(None).unwrap());
        let stats = Statistics::new(files.len());
        let transfer = RecordingTransfer::default();

        let report = sort_files(&config, files, &transfer, &stats, |_| {});

        assert!(transfer.calls.borrow().is_empty());
        assert_eq!(report.placements.len(), 2);
        assert!(report.placements.iter().all(|p| p.outcome.is_none()));
    }

    #[test]
    fn test_transfer_errors_are_reported_per_file() {
        let temp_dir = setup();
        let config = config(temp_dir.path(), &["country=Italy", "country=Spain"]);
        let files = collect_json_files(&config, &FileFilter::new(None).unwrap());
        let stats = Statistics::new(files.len());
        let transfer = RecordingTransfer {
            fail: true,
            ..Default::default()
        };

        let report = sort_files(&config, files, &transfer, &stats, |_| {});

        assert_eq!(transfer.calls.borrow().len(), 2);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(stats.get_error_count(), 3);
        assert_eq!(stats.get_transferred_count(), 0);
    }

    #[test]
    fn test_same_target_in_one_run_is_not_transferred_twice() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a.json"), r#"{"country": "Italy"}"#).unwrap();
        fs::write(nested.join("a.json"), r#"{"country": "Italy"}"#).unwrap();

        let mut config = config(temp_dir.path(), &["country=Italy"]);
        config.max_depth = 2;
        let files = collect_json_files(&config, &FileFilter::new(None).unwrap());
        assert_eq!(files.len(), 2);

        for dry_run in [false, true] {
            config.dry_run = dry_run;
            let stats = Statistics::new(files.len());
            let transfer = RecordingTransfer::default();

            let report = sort_files(&config, files.clone(), &transfer, &stats, |_| {});

            assert_eq!(stats.get_transferred_count(), 1);
            assert_eq!(stats.get_error_count(), 1);
            assert_eq!(report.placements.len(), 1);
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].0.ends_with("sub/a.json"));
            assert!(report.errors[0].1.contains("a.json"));
            assert_eq!(transfer.calls.borrow().len(), if dry_run { 0 } else { 1 });
        }
    }
}
