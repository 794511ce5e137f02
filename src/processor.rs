//! JSON 파일 처리 모듈
//!
//! 개별 JSON 파일의 읽기, 파싱, 필드 추출, 매칭을 담당합니다.
//! 파일 이동은 하지 않으며 결과만 반환합니다.

use memmap2::Mmap;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Result, SortError};
use crate::matcher::{evaluate, MatchSpec, ResolvedRecord};
use crate::naming::FolderNameFormat;

/// 단일 파일의 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 조건에 맞음
    Matched {
        destination_name: String,
        matched_on: Vec<String>,
    },
    /// 조건에 맞지 않음 (건너뜀)
    Unmatched,
    /// 읽기/파싱 실패
    Failed(String),
}

/// 파일 처리 결과
#[derive(Debug)]
pub struct ProcessResult {
    /// 처리된 파일 경로
    pub path: PathBuf,
    pub outcome: FileOutcome,
    /// 원본 파일 크기
    pub file_size: u64,
}

impl ProcessResult {
    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, FileOutcome::Matched { .. })
    }

    /// 매칭된 경우 대상 폴더 이름
    pub fn destination_name(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Matched {
                destination_name, ..
            } => Some(destination_name),
            _ => None,
        }
    }

    /// 실패한 경우 에러 메시지
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// JSON 처리 옵션
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

/// 단일 JSON 파일 처리
///
/// # Arguments
/// * `path` - 처리할 JSON 파일 경로
/// * `spec` - 매칭 조건
/// * `format` - 폴더 이름 형식 (선택)
/// * `options` - 처리 옵션
///
/// # Returns
/// 분류 결과를 담은 `ProcessResult`. 파싱 에러도 결과로 반환됩니다.
pub fn process_file(
    path: PathBuf,
    spec: &MatchSpec,
    format: Option<&FolderNameFormat>,
    options: &ProcessOptions,
) -> ProcessResult {
    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    let outcome = match classify(&path, file_size, spec, format, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "skipping file");
            FileOutcome::Failed(e.to_string())
        }
    };

    ProcessResult {
        path,
        outcome,
        file_size,
    }
}

/// 내부 파일 처리 로직
fn classify(
    path: &Path,
    file_size: u64,
    spec: &MatchSpec,
    format: Option<&FolderNameFormat>,
    options: &ProcessOptions,
) -> Result<FileOutcome> {
    let document = parse_json_file(path, file_size, options)?;
    let record = ResolvedRecord::from_document(&document, spec);
    let result = evaluate(&record, spec, format)?;

    let outcome = match result.destination_name {
        Some(destination_name) if result.matched => {
            tracing::debug!(
                file = %path.display(),
                destination = %destination_name,
                matched_on = ?result.matched_on,
                "matched"
            );
            FileOutcome::Matched {
                destination_name,
                matched_on: result.matched_on,
            }
        }
        _ => {
            tracing::debug!(file = %path.display(), "no match");
            FileOutcome::Unmatched
        }
    };

    Ok(outcome)
}

/// 파일 크기에 따라 버퍼 리더 또는 메모리 매핑으로 JSON 파싱
pub fn parse_json_file(path: &Path, file_size: u64, options: &ProcessOptions) -> Result<Value> {
    if file_size >= options.mmap_threshold {
        // 대용량 파일: 메모리 매핑 사용
        parse_with_mmap(path)
    } else {
        // 일반 파일: 버퍼 리더 사용
        parse_with_reader(path)
    }
}

/// 버퍼 리더를 사용한 JSON 파싱
fn parse_with_reader(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| SortError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| SortError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| SortError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // SAFETY: 처리 중에는 파일을 읽기만 하며, 이동은 매핑을 해제한 뒤에 일어남
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| SortError::FileOpenError {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| SortError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Criterion;
    use crate::path::FieldPath;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn keys(raw: &[&str]) -> MatchSpec {
        MatchSpec::by_keys(raw.iter().map(|k| FieldPath::parse(k).unwrap()).collect()).unwrap()
    }

    #[test]
    fn test_process_matched() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "a.json", r#"{"name": "John"}"#);

        let result = process_file(path, &keys(&["name"]), None, &ProcessOptions::new());
        assert!(result.is_matched());
        assert_eq!(result.destination_name(), Some("name=John"));
        assert_eq!(result.file_size, 16);
    }

    #[test]
    fn test_process_unmatched() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "a.json", r#"{"country": "Italy"}"#);

        let result = process_file(path, &keys(&["name"]), None, &ProcessOptions::new());
        assert_eq!(result.outcome, FileOutcome::Unmatched);
        assert!(result.error().is_none());
    }

    #[test]
    fn test_process_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "broken.json", r#"{"name": "#);

        let result = process_file(path, &keys(&["name"]), None, &ProcessOptions::new());
        let error = result.error().unwrap();
        assert!(error.contains("JSON 파싱 실패"));
        assert!(error.contains("broken.json"));
    }

    #[test]
    fn test_process_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let result = process_file(path, &keys(&["name"]), None, &ProcessOptions::new());
        assert!(result.error().unwrap().contains("파일을 열 수 없습니다"));
    }

    #[test]
    fn test_mmap_path_matches_reader_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            temp_dir.path(),
            "a.json",
            r#"{"profile": {"address": {"country": "Italy"}}}"#,
        );
        let spec =
            MatchSpec::any_of(vec![Criterion::parse("profile.address.country=Italy").unwrap()])
                .unwrap();
        let format = FolderNameFormat::new("{country}");

        let mapped = process_file(
            path.clone(),
            &spec,
            Some(&format),
            &ProcessOptions::new().with_mmap_threshold(0),
        );
        let buffered = process_file(path, &spec, Some(&format), &ProcessOptions::new());

        assert_eq!(mapped.outcome, buffered.outcome);
        assert_eq!(mapped.destination_name(), Some("Italy"));
    }
}
