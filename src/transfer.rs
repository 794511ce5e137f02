//! 파일 이동/복사 모듈
//!
//! 매칭된 파일을 대상 폴더로 옮깁니다. 대상 폴더가 없으면 만듭니다.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cli::ConflictPolicy;
use crate::error::{Result, SortError};

/// 이동 또는 복사
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferMode::Move => write!(f, "이동"),
            TransferMode::Copy => write!(f, "복사"),
        }
    }
}

/// 파일 전송 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 전송 완료
    Transferred { target: PathBuf, bytes: u64 },
    /// 대상 파일이 이미 있어 건너뜀
    SkippedExisting { target: PathBuf },
}

/// 파일 시스템 전송 인터페이스
pub trait FileTransfer {
    /// `source`를 `destination_dir` 안으로 옮기고 결과를 반환
    fn transfer(&self, source: &Path, destination_dir: &Path) -> Result<TransferOutcome>;
}

/// 실제 파일 시스템을 사용하는 전송기
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTransfer {
    pub mode: TransferMode,
    pub on_conflict: ConflictPolicy,
}

impl FsTransfer {
    pub fn new(mode: TransferMode, on_conflict: ConflictPolicy) -> Self {
        Self { mode, on_conflict }
    }
}

impl FileTransfer for FsTransfer {
    fn transfer(&self, source: &Path, destination_dir: &Path) -> Result<TransferOutcome> {
        fs::create_dir_all(destination_dir).map_err(|e| SortError::CreateDirError {
            path: destination_dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let file_name = source.file_name().ok_or_else(|| SortError::TransferError {
            from: source.to_path_buf(),
            to: destination_dir.to_path_buf(),
            reason: "파일 이름이 없습니다".to_string(),
        })?;
        let target = destination_dir.join(file_name);

        if target.exists() {
            match self.on_conflict {
                ConflictPolicy::Skip => return Ok(TransferOutcome::SkippedExisting { target }),
                ConflictPolicy::Error => return Err(SortError::DestinationExists { path: target }),
                ConflictPolicy::Overwrite => {}
            }
        }

        let bytes = fs::metadata(source).map(|m| m.len()).unwrap_or(0);

        let result = match self.mode {
            TransferMode::Copy => fs::copy(source, &target).map(|_| ()),
            TransferMode::Move => move_file(source, &target),
        };

        result.map_err(|e| SortError::TransferError {
            from: source.to_path_buf(),
            to: target.clone(),
            reason: e.to_string(),
        })?;

        Ok(TransferOutcome::Transferred { target, bytes })
    }
}

/// rename이 실패하면 (다른 장치 간 이동 등) 복사 후 삭제
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    fs::copy(source, target)?;
    fs::remove_file(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("user1.json");
        fs::write(&source, r#"{"name": "John"}"#).unwrap();
        (temp_dir, source)
    }

    #[test]
    fn test_move_creates_directory() {
        let (temp_dir, source) = setup();
        let dest = temp_dir.path().join("out").join("name=John");

        let transfer = FsTransfer::new(TransferMode::Move, ConflictPolicy::Overwrite);
        let outcome = transfer.transfer(&source, &dest).unwrap();

        let target = dest.join("user1.json");
        assert_eq!(
            outcome,
            TransferOutcome::Transferred {
                target: target.clone(),
                bytes: 16
            }
        );
        assert!(target.exists());
        assert!(!source.exists());
    }

    #[test]
    fn test_copy_keeps_source() {
        let (temp_dir, source) = setup();
        let dest = temp_dir.path().join("John");

        let transfer = FsTransfer::new(TransferMode::Copy, ConflictPolicy::Overwrite);
        transfer.transfer(&source, &dest).unwrap();

        assert!(source.exists());
        assert!(dest.join("user1.json").exists());
    }

    #[test]
    fn test_conflict_policies() {
        let (temp_dir, source) = setup();
        let dest = temp_dir.path().join("John");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("user1.json"), "old").unwrap();

        let skip = FsTransfer::new(TransferMode::Move, ConflictPolicy::Skip);
        assert!(matches!(
            skip.transfer(&source, &dest).unwrap(),
            TransferOutcome::SkippedExisting { .. }
        ));
        assert!(source.exists());

        let error = FsTransfer::new(TransferMode::Move, ConflictPolicy::Error);
        assert!(matches!(
            error.transfer(&source, &dest),
            Err(SortError::DestinationExists { .. })
        ));
        assert!(source.exists());

        let overwrite = FsTransfer::new(TransferMode::Move, ConflictPolicy::Overwrite);
        overwrite.transfer(&source, &dest).unwrap();
        assert_eq!(
            fs::read_to_string(dest.join("user1.json")).unwrap(),
            r#"{"name": "John"}"#
        );
        assert!(!source.exists());
    }

    #[test]
    fn test_missing_source_is_transfer_error() {
        let temp_dir = TempDir::new().unwrap();
        let transfer = FsTransfer::default();

        let result = transfer.transfer(
            &temp_dir.path().join("missing.json"),
            &temp_dir.path().join("out"),
        );
        assert!(matches!(result, Err(SortError::TransferError { .. })));
    }
}
