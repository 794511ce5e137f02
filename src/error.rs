//! 에러 타입 정의 모듈
//!
//! jsorter에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 필드 누락이나 타입 불일치는 에러가 아니라 "매칭 실패"로 처리되므로 여기에 없습니다.

use std::path::PathBuf;
use thiserror::Error;

/// jsorter에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum SortError {
    /// 원본 폴더가 존재하지 않음
    #[error("원본 폴더를 찾을 수 없습니다: {path}")]
    SourceNotFound { path: PathBuf },

    /// 원본 경로가 폴더가 아님
    #[error("원본 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// --keys / --find / --and 중 아무것도 지정되지 않음
    #[error("--keys, --find, --and 중 하나를 지정해야 합니다")]
    NoMatchMode,

    /// 여러 모드를 동시에 지정함
    #[error("검색 모드는 하나만 지정할 수 있습니다: {modes}")]
    ConflictingModes { modes: String },

    /// key=value 형식이 아님
    #[error("잘못된 조건 형식입니다 (key=value 필요): {token}")]
    InvalidCriterion { token: String },

    /// 점 표기 경로가 잘못됨 (빈 세그먼트 등)
    #[error("잘못된 필드 경로입니다: {path:?}")]
    InvalidFieldPath { path: String },

    /// 조건/키가 하나도 없는 매치 스펙
    #[error("매치 조건이 비어 있습니다")]
    EmptyMatchSpec,

    /// 유효하지 않은 글로브 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// JSON 파일 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// JSON 파싱 실패
    #[error("JSON 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// 대상 폴더 생성 실패
    #[error("폴더를 만들 수 없습니다 ({path}): {reason}")]
    CreateDirError { path: PathBuf, reason: String },

    /// 파일 이동/복사 실패
    #[error("파일 이동 실패 ({from} -> {to}): {reason}")]
    TransferError {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// 대상 파일이 이미 존재 (Error 모드, 또는 같은 실행에서 이미 쓴 경로)
    #[error("대상 파일이 이미 존재합니다: {path}")]
    DestinationExists { path: PathBuf },
}

impl SortError {
    /// 실행 전에 보고되어야 하는 설정 에러인지 확인
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SortError::SourceNotFound { .. }
                | SortError::NotADirectory { .. }
                | SortError::NoMatchMode
                | SortError::ConflictingModes { .. }
                | SortError::InvalidCriterion { .. }
                | SortError::InvalidFieldPath { .. }
                | SortError::EmptyMatchSpec
                | SortError::InvalidPattern { .. }
        )
    }
}

/// jsorter 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SortError>;
