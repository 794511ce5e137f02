//! jsorter - JSON SORTER
//!
//! JSON 파일에서 필드 값을 읽어 조건에 맞는 파일을 값별 폴더로 분류하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔑 **키 분류**: 지정한 키의 값으로 폴더 분류 (`--keys`)
//! - 🔍 **OR 검색**: key=value 조건 중 하나라도 맞는 파일 분류 (`--find`)
//! - 🎯 **AND 그룹**: 그룹 안 조건이 모두 맞는 파일 분류 (`--and`, 여러 그룹 지원)
//! - 🪆 **중첩 필드**: 점 표기(`user.profile.name`)로 깊은 필드 접근
//! - 📏 **범위 조건**: `age=30+` 형식의 숫자 하한 비교
//! - 🏷️ **폴더 이름 형식**: `{name}_from_{country}` 템플릿
//! - 🧪 **드라이런 모드**: 실제 이동 없이 분류 결과 미리 확인
//! - 📊 **상세 통계**: 이동/미매칭/실패 파일 수 표시
//!
//! # 예제
//!
//! ```bash
//! # 키 값으로 분류
//! jsorter ./data --keys user.name
//!
//! # AND 그룹 + 폴더 이름 형식
//! jsorter ./data --and name=John country=Italy --format "{name}_from_{country}"
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod naming;
pub mod path;
pub mod processor;
pub mod sorter;
pub mod stats;
pub mod transfer;

// Re-exports for convenient access
pub use cli::{Args, ConflictPolicy};
pub use config::{build_match_spec, SortConfig};
pub use error::{Result, SortError};
pub use filter::FileFilter;
pub use matcher::{
    evaluate, Comparison, CriteriaGroup, Criterion, MatchResult, MatchSpec, ResolvedRecord,
};
pub use naming::{sanitize_dir_name, FolderNameFormat};
pub use path::{resolve, FieldPath, ResolvedValue};
pub use processor::{process_file, FileOutcome, ProcessOptions, ProcessResult};
pub use sorter::{collect_json_files, sort_files, Placement, SortReport};
pub use stats::{format_bytes, format_duration, Statistics};
pub use transfer::{FileTransfer, FsTransfer, TransferMode, TransferOutcome};
