//! 실행 설정 모듈
//!
//! CLI 인자를 한 번만 검증하여 변경되지 않는 `SortConfig`로 만듭니다.
//! `key=value` 토큰은 여기서 `Criterion`으로 파싱되며, 잘못된 토큰은 파일 처리 전에 에러가 됩니다.

use std::path::PathBuf;

use crate::cli::{Args, ConflictPolicy};
use crate::error::{Result, SortError};
use crate::matcher::{CriteriaGroup, Criterion, MatchSpec};
use crate::naming::FolderNameFormat;
use crate::path::FieldPath;
use crate::transfer::TransferMode;

/// 대상 폴더 기본 이름 (원본 폴더 아래에 생성)
pub const DEFAULT_DESTINATION: &str = "categorized_files";

/// 기본 탐색 깊이 (원본 폴더의 파일만)
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// 검증이 끝난 실행 설정
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub spec: MatchSpec,
    pub format: Option<FolderNameFormat>,
    pub transfer: TransferMode,
    pub on_conflict: ConflictPolicy,
    pub pattern: Option<String>,
    pub max_depth: usize,
    pub dry_run: bool,
    pub verbose: bool,
    pub log: Option<PathBuf>,
}

impl SortConfig {
    /// CLI 인자로부터 설정 생성
    pub fn from_args(args: &Args) -> Result<Self> {
        validate_source(&args.source)?;

        let spec = build_match_spec(&args.keys, &args.find, &args.get_and_groups())?;

        let destination = args
            .destination
            .clone()
            .unwrap_or_else(|| args.source.join(DEFAULT_DESTINATION));

        Ok(Self {
            source: args.source.clone(),
            destination,
            spec,
            format: args.format.as_deref().map(FolderNameFormat::new),
            transfer: if args.copy {
                TransferMode::Copy
            } else {
                TransferMode::Move
            },
            on_conflict: args.on_conflict,
            pattern: args.pattern.clone(),
            max_depth: args.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            dry_run: args.dry_run,
            verbose: args.verbose,
            log: args.log.clone(),
        })
    }
}

/// 원본 경로 유효성 검사
fn validate_source(source: &std::path::Path) -> Result<()> {
    if !source.exists() {
        return Err(SortError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    if !source.is_dir() {
        return Err(SortError::NotADirectory {
            path: source.to_path_buf(),
        });
    }

    Ok(())
}

/// 세 가지 모드 중 정확히 하나가 지정되었는지 확인하고 `MatchSpec` 생성
pub fn build_match_spec<S: AsRef<str>>(
    keys: &[S],
    find: &[S],
    and_groups: &[Vec<S>],
) -> Result<MatchSpec> {
    let mut selected = Vec::new();
    if !keys.is_empty() {
        selected.push("--keys");
    }
    if !find.is_empty() {
        selected.push("--find");
    }
    if !and_groups.is_empty() {
        selected.push("--and");
    }

    match selected.len() {
        0 => return Err(SortError::NoMatchMode),
        1 => {}
        _ => {
            return Err(SortError::ConflictingModes {
                modes: selected.join(", "),
            })
        }
    }

    if !keys.is_empty() {
        let paths = keys
            .iter()
            .map(|k| FieldPath::parse(k.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        MatchSpec::by_keys(paths)
    } else if !find.is_empty() {
        let criteria = find
            .iter()
            .map(|t| Criterion::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        MatchSpec::any_of(criteria)
    } else {
        let groups = and_groups
            .iter()
            .map(|g| CriteriaGroup::parse(g))
            .collect::<Result<Vec<_>>>()?;
        MatchSpec::any_group_all_of(groups)
    }
}
