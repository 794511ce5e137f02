//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.
//! `--and`는 여러 번 지정할 수 있고, 지정할 때마다 새 조건 그룹이 시작됩니다.

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// 대상 파일이 이미 있을 때의 처리 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum ConflictPolicy {
    /// 기존 파일 덮어쓰기
    #[default]
    Overwrite,
    /// 건너뛰기 (원본 유지)
    Skip,
    /// 에러로 보고
    Error,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictPolicy::Overwrite => write!(f, "Overwrite"),
            ConflictPolicy::Skip => write!(f, "Skip"),
            ConflictPolicy::Error => write!(f, "Error"),
        }
    }
}

/// jsorter CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "jsorter",
    author = "YourName <your@email.com>",
    version,
    about = "JSON SORTER - JSON 파일의 필드 값으로 파일을 폴더별로 분류하는 CLI 도구",
    long_about = r#"
JSON SORTER
===========

폴더 안의 JSON 파일에서 필드 값을 읽어 (점 표기로 중첩 필드 지원)
조건에 맞는 파일을 값에 따라 이름 붙인 폴더로 이동합니다.

검색 모드 (하나만 지정):
  --keys   키 값으로 분류            (폴더: name=John_country=Italy)
  --find   key=value 중 하나라도 일치 (폴더: name-John)
  --and    그룹 안 조건이 모두 일치   (폴더: name-John_country-Italy)

범위 조건: age=30+  (30 이상)

예제:
  jsorter ./data --keys user.name
  jsorter ./data --find country=Italy country=Spain
  jsorter ./data --and name=John country=Italy --and name=Maria country=Spain
  jsorter ./data --and name=John age=30+ --format "{name}_over_30"
  jsorter ./data --keys country --copy -d ./sorted --dry-run
"#
)]
pub struct Args {
    /// JSON 파일들이 있는 원본 폴더 경로
    pub source: PathBuf,

    /// 분류된 폴더를 만들 기본 경로 (기본값: 원본 폴더/categorized_files)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// 분류 기준 키 (점 표기 지원, 예: user.profile.name)
    #[arg(short, long, num_args = 1..)]
    pub keys: Vec<String>,

    /// 찾을 key=value 조건 (OR)
    #[arg(short, long, num_args = 1..)]
    pub find: Vec<String>,

    /// 모두 일치해야 하는 key=value 조건 그룹 (AND, 여러 번 지정 가능)
    #[arg(short = 'a', long = "and", num_args = 1.., action = ArgAction::Append)]
    pub and_criteria: Vec<String>,

    /// `--and` 지정 단위로 묶은 조건 그룹
    #[arg(skip)]
    pub and_groups: Vec<Vec<String>>,

    /// 폴더 이름 형식 ({key} 자리표시자, 예: "{name}_from_{country}")
    #[arg(long)]
    pub format: Option<String>,

    /// 이동 대신 복사
    #[arg(long)]
    pub copy: bool,

    /// 대상 파일이 이미 있을 때의 처리
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Overwrite)]
    pub on_conflict: ConflictPolicy,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "user_*.json")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 최대 폴더 탐색 깊이 (기본값: 1, 원본 폴더만)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// 실제 이동 없이 분류 결과만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 프로세스 인자를 파싱 (`--and` 그룹 포함)
    pub fn parse_grouped() -> Self {
        let matches = Self::command().get_matches();
        Self::from_matches_grouped(&matches).unwrap_or_else(|e| e.exit())
    }

    /// 주어진 인자 목록을 파싱 (`--and` 그룹 포함)
    pub fn try_parse_grouped_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(itr)?;
        Self::from_matches_grouped(&matches)
    }

    fn from_matches_grouped(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut args = Self::from_arg_matches(matches)?;
        args.and_groups = matches
            .get_occurrences::<String>("and_criteria")
            .map(|occurrences| {
                occurrences
                    .map(|values| values.cloned().collect())
                    .collect()
            })
            .unwrap_or_default();
        Ok(args)
    }

    /// AND 조건 그룹 목록 반환
    ///
    /// 그룹 정보 없이 만들어진 경우 전체 `--and` 값을 하나의 그룹으로 봅니다.
    pub fn get_and_groups(&self) -> Vec<Vec<String>> {
        if !self.and_groups.is_empty() {
            self.and_groups.clone()
        } else if !self.and_criteria.is_empty() {
            vec![self.and_criteria.clone()]
        } else {
            Vec::new()
        }
    }
}
