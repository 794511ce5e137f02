//! 매칭 엔진 모듈
//!
//! 추출된 필드 값이 검색 조건에 맞는지 판단하고, 맞으면 대상 폴더 이름을 계산합니다.
//!
//! 세 가지 모드를 지원합니다.
//!
//! - [`MatchSpec::ByKeys`]: 모든 키가 존재하면 매칭, 값으로 폴더 분류
//! - [`MatchSpec::AnyOf`]: 조건 중 하나라도 맞으면 매칭 (OR)
//! - [`MatchSpec::AnyGroupAllOf`]: 그룹 안의 조건이 모두 맞는 그룹이 하나라도 있으면 매칭 (그룹 내 AND, 그룹 간 OR)
//!
//! 필드 누락, 숫자가 아닌 값의 범위 비교, 없는 자리표시자는 모두 에러가 아니라
//! "매칭 안 됨" 또는 "문자 그대로 출력"으로 처리됩니다.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SortError};
use crate::naming::{default_name, sanitize_dir_name, FieldValue, FolderNameFormat};
use crate::path::{resolve, FieldPath, ResolvedValue};

/// 조건 비교 방식
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    /// 문자열 완전 일치 (대소문자 구분)
    Equals,
    /// 숫자 하한 비교 (`30+` → 값 ≥ 30)
    AtLeast(f64),
}

/// 하나의 검색 조건 (필드 경로, 기대값, 비교 방식)
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    path: FieldPath,
    expected: String,
    comparison: Comparison,
}

impl Criterion {
    /// 기대값이 `N+` 형식이고 N이 숫자면 범위 비교, 아니면 문자열 비교
    pub fn new(path: FieldPath, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        let comparison = match parse_lower_bound(&expected) {
            Some(bound) => Comparison::AtLeast(bound),
            None => Comparison::Equals,
        };

        Self {
            path,
            expected,
            comparison,
        }
    }

    /// `key=value` 토큰 파싱 (첫 번째 `=` 기준으로 분리)
    ///
    /// # Examples
    /// ```
    /// use jsorter::matcher::{Comparison, Criterion};
    ///
    /// let c = Criterion::parse("user.age=30+").unwrap();
    /// assert_eq!(c.path().as_str(), "user.age");
    /// assert_eq!(c.comparison(), Comparison::AtLeast(30.0));
    ///
    /// assert!(Criterion::parse("no-equals-sign").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| SortError::InvalidCriterion {
                token: token.to_string(),
            })?;

        if key.trim().is_empty() {
            return Err(SortError::InvalidCriterion {
                token: token.to_string(),
            });
        }

        Ok(Self::new(FieldPath::parse(key)?, value))
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// 추출된 값이 조건을 만족하는지 확인
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match self.comparison {
            Comparison::Equals => value == self.expected,
            Comparison::AtLeast(bound) => parse_number(value).is_some_and(|n| n >= bound),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.expected)
    }
}

/// `N+` 형식의 하한값 파싱
fn parse_lower_bound(expected: &str) -> Option<f64> {
    expected.strip_suffix('+').and_then(parse_number)
}

/// 공백을 포함한 값은 숫자로 보지 않음 (문자열 비교와 같은 엄격함)
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 모두 만족해야 하는 조건 묶음 (AND)
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaGroup {
    criteria: Vec<Criterion>,
}

impl CriteriaGroup {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self> {
        if criteria.is_empty() {
            return Err(SortError::EmptyMatchSpec);
        }
        Ok(Self { criteria })
    }

    /// `key=value` 토큰 목록으로 그룹 생성
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let criteria = tokens
            .iter()
            .map(|t| Criterion::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(criteria)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// 그룹의 모든 조건이 맞는지 확인
    pub fn matches(&self, record: &ResolvedRecord) -> bool {
        self.criteria.iter().all(|c| c.matches(record.get(c.path())))
    }
}

/// 검색 모드 (실행당 하나만 활성)
#[derive(Debug, Clone, PartialEq)]
pub enum MatchSpec {
    /// 키 분류 모드 (--keys)
    ByKeys(Vec<FieldPath>),
    /// OR 모드 (--find)
    AnyOf(Vec<Criterion>),
    /// AND 그룹 모드 (--and ...)
    AnyGroupAllOf(Vec<CriteriaGroup>),
}

impl MatchSpec {
    pub fn by_keys(paths: Vec<FieldPath>) -> Result<Self> {
        let spec = MatchSpec::ByKeys(paths);
        spec.validate()?;
        Ok(spec)
    }

    pub fn any_of(criteria: Vec<Criterion>) -> Result<Self> {
        let spec = MatchSpec::AnyOf(criteria);
        spec.validate()?;
        Ok(spec)
    }

    pub fn any_group_all_of(groups: Vec<CriteriaGroup>) -> Result<Self> {
        let spec = MatchSpec::AnyGroupAllOf(groups);
        spec.validate()?;
        Ok(spec)
    }

    /// 조건/키가 하나도 없으면 설정 에러
    pub fn validate(&self) -> Result<()> {
        let empty = match self {
            MatchSpec::ByKeys(paths) => paths.is_empty(),
            MatchSpec::AnyOf(criteria) => criteria.is_empty(),
            MatchSpec::AnyGroupAllOf(groups) => {
                groups.is_empty() || groups.iter().any(|g| g.criteria.is_empty())
            }
        };

        if empty {
            Err(SortError::EmptyMatchSpec)
        } else {
            Ok(())
        }
    }

    /// 모드 이름 (헤더 출력용)
    pub fn mode_name(&self) -> &'static str {
        match self {
            MatchSpec::ByKeys(_) => "키 분류 (--keys)",
            MatchSpec::AnyOf(_) => "OR 조건 (--find)",
            MatchSpec::AnyGroupAllOf(_) => "AND 그룹 (--and)",
        }
    }

    /// 평가에 필요한 모든 필드 경로 (중복 제거, 선언 순서 유지)
    pub fn required_paths(&self) -> Vec<&FieldPath> {
        let all: Vec<&FieldPath> = match self {
            MatchSpec::ByKeys(paths) => paths.iter().collect(),
            MatchSpec::AnyOf(criteria) => criteria.iter().map(Criterion::path).collect(),
            MatchSpec::AnyGroupAllOf(groups) => groups
                .iter()
                .flat_map(|g| g.criteria.iter().map(Criterion::path))
                .collect(),
        };

        let mut unique: Vec<&FieldPath> = Vec::with_capacity(all.len());
        for path in all {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }
}

/// 한 파일에서 추출한 필드 값 모음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRecord {
    values: HashMap<FieldPath, ResolvedValue>,
}

impl ResolvedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 매치 스펙에 필요한 경로를 문서에서 모두 추출
    pub fn from_document(document: &Value, spec: &MatchSpec) -> Self {
        let values = spec
            .required_paths()
            .into_iter()
            .map(|path| (path.clone(), resolve(document, path)))
            .collect();
        Self { values }
    }

    /// 값 조회 (추출되지 않았거나 없는 값은 None)
    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        self.values.get(path).and_then(ResolvedValue::as_str)
    }
}

/// 매칭 결과
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub matched: bool,
    /// 정리된 대상 폴더 이름 (매칭 시)
    pub destination_name: Option<String>,
    /// 매칭에 사용된 `key=value` 목록
    pub matched_on: Vec<String>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self::default()
    }

    fn matched(destination_name: String, fields: &[FieldValue<'_>]) -> Self {
        Self {
            matched: true,
            destination_name: Some(destination_name),
            matched_on: fields
                .iter()
                .map(|f| format!("{}={}", f.path, f.value))
                .collect(),
        }
    }
}

/// 레코드를 매치 스펙으로 평가
///
/// 빈 매치 스펙만 에러이고, 나머지 경우는 항상 `MatchResult`를 반환합니다.
pub fn evaluate(
    record: &ResolvedRecord,
    spec: &MatchSpec,
    format: Option<&FolderNameFormat>,
) -> Result<MatchResult> {
    spec.validate()?;

    let result = match spec {
        MatchSpec::ByKeys(paths) => {
            let fields: Option<Vec<FieldValue<'_>>> = paths
                .iter()
                .map(|p| record.get(p).map(|v| FieldValue::new(p, v)))
                .collect();

            match fields {
                Some(fields) => {
                    MatchResult::matched(folder_name(&fields, format, "="), &fields)
                }
                None => MatchResult::no_match(),
            }
        }
        MatchSpec::AnyOf(criteria) => criteria
            .iter()
            .find(|c| c.matches(record.get(c.path())))
            .map(|c| FieldValue::new(c.path(), c.expected()))
            .map(|field| MatchResult::matched(folder_name(&[field], format, "-"), &[field]))
            .unwrap_or_else(MatchResult::no_match),
        MatchSpec::AnyGroupAllOf(groups) => groups
            .iter()
            .find(|g| g.matches(record))
            .map(|group| {
                let fields: Vec<FieldValue<'_>> = group
                    .criteria()
                    .iter()
                    .map(|c| FieldValue::new(c.path(), c.expected()))
                    .collect();
                MatchResult::matched(folder_name(&fields, format, "-"), &fields)
            })
            .unwrap_or_else(MatchResult::no_match),
    };

    Ok(result)
}

/// 템플릿이 있으면 치환, 없으면 기본 이름. 결과는 항상 정리됨
fn folder_name(
    fields: &[FieldValue<'_>],
    format: Option<&FolderNameFormat>,
    pair_separator: &str,
) -> String {
    let raw = match format {
        Some(format) => format.render(fields),
        None => default_name(fields, pair_separator),
    };
    sanitize_dir_name(&raw)
}
