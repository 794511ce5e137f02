//! 필드 경로 모듈
//!
//! 점 표기 경로(`user.profile.name`)를 파싱하고 JSON 문서에서 값을 찾아냅니다.
//!
//! 배열 인덱싱(`items.0.id`)은 지원하지 않습니다. 경로 중간에 배열을 만나면
//! 값이 없는 것(`ResolvedValue::Absent`)으로 처리합니다.

use serde_json::Value;
use std::fmt;

use crate::error::{Result, SortError};

/// 점으로 구분된 필드 경로
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// 점 표기 문자열을 파싱
    ///
    /// 빈 문자열이나 빈 세그먼트(`a..b`, `.a`, `a.`)가 있으면 에러를 반환합니다.
    ///
    /// # Examples
    /// ```
    /// use jsorter::path::FieldPath;
    ///
    /// let path = FieldPath::parse("user.profile.name").unwrap();
    /// assert_eq!(path.segments(), ["user", "profile", "name"]);
    /// assert_eq!(path.label(), "name");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();

        if raw.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(SortError::InvalidFieldPath {
                path: raw.to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// 경로 세그먼트 목록
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// 원본 점 표기 문자열
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 폴더 이름에 쓰는 라벨 (마지막 세그먼트)
    pub fn label(&self) -> &str {
        // parse()가 최소 한 개의 세그먼트를 보장
        self.segments.last().map(String::as_str).unwrap_or(&self.raw)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 경로를 적용한 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// 스칼라 값의 문자열 표현
    Present(String),
    /// 경로에 값이 없음 (null, 객체/배열 포함)
    Absent,
}

impl ResolvedValue {
    /// 값이 있으면 문자열 참조 반환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::Present(s) => Some(s),
            ResolvedValue::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ResolvedValue::Present(_))
    }
}

/// JSON 문서에서 경로의 값을 찾아 문자열로 변환
///
/// 숫자는 serde_json의 표준 표기, 불리언은 `true`/`false`로 변환합니다.
/// null, 객체, 배열은 폴더 이름으로 쓸 수 없으므로 `Absent`입니다.
pub fn resolve(document: &Value, path: &FieldPath) -> ResolvedValue {
    match lookup(document, path) {
        Some(Value::String(s)) => ResolvedValue::Present(s.clone()),
        Some(Value::Number(n)) => ResolvedValue::Present(n.to_string()),
        Some(Value::Bool(b)) => ResolvedValue::Present(b.to_string()),
        Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) | None => {
            ResolvedValue::Absent
        }
    }
}

/// 중첩 필드 값 가져오기 (객체 키만 따라감)
fn lookup<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = document;

    for segment in path.segments() {
        match current {
            Value::Object(map) => {
                current = map.get(segment)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_field_path() {
        let p = path("a.b.c");
        assert_eq!(p.segments(), ["a", "b", "c"]);
        assert_eq!(p.as_str(), "a.b.c");
        assert_eq!(p.label(), "c");
        assert_eq!(path("name").label(), "name");
        assert_eq!(path(" name ").as_str(), "name");
    }

    #[test]
    fn test_parse_invalid_field_path() {
        for raw in ["", "  ", "a..b", ".a", "a."] {
            assert!(FieldPath::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_resolve_nested() {
        let doc = json!({"a": {"b": {"c": "value"}}});

        assert_eq!(
            resolve(&doc, &path("a.b.c")),
            ResolvedValue::Present("value".to_string())
        );
        assert_eq!(resolve(&doc, &path("a.b.d")), ResolvedValue::Absent);
        assert_eq!(resolve(&doc, &path("x.y.z")), ResolvedValue::Absent);
    }

    #[test]
    fn test_resolve_scalar_coercion() {
        let doc = json!({
            "age": 35,
            "score": 9.5,
            "active": true,
            "deleted": false,
            "nickname": null
        });

        assert_eq!(resolve(&doc, &path("age")).as_str(), Some("35"));
        assert_eq!(resolve(&doc, &path("score")).as_str(), Some("9.5"));
        assert_eq!(resolve(&doc, &path("active")).as_str(), Some("true"));
        assert_eq!(resolve(&doc, &path("deleted")).as_str(), Some("false"));
        assert_eq!(resolve(&doc, &path("nickname")), ResolvedValue::Absent);
    }

    #[test]
    fn test_resolve_through_scalar_is_absent() {
        let doc = json!({"name": "John"});
        assert_eq!(resolve(&doc, &path("name.first")), ResolvedValue::Absent);
    }

    #[test]
    fn test_resolve_arrays_are_absent() {
        let doc = json!({"tags": ["a", "b"], "items": [{"id": 1}]});

        assert_eq!(resolve(&doc, &path("tags")), ResolvedValue::Absent);
        assert_eq!(resolve(&doc, &path("items.0.id")), ResolvedValue::Absent);

        let root_array = json!([{"id": 1}]);
        assert_eq!(resolve(&root_array, &path("id")), ResolvedValue::Absent);
    }

    #[test]
    fn test_resolve_object_leaf_is_absent() {
        let doc = json!({"user": {"name": "John"}});
        assert!(!resolve(&doc, &path("user")).is_present());
    }
}
