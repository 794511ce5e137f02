//! 파일 선택 모듈
//!
//! `.json` 확장자와 선택적인 glob 패턴으로 처리할 파일을 고릅니다.

use glob::Pattern;
use std::path::Path;

use crate::error::{Result, SortError};

/// JSON 파일 필터
#[derive(Debug, Default)]
pub struct FileFilter {
    pattern: Option<Pattern>,
}

impl FileFilter {
    /// 새 필터 생성
    ///
    /// # Arguments
    /// * `pattern` - 파일 이름 글로브 패턴 (None이면 모든 JSON 파일)
    ///
    /// # Examples
    /// ```
    /// use jsorter::filter::FileFilter;
    /// use std::path::Path;
    ///
    /// let filter = FileFilter::new(Some("user_*")).unwrap();
    /// assert!(filter.accepts(Path::new("data/user_1.json")));
    /// assert!(!filter.accepts(Path::new("data/user_1.txt")));
    /// assert!(!filter.accepts(Path::new("data/order_1.json")));
    /// ```
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let compiled = pattern
            .map(|p| {
                Pattern::new(p).map_err(|_| SortError::InvalidPattern {
                    pattern: p.to_string(),
                })
            })
            .transpose()?;

        Ok(Self { pattern: compiled })
    }

    /// 경로가 JSON 파일이고 패턴과 일치하는지 확인
    pub fn accepts(&self, path: &Path) -> bool {
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if !is_json {
            return false;
        }

        match (&self.pattern, path.file_name().and_then(|s| s.to_str())) {
            (Some(p), Some(name)) => p.matches(name),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_extension_only() {
        let filter = FileFilter::new(None).unwrap();
        assert!(filter.accepts(Path::new("a.json")));
        assert!(filter.accepts(Path::new("A.JSON")));
        assert!(!filter.accepts(Path::new("a.jsonl")));
        assert!(!filter.accepts(Path::new("a.txt")));
        assert!(!filter.accepts(Path::new("json")));
    }

    #[test]
    fn test_pattern_with_wildcard() {
        let filter = FileFilter::new(Some("*_SUM_*")).unwrap();
        assert!(filter.accepts(Path::new("test_SUM_1.json")));
        assert!(!filter.accepts(Path::new("test.json")));
    }

    #[test]
    fn test_pattern_with_question_mark() {
        let filter = FileFilter::new(Some("data?.json")).unwrap();
        assert!(filter.accepts(Path::new("data1.json")));
        assert!(!filter.accepts(Path::new("data12.json")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FileFilter::new(Some("[invalid"));
        assert!(matches!(result, Err(SortError::InvalidPattern { .. })));
    }
}
