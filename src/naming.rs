//! 폴더 이름 생성 모듈
//!
//! 매칭된 필드 값으로 대상 폴더 이름을 만들고, 파일 시스템에서 쓸 수 없는
//! 문자를 치환합니다.

use std::fmt;

use crate::path::FieldPath;

/// 폴더 이름에 사용되는 (필드, 값) 쌍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValue<'a> {
    pub path: &'a FieldPath,
    pub value: &'a str,
}

impl<'a> FieldValue<'a> {
    pub fn new(path: &'a FieldPath, value: &'a str) -> Self {
        Self { path, value }
    }
}

/// `{fieldname}` 자리표시자를 포함한 폴더 이름 템플릿
///
/// 자리표시자 이름은 전체 점 표기 경로(`{profile.name}`) 또는 마지막
/// 세그먼트(`{name}`)와 비교합니다. 대응하는 필드가 없으면 `{name}` 그대로 남깁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNameFormat {
    template: String,
}

impl FolderNameFormat {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// 템플릿에 필드 값을 채워 넣음
    ///
    /// # Examples
    /// ```
    /// use jsorter::naming::{FieldValue, FolderNameFormat};
    /// use jsorter::path::FieldPath;
    ///
    /// let name = FieldPath::parse("name").unwrap();
    /// let country = FieldPath::parse("address.country").unwrap();
    /// let fields = [FieldValue::new(&name, "John"), FieldValue::new(&country, "Italy")];
    ///
    /// let format = FolderNameFormat::new("{name}_from_{country}_{missing}");
    /// assert_eq!(format.render(&fields), "John_from_Italy_{missing}");
    /// ```
    pub fn render(&self, fields: &[FieldValue<'_>]) -> String {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];

            let Some(close) = after_open.find('}') else {
                // 닫히지 않은 중괄호는 그대로 출력
                output.push_str(&rest[open..]);
                return output;
            };

            let name = &after_open[..close];
            match lookup_placeholder(fields, name) {
                Some(value) => output.push_str(value),
                None => {
                    output.push('{');
                    output.push_str(name);
                    output.push('}');
                }
            }
            rest = &after_open[close + 1..];
        }

        output.push_str(rest);
        output
    }
}

impl fmt::Display for FolderNameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// 자리표시자 이름에 해당하는 값 찾기 (전체 경로 우선, 그다음 라벨)
fn lookup_placeholder<'a>(fields: &[FieldValue<'a>], name: &str) -> Option<&'a str> {
    if name.is_empty() || name.contains('{') {
        return None;
    }

    fields
        .iter()
        .find(|f| f.path.as_str() == name)
        .or_else(|| fields.iter().find(|f| f.path.label() == name))
        .map(|f| f.value)
}

/// 기본 폴더 이름: `라벨{sep}값` 쌍을 `_`로 연결
///
/// 키 분류 모드는 `=`, 조건 매칭 모드는 `-`를 구분자로 씁니다.
pub fn default_name(fields: &[FieldValue<'_>], pair_separator: &str) -> String {
    fields
        .iter()
        .map(|f| format!("{}{}{}", f.path.label(), pair_separator, f.value))
        .collect::<Vec<_>>()
        .join("_")
}

/// 폴더 이름으로 쓸 수 없는 문자를 `_`로 치환
///
/// 경로 구분자, NUL, 제어 문자, Windows 예약 문자(`: * ? " < > |`)를
/// 치환하고 앞뒤 공백을 제거합니다. 결과가 비었거나 `.`/`..`이면 `_`를 반환합니다.
pub fn sanitize_dir_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();
    match trimmed {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}
