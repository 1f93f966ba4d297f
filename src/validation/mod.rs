use std::collections::BTreeMap;

use serde::Serialize;

pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 50;

pub const NAME_TOO_SHORT: &str = "Name must be more than 1 character";
pub const NAME_TOO_LONG: &str = "Name must be less than 50 characters";

/// 校验失败的约束类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidEnumValue,
    InvalidFormat,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// 出错字段的完整路径，例如 `chores[1].description`
    pub path: String,
    pub constraint: Constraint,
    pub message: String,
}

impl ValidationIssue {
    /// 顶层字段名，即路径中第一个 `.` 或 `[` 之前的部分
    pub fn field(&self) -> &str {
        self.path
            .split(['.', '['])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

/// 收集全部字段错误，不在第一个错误处停止
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

/// 扁平化后的错误结构，按顶层字段分组
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        path: impl Into<String>,
        constraint: Constraint,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            constraint,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// 指定顶层字段上的所有问题
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.field() == field)
    }

    pub fn has(&self, path: &str, constraint: &Constraint) -> bool {
        self.issues
            .iter()
            .any(|i| i.path == path && &i.constraint == constraint)
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// 所有错误信息拼成一行，用于 `ApiResponse.msg`
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| format!("{}: {}", i.path, i.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn flatten(&self) -> FlattenedErrors {
        let mut flattened = FlattenedErrors::default();
        for issue in &self.issues {
            if issue.path.is_empty() {
                flattened.form_errors.push(issue.message.clone());
            } else {
                flattened
                    .field_errors
                    .entry(issue.field().to_string())
                    .or_default()
                    .push(issue.message.clone());
            }
        }
        flattened
    }
}

/// 字符长度（按 Unicode 标量计数）
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// 校验长度区间，超出时记录对应的错误信息
pub fn check_length(
    errors: &mut ValidationErrors,
    path: &str,
    value: &str,
    min: Option<(usize, &str)>,
    max: Option<(usize, &str)>,
) {
    let len = char_len(value);
    if let Some((min, message)) = min {
        if len < min {
            errors.add(path, Constraint::TooShort { min }, message);
        }
    }
    if let Some((max, message)) = max {
        if len > max {
            errors.add(path, Constraint::TooLong { max }, message);
        }
    }
}

/// 家庭、区域、家务名称的通用规则：1 到 50 个字符
pub fn check_name(errors: &mut ValidationErrors, path: &str, value: &str) {
    check_length(
        errors,
        path,
        value,
        Some((NAME_MIN_CHARS, NAME_TOO_SHORT)),
        Some((NAME_MAX_CHARS, NAME_TOO_LONG)),
    );
}

pub fn validate_name(path: &str, value: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, path, value);
    errors.into_result(())
}
