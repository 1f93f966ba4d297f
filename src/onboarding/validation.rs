use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Frequency;
use crate::validation::{
    Constraint, NAME_MAX_CHARS, NAME_MIN_CHARS, NAME_TOO_SHORT, ValidationErrors, check_length,
    check_name,
};

pub const DESCRIPTION_MAX_CHARS: usize = 255;

const CHORE_NAME_TOO_LONG: &str = "Must not be more than 50 characters";
// 实际限制是 255，文案沿用前端既有的 "50"，待产品确认
const DESCRIPTION_TOO_LONG: &str = "Description must be less than 50 characters";

/// 引导表单提交的原始字段，`areas` 和 `chores` 是 JSON 字符串
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    #[serde(default)]
    pub household_name: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub chores: String,
}

/// 单条家务记录，所有字段可选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoreDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub frequency: Option<Frequency>,
    pub custom_frequency: Option<String>,
}

/// 校验通过的引导数据
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOnboarding {
    pub household_name: String,
    /// 区域名 -> 家务名列表；同名区域在解析时已合并
    pub areas: BTreeMap<String, Vec<String>>,
    pub chores: Vec<ChoreDraft>,
}

/// 原样回传给客户端的字段，JSON 能解析时回传解析后的值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedFields {
    pub household_name: String,
    pub areas: Value,
    pub chores: Value,
}

impl From<&OnboardingForm> for SubmittedFields {
    fn from(form: &OnboardingForm) -> Self {
        let parse_or_raw = |raw: &str| {
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        Self {
            household_name: form.household_name.clone(),
            areas: parse_or_raw(&form.areas),
            chores: parse_or_raw(&form.chores),
        }
    }
}

pub fn validate(form: &OnboardingForm) -> Result<ValidatedOnboarding, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_name(&mut errors, "householdName", &form.household_name);
    let areas = parse_areas(&mut errors, &form.areas);
    let chores = parse_chores(&mut errors, &form.chores);

    errors.into_result(ValidatedOnboarding {
        household_name: form.household_name.clone(),
        areas: areas.unwrap_or_default(),
        chores: chores.unwrap_or_default(),
    })
}

fn parse_areas(
    errors: &mut ValidationErrors,
    raw: &str,
) -> Option<BTreeMap<String, Vec<String>>> {
    if raw.trim().is_empty() {
        errors.add("areas", Constraint::Required, "Required");
        return None;
    }

    let areas = match serde_json::from_str::<BTreeMap<String, Vec<String>>>(raw) {
        Ok(areas) => areas,
        Err(e) => {
            tracing::debug!("Invalid areas payload: {}", e);
            errors.add(
                "areas",
                Constraint::InvalidFormat,
                "Expected an object mapping area names to lists of chore names",
            );
            return None;
        }
    };

    for (area, chores) in &areas {
        check_name(errors, &format!("areas.{area}"), area);
        for (i, chore) in chores.iter().enumerate() {
            check_name(errors, &format!("areas.{area}[{i}]"), chore);
        }
    }

    Some(areas)
}

fn parse_chores(errors: &mut ValidationErrors, raw: &str) -> Option<Vec<ChoreDraft>> {
    if raw.trim().is_empty() {
        errors.add("chores", Constraint::Required, "Required");
        return None;
    }

    let inputs = match serde_json::from_str::<Vec<ChoreInput>>(raw) {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::debug!("Invalid chores payload: {}", e);
            errors.add(
                "chores",
                Constraint::InvalidFormat,
                "Expected an array of chore records",
            );
            return None;
        }
    };

    let drafts = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| validate_chore(errors, i, input))
        .collect();

    Some(drafts)
}

fn validate_chore(errors: &mut ValidationErrors, index: usize, input: ChoreInput) -> ChoreDraft {
    if let Some(name) = &input.name {
        check_length(
            errors,
            &format!("chores[{index}].name"),
            name,
            Some((NAME_MIN_CHARS, NAME_TOO_SHORT)),
            Some((NAME_MAX_CHARS, CHORE_NAME_TOO_LONG)),
        );
    }

    if let Some(description) = &input.description {
        check_length(
            errors,
            &format!("chores[{index}].description"),
            description,
            None,
            Some((DESCRIPTION_MAX_CHARS, DESCRIPTION_TOO_LONG)),
        );
    }

    let frequency = match input.frequency.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<Frequency>() {
            Ok(f) => Some(f),
            Err(()) => {
                errors.add(
                    format!("chores[{index}].frequency"),
                    Constraint::InvalidEnumValue,
                    invalid_frequency_message(raw),
                );
                None
            }
        },
    };

    ChoreDraft {
        name: input.name,
        description: input.description,
        due_at: input.due_at,
        frequency,
        custom_frequency: input.custom_frequency,
    }
}

fn invalid_frequency_message(received: &str) -> String {
    let expected = Frequency::ALL
        .iter()
        .map(|f| format!("'{f}'"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("Invalid enum value. Expected {expected}, received '{received}'")
}
