use serde::Serialize;

use crate::onboarding::SubmittedFields;
use crate::validation::FlattenedErrors;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSuccess {
    pub status: &'static str,
    pub household_id: String,
}

/// 校验失败时返回错误和原始字段，方便客户端带着原值重新渲染
#[derive(Debug, Serialize)]
pub struct OnboardingFailure {
    pub error: FlattenedErrors,
    pub fields: SubmittedFields,
}
