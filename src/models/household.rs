use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Area, Chore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHousehold {
    pub id: String,
    pub name: String,
}

/// 家庭及其区域、每个区域的家务
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdOverview {
    pub household: Household,
    pub areas: Vec<AreaOverview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOverview {
    pub area: Area,
    pub chores: Vec<Chore>,
}

impl HouseholdOverview {
    /// 还原为提交时的 区域名 -> 家务名列表 结构，家务保持录入顺序
    pub fn area_chore_names(&self) -> BTreeMap<String, Vec<String>> {
        self.areas
            .iter()
            .map(|a| {
                let names = a.chores.iter().map(|c| c.name.clone()).collect();
                (a.area.name.clone(), names)
            })
            .collect()
    }
}
