use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::validation::{ChoreDraft, ValidatedOnboarding};
use crate::database::{EntityStore, StoreError, StoreTransaction};
use crate::models::{NewArea, NewAreaChore, NewChore, NewHousehold};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("household creation failed")]
    HouseholdCreation,
    #[error("areas creation failed")]
    AreasCreation,
    #[error("chores creation failed")]
    ChoresCreation,
    #[error("area chore associations creation failed")]
    AssociationsCreation,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 按外键依赖顺序排好的待插入行
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub household: NewHousehold,
    pub areas: Vec<NewArea>,
    pub chores: Vec<NewChore>,
    pub links: Vec<NewAreaChore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingReceipt {
    pub household_id: String,
    pub areas: usize,
    pub chores: usize,
    pub associations: usize,
}

impl InsertPlan {
    /// 每个区域名、每个家务名各分配一个ID。家务按名称去重，
    /// 多个区域引用同名家务时指向同一行
    pub fn build(onboarding: &ValidatedOnboarding, mut next_id: impl FnMut() -> String) -> Self {
        let household = NewHousehold {
            id: next_id(),
            name: onboarding.household_name.clone(),
        };

        let mut area_ids: HashMap<&str, String> = HashMap::new();
        let areas = onboarding
            .areas
            .keys()
            .map(|name| {
                let id = next_id();
                area_ids.insert(name.as_str(), id.clone());
                NewArea {
                    id,
                    name: name.clone(),
                    household_id: household.id.clone(),
                }
            })
            .collect();

        let mut chore_ids: HashMap<&str, String> = HashMap::new();
        let mut chores: Vec<NewChore> = Vec::new();

        // 家务记录在前，字段取同名的第一条记录
        for draft in &onboarding.chores {
            if let Some(name) = draft.name.as_deref() {
                if !chore_ids.contains_key(name) {
                    let chore = new_chore(next_id(), name, Some(draft));
                    chore_ids.insert(name, chore.id.clone());
                    chores.push(chore);
                }
            }
        }
        // 只出现在区域列表里的家务名也要建行
        for name in onboarding.areas.values().flatten() {
            if !chore_ids.contains_key(name.as_str()) {
                let chore = new_chore(next_id(), name, None);
                chore_ids.insert(name.as_str(), chore.id.clone());
                chores.push(chore);
            }
        }

        // 同一区域里重复的家务名只保留第一次出现的位置
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut links = Vec::new();
        for (area_name, chore_names) in &onboarding.areas {
            let mut position = 0;
            for chore_name in chore_names {
                let (Some(area_id), Some(chore_id)) = (
                    area_ids.get(area_name.as_str()),
                    chore_ids.get(chore_name.as_str()),
                ) else {
                    continue;
                };
                if seen.insert((area_id.as_str(), chore_id.as_str())) {
                    links.push(NewAreaChore {
                        area_id: area_id.clone(),
                        chore_id: chore_id.clone(),
                        position,
                    });
                    position += 1;
                }
            }
        }

        Self {
            household,
            areas,
            chores,
            links,
        }
    }
}

fn new_chore(id: String, name: &str, draft: Option<&ChoreDraft>) -> NewChore {
    NewChore {
        id,
        name: name.to_string(),
        description: draft
            .and_then(|d| d.description.clone())
            .filter(|d| !d.is_empty()),
        due_at: draft.and_then(|d| d.due_at.clone()),
        frequency: draft.and_then(|d| d.frequency),
        custom_frequency: draft.and_then(|d| d.custom_frequency.clone()),
    }
}

/// 在一个事务里写入家庭、区域、家务和关联行，任一步失败全部回滚
pub async fn persist(
    store: &dyn EntityStore,
    onboarding: &ValidatedOnboarding,
    next_id: impl FnMut() -> String,
) -> Result<OnboardingReceipt, PersistenceError> {
    let plan = InsertPlan::build(onboarding, next_id);
    let mut tx = store.begin().await?;

    let outcome = run_steps(tx.as_mut(), &plan).await;
    match outcome {
        Ok(receipt) => {
            tx.commit().await?;
            tracing::info!(
                "Onboarded household {} with {} area(s), {} chore(s), {} association(s)",
                receipt.household_id,
                receipt.areas,
                receipt.chores,
                receipt.associations
            );
            Ok(receipt)
        }
        Err(e) => {
            tracing::error!("Onboarding failed, rolling back: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Rollback failed: {:?}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn run_steps(
    tx: &mut dyn StoreTransaction,
    plan: &InsertPlan,
) -> Result<OnboardingReceipt, PersistenceError> {
    tracing::debug!("Inserting household {}", plan.household.id);
    let households = tx.insert_household(&plan.household).await?;
    if households.is_empty() {
        return Err(PersistenceError::HouseholdCreation);
    }

    let mut receipt = OnboardingReceipt {
        household_id: plan.household.id.clone(),
        areas: 0,
        chores: 0,
        associations: 0,
    };

    if !plan.areas.is_empty() {
        tracing::debug!("Inserting {} area(s)", plan.areas.len());
        let rows = tx.insert_areas(&plan.areas).await?;
        if rows.is_empty() {
            return Err(PersistenceError::AreasCreation);
        }
        receipt.areas = rows.len();
    }

    if !plan.chores.is_empty() {
        tracing::debug!("Inserting {} chore(s)", plan.chores.len());
        let rows = tx.insert_chores(&plan.chores).await?;
        if rows.is_empty() {
            return Err(PersistenceError::ChoresCreation);
        }
        receipt.chores = rows.len();
    }

    if !plan.links.is_empty() {
        tracing::debug!("Inserting {} area chore association(s)", plan.links.len());
        let rows = tx.insert_area_chores(&plan.links).await?;
        if rows.is_empty() {
            return Err(PersistenceError::AssociationsCreation);
        }
        receipt.associations = rows.len();
    }

    Ok(receipt)
}
