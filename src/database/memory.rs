// 测试用的内存实体存储
// 与 Postgres 表结构保持相同的约束：主键、用户邮箱唯一、外键

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::{EntityStore, StoreError, StoreTransaction};
use crate::models::{
    Area, AreaChore, AreaOverview, Chore, Household, HouseholdOverview, NewArea, NewAreaChore,
    NewChore, NewHousehold, NewUser, User,
};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub households: Vec<Household>,
    pub areas: Vec<Area>,
    pub chores: Vec<Chore>,
    pub area_chores: Vec<AreaChore>,
    pub users: Vec<User>,
}

/// 返回空结果集的插入步骤，用于模拟写入失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingInsert {
    Household,
    Areas,
    Chores,
    AreaChores,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    failing: Option<FailingInsert>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(step: FailingInsert) -> Self {
        Self {
            tables: Arc::default(),
            failing: Some(step),
        }
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }
}

pub struct MemoryTransaction {
    shared: Arc<Mutex<Tables>>,
    staged: Tables,
    failing: Option<FailingInsert>,
}

impl MemoryTransaction {
    fn fails(&self, step: FailingInsert) -> bool {
        self.failing == Some(step)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_household(
        &mut self,
        household: &NewHousehold,
    ) -> Result<Vec<Household>, StoreError> {
        if self.fails(FailingInsert::Household) {
            return Ok(Vec::new());
        }
        if self.staged.households.iter().any(|h| h.id == household.id) {
            return Err(StoreError::Conflict(format!("households.id {}", household.id)));
        }

        let now = Utc::now();
        let row = Household {
            id: household.id.clone(),
            name: household.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.staged.households.push(row.clone());
        Ok(vec![row])
    }

    async fn insert_areas(&mut self, areas: &[NewArea]) -> Result<Vec<Area>, StoreError> {
        if self.fails(FailingInsert::Areas) {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(areas.len());
        for area in areas {
            if !self.staged.households.iter().any(|h| h.id == area.household_id) {
                return Err(StoreError::MissingReference(format!(
                    "households.id {}",
                    area.household_id
                )));
            }
            if self.staged.areas.iter().any(|a| a.id == area.id) {
                return Err(StoreError::Conflict(format!("areas.id {}", area.id)));
            }
            let row = Area {
                id: area.id.clone(),
                name: area.name.clone(),
                household_id: Some(area.household_id.clone()),
                created_at: now,
                updated_at: now,
            };
            self.staged.areas.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn insert_chores(&mut self, chores: &[NewChore]) -> Result<Vec<Chore>, StoreError> {
        if self.fails(FailingInsert::Chores) {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(chores.len());
        for chore in chores {
            if self.staged.chores.iter().any(|c| c.id == chore.id) {
                return Err(StoreError::Conflict(format!("chores.id {}", chore.id)));
            }
            let row = Chore {
                id: chore.id.clone(),
                name: chore.name.clone(),
                description: chore.description.clone(),
                due_at: chore.due_at.clone(),
                frequency: chore.frequency,
                custom_frequency: chore.custom_frequency.clone(),
                created_at: now,
                updated_at: now,
            };
            self.staged.chores.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn insert_area_chores(
        &mut self,
        links: &[NewAreaChore],
    ) -> Result<Vec<AreaChore>, StoreError> {
        if self.fails(FailingInsert::AreaChores) {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            if !self.staged.areas.iter().any(|a| a.id == link.area_id) {
                return Err(StoreError::MissingReference(format!("areas.id {}", link.area_id)));
            }
            if !self.staged.chores.iter().any(|c| c.id == link.chore_id) {
                return Err(StoreError::MissingReference(format!("chores.id {}", link.chore_id)));
            }
            if self
                .staged
                .area_chores
                .iter()
                .any(|ac| ac.area_id == link.area_id && ac.chore_id == link.chore_id)
            {
                return Err(StoreError::Conflict(format!(
                    "areas_to_chores ({}, {})",
                    link.area_id, link.chore_id
                )));
            }
            let row = AreaChore {
                area_id: link.area_id.clone(),
                chore_id: link.chore_id.clone(),
                position: link.position,
                created_at: now,
                updated_at: now,
            };
            self.staged.area_chores.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn delete_area_chores(&mut self, area_id: &str) -> Result<u64, StoreError> {
        let before = self.staged.area_chores.len();
        self.staged.area_chores.retain(|ac| ac.area_id != area_id);
        Ok((before - self.staged.area_chores.len()) as u64)
    }

    async fn delete_area(&mut self, area_id: &str) -> Result<u64, StoreError> {
        if self.staged.area_chores.iter().any(|ac| ac.area_id == area_id) {
            return Err(StoreError::Conflict(format!(
                "areas_to_chores still references area {area_id}"
            )));
        }
        let before = self.staged.areas.len();
        self.staged.areas.retain(|a| a.id != area_id);
        Ok((before - self.staged.areas.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { shared, staged, .. } = *self;
        *shared.lock().unwrap() = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let staged = self.tables.lock().unwrap().clone();
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.tables),
            staged,
            failing: self.failing,
        }))
    }

    async fn find_household_overview(
        &self,
        household_id: &str,
    ) -> Result<Option<HouseholdOverview>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let Some(household) = tables.households.iter().find(|h| h.id == household_id) else {
            return Ok(None);
        };

        let mut areas: Vec<AreaOverview> = tables
            .areas
            .iter()
            .filter(|a| a.household_id.as_deref() == Some(household_id))
            .map(|area| {
                let mut links: Vec<&AreaChore> = tables
                    .area_chores
                    .iter()
                    .filter(|ac| ac.area_id == area.id)
                    .collect();
                links.sort_by_key(|ac| ac.position);
                let chores: Vec<Chore> = links
                    .into_iter()
                    .filter_map(|ac| tables.chores.iter().find(|c| c.id == ac.chore_id))
                    .cloned()
                    .collect();
                AreaOverview {
                    area: area.clone(),
                    chores,
                }
            })
            .collect();
        areas.sort_by(|a, b| a.area.name.cmp(&b.area.name));

        Ok(Some(HouseholdOverview {
            household: household.clone(),
            areas,
        }))
    }

    async fn rename_household(
        &self,
        household_id: &str,
        name: &str,
    ) -> Result<Household, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let household = tables
            .households
            .iter_mut()
            .find(|h| h.id == household_id)
            .ok_or(StoreError::NotFound)?;
        household.name = name.to_string();
        household.updated_at = Utc::now();
        Ok(household.clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("users.email {}", user.email)));
        }
        if let Some(household_id) = &user.household_id {
            if !tables.households.iter().any(|h| &h.id == household_id) {
                return Err(StoreError::MissingReference(format!(
                    "households.id {household_id}"
                )));
            }
        }

        let now = Utc::now();
        let row = User {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            household_id: user.household_id.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}
