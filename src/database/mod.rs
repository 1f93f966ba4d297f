// 数据库模块
// 定义实体存储接口，Postgres 实现和测试用的内存实现

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Area, AreaChore, Chore, Household, HouseholdOverview, NewArea, NewAreaChore, NewChore,
    NewHousehold, NewUser, User,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),
    /// 插入语句没有返回任何行
    #[error("{0} creation failed")]
    NothingInserted(&'static str),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::MissingReference(db.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// 一次写事务。丢弃未提交的事务等同于回滚
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert_household(
        &mut self,
        household: &NewHousehold,
    ) -> Result<Vec<Household>, StoreError>;

    async fn insert_areas(&mut self, areas: &[NewArea]) -> Result<Vec<Area>, StoreError>;

    async fn insert_chores(&mut self, chores: &[NewChore]) -> Result<Vec<Chore>, StoreError>;

    async fn insert_area_chores(
        &mut self,
        links: &[NewAreaChore],
    ) -> Result<Vec<AreaChore>, StoreError>;

    /// 返回删除的关联行数
    async fn delete_area_chores(&mut self, area_id: &str) -> Result<u64, StoreError>;

    async fn delete_area(&mut self, area_id: &str) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;

    async fn find_household_overview(
        &self,
        household_id: &str,
    ) -> Result<Option<HouseholdOverview>, StoreError>;

    async fn rename_household(
        &self,
        household_id: &str,
        name: &str,
    ) -> Result<Household, StoreError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_area(&self, area: &NewArea) -> Result<Area, StoreError> {
        let mut tx = self.begin().await?;
        let mut rows = tx.insert_areas(std::slice::from_ref(area)).await?;
        let created = rows.pop().ok_or(StoreError::NothingInserted("area"))?;
        tx.commit().await?;

        tracing::info!("Created area {} for household {}", created.id, area.household_id);
        Ok(created)
    }

    /// 删除区域。关联表没有级联删除，先删关联行再删区域
    async fn delete_area(&self, area_id: &str) -> Result<u64, StoreError> {
        let mut tx = self.begin().await?;
        let removed_links = tx.delete_area_chores(area_id).await?;
        let removed = tx.delete_area(area_id).await?;

        if removed == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;
        tracing::info!(
            "Deleted area {} and {} chore association(s)",
            area_id,
            removed_links
        );
        Ok(removed_links)
    }
}
