use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use super::{EntityStore, StoreError, StoreTransaction};
use crate::models::{
    Area, AreaChore, AreaOverview, Chore, Household, HouseholdOverview, NewArea, NewAreaChore,
    NewChore, NewHousehold, NewUser, User,
};

const HOUSEHOLD_COLUMNS: &str = "id, name, created_at, updated_at";
const AREA_COLUMNS: &str = "id, name, household_id, created_at, updated_at";
const CHORE_COLUMNS: &str =
    "id, name, description, due_at, frequency, custom_frequency, created_at, updated_at";
const AREA_CHORE_COLUMNS: &str = "area_id, chore_id, position, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password, household_id, created_at, updated_at";

/// Postgres 实体存储
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

// 区域下的家务行，带上所属区域ID
#[derive(FromRow)]
struct AreaChoreRow {
    area_id: String,
    #[sqlx(flatten)]
    chore: Chore,
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn insert_household(
        &mut self,
        household: &NewHousehold,
    ) -> Result<Vec<Household>, StoreError> {
        let rows = sqlx::query_as::<_, Household>(&format!(
            "INSERT INTO households (id, name) VALUES ($1, $2) RETURNING {HOUSEHOLD_COLUMNS}"
        ))
        .bind(&household.id)
        .bind(&household.name)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows)
    }

    async fn insert_areas(&mut self, areas: &[NewArea]) -> Result<Vec<Area>, StoreError> {
        if areas.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO areas (id, name, household_id) ");
        builder.push_values(areas, |mut b, area| {
            b.push_bind(&area.id)
                .push_bind(&area.name)
                .push_bind(&area.household_id);
        });
        builder.push(format!(" RETURNING {AREA_COLUMNS}"));

        let rows = builder
            .build_query_as::<Area>()
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }

    async fn insert_chores(&mut self, chores: &[NewChore]) -> Result<Vec<Chore>, StoreError> {
        if chores.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO chores (id, name, description, due_at, frequency, custom_frequency) ",
        );
        builder.push_values(chores, |mut b, chore| {
            b.push_bind(&chore.id)
                .push_bind(&chore.name)
                .push_bind(&chore.description)
                .push_bind(&chore.due_at)
                .push_bind(chore.frequency)
                .push_bind(&chore.custom_frequency);
        });
        builder.push(format!(" RETURNING {CHORE_COLUMNS}"));

        let rows = builder
            .build_query_as::<Chore>()
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }

    async fn insert_area_chores(
        &mut self,
        links: &[NewAreaChore],
    ) -> Result<Vec<AreaChore>, StoreError> {
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO areas_to_chores (area_id, chore_id, position) ",
        );
        builder.push_values(links, |mut b, link| {
            b.push_bind(&link.area_id)
                .push_bind(&link.chore_id)
                .push_bind(link.position);
        });
        builder.push(format!(" RETURNING {AREA_CHORE_COLUMNS}"));

        let rows = builder
            .build_query_as::<AreaChore>()
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }

    async fn delete_area_chores(&mut self, area_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM areas_to_chores WHERE area_id = $1")
            .bind(area_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_area(&mut self, area_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM areas WHERE id = $1")
            .bind(area_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn find_household_overview(
        &self,
        household_id: &str,
    ) -> Result<Option<HouseholdOverview>, StoreError> {
        let household = sqlx::query_as::<_, Household>(&format!(
            "SELECT {HOUSEHOLD_COLUMNS} FROM households WHERE id = $1"
        ))
        .bind(household_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(household) = household else {
            return Ok(None);
        };

        let areas = sqlx::query_as::<_, Area>(&format!(
            "SELECT {AREA_COLUMNS} FROM areas WHERE household_id = $1 ORDER BY name"
        ))
        .bind(household_id)
        .fetch_all(&self.pool)
        .await?;

        let chore_rows = sqlx::query_as::<_, AreaChoreRow>(
            r#"
            SELECT
                ac.area_id,
                c.id, c.name, c.description, c.due_at, c.frequency,
                c.custom_frequency, c.created_at, c.updated_at
            FROM areas_to_chores ac
            JOIN chores c ON c.id = ac.chore_id
            JOIN areas a ON a.id = ac.area_id
            WHERE a.household_id = $1
            ORDER BY ac.position, c.name
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await?;

        let mut chores_by_area: HashMap<String, Vec<Chore>> = HashMap::new();
        for row in chore_rows {
            chores_by_area.entry(row.area_id).or_default().push(row.chore);
        }

        let areas = areas
            .into_iter()
            .map(|area| AreaOverview {
                chores: chores_by_area.remove(&area.id).unwrap_or_default(),
                area,
            })
            .collect();

        Ok(Some(HouseholdOverview { household, areas }))
    }

    async fn rename_household(
        &self,
        household_id: &str,
        name: &str,
    ) -> Result<Household, StoreError> {
        let household = sqlx::query_as::<_, Household>(&format!(
            r#"
            UPDATE households
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {HOUSEHOLD_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(household_id)
        .fetch_optional(&self.pool)
        .await?;

        household.ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password, household_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.household_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Created user: {}", user.id);
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Failed to create user: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
