use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};

/// Completion marker for a (user, unit) pair. `complete` starts null and is
/// set at most once; `last_access` is refreshed on every touch. All
/// timestamps are passed in by the caller.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct StudentProgress {
    id: Uuid,
    user_id: Uuid,
    unit_id: Uuid,
    complete: Option<DateTime<Utc>>,
    last_access: DateTime<Utc>,
}

impl ResourceTyped for StudentProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::StudentProgress
    }
}

impl StudentProgress {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn unit_id(&self) -> Uuid {
        self.unit_id
    }

    pub fn complete(&self) -> Option<DateTime<Utc>> {
        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete.is_some()
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    /// Record that the user visited the unit: insert the progress row if it
    /// does not exist yet, refresh `last_access` either way.
    pub async fn touch(
        mm: &ModelManager,
        user_id: Uuid,
        unit_id: Uuid,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            "INSERT INTO student_progress (id, user_id, unit_id, complete, last_access) \
             VALUES ($1,$2,$3,NULL,$4) \
             ON CONFLICT (user_id, unit_id) DO UPDATE SET last_access = $4 \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(unit_id)
        .bind(now)
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    /// Mark the unit complete for the user. The completion timestamp is set
    /// only the first time; repeated calls keep the original one and only
    /// refresh `last_access`.
    pub async fn mark_complete(
        mm: &ModelManager,
        user_id: Uuid,
        unit_id: Uuid,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            "INSERT INTO student_progress (id, user_id, unit_id, complete, last_access) \
             VALUES ($1,$2,$3,$4,$4) \
             ON CONFLICT (user_id, unit_id) DO UPDATE \
             SET complete = COALESCE(student_progress.complete, $4), last_access = $4 \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(unit_id)
        .bind(now)
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn find_by_user_and_unit(
        mm: &ModelManager,
        user_id: Uuid,
        unit_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM student_progress WHERE user_id = $1 AND unit_id = $2")
                .bind(user_id)
                .bind(unit_id)
                .fetch_optional(mm.executor())
                .await?;
        Ok(result)
    }

    pub async fn all_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM student_progress WHERE user_id = $1 ORDER BY last_access DESC",
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
