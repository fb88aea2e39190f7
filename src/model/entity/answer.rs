use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};

/// A user's submitted response to an activity. Answers are append-only:
/// the timestamp is fixed at creation and there is no update or delete.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Answer {
    id: Uuid,
    activity_id: Uuid,
    user_id: Uuid,
    submitted_at: DateTime<Utc>,
    answer: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnswerCreate {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    /// Submission timestamp, passed in explicitly so behavior stays
    /// deterministic in tests.
    pub submitted_at: DateTime<Utc>,
    pub answer: String,
}

impl ResourceTyped for Answer {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Answer
    }
}

impl Answer {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn activity_id(&self) -> Uuid {
        self.activity_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub async fn create(mm: &ModelManager, data: AnswerCreate) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO answers (id, activity_id, user_id, submitted_at, answer) \
             VALUES ($1,$2,$3,$4,$5) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.activity_id)
        .bind(data.user_id)
        .bind(data.submitted_at)
        .bind(&data.answer)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Answer {
            id,
            activity_id: data.activity_id,
            user_id: data.user_id,
            submitted_at: data.submitted_at,
            answer: data.answer,
        })
    }

    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM answers WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn all_by_activity(
        mm: &ModelManager,
        activity_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM answers WHERE activity_id = $1 ORDER BY submitted_at ASC",
        )
        .bind(activity_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM answers WHERE user_id = $1 ORDER BY submitted_at ASC")
                .bind(user_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    pub async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers")
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}
