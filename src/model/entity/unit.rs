use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

/// Ordered subdivision of a lesson. Video and activity are independently
/// optional; a unit may carry either, both or neither.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Unit {
    id: Uuid,
    lesson_id: Uuid,
    video_id: Option<Uuid>,
    activity_id: Option<Uuid>,
    position: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UnitCreate {
    pub lesson_id: Uuid,
    pub video_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    pub position: i32,
}

impl ResourceTyped for Unit {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Unit
    }
}

impl Unit {
    pub fn new(
        id: Uuid,
        lesson_id: Uuid,
        video_id: Option<Uuid>,
        activity_id: Option<Uuid>,
        position: i32,
    ) -> Self {
        Self {
            id,
            lesson_id,
            video_id,
            activity_id,
            position,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn video_id(&self) -> Option<Uuid> {
        self.video_id
    }

    pub fn activity_id(&self) -> Option<Uuid> {
        self.activity_id
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

#[async_trait]
impl CrudRepository<Unit, UnitCreate, Uuid> for Unit {
    async fn create(mm: &ModelManager, data: UnitCreate) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO units (id, lesson_id, video_id, activity_id, position) \
             VALUES ($1,$2,$3,$4,$5) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.lesson_id)
        .bind(data.video_id)
        .bind(data.activity_id)
        .bind(data.position)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Unit {
            id,
            lesson_id: data.lesson_id,
            video_id: data.video_id,
            activity_id: data.activity_id,
            position: data.position,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: UnitCreate) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE units SET lesson_id = $1, video_id = $2, activity_id = $3, position = $4 \
             WHERE id = $5",
        )
        .bind(data.lesson_id)
        .bind(data.video_id)
        .bind(data.activity_id)
        .bind(data.position)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.lesson_id = data.lesson_id;
        self.video_id = data.video_id;
        self.activity_id = data.activity_id;
        self.position = data.position;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM units WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM units ORDER BY position LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM units")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Unit, UnitCreate, Uuid);

impl Unit {
    pub async fn all_by_lesson(mm: &ModelManager, lesson_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM units WHERE lesson_id = $1 ORDER BY position ASC")
                .bind(lesson_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    /// Units are not stored on the course directly; they are reached by
    /// joining through its lessons, ordered by lesson position and then by
    /// unit position within the lesson.
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT u.* FROM units u \
             JOIN lessons l ON l.id = u.lesson_id \
             WHERE l.course_id = $1 \
             ORDER BY l.position ASC, u.position ASC",
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
