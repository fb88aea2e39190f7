use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::entity::Unit;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::utils::slug::slugify;

/// Ordered subdivision of a course. The slug is derived from the name once,
/// at creation, and never recomputed; it is unique across the whole
/// platform, not per course.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    id: Uuid,
    course_id: Uuid,
    slug: String,
    name: String,
    description: String,
    position: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub name: String,
    pub description: String,
    pub position: i32,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Number of units in a loaded lesson aggregate.
pub fn unit_count(units: &[Unit]) -> usize {
    units.len()
}

/// Units carrying a video.
pub fn video_count(units: &[Unit]) -> usize {
    units.iter().filter(|u| u.video_id().is_some()).count()
}

/// Units carrying an activity.
pub fn activity_count(units: &[Unit]) -> usize {
    units.iter().filter(|u| u.activity_id().is_some()).count()
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, Uuid> for Lesson {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        let slug = slugify(&data.name);
        let result = sqlx::query(
            "INSERT INTO lessons (id, course_id, slug, name, description, position) \
             VALUES ($1,$2,$3,$4,$5,$6) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&slug)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.position)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Lesson {
            id,
            course_id: data.course_id,
            slug,
            name: data.name,
            description: data.description,
            position: data.position,
        })
    }

    // Renames do not touch the slug.
    async fn update(mut self, mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE lessons SET course_id = $1, name = $2, description = $3, position = $4 \
             WHERE id = $5",
        )
        .bind(data.course_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.position)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.course_id = data.course_id;
        self.name = data.name;
        self.description = data.description;
        self.position = data.position;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM lessons ORDER BY position LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);

impl Lesson {
    pub async fn find_by_slug(mm: &ModelManager, slug: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE slug = $1")
            .bind(slug)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM lessons WHERE course_id = $1 ORDER BY position ASC")
                .bind(course_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    pub async fn units(&self, mm: &ModelManager) -> DatabaseResult<Vec<Unit>> {
        Unit::all_by_lesson(mm, self.id).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn unit(video: bool, activity: bool) -> Unit {
        Unit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            video.then(Uuid::new_v4),
            activity.then(Uuid::new_v4),
            0,
        )
    }

    #[test]
    fn test_counts_over_loaded_units() {
        let units = vec![
            unit(true, false),
            unit(true, true),
            unit(false, true),
            unit(false, false),
        ];

        assert_eq!(unit_count(&units), 4);
        assert_eq!(video_count(&units), 2);
        assert_eq!(activity_count(&units), 2);
        assert_eq!(unit_count(&[]), 0);
    }
}
