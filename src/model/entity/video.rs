use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

/// Reference to an externally hosted video.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Video {
    id: Uuid,
    name: String,
    youtube_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoCreate {
    pub name: String,
    pub youtube_id: String,
}

impl ResourceTyped for Video {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Video
    }
}

impl Video {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn youtube_id(&self) -> &str {
        &self.youtube_id
    }
}

#[async_trait]
impl CrudRepository<Video, VideoCreate, Uuid> for Video {
    async fn create(mm: &ModelManager, data: VideoCreate) -> DatabaseResult<Self> {
        let result =
            sqlx::query("INSERT INTO videos (id, name, youtube_id) VALUES ($1,$2,$3) RETURNING id")
                .bind(Uuid::new_v4())
                .bind(&data.name)
                .bind(&data.youtube_id)
                .fetch_one(mm.executor())
                .await?;

        let id = result.try_get("id")?;
        Ok(Video {
            id,
            name: data.name,
            youtube_id: data.youtube_id,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: VideoCreate) -> DatabaseResult<Self> {
        sqlx::query("UPDATE videos SET name = $1, youtube_id = $2 WHERE id = $3")
            .bind(&data.name)
            .bind(&data.youtube_id)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.name = data.name;
        self.youtube_id = data.youtube_id;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM videos ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Video, VideoCreate, Uuid);
