use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::entity::{CourseStudent, Lesson, Unit};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    New,
    Private,
    Public,
}

impl From<&str> for CourseStatus {
    fn from(value: &str) -> Self {
        match value {
            "private" => Self::Private,
            "public" => Self::Public,
            _ => Self::New,
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Course {
    id: Uuid,
    slug: String,
    name: String,
    intro_video_id: Option<Uuid>,
    application: String,
    requirement: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    abstract_text: String,
    structure: String,
    workload: String,
    pronatec: String,
    status: String,
    publication: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CourseCreate {
    pub slug: String,
    pub name: String,
    pub intro_video_id: Option<Uuid>,
    pub application: String,
    pub requirement: String,
    pub abstract_text: String,
    pub structure: String,
    pub workload: String,
    pub pronatec: String,
    pub status: Option<CourseStatus>,
    pub publication: Option<NaiveDate>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intro_video_id(&self) -> Option<Uuid> {
        self.intro_video_id
    }

    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    pub fn status(&self) -> CourseStatus {
        CourseStatus::from(self.status.as_str())
    }

    pub fn publication(&self) -> Option<NaiveDate> {
        self.publication
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let status = data.status.unwrap_or(CourseStatus::New).to_string();
        let result = sqlx::query(
            "INSERT INTO courses (id, slug, name, intro_video_id, application, requirement, abstract, structure, workload, pronatec, status, publication) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.slug)
        .bind(&data.name)
        .bind(data.intro_video_id)
        .bind(&data.application)
        .bind(&data.requirement)
        .bind(&data.abstract_text)
        .bind(&data.structure)
        .bind(&data.workload)
        .bind(&data.pronatec)
        .bind(&status)
        .bind(data.publication)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Course {
            id,
            slug: data.slug,
            name: data.name,
            intro_video_id: data.intro_video_id,
            application: data.application,
            requirement: data.requirement,
            abstract_text: data.abstract_text,
            structure: data.structure,
            workload: data.workload,
            pronatec: data.pronatec,
            status,
            publication: data.publication,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let status = data.status.unwrap_or_else(|| self.status()).to_string();
        sqlx::query(
            "UPDATE courses SET slug = $1, name = $2, intro_video_id = $3, application = $4, requirement = $5, abstract = $6, structure = $7, workload = $8, pronatec = $9, status = $10, publication = $11 \
             WHERE id = $12",
        )
        .bind(&data.slug)
        .bind(&data.name)
        .bind(data.intro_video_id)
        .bind(&data.application)
        .bind(&data.requirement)
        .bind(&data.abstract_text)
        .bind(&data.structure)
        .bind(&data.workload)
        .bind(&data.pronatec)
        .bind(&status)
        .bind(data.publication)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.slug = data.slug;
        self.name = data.name;
        self.intro_video_id = data.intro_video_id;
        self.application = data.application;
        self.requirement = data.requirement;
        self.abstract_text = data.abstract_text;
        self.structure = data.structure;
        self.workload = data.workload;
        self.pronatec = data.pronatec;
        self.status = status;
        self.publication = data.publication;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);

impl Course {
    pub async fn find_by_slug(mm: &ModelManager, slug: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE slug = $1")
            .bind(slug)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }

    pub async fn lessons(&self, mm: &ModelManager) -> DatabaseResult<Vec<Lesson>> {
        Lesson::all_by_course(mm, self.id).await
    }

    /// First lesson in the course's natural ordering, `None` when the
    /// course has no lessons yet.
    pub async fn first_lesson(&self, mm: &ModelManager) -> DatabaseResult<Option<Lesson>> {
        let result = sqlx::query_as(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY position ASC LIMIT 1",
        )
        .bind(self.id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    /// All units of the course, joined through its lessons and ordered by
    /// lesson position first, unit position second.
    pub async fn units(&self, mm: &ModelManager) -> DatabaseResult<Vec<Unit>> {
        Unit::all_by_course(mm, self.id).await
    }

    /// Enroll a user into this course. Idempotent: a second call with the
    /// same user returns the existing enrollment instead of creating a
    /// duplicate. The (user, course) unique constraint is the backstop when
    /// two calls race.
    pub async fn enroll_student(
        &self,
        mm: &ModelManager,
        user_id: Uuid,
    ) -> DatabaseResult<CourseStudent> {
        CourseStudent::get_or_create(mm, user_id, self.id).await
    }
}
