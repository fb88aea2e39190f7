use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfessorRole {
    Instructor,
    Assistant,
    PedagogyAssistant,
}

impl From<&str> for ProfessorRole {
    fn from(value: &str) -> Self {
        match value {
            "assistant" => Self::Assistant,
            "pedagogy_assistant" => Self::PedagogyAssistant,
            _ => Self::Instructor,
        }
    }
}

impl std::fmt::Display for ProfessorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instructor => write!(f, "instructor"),
            Self::Assistant => write!(f, "assistant"),
            Self::PedagogyAssistant => write!(f, "pedagogy_assistant"),
        }
    }
}

/// Teaching-role link between a user and a course. A user holds at most one
/// professor record per course.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CourseProfessor {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    biography: String,
    role: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CourseProfessorCreate {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub biography: String,
    pub role: Option<ProfessorRole>,
}

impl ResourceTyped for CourseProfessor {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::CourseProfessor
    }
}

impl CourseProfessor {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn biography(&self) -> &str {
        &self.biography
    }

    pub fn role(&self) -> ProfessorRole {
        ProfessorRole::from(self.role.as_str())
    }
}

#[async_trait]
impl CrudRepository<CourseProfessor, CourseProfessorCreate, Uuid> for CourseProfessor {
    async fn create(mm: &ModelManager, data: CourseProfessorCreate) -> DatabaseResult<Self> {
        let role = data.role.unwrap_or(ProfessorRole::Instructor).to_string();
        let result = sqlx::query(
            "INSERT INTO course_professors (id, user_id, course_id, biography, role) \
             VALUES ($1,$2,$3,$4,$5) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.course_id)
        .bind(&data.biography)
        .bind(&role)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(CourseProfessor {
            id,
            user_id: data.user_id,
            course_id: data.course_id,
            biography: data.biography,
            role,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        data: CourseProfessorCreate,
    ) -> DatabaseResult<Self> {
        let role = data.role.unwrap_or_else(|| self.role()).to_string();
        sqlx::query("UPDATE course_professors SET biography = $1, role = $2 WHERE id = $3")
            .bind(&data.biography)
            .bind(&role)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.biography = data.biography;
        self.role = role;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM course_professors WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_professors WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_professors LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_professors")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(CourseProfessor, CourseProfessorCreate, Uuid);

impl CourseProfessor {
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_professors WHERE course_id = $1")
            .bind(course_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            ProfessorRole::Instructor,
            ProfessorRole::Assistant,
            ProfessorRole::PedagogyAssistant,
        ] {
            assert_eq!(ProfessorRole::from(role.to_string().as_str()), role);
        }
        assert_eq!(ProfessorRole::from("dean"), ProfessorRole::Instructor);
    }
}
