use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};

/// Enrollment link between a user and a course. A user holds at most one
/// enrollment per course; there is no update or delete, enrollment records
/// only accumulate.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CourseStudent {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
}

impl ResourceTyped for CourseStudent {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::CourseStudent
    }
}

/// Completed units over total units, as a truncated integer percentage.
/// A course with zero units counts as 0 percent rather than dividing by
/// zero.
pub fn percent_progress(units_done: i64, units_total: i64) -> i32 {
    if units_total == 0 {
        return 0;
    }
    (100 * units_done / units_total) as i32
}

impl CourseStudent {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    /// Look up the enrollment for (user, course), creating it when absent.
    /// Safe under repeated and concurrent invocation: the insert steps
    /// aside on conflict and the final select returns whichever row won.
    pub async fn get_or_create(
        mm: &ModelManager,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Self> {
        if let Some(existing) = Self::find_by_user_and_course(mm, user_id, course_id).await? {
            return Ok(existing);
        }

        sqlx::query(
            "INSERT INTO course_students (id, user_id, course_id) VALUES ($1,$2,$3) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(course_id)
        .execute(mm.executor())
        .await?;

        let created = sqlx::query_as(
            "SELECT * FROM course_students WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(created)
    }

    pub async fn find_by_user_and_course(
        mm: &ModelManager,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM course_students WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_students WHERE course_id = $1")
            .bind(course_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn count_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM course_students WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(mm.executor())
                .await?;
        Ok(result)
    }

    /// Percentage of the course's units this student has completed. The
    /// counts are fetched explicitly and the arithmetic is done by
    /// [`percent_progress`].
    pub async fn percent_progress(&self, mm: &ModelManager) -> DatabaseResult<i32> {
        let units_total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM units u \
             JOIN lessons l ON l.id = u.lesson_id \
             WHERE l.course_id = $1",
        )
        .bind(self.course_id)
        .fetch_one(mm.executor())
        .await?;

        let units_done: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM student_progress sp \
             JOIN units u ON u.id = sp.unit_id \
             JOIN lessons l ON l.id = u.lesson_id \
             WHERE sp.user_id = $1 AND l.course_id = $2 AND sp.complete IS NOT NULL",
        )
        .bind(self.user_id)
        .bind(self.course_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(percent_progress(units_done, units_total))
    }
}
