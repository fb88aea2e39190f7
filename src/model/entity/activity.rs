use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use sqlx::types::Json;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::entity::Answer;
use crate::model::repo::ResourceTyped;
use crate::model::{DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository};

pub const KIND_MULTIPLE_CHOICE: &str = "multiplechoice";
pub const KIND_SINGLE_CHOICE: &str = "singlechoice";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub question: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MultipleChoiceExpected {
    /// Zero-based indices into `choices`, several allowed.
    choices: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SingleChoiceExpected {
    /// Zero-based index into `choices`.
    choice: i32,
}

/// Typed view over an activity's discriminator and its two stored payloads.
/// The database keeps the payloads opaque; this sum is the in-process
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityPayload {
    MultipleChoice {
        data: ChoiceQuestion,
        expected_choices: Vec<i32>,
    },
    SingleChoice {
        data: ChoiceQuestion,
        expected_choice: i32,
    },
}

impl ActivityPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => KIND_MULTIPLE_CHOICE,
            Self::SingleChoice { .. } => KIND_SINGLE_CHOICE,
        }
    }

    pub fn data_json(&self) -> DatabaseResult<serde_json::Value> {
        let data = match self {
            Self::MultipleChoice { data, .. } | Self::SingleChoice { data, .. } => data,
        };
        Ok(serde_json::to_value(data)?)
    }

    pub fn expected_json(&self) -> DatabaseResult<serde_json::Value> {
        let value = match self {
            Self::MultipleChoice {
                expected_choices, ..
            } => serde_json::to_value(MultipleChoiceExpected {
                choices: expected_choices.clone(),
            })?,
            Self::SingleChoice {
                expected_choice, ..
            } => serde_json::to_value(SingleChoiceExpected {
                choice: *expected_choice,
            })?,
        };
        Ok(value)
    }

    /// Decode the stored discriminator and payloads back into the typed
    /// sum. An unknown discriminator is a validation failure, not a crash.
    pub fn from_parts(
        kind: &str,
        data: &serde_json::Value,
        expected_answer: &serde_json::Value,
    ) -> DatabaseResult<Self> {
        match kind {
            KIND_MULTIPLE_CHOICE => {
                let data: ChoiceQuestion = serde_json::from_value(data.clone())?;
                let expected: MultipleChoiceExpected =
                    serde_json::from_value(expected_answer.clone())?;
                Ok(Self::MultipleChoice {
                    data,
                    expected_choices: expected.choices,
                })
            }
            KIND_SINGLE_CHOICE => {
                let data: ChoiceQuestion = serde_json::from_value(data.clone())?;
                let expected: SingleChoiceExpected =
                    serde_json::from_value(expected_answer.clone())?;
                Ok(Self::SingleChoice {
                    data,
                    expected_choice: expected.choice,
                })
            }
            other => Err(DatabaseError::Validation(format!(
                "unknown activity kind: {:?}",
                other
            ))),
        }
    }
}

/// Quiz item. The `kind` column selects how `data` and `expected_answer`
/// are interpreted; the schema itself does not validate the payload shape.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Activity {
    id: Uuid,
    kind: String,
    data: Json<serde_json::Value>,
    expected_answer: Json<serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ActivityCreate {
    pub kind: String,
    pub data: serde_json::Value,
    pub expected_answer: serde_json::Value,
}

impl ActivityCreate {
    pub fn from_payload(payload: &ActivityPayload) -> DatabaseResult<Self> {
        Ok(Self {
            kind: payload.kind().to_string(),
            data: payload.data_json()?,
            expected_answer: payload.expected_json()?,
        })
    }
}

impl ResourceTyped for Activity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Activity
    }
}

impl Activity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data.0
    }

    pub fn expected_answer(&self) -> &serde_json::Value {
        &self.expected_answer.0
    }

    pub fn payload(&self) -> DatabaseResult<ActivityPayload> {
        ActivityPayload::from_parts(&self.kind, &self.data.0, &self.expected_answer.0)
    }
}

#[async_trait]
impl CrudRepository<Activity, ActivityCreate, Uuid> for Activity {
    async fn create(mm: &ModelManager, data: ActivityCreate) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO activities (id, kind, data, expected_answer) \
             VALUES ($1,$2,$3,$4) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.kind)
        .bind(Json(&data.data))
        .bind(Json(&data.expected_answer))
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Activity {
            id,
            kind: data.kind,
            data: Json(data.data),
            expected_answer: Json(data.expected_answer),
        })
    }

    async fn update(mut self, mm: &ModelManager, data: ActivityCreate) -> DatabaseResult<Self> {
        sqlx::query("UPDATE activities SET kind = $1, data = $2, expected_answer = $3 WHERE id = $4")
            .bind(&data.kind)
            .bind(Json(&data.data))
            .bind(Json(&data.expected_answer))
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.kind = data.kind;
        self.data = Json(data.data);
        self.expected_answer = Json(data.expected_answer);
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM activities LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Activity, ActivityCreate, Uuid);

impl Activity {
    pub async fn answers(&self, mm: &ModelManager) -> DatabaseResult<Vec<Answer>> {
        Answer::all_by_activity(mm, self.id).await
    }
}
