use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::mail::{MailResult, Mailer};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::utils::media::media_url;

// ASCII word characters only; the regex crate's `\w` would also match
// letters like `å`.
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_.+-]+$").expect("invalid username pattern"));

const USERNAME_MAX_LEN: usize = 30;

/// Usernames are restricted to ASCII word characters plus `./+/-` and
/// checked before anything reaches the database.
pub fn validate_username(username: &str) -> DatabaseResult<()> {
    if username.len() > USERNAME_MAX_LEN {
        return Err(crate::model::DatabaseError::Validation(format!(
            "username longer than {} characters",
            USERNAME_MAX_LEN
        )));
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(crate::model::DatabaseError::Validation(format!(
            "invalid username: {:?}",
            username
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    is_staff: bool,
    is_active: bool,
    date_joined: DateTime<Utc>,
    picture: String,
    occupation: String,
    city: String,
    site: String,
    biography: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Joined timestamp, passed in explicitly so behavior stays
    /// deterministic in tests.
    pub date_joined: DateTime<Utc>,
    pub picture: String,
    pub occupation: String,
    pub city: String,
    pub site: String,
    pub biography: String,
}

impl ResourceTyped for User {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::User
    }
}

impl User {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn biography(&self) -> &str {
        &self.biography
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Full name when any name part is set, email otherwise.
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            return self.email.clone();
        }
        self.full_name()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }

    /// Public URL of the profile picture under the configured media base.
    pub fn picture_url(&self, media_base_url: &str) -> String {
        media_url(media_base_url, &self.picture)
    }

    /// Canonical profile path, keyed by the percent-encoded email address.
    pub fn absolute_url(&self) -> String {
        format!("/users/{}/", urlencoding::encode(&self.email))
    }

    /// Send a message to this account's own address.
    pub async fn email_user(
        &self,
        mailer: &dyn Mailer,
        subject: &str,
        body: &str,
    ) -> MailResult<()> {
        mailer.send(&self.email, subject, body).await
    }
}

#[async_trait]
impl CrudRepository<User, UserCreate, Uuid> for User {
    async fn create(mm: &ModelManager, data: UserCreate) -> DatabaseResult<Self> {
        validate_username(&data.username)?;

        let result = sqlx::query(
            "INSERT INTO users (id, username, email, first_name, last_name, is_staff, is_active, date_joined, picture, occupation, city, site, biography) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(false)
        .bind(true)
        .bind(data.date_joined)
        .bind(&data.picture)
        .bind(&data.occupation)
        .bind(&data.city)
        .bind(&data.site)
        .bind(&data.biography)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(User {
            id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            is_staff: false,
            is_active: true,
            date_joined: data.date_joined,
            picture: data.picture,
            occupation: data.occupation,
            city: data.city,
            site: data.site,
            biography: data.biography,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: UserCreate) -> DatabaseResult<Self> {
        validate_username(&data.username)?;

        sqlx::query(
            "UPDATE users SET username = $1, email = $2, first_name = $3, last_name = $4, picture = $5, occupation = $6, city = $7, site = $8, biography = $9 \
             WHERE id = $10",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.picture)
        .bind(&data.occupation)
        .bind(&data.city)
        .bind(&data.site)
        .bind(&data.biography)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.username = data.username;
        self.email = data.email;
        self.first_name = data.first_name;
        self.last_name = data.last_name;
        self.picture = data.picture;
        self.occupation = data.occupation;
        self.city = data.city;
        self.site = data.site;
        self.biography = data.biography;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM users ORDER BY date_joined LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(User, UserCreate, Uuid);

impl User {
    pub async fn find_by_username(
        mm: &ModelManager,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }

    pub async fn find_by_email(mm: &ModelManager, email: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jane.doe".into(),
            email: "jane@example.org".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
            picture: "user-pictures/jane.png".into(),
            occupation: String::new(),
            city: String::new(),
            site: String::new(),
            biography: String::new(),
        }
    }

    #[test]
    fn test_validate_username() {
        for ok in ["jane", "jane.doe", "jane+doe", "jane-doe", "j_d42", "J.D"] {
            assert!(validate_username(ok).is_ok(), "{ok} should be valid");
        }
        for bad in ["", "jane doe", "jane@doe", "a/b", "x".repeat(31).as_str()] {
            assert!(validate_username(bad).is_err(), "{bad:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_username_rejects_non_ascii_letters() {
        for bad in ["jåne", "доцент", "日本", "jane\u{212a}"] {
            assert!(validate_username(bad).is_err(), "{bad:?} should be invalid");
        }
    }

    #[test]
    fn test_full_name_trimmed() {
        let mut user = sample_user();
        assert_eq!(user.full_name(), "Jane Doe");

        user.last_name.clear();
        assert_eq!(user.full_name(), "Jane");

        user.first_name.clear();
        assert_eq!(user.full_name(), "");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "Jane Doe");

        user.first_name.clear();
        user.last_name.clear();
        assert_eq!(user.display_name(), "jane@example.org");
    }

    #[test]
    fn test_picture_url() {
        let user = sample_user();
        assert_eq!(
            user.picture_url("/media/"),
            "/media/user-pictures/jane.png"
        );
    }

    #[test]
    fn test_absolute_url_quotes_email() {
        let user = sample_user();
        assert_eq!(user.absolute_url(), "/users/jane%40example.org/");
    }

    struct CaptureMailer {
        sent: std::sync::Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl crate::mail::Mailer for CaptureMailer {
        async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.into(), subject.into(), body.into()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_email_user_sends_to_own_address() {
        let user = sample_user();
        let mailer = CaptureMailer {
            sent: std::sync::Mutex::new(Vec::new()),
        };

        user.email_user(&mailer, "Welcome", "Hello!").await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "jane@example.org");
        assert_eq!(sent[0].1, "Welcome");
    }
}
