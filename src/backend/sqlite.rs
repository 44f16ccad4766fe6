use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use uuid::Uuid;

use crate::backend::{AuthProvider, CourseStore};
use crate::error::AppError;
use crate::models::{Course, NewCourse, Session};

/// Local stand-in for the hosted backend, backed by a SQLite file.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(db: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations").run(&db).await?;
        info!("sqlite store ready");
        Ok(Self { db })
    }

    async fn find_course(&self, owner: &str, id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT id, user_id, name, total_hours, weekly_hours, absences, created_at FROM courses WHERE id = ? AND user_id = ?"
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
    }
}

#[async_trait]
impl CourseStore for SqliteStore {
    async fn create(&self, session: &Session, course: NewCourse) -> Result<Course, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO courses
                (id, user_id, name, total_hours, weekly_hours, absences, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
            "#,
        )
        .bind(&id)
        .bind(&session.user_id)
        .bind(&course.name)
        .bind(course.total_hours)
        .bind(course.weekly_hours)
        .bind(&now)
        .execute(&self.db)
        .await?;

        Ok(Course {
            id,
            user_id: session.user_id.clone(),
            name: course.name,
            total_hours: course.total_hours,
            weekly_hours: course.weekly_hours,
            absences: 0,
            created_at: now,
        })
    }

    async fn list(&self, session: &Session) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, user_id, name, total_hours, weekly_hours, absences, created_at
            FROM courses
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(&session.user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(courses)
    }

    async fn update_absences(
        &self,
        session: &Session,
        id: &str,
        absences: u32,
    ) -> Result<Course, AppError> {
        let updated = sqlx::query("UPDATE courses SET absences = ?1 WHERE id = ?2 AND user_id = ?3")
            .bind(absences)
            .bind(id)
            .bind(&session.user_id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound);
        }

        self.find_course(&session.user_id, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM courses WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(&session.user_id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Development sign-in for the SQLite backend: any non-empty email is
/// accepted and becomes the owner id. Passwords are not checked.
pub struct LocalAuth;

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::BadRequest("Email is required".to_string()));
        }

        Ok(Session {
            user_id: email.clone(),
            email,
            access_token: Uuid::new_v4().to_string(),
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AppError> {
        Ok(())
    }
}
