pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, NewCourse, Session};

pub use sqlite::{LocalAuth, SqliteStore};
pub use supabase::{SupabaseClient, SupabaseConfig};

/// Sign-in and sign-out against the hosted auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError>;
    async fn sign_out(&self, session: &Session) -> Result<(), AppError>;
}

/// The `courses` collection, always scoped to the session's owner.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create(&self, session: &Session, course: NewCourse) -> Result<Course, AppError>;

    /// Newest first.
    async fn list(&self, session: &Session) -> Result<Vec<Course>, AppError>;

    async fn update_absences(
        &self,
        session: &Session,
        id: &str,
        absences: u32,
    ) -> Result<Course, AppError>;

    async fn delete(&self, session: &Session, id: &str) -> Result<(), AppError>;
}
