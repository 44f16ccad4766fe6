pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, warn};

use crate::backend::{AuthProvider, CourseStore};
use crate::error::AppError;
use crate::models::{AbsencesPatch, Course, NewCourse, NewCourseRecord, Session};

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Client for a hosted Supabase project: GoTrue for auth and PostgREST for
/// the `courses` table. Row level security on the project is expected to
/// match the `user_id` filters sent here.
pub struct SupabaseClient {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn courses_url(&self, params: &[(&str, &str)]) -> Result<Url, AppError> {
        Url::parse_with_params(&format!("{}/rest/v1/courses", self.config.url), params)
            .map_err(|e| AppError::Config(format!("invalid SUPABASE_URL: {}", e)))
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
    }

    async fn ensure_success(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Supabase API error {}: {}", status, body);
        // an expired or revoked access token
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        Err(AppError::Backend {
            status: status.as_u16(),
            message: dto::ErrorBody::message_from(&body),
        })
    }

    /// PostgREST answers writes with the affected rows; none means the id
    /// did not match a course owned by this user.
    async fn single_row(response: Response) -> Result<Course, AppError> {
        let rows: Vec<Course> = Self::ensure_success(response).await?.json().await?;
        rows.into_iter().next().ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let url = self.auth_url("token?grant_type=password");
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&dto::PasswordGrantRequest { email, password })
            .send()
            .await?;

        let token: dto::TokenResponse = Self::ensure_success(response).await?.json().await?;
        debug!("signed in user {}", token.user.id);

        Ok(Session {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_string()),
            access_token: token.access_token,
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AppError> {
        let url = self.auth_url("logout");
        let response = self
            .authorized(self.client.post(&url), session)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CourseStore for SupabaseClient {
    async fn create(&self, session: &Session, course: NewCourse) -> Result<Course, AppError> {
        let url = self.courses_url(&[("select", "*")])?;
        let record = NewCourseRecord {
            user_id: &session.user_id,
            name: &course.name,
            total_hours: course.total_hours,
            weekly_hours: course.weekly_hours,
        };

        let response = self
            .authorized(self.client.post(url), session)
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?;

        Self::single_row(response).await
    }

    async fn list(&self, session: &Session) -> Result<Vec<Course>, AppError> {
        let owner = format!("eq.{}", session.user_id);
        let url = self.courses_url(&[
            ("select", "*"),
            ("user_id", owner.as_str()),
            ("order", "created_at.desc"),
        ])?;

        let response = self
            .authorized(self.client.get(url), session)
            .send()
            .await?;

        let courses: Vec<Course> = Self::ensure_success(response).await?.json().await?;
        debug!("fetched {} courses for {}", courses.len(), session.user_id);
        Ok(courses)
    }

    async fn update_absences(
        &self,
        session: &Session,
        id: &str,
        absences: u32,
    ) -> Result<Course, AppError> {
        let owner = format!("eq.{}", session.user_id);
        let target = format!("eq.{}", id);
        let url = self.courses_url(&[("id", target.as_str()), ("user_id", owner.as_str()), ("select", "*")])?;

        let response = self
            .authorized(self.client.patch(url), session)
            .header("Prefer", "return=representation")
            .json(&AbsencesPatch { absences })
            .send()
            .await?;

        Self::single_row(response).await
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), AppError> {
        let owner = format!("eq.{}", session.user_id);
        let target = format!("eq.{}", id);
        let url = self.courses_url(&[("id", target.as_str()), ("user_id", owner.as_str()), ("select", "id")])?;

        let response = self
            .authorized(self.client.delete(url), session)
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let deleted: Vec<serde_json::Value> = Self::ensure_success(response).await?.json().await?;
        if deleted.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new(SupabaseConfig {
            url: "https://project.supabase.co".to_string(),
            anon_key: "anon".to_string(),
        })
        .expect("client should build")
    }

    #[test]
    fn test_courses_url_encodes_owner_filter() {
        let url = client()
            .courses_url(&[("user_id", "eq.abc 1"), ("order", "created_at.desc")])
            .expect("url should parse");

        assert_eq!(url.path(), "/rest/v1/courses");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("user_id".to_string(), "eq.abc 1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_auth_url() {
        assert_eq!(
            client().auth_url("logout"),
            "https://project.supabase.co/auth/v1/logout"
        );
    }
}
