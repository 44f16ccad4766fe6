#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use attendance::backend::{AuthProvider, CourseStore};
use attendance::error::AppError;
use attendance::models::{Course, NewCourse, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    List,
    Update(String, u32),
    Delete(String),
}

/// In-memory backend that records every call and can be told to fail, or to
/// reject the access token the way an expired session would.
#[derive(Default)]
pub struct FakeStore {
    pub courses: Mutex<Vec<Course>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail: AtomicBool,
    pub expired: AtomicBool,
    next_id: Mutex<u32>,
}

impl FakeStore {
    pub fn with_courses(courses: Vec<Course>) -> Self {
        let store = Self::default();
        *store.courses.lock().unwrap() = courses;
        store
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_expired(&self, expired: bool) {
        self.expired.store(expired, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Course> {
        self.courses.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        if self.expired.load(Ordering::SeqCst) {
            return Err(AppError::Unauthorized);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Backend {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CourseStore for FakeStore {
    async fn create(&self, session: &Session, course: NewCourse) -> Result<Course, AppError> {
        self.record(Call::Create(course.name.clone()))?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Course {
            id: format!("course-{}", next_id),
            user_id: session.user_id.clone(),
            name: course.name,
            total_hours: course.total_hours,
            weekly_hours: course.weekly_hours,
            absences: 0,
            created_at: format!("2026-10-17T00:00:{:02}.000000Z", next_id),
        };
        self.courses.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn list(&self, session: &Session) -> Result<Vec<Course>, AppError> {
        self.record(Call::List)?;
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn update_absences(
        &self,
        session: &Session,
        id: &str,
        absences: u32,
    ) -> Result<Course, AppError> {
        self.record(Call::Update(id.to_string(), absences))?;
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .iter_mut()
            .find(|c| c.id == id && c.user_id == session.user_id)
            .ok_or(AppError::NotFound)?;
        course.absences = absences;
        Ok(course.clone())
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), AppError> {
        self.record(Call::Delete(id.to_string()))?;
        let mut courses = self.courses.lock().unwrap();
        let before = courses.len();
        courses.retain(|c| !(c.id == id && c.user_id == session.user_id));
        if courses.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Accepts `student@example.com` / `secret`, rejects everything else.
#[derive(Default)]
pub struct FakeAuth {
    pub signed_out: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if email == "student@example.com" && password == "secret" {
            Ok(session())
        } else {
            Err(AppError::Backend {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })
        }
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AppError> {
        self.signed_out.lock().unwrap().push(session.user_id.clone());
        Ok(())
    }
}

pub fn session() -> Session {
    Session {
        user_id: "user-1".to_string(),
        email: "student@example.com".to_string(),
        access_token: "access-token".to_string(),
    }
}

pub fn course(id: &str, total_hours: u32, weekly_hours: u32, absences: u32) -> Course {
    Course {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        name: format!("Course {}", id),
        total_hours,
        weekly_hours,
        absences,
        created_at: "2026-10-01T00:00:00.000000Z".to_string(),
    }
}
