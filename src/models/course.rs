use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub total_hours: u32,
    pub weekly_hours: u32,
    pub absences: u32,
    pub created_at: String,
}

/// A validated course ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub total_hours: u32,
    pub weekly_hours: u32,
}

/// Row sent to the backend on insert. Absences start at zero server-side.
#[derive(Debug, Clone, Serialize)]
pub struct NewCourseRecord<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub total_hours: u32,
    pub weekly_hours: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbsencesPatch {
    pub absences: u32,
}
