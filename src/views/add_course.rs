use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::backend::CourseStore;
use crate::error::AppError;
use crate::models::{Course, NewCourse, Session};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Course name is required")]
    MissingName,

    #[error("{0} must be a whole number")]
    NotANumber(&'static str),

    #[error("{0} must be at least 1")]
    BelowMinimum(&'static str),
}

/// Raw values from the add-course form, kept as typed so they can be shown
/// again after a failed submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_hours: String,
    #[serde(default)]
    pub weekly_hours: String,
}

impl CourseForm {
    pub fn validate(&self) -> Result<NewCourse, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        Ok(NewCourse {
            name: name.to_string(),
            total_hours: parse_hours(&self.total_hours, "Total hours")?,
            weekly_hours: parse_hours(&self.weekly_hours, "Hours per class")?,
        })
    }
}

fn parse_hours(raw: &str, field: &'static str) -> Result<u32, FormError> {
    let value: i64 = raw.trim().parse().map_err(|_| FormError::NotANumber(field))?;
    if value < 1 {
        return Err(FormError::BelowMinimum(field));
    }
    u32::try_from(value).map_err(|_| FormError::NotANumber(field))
}

/// Validates and creates the course. Validation failures come back as
/// `AppError::BadRequest`; `user_message` on any error gives the single line
/// shown above the submit button.
pub async fn submit(
    store: &dyn CourseStore,
    session: &Session,
    form: &CourseForm,
) -> Result<Course, AppError> {
    let new_course = form
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    match store.create(session, new_course).await {
        Ok(course) => {
            info!("created course {} for {}", course.id, session.user_id);
            Ok(course)
        }
        Err(e) => {
            error!("failed to create course: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, total: &str, weekly: &str) -> CourseForm {
        CourseForm {
            name: name.to_string(),
            total_hours: total.to_string(),
            weekly_hours: weekly.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let course = form(" Algebra ", "40", " 4").validate().unwrap();
        assert_eq!(
            course,
            NewCourse {
                name: "Algebra".to_string(),
                total_hours: 40,
                weekly_hours: 4,
            }
        );
    }

    #[test]
    fn test_rejects_missing_name() {
        assert_eq!(form("  ", "40", "4").validate(), Err(FormError::MissingName));
    }

    #[test]
    fn test_rejects_non_numeric_hours() {
        assert_eq!(
            form("Algebra", "forty", "4").validate(),
            Err(FormError::NotANumber("Total hours"))
        );
        assert_eq!(
            form("Algebra", "40", "4.5").validate(),
            Err(FormError::NotANumber("Hours per class"))
        );
        assert_eq!(
            form("Algebra", "", "4").validate(),
            Err(FormError::NotANumber("Total hours"))
        );
    }

    #[test]
    fn test_rejects_zero_and_negative_hours() {
        assert_eq!(
            form("Algebra", "40", "0").validate(),
            Err(FormError::BelowMinimum("Hours per class"))
        );
        assert_eq!(
            form("Algebra", "-3", "4").validate(),
            Err(FormError::BelowMinimum("Total hours"))
        );
    }

    #[test]
    fn test_rejects_out_of_range_hours() {
        assert_eq!(
            form("Algebra", "99999999999", "4").validate(),
            Err(FormError::NotANumber("Total hours"))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FormError::BelowMinimum("Hours per class").to_string(),
            "Hours per class must be at least 1"
        );
    }
}
