//! Attendance rules: a student may miss at most a quarter of the scheduled
//! classes of a course, rounded down.

use serde::Serialize;
use thiserror::Error;

use crate::models::Course;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("hours per class must be at least 1")]
    ZeroWeeklyHours,
}

/// `floor((total_hours / weekly_hours) * 0.25)`.
///
/// Evaluated as `total_hours / (4 * weekly_hours)`, which is the same value
/// for non-negative integers and cannot produce NaN or infinity.
pub fn compute_max_absences(total_hours: u32, weekly_hours: u32) -> Result<u32, PolicyError> {
    if weekly_hours == 0 {
        return Err(PolicyError::ZeroWeeklyHours);
    }
    let max = u64::from(total_hours) / (4 * u64::from(weekly_hours));
    // max <= total_hours / 4, so it always fits back into u32
    Ok(max as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceTier {
    Ok,
    Warning,
    Danger,
}

impl AttendanceTier {
    pub fn classify(absences: u32, max_absences: u32) -> Self {
        let absences = u64::from(absences);
        let max = u64::from(max_absences);
        if absences >= max {
            AttendanceTier::Danger
        } else if absences * 10 > max * 7 {
            AttendanceTier::Warning
        } else {
            AttendanceTier::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceTier::Ok => "ok",
            AttendanceTier::Warning => "warning",
            AttendanceTier::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceStatus {
    pub max_absences: u32,
    pub tier: AttendanceTier,
}

impl AttendanceStatus {
    pub fn for_course(course: &Course) -> Result<Self, PolicyError> {
        let max_absences = compute_max_absences(course.total_hours, course.weekly_hours)?;
        Ok(Self {
            max_absences,
            tier: AttendanceTier::classify(course.absences, max_absences),
        })
    }
}
