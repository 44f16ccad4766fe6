use serde::Serialize;
use tera::Tera;

use crate::models::Course;
use crate::policy::AttendanceStatus;
use crate::views::add_course::CourseForm;

/// Templates are compiled into the binary so the server does not depend on
/// its working directory.
pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("dashboard.html", include_str!("../templates/dashboard.html")),
        ("add_course.html", include_str!("../templates/add_course.html")),
        ("login.html", include_str!("../templates/login.html")),
    ])?;
    Ok(tera)
}

#[derive(Serialize, Clone, Debug)]
pub struct CourseCardVm {
    pub id: String,
    pub name: String,
    pub total_hours: u32,
    pub weekly_hours: u32,
    pub absences: u32,
    pub max_absences: Option<u32>,
    pub tier: &'static str,
}

impl From<&Course> for CourseCardVm {
    fn from(course: &Course) -> Self {
        let status = AttendanceStatus::for_course(course).ok();
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            total_hours: course.total_hours,
            weekly_hours: course.weekly_hours,
            absences: course.absences,
            max_absences: status.map(|s| s.max_absences),
            tier: status.map(|s| s.tier.as_str()).unwrap_or("invalid"),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct DashboardVm {
    pub courses: Vec<CourseCardVm>,
    pub load_failed: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct AddCourseVm<'a> {
    pub form: &'a CourseForm,
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct LoginVm {
    pub email: String,
    pub error: Option<String>,
}
