pub mod add_course;
pub mod dashboard;

pub use add_course::{CourseForm, FormError};
pub use dashboard::{AbsenceChange, CourseListView};
