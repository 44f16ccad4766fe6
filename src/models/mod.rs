pub mod course;
pub mod session;

pub use course::{AbsencesPatch, Course, NewCourse, NewCourseRecord};
pub use session::Session;
