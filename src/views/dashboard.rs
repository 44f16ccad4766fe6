use tracing::{error, info};

use crate::backend::CourseStore;
use crate::error::AppError;
use crate::models::{Course, Session};
use crate::templates::{CourseCardVm, DashboardVm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceChange {
    Increment,
    Decrement,
}

impl AbsenceChange {
    /// Decrement clamps at zero; increment has no upper bound.
    pub fn apply(self, current: u32) -> u32 {
        match self {
            AbsenceChange::Increment => current.saturating_add(1),
            AbsenceChange::Decrement => current.saturating_sub(1),
        }
    }
}

/// The signed-in user's courses as last confirmed by the backend.
///
/// Mutations are sent one at a time and only reflected in `courses` after
/// the backend acknowledges them. Failures are logged and leave the list as
/// it was. A rejected access token is remembered in `session_expired` so
/// the caller can end the session.
pub struct CourseListView<'a> {
    store: &'a dyn CourseStore,
    session: &'a Session,
    courses: Vec<Course>,
    load_failed: bool,
    session_expired: bool,
}

impl<'a> CourseListView<'a> {
    /// A view with nothing fetched yet, for handlers that only mutate.
    pub fn new(store: &'a dyn CourseStore, session: &'a Session) -> Self {
        Self {
            store,
            session,
            courses: Vec::new(),
            load_failed: false,
            session_expired: false,
        }
    }

    pub async fn load(store: &'a dyn CourseStore, session: &'a Session) -> Self {
        let mut view = Self::new(store, session);
        match store.list(session).await {
            Ok(courses) => view.courses = courses,
            Err(e) => {
                error!("failed to fetch courses for {}: {}", session.user_id, e);
                view.load_failed = true;
                view.note_failure(&e);
            }
        }
        view
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// Writes `change` applied to `current`, the count the caller last saw.
    /// There is no check against a newer value on the backend.
    pub async fn change_absences(
        &mut self,
        id: &str,
        current: u32,
        change: AbsenceChange,
    ) -> Option<u32> {
        let absences = change.apply(current);
        match self.store.update_absences(self.session, id, absences).await {
            Ok(_) => {
                if let Some(course) = self.courses.iter_mut().find(|c| c.id == id) {
                    course.absences = absences;
                }
                info!("course {} absences {} -> {}", id, current, absences);
                Some(absences)
            }
            Err(e) => {
                error!("failed to update absences for course {}: {}", id, e);
                self.note_failure(&e);
                None
            }
        }
    }

    /// Steps the count held in the loaded list. The HTTP handlers post the
    /// count the page showed and go through `change_absences` instead.
    pub async fn increment(&mut self, id: &str) -> Option<u32> {
        let current = self.current_absences(id)?;
        self.change_absences(id, current, AbsenceChange::Increment).await
    }

    /// Counterpart of `increment`, clamped at zero.
    pub async fn decrement(&mut self, id: &str) -> Option<u32> {
        let current = self.current_absences(id)?;
        self.change_absences(id, current, AbsenceChange::Decrement).await
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        match self.store.delete(self.session, id).await {
            Ok(()) => {
                self.courses.retain(|c| c.id != id);
                info!("deleted course {}", id);
                true
            }
            Err(e) => {
                error!("failed to delete course {}: {}", id, e);
                self.note_failure(&e);
                false
            }
        }
    }

    pub fn to_vm(&self) -> DashboardVm {
        DashboardVm {
            courses: self.courses.iter().map(CourseCardVm::from).collect(),
            load_failed: self.load_failed,
        }
    }

    fn note_failure(&mut self, err: &AppError) {
        if matches!(err, AppError::Unauthorized) {
            self.session_expired = true;
        }
    }

    fn current_absences(&self, id: &str) -> Option<u32> {
        let found = self.courses.iter().find(|c| c.id == id).map(|c| c.absences);
        if found.is_none() {
            error!("course {} is not in the current list", id);
        }
        found
    }
}
