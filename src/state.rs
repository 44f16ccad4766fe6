use std::sync::Arc;

use tera::Tera;

use crate::backend::{AuthProvider, CourseStore};
use crate::error::AppError;
use crate::session::SessionStore;
use crate::templates::build_templates;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionStore,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>, auth: Arc<dyn AuthProvider>) -> Result<Self, AppError> {
        Ok(Self {
            store,
            auth,
            sessions: SessionStore::new(),
            templates: Arc::new(build_templates()?),
        })
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}
