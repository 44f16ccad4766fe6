use serde::{Deserialize, Serialize};

/// An authenticated user as seen by the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}
