use serde::Deserialize;

/// Body for creating or updating a user through the plain CRUD routes.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}
