//! User domain model.

use serde::{Deserialize, Serialize};

/// A registered user. Users are created by the account/auth subsystem;
/// the asset services only check that they exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}
