use super::users_model::User;
use crate::errors::Result;

/// Trait for user lookups.
pub trait UserRepositoryTrait: Send + Sync {
    /// Returns the user, or `None` when no user has this id.
    fn get_by_id(&self, user_id: i32) -> Result<Option<User>>;
}
