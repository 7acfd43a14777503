//! Users module - read-only lookup of the users that own assets.

mod users_model;
mod users_traits;

pub use users_model::User;
pub use users_traits::UserRepositoryTrait;
