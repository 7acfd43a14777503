//! SQLite storage implementation for Plaid items, asset report handles and
//! imported accounts.

mod model;
mod repository;

pub use model::{
    AssetAccountDB, AssetAccountUpsertDB, NewAssetHistoricalBalanceDB, NewPlaidAssetItemDB,
    PlaidAssetItemDB, PlaidItemDB,
};
pub use repository::PlaidRepository;
