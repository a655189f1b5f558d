mod auth;
mod cache;
mod export;
mod ledger;
mod store;
mod sync_list;

pub use auth::TokenManager;
pub use cache::MatchCache;
pub use export::{default_export_path, export_playlist};
pub use ledger::ResumeLedger;
pub use store::StoreError;
pub use store::data_dir;
pub use sync_list::SyncListManager;
