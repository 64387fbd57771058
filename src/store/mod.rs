mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface the gateway needs.
///
/// Lookups take the pusher id because the access grant and account state
/// are fetched in the same round trip as the repository row.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Gateway lookups
    fn lookup_repository(&self, pusher_id: i64, path: &str) -> Result<Option<RepoLookup>>;
    fn lookup_redirect(&self, pusher_id: i64, path: &str) -> Result<Option<RepoLookup>>;
    fn lookup_pusher(&self, pusher_id: i64) -> Result<Option<Pusher>>;

    /// Inserts an autocreated repository owned by `owner_id` at `path`.
    ///
    /// Returns the id of the row at `path` if it is owned by `owner_id`,
    /// whether this call inserted it or a concurrent one did. Returns `None`
    /// when the path is taken by another owner.
    fn create_autocreated_repository(
        &self,
        name: &str,
        owner_id: i64,
        path: &str,
    ) -> Result<Option<i64>>;

    // Seeding, used by provisioning tools and tests
    fn create_user(&self, user: &User) -> Result<()>;
    fn create_repository(&self, repo: &NewRepository) -> Result<i64>;
    fn create_access(&self, repo_id: i64, user_id: i64, mode: &str) -> Result<()>;
    fn create_redirect(&self, path: &str, new_repo_id: i64) -> Result<()>;
}
