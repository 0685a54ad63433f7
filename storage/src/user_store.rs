//! User store: one JSON file per user under `<base>/db/users`.

use tracing::{info, instrument};

use crate::error::Result;
use crate::json_file::{self, WriteMode};
use crate::models::UserRecord;
use crate::paths::{list_json_stems, StorePaths};

#[derive(Debug, Clone)]
pub struct UserStore {
    paths: StorePaths,
}

impl UserStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// True iff `<user_id>.json` exists as a file. Invalid ids never exist.
    pub fn exists(&self, user_id: &str) -> bool {
        self.paths
            .user_file(user_id)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Loads a user; `Ok(None)` when no record was created yet.
    #[instrument(skip(self))]
    pub fn load(&self, user_id: &str) -> Result<Option<UserRecord>> {
        json_file::read(&self.paths.user_file(user_id)?)
    }

    /// Writes a new user record. Fails with `AlreadyExists` rather than overwriting.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn create(&self, user: &UserRecord) -> Result<bool> {
        let path = self.paths.user_file(&user.key())?;
        json_file::write(&path, user, WriteMode::CreateNew)?;
        info!(path = %path.display(), "User created");
        Ok(true)
    }

    /// Ids of every stored user, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        list_json_stems(&self.paths.users_dir())
    }
}
