//! File-backed account store
//!
//! One JSON file per account under the store directory, named
//! `<username>.json`. All writes go through atomic temp-file + rename, with
//! 0600 permissions since rows contain credentials. Mutual exclusion is
//! per-account: the outer `RwLock` only guards the map of rows, never a row
//! mutation, so writers to different accounts proceed in parallel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::error::{Error, Result};

/// Thread-safe store of account rows, persisted one file per account.
pub struct AccountStore {
    dir: PathBuf,
    accounts: RwLock<HashMap<String, Arc<Mutex<Account>>>>,
}

impl AccountStore {
    /// Open a store directory, creating it if missing, and load every
    /// `*.json` row. Files that fail to parse abort the open; a corrupt row
    /// is a persistence error, not something to silently skip.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Io(format!("creating store directory: {e}")))?;

        let mut accounts = HashMap::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Error::Io(format!("reading store directory: {e}")))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::Io(format!("reading store directory: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Io(format!("reading {}: {e}", path.display())))?;
            let account: Account = serde_json::from_str(&contents)
                .map_err(|e| Error::Parse(format!("parsing {}: {e}", path.display())))?;
            if row_path(&dir, &account.username) != path {
                warn!(path = %path.display(), username = %account.username,
                    "row filename does not match username");
            }
            accounts.insert(account.username.clone(), Arc::new(Mutex::new(account)));
        }

        info!(dir = %dir.display(), accounts = accounts.len(), "opened account store");
        Ok(Self {
            dir,
            accounts: RwLock::new(accounts),
        })
    }

    /// Clone of a single account row.
    pub async fn get(&self, username: &str) -> Result<Account> {
        let row = self.row(username).await?;
        let account = row.lock().await;
        Ok(account.clone())
    }

    /// Clones of all rows, ordered by username for deterministic output.
    pub async fn list(&self) -> Vec<Account> {
        let rows: Vec<Arc<Mutex<Account>>> = {
            let accounts = self.accounts.read().await;
            accounts.values().cloned().collect()
        };
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(row.lock().await.clone());
        }
        out.sort_by(|a, b| a.username.cmp(&b.username));
        out
    }

    /// Insert or replace an account row and persist it.
    pub async fn upsert(&self, account: Account) -> Result<()> {
        validate_username(&account.username)?;
        let row = {
            let mut accounts = self.accounts.write().await;
            accounts
                .entry(account.username.clone())
                .or_insert_with(|| Arc::new(Mutex::new(account.clone())))
                .clone()
        };
        let mut current = row.lock().await;
        *current = account;
        write_atomic(&self.dir, &current).await?;
        debug!(username = %current.username, "upserted account");
        Ok(())
    }

    /// Atomic read-modify-write of one row. The closure runs with the row
    /// lock held and the result is persisted before the lock is released;
    /// concurrent updates to the same account serialize, updates to other
    /// accounts are unaffected. Returns the updated row.
    pub async fn update<F>(&self, username: &str, f: F) -> Result<Account>
    where
        F: FnOnce(&mut Account),
    {
        let row = self.row(username).await?;
        let mut account = row.lock().await;
        f(&mut account);
        write_atomic(&self.dir, &account).await?;
        Ok(account.clone())
    }

    /// Remove a row and its file. Returns the removed account if it existed.
    pub async fn remove(&self, username: &str) -> Result<Option<Account>> {
        let row = {
            let mut accounts = self.accounts.write().await;
            accounts.remove(username)
        };
        let Some(row) = row else {
            return Ok(None);
        };
        let account = row.lock().await.clone();
        match tokio::fs::remove_file(row_path(&self.dir, username)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(format!("removing account file: {e}"))),
        }
        debug!(username, "removed account");
        Ok(Some(account))
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn row(&self, username: &str) -> Result<Arc<Mutex<Account>>> {
        let accounts = self.accounts.read().await;
        accounts
            .get(username)
            .cloned()
            .ok_or_else(|| Error::NotFound(username.to_string()))
    }
}

/// Path of the persisted row for a username.
fn row_path(dir: &Path, username: &str) -> PathBuf {
    dir.join(format!("{username}.json"))
}

/// Usernames become filenames, so anything that could escape the store
/// directory is rejected up front.
fn validate_username(username: &str) -> Result<()> {
    if username.is_empty()
        || username == "."
        || username == ".."
        || username.contains(['/', '\\'])
    {
        return Err(Error::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Write one account row atomically: temp file in the same directory, 0600
/// permissions, then rename over the target.
async fn write_atomic(dir: &Path, account: &Account) -> Result<()> {
    let json = serde_json::to_string_pretty(account)
        .map_err(|e| Error::Parse(format!("serializing account: {e}")))?;

    let tmp_path = dir.join(format!(
        ".{}.tmp.{}",
        account.username,
        std::process::id()
    ));
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp account file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting account file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, row_path(dir, &account.username))
        .await
        .map_err(|e| Error::Io(format!("renaming temp account file: {e}")))?;
    Ok(())
}
