//! Resolving where an account's authorized keys live
//!
//! Preparation of the directory and file (ownership and permissions) only
//! happens through [`KeyLocation::prepare`], right before a write.

use crate::error::{Error, Result};
use nix::unistd::{Gid, Uid, User, chown};
use std::fs::{self, OpenOptions};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Default key file location relative to the home directory
pub const DEFAULT_KEYS_PATH: &str = ".ssh/authorized_keys";

const DIR_MODE: u32 = 0o700;
const FILE_MODE: u32 = 0o600;

/// A local account resolved from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub home: PathBuf,
    pub uid: Uid,
    pub gid: Gid,
}

impl Account {
    /// Look an account up in the system user database
    pub fn lookup(name: &str) -> Result<Self> {
        let user = User::from_name(name)
            .map_err(|e| Error::UserLookup(format!("failed to look up '{}': {}", name, e)))?
            .ok_or_else(|| Error::UserLookup(format!("no such user '{}'", name)))?;
        Ok(user.into())
    }

    /// The account the current process runs as
    pub fn current() -> Result<Self> {
        let uid = Uid::current();
        let user = User::from_uid(uid)
            .map_err(|e| Error::UserLookup(format!("failed to look up uid {}: {}", uid, e)))?
            .ok_or_else(|| Error::UserLookup(format!("no user with uid {}", uid)))?;
        Ok(user.into())
    }
}

impl From<User> for Account {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            home: user.dir,
            uid: user.uid,
            gid: user.gid,
        }
    }
}

/// Resolved key file path for an account
#[derive(Debug, Clone)]
pub struct KeyLocation {
    account: Account,
    path: PathBuf,
    manage_dir: bool,
}

impl KeyLocation {
    /// Resolve the key file of `user`
    ///
    /// Without an override the path is `<home>/.ssh/authorized_keys`. An
    /// override may start with `~`. With `follow`, a symlink at the path is
    /// resolved to its target so writes do not replace the link itself.
    pub fn resolve(
        user: &str,
        path_override: Option<&str>,
        manage_dir: bool,
        follow: bool,
    ) -> Result<Self> {
        let account = Account::lookup(user)?;
        Ok(Self::for_account(account, path_override, manage_dir, follow))
    }

    /// Resolve the key file of an already looked-up account
    pub fn for_account(
        account: Account,
        path_override: Option<&str>,
        manage_dir: bool,
        follow: bool,
    ) -> Self {
        let mut path = match path_override {
            Some(p) => PathBuf::from(shellexpand::tilde(p).as_ref()),
            None => account.home.join(DEFAULT_KEYS_PATH),
        };

        // A relative override would otherwise depend on the working directory
        if path.is_relative() {
            match std::path::absolute(&path) {
                Ok(absolute) => path = absolute,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Cannot make path absolute: {}", e);
                }
            }
        }

        if follow && path.is_symlink() {
            match fs::canonicalize(&path) {
                Ok(target) => {
                    tracing::debug!(
                        link = %path.display(),
                        target = %target.display(),
                        "Following symlink"
                    );
                    path = target;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Cannot follow symlink: {}", e);
                }
            }
        }

        Self {
            account,
            path,
            manage_dir,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manage_dir(&self) -> bool {
        self.manage_dir
    }

    /// Make the location ready for a write
    ///
    /// With directory management the parent directory is created if needed
    /// and set to mode 0700 owned by the account. The file is created if
    /// missing, then owned by the account with mode 0600.
    pub fn prepare(&self) -> Result<()> {
        let uid = self.account.uid;
        let gid = self.account.gid;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if self.manage_dir {
                if !dir.exists() {
                    fs::DirBuilder::new().mode(DIR_MODE).create(dir).map_err(|e| {
                        Error::file_io(format!("Failed to create directory '{}'", dir.display()), e)
                    })?;
                    tracing::info!(path = %dir.display(), "Created key directory");
                }
                set_owner_and_mode(dir, uid, gid, DIR_MODE)?;
            } else if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    Error::file_io(format!("Failed to create directory '{}'", dir.display()), e)
                })?;
            }
        }

        if !self.path.exists() {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .mode(FILE_MODE)
                .open(&self.path)
                .map_err(|e| {
                    Error::file_io(format!("Failed to create '{}'", self.path.display()), e)
                })?;
            tracing::info!(path = %self.path.display(), "Created key file");
        }
        set_owner_and_mode(&self.path, uid, gid, FILE_MODE)
    }
}

fn set_owner_and_mode(path: &Path, uid: Uid, gid: Gid, mode: u32) -> Result<()> {
    chown(path, Some(uid), Some(gid)).map_err(|e| {
        Error::file_io(format!("Failed to change owner of '{}'", path.display()), e.into())
    })?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        Error::file_io(format!("Failed to set permissions on '{}'", path.display()), e)
    })
}
