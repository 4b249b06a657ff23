//! Reconciliation of a key file against a desired state
//!
//! The flow is load, validate, apply, then persist only if something
//! changed. Invalid requests are rejected before any write happens.
//!
//! There is no locking across processes: two concurrent runs against the
//! same file race and the later rename wins. Callers that need strict
//! serialization must lock around invocations themselves.

mod engine;
mod request;

pub use engine::{Change, apply, parse_request};
pub use request::{KeyState, Request, split_lines};

use crate::error::Result;
use crate::keys::KeyTypeSet;
use crate::store::{self, KeyLocation};
use serde::Serialize;
use std::path::PathBuf;

/// Result of a reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub user: String,
    pub path: PathBuf,
    pub state: KeyState,
    /// Whether the file was left unwritten because of check mode
    pub check_mode: bool,
    pub changes: Vec<Change>,
}

/// Reconcile the key file at `location` with `request`
///
/// In check mode the changes are computed and reported but the location is
/// neither prepared nor written.
pub fn sync(
    location: &KeyLocation,
    request: &Request,
    types: &KeyTypeSet,
    check_mode: bool,
) -> Result<Outcome> {
    let path = location.path();

    // Reject bad input before reading anything
    parse_request(request, types)?;

    let mut file = store::load(path, types)?;
    let changes = apply(&mut file, request, types)?;
    let changed = !changes.is_empty();

    if changed && !check_mode {
        location.prepare()?;
        store::save(path, &file)?;
    }

    tracing::info!(
        user = %location.account().name,
        path = %path.display(),
        state = %request.state,
        changed,
        check_mode,
        changes = changes.len(),
        "Reconciled authorized keys"
    );

    Ok(Outcome {
        changed,
        user: location.account().name.clone(),
        path: path.to_path_buf(),
        state: request.state,
        check_mode,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::Account;
    use std::fs;
    use tempfile::TempDir;

    fn location(home: &TempDir) -> KeyLocation {
        let account = Account {
            home: home.path().to_path_buf(),
            ..Account::current().unwrap()
        };
        KeyLocation::for_account(account, None, true, false)
    }

    #[test]
    fn test_sync_writes_on_change() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        let request = Request::from_text("ssh-rsa AAAAKEY1 a", KeyState::Present);

        let outcome = sync(&location, &request, &KeyTypeSet::default(), false).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.path, location.path());
        assert_eq!(
            fs::read_to_string(location.path()).unwrap(),
            "ssh-rsa AAAAKEY1 a\n"
        );
    }

    #[test]
    fn test_sync_no_change_does_not_create() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        let request = Request::from_text("ssh-rsa AAAAKEY1", KeyState::Absent);

        let outcome = sync(&location, &request, &KeyTypeSet::default(), false).unwrap();
        assert!(!outcome.changed);
        assert!(!home.path().join(".ssh").exists());
    }

    #[test]
    fn test_sync_check_mode() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        let request = Request::from_text("ssh-rsa AAAAKEY1 a", KeyState::Present);

        let outcome = sync(&location, &request, &KeyTypeSet::default(), true).unwrap();
        assert!(outcome.changed);
        assert!(outcome.check_mode);
        assert_eq!(outcome.changes, vec![Change::Added("AAAAKEY1".to_string())]);
        assert!(!location.path().exists());
    }

    #[test]
    fn test_sync_invalid_request_leaves_file() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        fs::create_dir(home.path().join(".ssh")).unwrap();
        fs::write(location.path(), "ssh-rsa AAAAKEY1 a\n").unwrap();

        let request = Request::from_text("ssh-rsa AAAAKEY2 b\nssh-rsa", KeyState::Present);
        let result = sync(&location, &request, &KeyTypeSet::default(), false);

        assert!(matches!(result, Err(Error::InvalidKeySpec { .. })));
        assert_eq!(
            fs::read_to_string(location.path()).unwrap(),
            "ssh-rsa AAAAKEY1 a\n"
        );
    }

    #[test]
    fn test_sync_exclusive_without_keys_keeps_file() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        fs::create_dir(home.path().join(".ssh")).unwrap();
        fs::write(location.path(), "ssh-rsa AAAAKEY1 a\nssh-rsa AAAAKEY2 b\n").unwrap();

        let request =
            Request::from_text("# nothing here\n", KeyState::Present).with_exclusive(true);
        let result = sync(&location, &request, &KeyTypeSet::default(), false);

        assert!(matches!(result, Err(Error::InvalidKeySpec { .. })));
        assert_eq!(
            fs::read_to_string(location.path()).unwrap(),
            "ssh-rsa AAAAKEY1 a\nssh-rsa AAAAKEY2 b\n"
        );
    }

    #[test]
    fn test_outcome_json() {
        let home = TempDir::new().unwrap();
        let location = location(&home);
        let request = Request::from_text("ssh-rsa AAAAKEY1 a", KeyState::Present);

        let outcome = sync(&location, &request, &KeyTypeSet::default(), true).unwrap();
        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["changed"], true);
        assert_eq!(json["state"], "present");
        assert_eq!(json["changes"][0]["action"], "added");
    }
}
