// ============================
// crates/backend-lib/src/htpasswd/mod.rs
// ============================
//! Credential table loaded from an htpasswd-style flat file.
//!
//! Each line is `username:hash`. Blank lines and lines starting with `#` are
//! ignored. Usernames are compared case-insensitively with surrounding
//! whitespace removed.
mod error;
pub mod scheme;

pub use error::AuthError;
pub use scheme::HashScheme;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Immutable username → hash table
#[derive(Debug, Clone, Default)]
pub struct Htpasswd {
    users: HashMap<String, HashScheme>,
    /// Most expensive bcrypt hash in the table; unknown usernames are checked
    /// against it so they take as long to reject as known ones
    decoy: Option<String>,
}

/// Normalize a username the same way at load and at query time
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Htpasswd {
    /** Build the table from a line-oriented reader
    # Errors
    Returns `AuthError::SourceRead` if the reader fails or yields invalid UTF-8.
    A partial table is never returned. */
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, AuthError> {
        let mut users = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (username, hash) = match line.split_once(':') {
                Some((username, hash)) => (username, hash.trim()),
                None => {
                    // kept with an empty hash, which can never verify
                    warn!(line = index + 1, "credential line has no ':' delimiter");
                    (line, "")
                },
            };

            users.insert(normalize_username(username), HashScheme::parse(hash));
        }

        let decoy = users
            .values()
            .filter_map(|scheme| match scheme {
                HashScheme::Bcrypt(hash) => Some(hash),
                _ => None,
            })
            .max_by_key(|hash| scheme::bcrypt_cost(hash))
            .cloned();

        debug!(users = users.len(), "loaded credential table");
        Ok(Self { users, decoy })
    }

    /// Open and load a credential file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /** Verify a username/password pair
    # Errors
    * `UserNotFound` - no entry for the normalized username
    * `UnsupportedHash` - the stored hash uses an unknown format
    * `MalformedHash` - the stored hash claims a known format but cannot be decoded
    * `PasswordMismatch` - the password does not match */
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let Some(scheme) = self.users.get(&normalize_username(username)) else {
            if let Some(decoy) = &self.decoy {
                let _ = bcrypt::verify(password, decoy);
            }
            return Err(AuthError::UserNotFound);
        };
        scheme.verify(password)
    }

    /// Whether an entry exists for this username
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(&normalize_username(username))
    }

    /// Stored scheme for this username, if any
    pub fn scheme(&self, username: &str) -> Option<&HashScheme> {
        self.users.get(&normalize_username(username))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
