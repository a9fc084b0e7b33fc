//! Open flags for SQLite connections.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a database file is opened.
///
/// The default matches `rusqlite`'s: read-write, create if missing, URI
/// filenames allowed, no mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OpenFlags {
    pub readonly: bool,
    pub readwrite: bool,
    pub create: bool,
    pub uri: bool,
    pub memory: bool,
    pub no_mutex: bool,
    pub full_mutex: bool,
    pub shared_cache: bool,
    pub private_cache: bool,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            readonly: false,
            readwrite: true,
            create: true,
            uri: true,
            memory: false,
            no_mutex: true,
            full_mutex: false,
            shared_cache: false,
            private_cache: false,
        }
    }
}

impl OpenFlags {
    /// Read-only access to an existing database.
    pub fn read_only() -> Self {
        Self {
            readonly: true,
            readwrite: false,
            create: false,
            ..Self::default()
        }
    }

    /// Checks the combinations SQLite itself refuses.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.readonly == self.readwrite {
            return Err("exactly one of readonly and readwrite must be set".into());
        }
        if self.create && self.readonly {
            return Err("create requires readwrite".into());
        }
        if self.no_mutex && self.full_mutex {
            return Err("no_mutex and full_mutex are exclusive".into());
        }
        if self.shared_cache && self.private_cache {
            return Err("shared_cache and private_cache are exclusive".into());
        }
        Ok(())
    }
}

impl From<OpenFlags> for rusqlite::OpenFlags {
    fn from(flags: OpenFlags) -> Self {
        let mut out = rusqlite::OpenFlags::empty();
        let table = [
            (flags.readonly, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY),
            (flags.readwrite, rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE),
            (flags.create, rusqlite::OpenFlags::SQLITE_OPEN_CREATE),
            (flags.uri, rusqlite::OpenFlags::SQLITE_OPEN_URI),
            (flags.memory, rusqlite::OpenFlags::SQLITE_OPEN_MEMORY),
            (flags.no_mutex, rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX),
            (flags.full_mutex, rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX),
            (flags.shared_cache, rusqlite::OpenFlags::SQLITE_OPEN_SHARED_CACHE),
            (flags.private_cache, rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE),
        ];
        for (set, flag) in table {
            if set {
                out |= flag;
            }
        }
        out
    }
}
