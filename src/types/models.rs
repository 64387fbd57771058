use std::fmt;

/// Repository visibility as stored in the `repository.visibility` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    Autocreated,
    /// Any value this gateway does not know about. Grants nothing.
    Other(String),
}

impl Visibility {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Autocreated => "autocreated",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for Visibility {
    fn from(s: &str) -> Self {
        match s {
            "public" => Self::Public,
            "unlisted" => Self::Unlisted,
            "private" => Self::Private,
            "autocreated" => Self::Autocreated,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Visibility {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode of an explicit access grant from the `access` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    Other(String),
}

impl AccessMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadOnly => "ro",
            Self::ReadWrite => "rw",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for AccessMode {
    fn from(s: &str) -> Self {
        match s {
            "ro" => Self::ReadOnly,
            "rw" => Self::ReadWrite,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AccessMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account type of the pusher. Only suspension matters to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserType {
    Suspended,
    Other(String),
}

impl UserType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Suspended => "suspended",
            Self::Other(s) => s,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        match s {
            "suspended" => Self::Suspended,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for UserType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity the SSH layer authenticated. Trusted as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PusherIdentity {
    pub id: i64,
    pub name: String,
}

impl PusherIdentity {
    pub fn canonical_name(&self) -> String {
        format!("~{}", self.name)
    }
}

/// Account state of the pusher as recorded in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pusher {
    pub user_type: UserType,
    pub suspension_notice: Option<String>,
}

/// Everything the gateway needs to decide on one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLookup {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub path: String,
    pub visibility: Visibility,
    pub pusher: Pusher,
    pub access: Option<AccessMode>,
    /// Set when the row was reached through the `redirect` table.
    pub redirected: bool,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub user_type: String,
    pub suspension_notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub owner_id: i64,
    pub path: String,
    pub visibility: String,
}
