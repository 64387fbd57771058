pub const SCHEMA: &str = r#"
-- Accounts; owned by the account service, read-only here
CREATE TABLE IF NOT EXISTS "user" (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    user_type TEXT NOT NULL DEFAULT 'active_non_paying',
    suspension_notice TEXT
);

-- Repositories; the gateway only ever inserts autocreated rows
CREATE TABLE IF NOT EXISTS repository (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created TEXT NOT NULL,
    updated TEXT NOT NULL,
    name TEXT NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    path TEXT NOT NULL UNIQUE,
    visibility TEXT NOT NULL,

    UNIQUE(owner_id, name)
);

-- Explicit per-user grants: mode is 'ro' or 'rw'
CREATE TABLE IF NOT EXISTS access (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id INTEGER NOT NULL REFERENCES repository(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    mode TEXT NOT NULL,

    UNIQUE(repo_id, user_id)
);

-- Paths left behind by renames
CREATE TABLE IF NOT EXISTS redirect (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE,
    new_repo_id INTEGER NOT NULL REFERENCES repository(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_repository_owner ON repository(owner_id);
CREATE INDEX IF NOT EXISTS idx_access_user ON access(user_id);
CREATE INDEX IF NOT EXISTS idx_redirect_repo ON redirect(new_repo_id);
"#;
