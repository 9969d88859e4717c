//! SQL schema for the Frontdesk SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    cpf           TEXT,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash  TEXT PRIMARY KEY,   -- sha-256 hex of the bearer token
    account_id  TEXT NOT NULL REFERENCES accounts(account_id),
    issued_at   TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

-- One row per check-in event. check_out is set exactly once; a NULL
-- check_out marks the visit as active.
CREATE TABLE IF NOT EXISTS visitors (
    visitor_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    cpf         TEXT NOT NULL,      -- normalised digits
    room        TEXT NOT NULL,      -- room label, e.g. 'Room 3'
    birth_date  TEXT,               -- ISO 8601 date
    email       TEXT,
    check_in    TEXT NOT NULL,      -- ISO 8601 UTC; server-assigned
    check_out   TEXT,
    created_at  TEXT NOT NULL
);

-- The audit trail is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS audit_log (
    entry_id    TEXT PRIMARY KEY,
    actor_id    TEXT NOT NULL,
    actor_name  TEXT NOT NULL,
    actor_cpf   TEXT,
    action      TEXT NOT NULL,
    details     TEXT,
    target_id   TEXT,
    target_name TEXT,
    ip_address  TEXT,
    user_agent  TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS visitors_cpf_idx         ON visitors(cpf);
CREATE INDEX IF NOT EXISTS visitors_room_active_idx ON visitors(room, check_out);
CREATE INDEX IF NOT EXISTS visitors_created_idx     ON visitors(created_at);
CREATE INDEX IF NOT EXISTS audit_created_idx        ON audit_log(created_at);
CREATE INDEX IF NOT EXISTS audit_action_idx         ON audit_log(action);
CREATE INDEX IF NOT EXISTS sessions_account_idx     ON sessions(account_id);

PRAGMA user_version = 1;
";
