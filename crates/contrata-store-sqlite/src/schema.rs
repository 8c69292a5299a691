//! SQL schema for the Contrata SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS candidates (
    candidate_id      TEXT PRIMARY KEY,
    paternal_surname  TEXT,
    maternal_surname  TEXT,
    given_names       TEXT,
    birth_date        TEXT,            -- YYYY-MM-DD or NULL
    experience        TEXT,
    education         TEXT,
    languages         TEXT,
    notes             TEXT,
    phone             TEXT,
    status            TEXT,            -- NULL | 'Postulado' | 'Eliminado' | department
    created_at        TEXT NOT NULL    -- RFC 3339 UTC, microsecond precision
);

-- Listing order: newest first, ties broken by key.
CREATE INDEX IF NOT EXISTS candidates_listing_idx
    ON candidates(created_at DESC, candidate_id DESC);

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    email          TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash  TEXT NOT NULL,      -- argon2 PHC string
    role           TEXT,               -- 'entrevistador' | 'empresa' | NULL
    created_at     TEXT NOT NULL
);

PRAGMA user_version = 1;
";
