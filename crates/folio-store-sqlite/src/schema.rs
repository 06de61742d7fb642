//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    avatar     TEXT,
    joined_at  TEXT NOT NULL
);

-- One profile per user, enforced here rather than by find-then-insert.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id     TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL UNIQUE
                   REFERENCES users(user_id) ON DELETE CASCADE,
    company        TEXT,
    website        TEXT,
    location       TEXT,
    status         TEXT NOT NULL CHECK (status != ''),
    skills         TEXT NOT NULL,               -- JSON array of strings
    bio            TEXT,
    githubusername TEXT,
    experience     TEXT NOT NULL DEFAULT '[]',  -- JSON array of Experience
    education      TEXT NOT NULL DEFAULT '[]',  -- JSON array of Education
    social         TEXT NOT NULL DEFAULT '{}',  -- JSON Social object
    created_at     TEXT NOT NULL                -- ISO 8601 UTC; set once
);

PRAGMA user_version = 1;
";

/// Profile columns in the order [`crate::encode::RawProfile::from_row`]
/// reads them. Unqualified so it works in `RETURNING` clauses and in joins
/// against `users` via `USING (user_id)`.
pub const PROFILE_COLUMNS: &str = "profile_id, user_id, company, website, location, status, \
   skills, bio, githubusername, experience, education, social, created_at";
