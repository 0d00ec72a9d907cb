//! Database schema and migrations for AI Inventory.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Latest aggregated AI news (replaced wholesale on every pass)
    r#"
CREATE TABLE news_articles (
    id          INTEGER PRIMARY KEY,     -- rank within the latest pass
    title       TEXT NOT NULL,
    summary     TEXT NOT NULL,
    link        TEXT NOT NULL,
    source      TEXT NOT NULL,
    pub_date    TEXT NOT NULL DEFAULT '',
    image       TEXT
);
"#,
    // v2: Newsletter subscribers
    r#"
CREATE TABLE subscribers (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE,
    subscribed_at   TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
];
