pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS records (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  url TEXT NOT NULL UNIQUE,
  title TEXT,
  author TEXT,
  date TEXT,
  categories_json TEXT NOT NULL DEFAULT '[]',
  last_scraped TEXT,
  content TEXT NOT NULL DEFAULT '',
  source TEXT,
  label TEXT,
  scraped INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_records_scraped ON records(scraped);
CREATE INDEX IF NOT EXISTS idx_records_label ON records(label);

CREATE TABLE IF NOT EXISTS meta (
  key TEXT PRIMARY KEY,
  value INTEGER NOT NULL
);

INSERT OR IGNORE INTO meta(key, value) VALUES ('revision', 0);
"#;

pub const RECORD_COLUMNS: &str =
    "url, title, author, date, categories_json, last_scraped, content, source, label, scraped";
