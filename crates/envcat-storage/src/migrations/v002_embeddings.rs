//! v002: per-record embedding bookkeeping. Vectors live in the index files.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS embeddings (
    record_id   TEXT PRIMARY KEY REFERENCES datasets(id) ON DELETE CASCADE,
    source_id   TEXT NOT NULL,
    model_name  TEXT NOT NULL,
    dimensions  INTEGER NOT NULL,
    build_id    TEXT NOT NULL,
    slot        INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_embeddings_build_slot ON embeddings(build_id, slot);
";
