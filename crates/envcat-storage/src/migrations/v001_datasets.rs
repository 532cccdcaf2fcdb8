//! v001: datasets plus the collections each record owns.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS datasets (
    id                         TEXT PRIMARY KEY,
    source_id                  TEXT NOT NULL,
    title                      TEXT NOT NULL,
    abstract                   TEXT,
    description                TEXT,
    lineage                    TEXT,
    publication_date           TEXT,
    metadata_date              TEXT,
    updated_date               TEXT,
    metadata_standard          TEXT,
    metadata_standard_version  TEXT,
    language                   TEXT,
    resource_status            TEXT,
    resource_type              TEXT,
    credit_text                TEXT,
    is_accessible_for_free     INTEGER,
    licence                    TEXT,
    extensions                 TEXT NOT NULL DEFAULT '{}',
    bbox_west                  REAL,
    bbox_east                  REAL,
    bbox_south                 REAL,
    bbox_north                 REAL,
    temporal_start             TEXT,
    temporal_end               TEXT,
    ingested_at                TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_datasets_source_id ON datasets(source_id);
CREATE INDEX IF NOT EXISTS idx_datasets_publication ON datasets(publication_date);

CREATE TABLE IF NOT EXISTS dataset_contacts (
    dataset_id               TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    position                 INTEGER NOT NULL,
    role                     TEXT NOT NULL,
    full_name                TEXT,
    given_name               TEXT,
    family_name              TEXT,
    honorific_prefix         TEXT,
    organisation_name        TEXT,
    organisation_identifier  TEXT,
    name_identifier          TEXT,
    position_name            TEXT,
    email                    TEXT,
    address                  TEXT,
    PRIMARY KEY (dataset_id, position)
);

CREATE TABLE IF NOT EXISTS dataset_keywords (
    dataset_id        TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    position          INTEGER NOT NULL,
    text              TEXT NOT NULL,
    text_folded       TEXT NOT NULL,
    keyword_type      TEXT NOT NULL,
    uri               TEXT,
    defined_term_set  TEXT,
    PRIMARY KEY (dataset_id, position)
);

CREATE INDEX IF NOT EXISTS idx_keywords_folded ON dataset_keywords(text_folded);

CREATE TABLE IF NOT EXISTS dataset_relationships (
    dataset_id        TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    position          INTEGER NOT NULL,
    relation_type     TEXT NOT NULL,
    target_source_id  TEXT NOT NULL,
    PRIMARY KEY (dataset_id, position)
);

CREATE TABLE IF NOT EXISTS dataset_online_resources (
    dataset_id     TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    position       INTEGER NOT NULL,
    url            TEXT NOT NULL,
    name           TEXT,
    description    TEXT,
    function       TEXT,
    resource_type  TEXT,
    PRIMARY KEY (dataset_id, position)
);

CREATE TABLE IF NOT EXISTS dataset_raw_documents (
    dataset_id    TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    format        TEXT NOT NULL,
    content       TEXT NOT NULL,
    size_bytes    INTEGER NOT NULL,
    retrieved_at  TEXT NOT NULL,
    PRIMARY KEY (dataset_id, format)
);
";
