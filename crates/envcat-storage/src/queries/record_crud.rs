//! Insert, get, delete for records and the collections they own.

use rusqlite::{params, Connection, OptionalExtension, Row};

use envcat_core::errors::{EnvcatResult, StorageError};
use envcat_core::models::{
    Contact, Keyword, KeywordType, OnlineResource, RawSourceDocument, Relationship,
    SourceFormat, SpatialExtent, TemporalExtent, UnifiedRecord,
};

use super::{
    col, decode_date, decode_datetime, decode_err, decode_timestamp, encode_date,
    encode_datetime,
};
use crate::to_storage_err;

/// The base SELECT columns for dataset queries (25 columns, indices 0-24).
pub(crate) const DATASET_COLUMNS: &str =
    "id, source_id, title, abstract, description, lineage,
     publication_date, metadata_date, updated_date,
     metadata_standard, metadata_standard_version, language,
     resource_status, resource_type, credit_text, is_accessible_for_free,
     licence, extensions, bbox_west, bbox_east, bbox_south, bbox_north,
     temporal_start, temporal_end, ingested_at";

/// Insert a record and everything it owns in one transaction.
/// A natural key that already exists is rejected and nothing is written.
pub fn insert_record(conn: &Connection, record: &UnifiedRecord) -> EnvcatResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_record begin: {e}")))?;

    match insert_record_inner(&tx, record) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_record commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn insert_record_inner(conn: &Connection, record: &UnifiedRecord) -> EnvcatResult<()> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM datasets WHERE source_id = ?1)",
            params![record.source_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if exists {
        return Err(StorageError::DuplicateNaturalKey {
            source_id: record.source_id.clone(),
        }
        .into());
    }

    let extensions = serde_json::to_string(&record.extensions)?;
    let bbox = record.spatial_extent;
    let temporal = record.temporal_extent.unwrap_or_default();

    conn.execute(
        &format!(
            "INSERT INTO datasets ({DATASET_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25
            )"
        ),
        params![
            record.id,
            record.source_id,
            record.title,
            record.abstract_text,
            record.description,
            record.lineage,
            encode_date(record.publication_date),
            encode_datetime(record.metadata_date),
            encode_date(record.updated_date),
            record.metadata_standard,
            record.metadata_standard_version,
            record.language,
            record.resource_status,
            record.resource_type,
            record.credit_text,
            record.is_accessible_for_free,
            record.licence,
            extensions,
            bbox.map(|b| b.west),
            bbox.map(|b| b.east),
            bbox.map(|b| b.south),
            bbox.map(|b| b.north),
            encode_date(temporal.start),
            encode_date(temporal.end),
            record.ingested_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    insert_collections(conn, record)
}

fn insert_collections(conn: &Connection, record: &UnifiedRecord) -> EnvcatResult<()> {
    for (pos, c) in record.contacts.iter().enumerate() {
        let address = c.address.as_ref().map(serde_json::to_string).transpose()?;
        conn.execute(
            "INSERT INTO dataset_contacts (
                dataset_id, position, role, full_name, given_name, family_name,
                honorific_prefix, organisation_name, organisation_identifier,
                name_identifier, position_name, email, address
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                record.id,
                pos as i64,
                c.role,
                c.full_name,
                c.given_name,
                c.family_name,
                c.honorific_prefix,
                c.organisation_name,
                c.organisation_identifier,
                c.name_identifier,
                c.position_name,
                c.email,
                address,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    for (pos, k) in record.keywords.iter().enumerate() {
        conn.execute(
            "INSERT INTO dataset_keywords (
                dataset_id, position, text, text_folded, keyword_type, uri, defined_term_set
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                pos as i64,
                k.text,
                k.folded(),
                k.keyword_type.as_str(),
                k.uri,
                k.defined_term_set,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    for (pos, r) in record.relationships.iter().enumerate() {
        conn.execute(
            "INSERT INTO dataset_relationships (dataset_id, position, relation_type, target_source_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![record.id, pos as i64, r.relation_type, r.target_source_id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    for (pos, o) in record.online_resources.iter().enumerate() {
        conn.execute(
            "INSERT INTO dataset_online_resources (
                dataset_id, position, url, name, description, function, resource_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                pos as i64,
                o.url,
                o.name,
                o.description,
                o.function,
                o.resource_type,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    for doc in &record.raw_documents {
        conn.execute(
            "INSERT INTO dataset_raw_documents (dataset_id, format, content, size_bytes, retrieved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                doc.format.as_str(),
                doc.content,
                doc.size_bytes as i64,
                doc.retrieved_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Point lookup by natural key.
pub fn get_by_source_id(conn: &Connection, source_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
    get_where(conn, "source_id = ?1", source_id)
}

/// Point lookup by surrogate key.
pub fn get_by_id(conn: &Connection, record_id: &str) -> EnvcatResult<Option<UnifiedRecord>> {
    get_where(conn, "id = ?1", record_id)
}

fn get_where(conn: &Connection, clause: &str, key: &str) -> EnvcatResult<Option<UnifiedRecord>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {DATASET_COLUMNS} FROM datasets WHERE {clause}"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![key], |row| Ok(parse_dataset_row(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(Ok(mut record)) => {
            load_collections(conn, &mut record)?;
            Ok(Some(record))
        }
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Delete a record by natural key. Owned rows and the embedding record go
/// with it through `ON DELETE CASCADE`.
pub fn delete_record(conn: &Connection, source_id: &str) -> EnvcatResult<bool> {
    let rows = conn
        .execute("DELETE FROM datasets WHERE source_id = ?1", params![source_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

/// Parse the scalar columns of a dataset row. Collections are loaded
/// separately by [`load_collections`].
pub(crate) fn parse_dataset_row(row: &Row<'_>) -> EnvcatResult<UnifiedRecord> {
    let extensions_json: String = col(row, 17)?;
    let extensions = serde_json::from_str(&extensions_json)
        .map_err(|e| decode_err(format!("extensions: {e}")))?;

    let bbox: [Option<f64>; 4] = [col(row, 18)?, col(row, 19)?, col(row, 20)?, col(row, 21)?];
    let spatial_extent = match bbox {
        [Some(west), Some(east), Some(south), Some(north)] => {
            Some(SpatialExtent::new(west, east, south, north))
        }
        _ => None,
    };
    let temporal = TemporalExtent::new(decode_date(col(row, 22)?)?, decode_date(col(row, 23)?)?);
    let ingested_at: String = col(row, 24)?;

    Ok(UnifiedRecord {
        id: col(row, 0)?,
        source_id: col(row, 1)?,
        title: col(row, 2)?,
        abstract_text: col(row, 3)?,
        description: col(row, 4)?,
        lineage: col(row, 5)?,
        publication_date: decode_date(col(row, 6)?)?,
        metadata_date: decode_datetime(col(row, 7)?)?,
        updated_date: decode_date(col(row, 8)?)?,
        metadata_standard: col(row, 9)?,
        metadata_standard_version: col(row, 10)?,
        language: col(row, 11)?,
        resource_status: col(row, 12)?,
        resource_type: col(row, 13)?,
        credit_text: col(row, 14)?,
        is_accessible_for_free: col(row, 15)?,
        licence: col(row, 16)?,
        extensions,
        spatial_extent,
        temporal_extent: (!temporal.is_empty()).then_some(temporal),
        contacts: Vec::new(),
        keywords: Vec::new(),
        relationships: Vec::new(),
        online_resources: Vec::new(),
        raw_documents: Vec::new(),
        ingested_at: decode_timestamp(&ingested_at)?,
    })
}

/// Load every owned collection for a record, in insertion order.
pub(crate) fn load_collections(conn: &Connection, record: &mut UnifiedRecord) -> EnvcatResult<()> {
    record.contacts = collect_rows(
        conn,
        "SELECT role, full_name, given_name, family_name, honorific_prefix,
                organisation_name, organisation_identifier, name_identifier,
                position_name, email, address
         FROM dataset_contacts WHERE dataset_id = ?1 ORDER BY position",
        &record.id,
        |row| {
            let address: Option<String> = col(row, 10)?;
            Ok(Contact {
                role: col(row, 0)?,
                full_name: col(row, 1)?,
                given_name: col(row, 2)?,
                family_name: col(row, 3)?,
                honorific_prefix: col(row, 4)?,
                organisation_name: col(row, 5)?,
                organisation_identifier: col(row, 6)?,
                name_identifier: col(row, 7)?,
                position_name: col(row, 8)?,
                email: col(row, 9)?,
                address: address
                    .map(|a| serde_json::from_str(&a))
                    .transpose()
                    .map_err(|e| decode_err(format!("contact address: {e}")))?,
            })
        },
    )?;

    record.keywords = collect_rows(
        conn,
        "SELECT text, keyword_type, uri, defined_term_set
         FROM dataset_keywords WHERE dataset_id = ?1 ORDER BY position",
        &record.id,
        |row| {
            let kind: String = col(row, 1)?;
            let keyword_type = kind.parse::<KeywordType>().map_err(decode_err)?;
            Ok(Keyword {
                text: col(row, 0)?,
                keyword_type,
                uri: col(row, 2)?,
                defined_term_set: col(row, 3)?,
            })
        },
    )?;

    record.relationships = collect_rows(
        conn,
        "SELECT relation_type, target_source_id
         FROM dataset_relationships WHERE dataset_id = ?1 ORDER BY position",
        &record.id,
        |row| {
            Ok(Relationship {
                relation_type: col(row, 0)?,
                target_source_id: col(row, 1)?,
            })
        },
    )?;

    record.online_resources = collect_rows(
        conn,
        "SELECT url, name, description, function, resource_type
         FROM dataset_online_resources WHERE dataset_id = ?1 ORDER BY position",
        &record.id,
        |row| {
            Ok(OnlineResource {
                url: col(row, 0)?,
                name: col(row, 1)?,
                description: col(row, 2)?,
                function: col(row, 3)?,
                resource_type: col(row, 4)?,
            })
        },
    )?;

    let mut documents = collect_rows(
        conn,
        "SELECT format, content, size_bytes, retrieved_at
         FROM dataset_raw_documents WHERE dataset_id = ?1",
        &record.id,
        |row| {
            let format: String = col(row, 0)?;
            let size: i64 = col(row, 2)?;
            let retrieved_at: String = col(row, 3)?;
            Ok(RawSourceDocument {
                format: format.parse::<SourceFormat>().map_err(decode_err)?,
                content: col(row, 1)?,
                size_bytes: usize::try_from(size)
                    .map_err(|_| decode_err(format!("negative document size {size}")))?,
                retrieved_at: decode_timestamp(&retrieved_at)?,
            })
        },
    )?;
    documents.sort_by_key(|d| d.format);
    record.raw_documents = documents;

    Ok(())
}

fn collect_rows<T, F>(conn: &Connection, sql: &str, dataset_id: &str, parse: F) -> EnvcatResult<Vec<T>>
where
    F: Fn(&Row<'_>) -> EnvcatResult<T>,
{
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![dataset_id], |row| Ok(parse(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}
