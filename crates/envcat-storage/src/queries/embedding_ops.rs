//! Embedding bookkeeping: one row per record in the current index build.

use rusqlite::{params, Connection, Row};

use envcat_core::errors::EnvcatResult;
use envcat_core::models::EmbeddingRecord;

use super::{col, decode_err, decode_timestamp};
use crate::to_storage_err;

/// Replace every embedding record in one transaction. A record id the store
/// does not hold fails the foreign key and leaves the old rows in place.
pub fn replace_all(conn: &Connection, records: &[EmbeddingRecord]) -> EnvcatResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("replace_embeddings begin: {e}")))?;

    match replace_all_inner(&tx, records) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("replace_embeddings commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn replace_all_inner(conn: &Connection, records: &[EmbeddingRecord]) -> EnvcatResult<()> {
    conn.execute("DELETE FROM embeddings", [])
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stmt = conn
        .prepare(
            "INSERT INTO embeddings (
                record_id, source_id, model_name, dimensions, build_id, slot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for r in records {
        stmt.execute(params![
            r.record_id,
            r.source_id,
            r.model_name,
            r.dimensions as i64,
            r.build_id,
            r.slot as i64,
            r.created_at.to_rfc3339(),
        ])
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// All embedding records ordered by slot.
pub fn list_all(conn: &Connection) -> EnvcatResult<Vec<EmbeddingRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT record_id, source_id, model_name, dimensions, build_id, slot, created_at
             FROM embeddings ORDER BY slot",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(parse_embedding_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn parse_embedding_row(row: &Row<'_>) -> EnvcatResult<EmbeddingRecord> {
    let dims: i64 = col(row, 3)?;
    let slot: i64 = col(row, 5)?;
    let created_at: String = col(row, 6)?;
    Ok(EmbeddingRecord {
        record_id: col(row, 0)?,
        source_id: col(row, 1)?,
        model_name: col(row, 2)?,
        dimensions: usize::try_from(dims)
            .map_err(|_| decode_err(format!("negative dimensions {dims}")))?,
        build_id: col(row, 4)?,
        slot: usize::try_from(slot).map_err(|_| decode_err(format!("negative slot {slot}")))?,
        created_at: decode_timestamp(&created_at)?,
    })
}
