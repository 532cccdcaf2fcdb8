//! Predicate queries, listing and counting.

use rusqlite::types::ToSql;
use rusqlite::{Connection, Statement};

use envcat_core::errors::EnvcatResult;
use envcat_core::models::{RecordPredicate, UnifiedRecord};

use super::encode_date;
use super::record_crud::{load_collections, parse_dataset_row, DATASET_COLUMNS};
use crate::to_storage_err;

/// Records matching every set field of `predicate`, ordered by natural key.
pub fn query_by_predicate(
    conn: &Connection,
    predicate: &RecordPredicate,
) -> EnvcatResult<Vec<UnifiedRecord>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut dyn_params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(keyword) = &predicate.keyword {
        dyn_params.push(Box::new(keyword.trim().to_lowercase()));
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM dataset_keywords k
                     WHERE k.dataset_id = datasets.id AND k.text_folded = ?{})",
            dyn_params.len()
        ));
    }
    if let Some(needle) = &predicate.title_contains {
        dyn_params.push(Box::new(needle.to_lowercase()));
        clauses.push(format!("instr(lower(title), ?{}) > 0", dyn_params.len()));
    }
    if let Some(from) = encode_date(predicate.published_from) {
        dyn_params.push(Box::new(from));
        clauses.push(format!("publication_date >= ?{}", dyn_params.len()));
    }
    if let Some(to) = encode_date(predicate.published_to) {
        dyn_params.push(Box::new(to));
        clauses.push(format!("publication_date <= ?{}", dyn_params.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let limit_clause = match predicate.limit {
        Some(limit) => {
            dyn_params.push(Box::new(limit as i64));
            format!(" LIMIT ?{}", dyn_params.len())
        }
        None => String::new(),
    };

    let sql = format!(
        "SELECT {DATASET_COLUMNS} FROM datasets{where_clause} ORDER BY source_id{limit_clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn ToSql> = dyn_params.iter().map(|p| p.as_ref()).collect();
    collect_records(conn, &mut stmt, params_refs.as_slice())
}

/// All records ordered by natural key.
pub fn list_all(conn: &Connection) -> EnvcatResult<Vec<UnifiedRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {DATASET_COLUMNS} FROM datasets ORDER BY source_id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_records(conn, &mut stmt, &[])
}

pub fn count(conn: &Connection) -> EnvcatResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM datasets", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

fn collect_records(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    params: &[&dyn ToSql],
) -> EnvcatResult<Vec<UnifiedRecord>> {
    let rows = stmt
        .query_map(params, |row| Ok(parse_dataset_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let mut record = row.map_err(|e| to_storage_err(e.to_string()))??;
        load_collections(conn, &mut record)?;
        records.push(record);
    }
    Ok(records)
}
