//! LanceDB connection and housekeeping helpers.

use arrow_array::RecordBatchIterator;
use lancedb::{connect, Connection};
use std::sync::Arc;

use eora_core::{Error, Result};

pub(crate) fn index_err(e: impl std::fmt::Display) -> Error { Error::Index(e.to_string()) }

pub async fn open_db(uri: &str) -> Result<Connection> {
    connect(uri).execute().await.map_err(index_err)
}

pub async fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let names = conn.table_names().execute().await.map_err(index_err)?;
    Ok(names.iter().any(|n| n == name))
}

pub async fn ensure_table(conn: &Connection, name: &str, schema: Arc<arrow_schema::Schema>) -> Result<()> {
    if table_exists(conn, name).await? {
        return Ok(());
    }
    // create empty table with 0 rows
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema.clone());
    conn.create_table(name, Box::new(iter)).execute().await.map_err(index_err)?;
    Ok(())
}
