//! Composite operations built purely on the CRUD primitives.

use serde_json::Value as JsonValue;

use pgrest_client_core::{Record, RestError, RestResult};

use crate::client::RestClient;
use crate::encode::{Extras, Filters};

/// Default number of rows per [`RestClient::bulk_insert`] chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Outcome of one `bulk_insert` chunk.
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Position of the chunk in send order.
    pub index: usize,
    /// Rows attempted in this chunk.
    pub attempted: usize,
    /// Rows the server reported as created.
    pub inserted: usize,
    /// Error, if the chunk failed.
    pub error: Option<RestError>,
}

/// Outcome of a [`RestClient::bulk_insert`]: created rows plus a per-chunk
/// report.
///
/// Chunks commit independently on the server; a failed chunk rolls back
/// neither the ones before it nor stops the ones after it. The report makes
/// partial success visible instead of collapsing everything into one row
/// list.
#[derive(Debug, Default)]
pub struct BulkInsertOutcome {
    /// Created rows, concatenated in chunk order.
    pub rows: Vec<Record>,
    /// One entry per chunk, in send order.
    pub chunks: Vec<ChunkOutcome>,
}

impl BulkInsertOutcome {
    /// True when every chunk succeeded.
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(|c| c.error.is_none())
    }

    /// Number of chunks that failed.
    pub fn failed_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.error.is_some()).count()
    }
}

impl RestClient {
    /// INSERT `rows` in sequential chunks of at most `chunk_size`; pass 0 to
    /// use [`DEFAULT_CHUNK_SIZE`].
    ///
    /// Chunk `i + 1` is not sent until chunk `i`'s response has arrived.
    pub async fn bulk_insert(
        &self,
        table: &str,
        rows: Vec<Record>,
        chunk_size: usize,
    ) -> BulkInsertOutcome {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        let mut outcome = BulkInsertOutcome::default();

        for (index, chunk) in rows.chunks(chunk_size).enumerate() {
            let attempted = chunk.len();
            let resp = self.insert_many(table, chunk.to_vec()).await;
            match resp.into_result() {
                Ok(created) => {
                    outcome.chunks.push(ChunkOutcome {
                        index,
                        attempted,
                        inserted: created.len(),
                        error: None,
                    });
                    outcome.rows.extend(created);
                }
                Err(err) => {
                    outcome.chunks.push(ChunkOutcome {
                        index,
                        attempted,
                        inserted: 0,
                        error: Some(err),
                    });
                }
            }
        }

        outcome
    }

    /// True when at least one row has `column = value`.
    pub async fn exists(
        &self,
        table: &str,
        column: &str,
        value: impl Into<JsonValue>,
    ) -> RestResult<bool> {
        let filters = Filters::new().eq(column, value);
        let rows = self
            .select(table, column, &filters, &Extras::new().limit(1))
            .await
            .into_result()?;
        Ok(!rows.is_empty())
    }

    /// Count matching rows by fetching their `id` column.
    ///
    /// Cost grows with the match set since every matching row is fetched;
    /// [`RestClient::count_exact`] asks the server for the total instead.
    pub async fn count(&self, table: &str, filters: &Filters) -> RestResult<i64> {
        let rows = self
            .select(table, "id", filters, &Extras::new())
            .await
            .into_result()?;
        Ok(rows.len() as i64)
    }

    /// First matching row, or `None`.
    pub async fn find_one(
        &self,
        table: &str,
        filters: &Filters,
        columns: &str,
    ) -> RestResult<Option<Record>> {
        self.select(table, columns, filters, &Extras::new().limit(1))
            .await
            .into_first()
    }

    /// Return the row matching `matches`, inserting one when absent.
    ///
    /// The inserted record is `data` when given, otherwise the match record
    /// itself. Check-then-act: a concurrent writer can insert between the
    /// lookup and the write, so duplicates are possible unless the server
    /// enforces uniqueness. [`RestClient::upsert`] avoids the race where
    /// the server supports it.
    pub async fn find_or_create(
        &self,
        table: &str,
        matches: Record,
        data: Option<Record>,
    ) -> RestResult<Option<Record>> {
        let filters = Filters::from_match(&matches);
        if let Some(found) = self.find_one(table, &filters, "*").await? {
            return Ok(Some(found));
        }
        let insert_data = data.unwrap_or(matches);
        self.insert_many(table, vec![insert_data]).await.into_first()
    }

    /// Update the row matching `matches` with `data`, inserting the merged
    /// record when no row matches (`data`'s keys win on collision).
    ///
    /// Check-then-act like [`RestClient::find_or_create`].
    pub async fn update_or_create(
        &self,
        table: &str,
        matches: Record,
        data: Record,
    ) -> RestResult<Option<Record>> {
        let filters = Filters::from_match(&matches);
        if self.find_one(table, &filters, "*").await?.is_some() {
            return self.update(table, &matches, data).await.into_first();
        }
        let merged = matches.merged_with(data);
        self.insert_many(table, vec![merged]).await.into_first()
    }
}
