use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::Value as JsonValue;
use url::Url;

use pgrest_client_core::{Record, RestConfig, RestError, RestResponse, RestResult};

use crate::encode::{encode_filters, encode_select, Extras, Filters};
use crate::execute::RequestExecutor;

/// Client for a PostgREST-compatible tabular data API.
///
/// Exposes the CRUD primitives; the composite helpers in [`crate::helpers`]
/// are built on these and never touch the transport directly. The primitives
/// themselves never fail: whatever envelope the executor produced (rows,
/// no-content, a remote error) is returned as-is.
///
/// # Example
/// ```ignore
/// use pgrest_client::{Extras, Filters, RestClient, RestConfig};
///
/// let client = RestClient::new(RestConfig::new("https://example.supabase.co", "anon-key"))?;
/// let resp = client.select("cities", "*", &Filters::new(), &Extras::new()).await;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    executor: RequestExecutor,
}

impl RestClient {
    /// Create a new client from a configuration.
    pub fn new(config: RestConfig) -> RestResult<Self> {
        Ok(Self {
            executor: RequestExecutor::new(&config)?,
        })
    }

    /// The `/rest/v1` base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        self.executor.base_url()
    }

    /// SELECT rows from `table`.
    ///
    /// `columns` is a comma-separated column expression (`"*"` for all).
    pub async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &Filters,
        extras: &Extras,
    ) -> RestResponse<Record> {
        let query = encode_select(columns, filters, extras);
        self.executor
            .execute(
                Method::GET,
                &format!("{}?{}", table, query),
                None,
                HeaderMap::new(),
            )
            .await
    }

    /// INSERT a single record.
    ///
    /// No representation is requested, so the reply is normally an empty
    /// 201; use [`RestClient::insert_many`] with one element when the
    /// created row is needed back.
    pub async fn insert(&self, table: &str, record: Record) -> RestResponse<Record> {
        let body = JsonValue::Object(record.into_inner());
        self.executor
            .execute(Method::POST, table, Some(&body), HeaderMap::new())
            .await
    }

    /// INSERT a batch of records, asking for `return=representation` so the
    /// created rows come back.
    pub async fn insert_many(&self, table: &str, records: Vec<Record>) -> RestResponse<Record> {
        let body = rows_body(records);
        self.executor
            .execute(Method::POST, table, Some(&body), prefer_representation())
            .await
    }

    /// UPDATE rows matching `matches` with `data`.
    ///
    /// Every `matches` entry becomes an `eq.` filter; for other operators,
    /// issue a [`RestClient::select`] first and update by key.
    pub async fn update(
        &self,
        table: &str,
        matches: &Record,
        data: Record,
    ) -> RestResponse<Record> {
        let query = encode_filters(&Filters::from_match(matches));
        let body = JsonValue::Object(data.into_inner());
        self.executor
            .execute(
                Method::PATCH,
                &format!("{}?{}", table, query),
                Some(&body),
                prefer_representation(),
            )
            .await
    }

    /// DELETE rows matching `matches` (exact-match per column, no body).
    pub async fn delete(&self, table: &str, matches: &Record) -> RestResponse<Record> {
        let query = encode_filters(&Filters::from_match(matches));
        self.executor
            .execute(
                Method::DELETE,
                &format!("{}?{}", table, query),
                None,
                HeaderMap::new(),
            )
            .await
    }

    /// UPSERT records, merging duplicates on the `on_conflict` columns.
    ///
    /// One round-trip alternative to the read-then-write helpers for servers
    /// that honor `Prefer: resolution=merge-duplicates`.
    pub async fn upsert(
        &self,
        table: &str,
        records: Vec<Record>,
        on_conflict: &[&str],
    ) -> RestResponse<Record> {
        let mut path = table.to_string();
        if !on_conflict.is_empty() {
            path.push_str("?on_conflict=");
            path.push_str(&on_conflict.join(","));
        }
        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );
        let body = rows_body(records);
        self.executor
            .execute(Method::POST, &path, Some(&body), headers)
            .await
    }

    /// Exact server-side row count via a HEAD request with
    /// `Prefer: count=exact`; the count arrives in `Content-Range`.
    pub async fn count_exact(&self, table: &str, filters: &Filters) -> RestResult<i64> {
        let query = encode_select("*", filters, &Extras::new());
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        let resp = self
            .executor
            .execute(
                Method::HEAD,
                &format!("{}?{}", table, query),
                None,
                headers,
            )
            .await;
        if let Some(err) = resp.error {
            return Err(err);
        }
        resp.count
            .ok_or_else(|| RestError::decode("Server sent no Content-Range count"))
    }
}

fn rows_body(records: Vec<Record>) -> JsonValue {
    JsonValue::Array(
        records
            .into_iter()
            .map(|r| JsonValue::Object(r.into_inner()))
            .collect(),
    )
}

fn prefer_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
