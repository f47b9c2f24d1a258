use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use pgrest_client_core::{Record, RestConfig, RestError, RestResponse, RestResult};

/// Issues one HTTP request per call against the `/rest/v1` surface and
/// decodes the JSON response into a [`RestResponse`].
///
/// The default header set (`apikey`, `Authorization`, `Content-Type`) is
/// fixed when the executor is built; anything request-specific (`Prefer`,
/// ...) arrives as a per-call header map and is never written back to
/// shared state, so one executor can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: Url,
}

impl RequestExecutor {
    /// Build an executor from a configuration.
    ///
    /// Trailing slashes on the base URL are stripped and `/rest/v1` is
    /// appended.
    pub fn new(config: &RestConfig) -> RestResult<Self> {
        let base = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(&format!("{}/rest/v1", base))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "apikey",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| RestError::config(format!("Invalid API key header: {}", e)))?,
        );
        default_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&config.authorization())
                .map_err(|e| RestError::config(format!("Invalid auth header: {}", e)))?,
        );
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(RestError::Transport)?;

        Ok(Self { http, base_url })
    }

    /// The `/rest/v1` base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one request and decode the reply.
    ///
    /// `path_and_query` is `<table>` or `<table>?<query>`; `headers` carries
    /// per-call additions such as `Prefer`. Any response, 4xx and 5xx
    /// included, comes back as a [`RestResponse`]; transport and decode
    /// failures travel in its `error` slot rather than escaping.
    pub async fn execute(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&JsonValue>,
        headers: HeaderMap,
    ) -> RestResponse<Record> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        debug!(method = %method, url = %url, "Executing request");

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return RestResponse::error(RestError::Transport(e)),
        };

        let status = response.status().as_u16();
        let count = parse_count_from_headers(response.headers());

        let body_text = match response.text().await {
            Ok(t) => t,
            Err(e) => return RestResponse::error(RestError::Transport(e)),
        };

        debug!(status, "Request completed");

        if status >= 400 {
            return RestResponse::error(parse_remote_error(status, &body_text));
        }

        if status == 204 || body_text.is_empty() {
            return RestResponse::no_content(status).with_count(count);
        }

        match parse_records(&body_text) {
            Ok(data) => RestResponse::ok(data, status).with_count(count),
            Err(e) => RestResponse::error(e),
        }
    }
}

/// Parse a JSON body into rows: an array of objects, or one bare object.
fn parse_records(body: &str) -> RestResult<Vec<Record>> {
    let value: JsonValue = serde_json::from_str(body)?;
    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::Object(map) => Ok(Record(map)),
                other => Err(RestError::decode(format!(
                    "Expected a row object, got: {}",
                    other
                ))),
            })
            .collect(),
        JsonValue::Object(map) => Ok(vec![Record(map)]),
        other => Err(RestError::decode(format!("Expected rows, got: {}", other))),
    }
}

/// Extract the total from a `Content-Range` header ("0-9/100"). A `*` total
/// (count not requested) yields None.
fn parse_count_from_headers(headers: &HeaderMap) -> Option<i64> {
    headers
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.rsplit('/').next())
        .and_then(|total| total.parse::<i64>().ok())
}

/// Decode an error body of the form `{ "message": ..., "code": ... }`,
/// falling back to the raw text when it is not JSON.
fn parse_remote_error(status: u16, body: &str) -> RestError {
    if let Ok(error_obj) = serde_json::from_str::<JsonValue>(body) {
        let message = error_obj
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        let code = error_obj
            .get("code")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        RestError::remote(status, message, code)
    } else {
        RestError::remote(status, body.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor_for(base_url: &str) -> RequestExecutor {
        RequestExecutor::new(&RestConfig::new(base_url, "test-key")).unwrap()
    }

    #[test]
    fn executor_new_ok() {
        let executor = RequestExecutor::new(&RestConfig::new(
            "https://example.supabase.co",
            "test-key",
        ));
        assert!(executor.is_ok());
    }

    #[test]
    fn executor_base_url() {
        let executor = executor_for("https://example.supabase.co");
        assert_eq!(executor.base_url().path(), "/rest/v1");
    }

    #[test]
    fn executor_base_url_trailing_slash() {
        let executor = executor_for("https://example.supabase.co///");
        assert_eq!(executor.base_url().as_str(), "https://example.supabase.co/rest/v1");
    }

    #[test]
    fn executor_rejects_invalid_api_key() {
        let result = RequestExecutor::new(&RestConfig::new(
            "https://example.supabase.co",
            "bad\nkey",
        ));
        assert!(matches!(result, Err(RestError::InvalidConfig(_))));
    }

    #[test]
    fn executor_rejects_invalid_base_url() {
        let result = RequestExecutor::new(&RestConfig::new("not a url", "test-key"));
        assert!(matches!(result, Err(RestError::UrlParse(_))));
    }

    #[test]
    fn parse_records_array_of_objects() {
        let rows = parse_records(r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_as::<i64>("id"), Some(1));
    }

    #[test]
    fn parse_records_single_object() {
        let rows = parse_records(r#"{"id":7}"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_as::<i64>("id"), Some(7));
    }

    #[test]
    fn parse_records_rejects_scalar() {
        assert!(matches!(parse_records("42"), Err(RestError::Decode(_))));
    }

    #[test]
    fn parse_records_rejects_array_of_scalars() {
        assert!(matches!(
            parse_records("[1,2,3]"),
            Err(RestError::Decode(_))
        ));
    }

    #[test]
    fn parse_records_rejects_invalid_json() {
        assert!(matches!(parse_records("{"), Err(RestError::Decode(_))));
    }

    #[test]
    fn count_from_content_range() {
        let mut headers = HeaderMap::new();
        headers.insert("content-range", HeaderValue::from_static("0-9/100"));
        assert_eq!(parse_count_from_headers(&headers), Some(100));
    }

    #[test]
    fn count_missing_when_total_is_star() {
        let mut headers = HeaderMap::new();
        headers.insert("content-range", HeaderValue::from_static("0-9/*"));
        assert_eq!(parse_count_from_headers(&headers), None);
    }

    #[test]
    fn count_missing_without_header() {
        assert_eq!(parse_count_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn remote_error_from_json_body() {
        let err = parse_remote_error(
            409,
            r#"{"message":"duplicate key value","code":"23505","details":null}"#,
        );
        match err {
            RestError::Remote {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate key value");
                assert_eq!(code.as_deref(), Some("23505"));
            }
            other => panic!("Expected Remote variant, got: {:?}", other),
        }
    }

    #[test]
    fn remote_error_from_plain_text_body() {
        let err = parse_remote_error(502, "bad gateway");
        match err {
            RestError::Remote {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
                assert!(code.is_none());
            }
            other => panic!("Expected Remote variant, got: {:?}", other),
        }
    }
}
