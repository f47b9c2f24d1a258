use crate::error::RestError;

/// Response envelope following the `{ data, error, count, status }` pattern.
///
/// Primitives never fail on their own: whatever the executor produced
/// (rows, an empty 204, a remote error body) travels in this envelope, and
/// callers branch on `error` rather than inspecting value shapes.
#[derive(Debug)]
pub struct RestResponse<T> {
    /// Returned rows (empty on error or no-content).
    pub data: Vec<T>,
    /// Error, if any.
    pub error: Option<RestError>,
    /// Row count from the `Content-Range` header, when the server sent one.
    pub count: Option<i64>,
    /// HTTP status of the exchange; `None` when the request never completed.
    pub status: Option<u16>,
}

impl<T> RestResponse<T> {
    /// Create a successful response with data.
    pub fn ok(data: Vec<T>, status: u16) -> Self {
        Self {
            data,
            error: None,
            count: None,
            status: Some(status),
        }
    }

    /// Create an empty success response (204, or a body-less reply).
    pub fn no_content(status: u16) -> Self {
        Self {
            data: Vec::new(),
            error: None,
            count: None,
            status: Some(status),
        }
    }

    /// Create an error response. Remote errors keep their status code.
    pub fn error(err: RestError) -> Self {
        let status = err.status();
        Self {
            data: Vec::new(),
            error: Some(err),
            count: None,
            status,
        }
    }

    /// Attach a count parsed from response headers.
    pub fn with_count(mut self, count: Option<i64>) -> Self {
        self.count = count;
        self
    }

    /// Check if the response is successful.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the response carries an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a Result, consuming the response.
    pub fn into_result(self) -> Result<Vec<T>, RestError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }

    /// Get the first row, or None if empty.
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// Consume and return the first row, or None if empty; errors propagate.
    pub fn into_first(self) -> Result<Option<T>, RestError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data.into_iter().next()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response() {
        let resp = RestResponse::ok(vec![1, 2, 3], 200);
        assert!(resp.is_ok());
        assert_eq!(resp.status, Some(200));
        assert_eq!(resp.first(), Some(&1));
        assert_eq!(resp.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn no_content_response() {
        let resp = RestResponse::<i32>::no_content(204);
        assert!(resp.is_ok());
        assert!(resp.data.is_empty());
        assert_eq!(resp.status, Some(204));
    }

    #[test]
    fn error_response_keeps_remote_status() {
        let resp = RestResponse::<i32>::error(RestError::remote(404, "not found", None));
        assert!(resp.is_err());
        assert_eq!(resp.status, Some(404));
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn error_response_without_status() {
        let resp = RestResponse::<i32>::error(RestError::decode("garbage"));
        assert!(resp.is_err());
        assert_eq!(resp.status, None);
    }

    #[test]
    fn into_first_returns_first_row() {
        let resp = RestResponse::ok(vec!["a", "b"], 200);
        assert_eq!(resp.into_first().unwrap(), Some("a"));
    }

    #[test]
    fn into_first_empty_is_none() {
        let resp = RestResponse::<&str>::ok(Vec::new(), 200);
        assert_eq!(resp.into_first().unwrap(), None);
    }

    #[test]
    fn into_first_propagates_error() {
        let resp = RestResponse::<i32>::error(RestError::remote(500, "boom", None));
        assert!(resp.into_first().is_err());
    }

    #[test]
    fn with_count_attaches_count() {
        let resp = RestResponse::<i32>::no_content(200).with_count(Some(42));
        assert_eq!(resp.count, Some(42));
    }
}
