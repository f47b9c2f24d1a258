use serde_json::Value as JsonValue;

use pgrest_client_core::Record;

/// An insertion-ordered set of `(column, operator, value)` filter clauses.
///
/// Operators are passed through verbatim: `eq`, `in`, or any other
/// PostgREST operator name. Nothing is validated locally; the remote API is
/// the sole arbiter of operator and column correctness.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    clauses: Vec<(String, String, JsonValue)>,
}

impl Filters {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause with an arbitrary PostgREST operator.
    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        self.clauses.push((column.into(), op.into(), value.into()));
        self
    }

    /// Add an exact-match (`eq`) clause.
    pub fn eq(self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filter(column, "eq", value)
    }

    /// Add an `in` clause; the values render as a parenthesized list.
    pub fn in_list(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<JsonValue>>,
    ) -> Self {
        let list: Vec<JsonValue> = values.into_iter().map(Into::into).collect();
        self.filter(column, "in", JsonValue::Array(list))
    }

    /// Convert a match record into one `eq` clause per column, in record order.
    pub fn from_match(matches: &Record) -> Self {
        let mut filters = Self::new();
        for (column, value) in matches.iter() {
            filters = filters.filter(column.clone(), "eq", value.clone());
        }
        filters
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Check if there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Auxiliary query directives: `order`, `limit`, `offset`, or any other key.
///
/// `order` is always emitted first among the extras; everything else follows
/// in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Extras {
    order: Option<String>,
    rest: Vec<(String, String)>,
}

impl Extras {
    /// Create an empty set of directives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `order` directive (e.g. `"name.asc"`).
    pub fn order(mut self, value: impl Into<String>) -> Self {
        self.order = Some(value.into());
        self
    }

    /// Set a `limit` directive.
    pub fn limit(self, n: u64) -> Self {
        self.set("limit", n.to_string())
    }

    /// Set an `offset` directive.
    pub fn offset(self, n: u64) -> Self {
        self.set("offset", n.to_string())
    }

    /// Set an arbitrary `key=value` directive.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.rest.push((key.into(), value.into()));
        self
    }

    /// Check if no directive is set.
    pub fn is_empty(&self) -> bool {
        self.order.is_none() && self.rest.is_empty()
    }
}

/// Encode a SELECT query string: `select=`, then filters, then extras.
///
/// Only the `op.value` segment and directive values are percent-encoded;
/// column names and directive keys pass through verbatim. Elements of an
/// `in` list are comma-joined without escaping, so values containing commas
/// or parentheses are not safely representable.
///
/// The output has no leading `?` and preserves the caller's insertion order.
pub fn encode_select(columns: &str, filters: &Filters, extras: &Extras) -> String {
    let mut params = vec![format!("select={}", urlencoding::encode(columns))];
    push_filters(&mut params, filters);

    if let Some(ref order) = extras.order {
        params.push(format!("order={}", urlencoding::encode(order)));
    }
    for (key, value) in &extras.rest {
        params.push(format!("{}={}", key, urlencoding::encode(value)));
    }

    params.join("&")
}

/// Encode the filter clauses alone; used for update/delete match queries.
pub(crate) fn encode_filters(filters: &Filters) -> String {
    let mut params = Vec::new();
    push_filters(&mut params, filters);
    params.join("&")
}

fn push_filters(params: &mut Vec<String>, filters: &Filters) {
    for (column, op, value) in &filters.clauses {
        let rendered = render_value(op, value);
        let segment = format!("{}.{}", op, rendered);
        params.push(format!("{}={}", column, urlencoding::encode(&segment)));
    }
}

/// Render a filter value as its PostgREST string form.
fn render_value(op: &str, value: &JsonValue) -> String {
    match value {
        JsonValue::Array(items) if op == "in" => {
            let joined = items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join(",");
            format!("({})", joined)
        }
        other => render_scalar(other),
    }
}

fn render_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
