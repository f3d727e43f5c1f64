//! Response shape resolvers
//!
//! The order-history endpoint does not return one stable envelope. Each
//! resolver recognizes one known shape and extracts the orders from it; the
//! first matching resolver wins.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::RawOrder;

/// A known response envelope
pub trait ShapeResolver: Send + Sync {
    /// Resolver name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether `body` has this resolver's shape
    fn matches(&self, body: &Value) -> bool;

    /// Orders contained in a matching `body`
    fn extract(&self, body: &Value) -> Vec<RawOrder>;
}

/// `{"entities": {"ORDER": {"<id>": {...}, ...}}}`
pub struct EntitiesOrderResolver;

impl ShapeResolver for EntitiesOrderResolver {
    fn name(&self) -> &'static str {
        "entities.ORDER"
    }

    fn matches(&self, body: &Value) -> bool {
        body.pointer("/entities/ORDER")
            .is_some_and(|orders| orders.is_object() || orders.is_array())
    }

    fn extract(&self, body: &Value) -> Vec<RawOrder> {
        match body.pointer("/entities/ORDER") {
            Some(Value::Object(map)) => map.values().cloned().map(RawOrder::new).collect(),
            Some(Value::Array(items)) => items.iter().cloned().map(RawOrder::new).collect(),
            _ => Vec::new(),
        }
    }
}

/// `{"sections": ...}` without a recognized order list. Seen in some
/// contexts; treated as an empty page, not a failure.
pub struct SectionsResolver;

impl ShapeResolver for SectionsResolver {
    fn name(&self) -> &'static str {
        "sections"
    }

    fn matches(&self, body: &Value) -> bool {
        body.get("sections").is_some()
    }

    fn extract(&self, body: &Value) -> Vec<RawOrder> {
        let keys: Vec<&str> = body
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        warn!(?keys, "unexpected response structure 'sections', no order list found");
        Vec::new()
    }
}

/// Default resolver chain, highest priority first
pub fn default_resolvers() -> Vec<Box<dyn ShapeResolver>> {
    vec![Box::new(EntitiesOrderResolver), Box::new(SectionsResolver)]
}

/// Apply the first matching resolver. Unmatched bodies yield no orders.
pub fn resolve_orders(resolvers: &[Box<dyn ShapeResolver>], body: &Value) -> Vec<RawOrder> {
    match resolvers.iter().find(|r| r.matches(body)) {
        Some(resolver) => {
            let orders = resolver.extract(body);
            debug!(resolver = resolver.name(), orders = orders.len(), "resolved page");
            orders
        }
        None => {
            let kind = match body {
                Value::Null => "null",
                Value::Object(_) => "object",
                Value::Array(_) => "array",
                _ => "scalar",
            };
            debug!(kind, "no resolver matched response body");
            Vec::new()
        }
    }
}
