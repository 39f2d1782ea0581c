//! In-memory stand-in for the invoice items API
//!
//! Implements `Transport` by interpreting the encoded form params the same
//! way the server does, so tests exercise the real encoding and decoding
//! paths without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use stripe_resource::{Client, Error, FormParams, Method, RequestOptions, Result, Transport};

const PATH: &str = "/v1/invoiceitems";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub params: FormParams,
}

#[derive(Default)]
struct State {
    /// Insertion order == creation order
    items: Vec<Value>,
    next_id: u64,
    clock: i64,
    finalized_invoices: HashSet<String>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> Client {
        Client::with_transport(self.clone())
    }

    /// Items on this invoice become immutable
    pub fn finalize_invoice(&self, invoice: &str) {
        self.state
            .lock()
            .unwrap()
            .finalized_invoices
            .insert(invoice.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        _options: &RequestOptions,
    ) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            params: params.clone(),
        });

        let id = path
            .strip_prefix(PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|raw| urlencoding::decode(raw).unwrap().into_owned());

        match (method, id) {
            (Method::Post, None) => state.create(&params),
            (Method::Get, None) => state.list(&params),
            (Method::Get, Some(id)) => state.find(&id).cloned(),
            (Method::Post, Some(id)) => state.update(&id, &params),
            (Method::Delete, Some(id)) => state.delete(&id),
            (Method::Delete, None) => Err(api_error(404, "resource_missing", "Unrecognized request URL", None)),
        }
    }
}

fn api_error(status: u16, code: &str, message: &str, param: Option<&str>) -> Error {
    let body = json!({
        "error": {
            "type": "invalid_request_error",
            "code": code,
            "message": message,
            "param": param,
        }
    });
    Error::from_response(status, &body.to_string())
}

fn missing(id: &str) -> Error {
    api_error(
        404,
        "resource_missing",
        &format!("No such invoiceitem: '{}'", id),
        Some("id"),
    )
}

fn invalid(param: &str, message: &str) -> Error {
    api_error(400, "parameter_invalid", message, Some(param))
}

fn parse_int(params: &FormParams, key: &str) -> Result<Option<i64>> {
    params
        .get(key)
        .map(|raw| raw.parse::<i64>().map_err(|_| invalid(key, "Invalid integer")))
        .transpose()
}

fn parse_bool(params: &FormParams, key: &str) -> Result<Option<bool>> {
    params
        .get(key)
        .map(|raw| match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid(key, "Invalid boolean")),
        })
        .transpose()
}

/// `prefix[sub]=value` pairs, keyed by `sub`
fn nested(params: &FormParams, prefix: &str) -> BTreeMap<String, String> {
    let open = format!("{}[", prefix);
    params
        .iter()
        .filter_map(|(k, v)| {
            k.strip_prefix(open.as_str())
                .and_then(|rest| rest.strip_suffix(']'))
                .map(|sub| (sub.to_string(), v.to_string()))
        })
        .collect()
}

fn tax_rate(id: &str) -> Value {
    json!({
        "id": id,
        "object": "tax_rate",
        "active": true,
        "display_name": "Sales tax",
        "inclusive": false,
        "percentage": 8.25,
    })
}

fn period_from(params: &FormParams) -> Result<Option<Value>> {
    let period = nested(params, "period");
    if period.is_empty() {
        return Ok(None);
    }
    let start = period
        .get("start")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| invalid("period[start]", "Missing period start"))?;
    let end = period
        .get("end")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| invalid("period[end]", "Missing period end"))?;
    if end < start {
        return Err(invalid("period[end]", "Period end must be after start"));
    }
    Ok(Some(json!({"start": start, "end": end})))
}

/// Tax rates in params: `None` = untouched, `Some([])` = cleared
fn tax_rates_from(params: &FormParams) -> Option<Vec<Value>> {
    if params.get("tax_rates") == Some("") {
        return Some(Vec::new());
    }
    let rates = nested(params, "tax_rates");
    if rates.is_empty() {
        return None;
    }
    let mut indexed: Vec<(usize, String)> = rates
        .into_iter()
        .filter_map(|(idx, id)| idx.parse().ok().map(|i| (i, id)))
        .collect();
    indexed.sort();
    Some(indexed.into_iter().map(|(_, id)| tax_rate(&id)).collect())
}

fn apply_metadata(item: &mut Map<String, Value>, params: &FormParams) {
    let updates = nested(params, "metadata");
    let metadata = item
        .entry("metadata")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .unwrap();
    for (key, value) in updates {
        if value.is_empty() {
            metadata.remove(&key);
        } else {
            metadata.insert(key, Value::String(value));
        }
    }
}

fn recompute_amount(item: &mut Map<String, Value>) {
    let quantity = item["quantity"].as_i64().unwrap_or(1);
    if let Some(unit) = item["unit_amount"].as_i64() {
        item.insert("amount".into(), json!(unit * quantity));
    } else if let Some(decimal) = item["unit_amount_decimal"].as_str() {
        let unit: f64 = decimal.parse().unwrap_or(0.0);
        item.insert("amount".into(), json!((unit * quantity as f64).round() as i64));
    }
}

impl State {
    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item["id"] == id)
    }

    fn find(&self, id: &str) -> Result<&Value> {
        self.position(id)
            .map(|idx| &self.items[idx])
            .ok_or_else(|| missing(id))
    }

    fn ensure_mutable(&self, item: &Value) -> Result<()> {
        if let Some(invoice) = item["invoice"].as_str() {
            if self.finalized_invoices.contains(invoice) {
                return Err(api_error(
                    400,
                    "invoice_not_editable",
                    "The invoice this item belongs to is no longer editable",
                    None,
                ));
            }
        }
        Ok(())
    }

    fn create(&mut self, params: &FormParams) -> Result<Value> {
        let currency = params
            .get("currency")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| api_error(400, "parameter_missing", "Missing required param: currency.", Some("currency")))?;
        let customer = params
            .get("customer")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| api_error(400, "parameter_missing", "Missing required param: customer.", Some("customer")))?;

        let amount = parse_int(params, "amount")?;
        let unit_amount = parse_int(params, "unit_amount")?;
        let unit_amount_decimal = params.get("unit_amount_decimal").map(str::to_string);
        let quantity = parse_int(params, "quantity")?.unwrap_or(1);

        if quantity < 0 {
            return Err(invalid("quantity", "Quantity must be non-negative"));
        }
        if unit_amount.is_some() && unit_amount_decimal.is_some() {
            return Err(invalid(
                "unit_amount_decimal",
                "Only one of unit_amount and unit_amount_decimal can be set",
            ));
        }
        if amount.is_some() && (unit_amount.is_some() || unit_amount_decimal.is_some()) {
            return Err(invalid("amount", "amount cannot be combined with unit_amount"));
        }
        if amount.is_none() && unit_amount.is_none() && unit_amount_decimal.is_none() {
            return Err(api_error(400, "parameter_missing", "Missing required param: amount.", Some("amount")));
        }

        self.next_id += 1;
        self.clock += 1;
        let date = 1_577_836_800 + self.clock;

        // A bare `amount` is a single unit of that amount
        let (unit_amount, quantity) = match amount {
            Some(a) => (Some(a), 1),
            None => (unit_amount, quantity),
        };
        let unit_amount_decimal = unit_amount_decimal.or_else(|| unit_amount.map(|u| u.to_string()));

        let mut item = Map::new();
        item.insert("id".into(), json!(format!("ii_{:04}", self.next_id)));
        item.insert("object".into(), json!("invoiceitem"));
        item.insert("amount".into(), json!(0));
        item.insert("currency".into(), json!(currency));
        item.insert("customer".into(), json!(customer));
        item.insert("date".into(), json!(date));
        item.insert("description".into(), json!(params.get("description")));
        item.insert(
            "discountable".into(),
            json!(parse_bool(params, "discountable")?.unwrap_or(true)),
        );
        item.insert("invoice".into(), json!(params.get("invoice")));
        item.insert("livemode".into(), json!(false));
        item.insert("metadata".into(), json!({}));
        item.insert(
            "period".into(),
            period_from(params)?.unwrap_or_else(|| json!({"start": date, "end": date})),
        );
        item.insert("plan".into(), Value::Null);
        item.insert("proration".into(), json!(false));
        item.insert("quantity".into(), json!(quantity));
        item.insert("subscription".into(), json!(params.get("subscription")));
        item.insert(
            "tax_rates".into(),
            json!(tax_rates_from(params).unwrap_or_default()),
        );
        item.insert("unit_amount".into(), json!(unit_amount));
        item.insert("unit_amount_decimal".into(), json!(unit_amount_decimal));
        apply_metadata(&mut item, params);
        recompute_amount(&mut item);

        let item = Value::Object(item);
        self.items.push(item.clone());
        Ok(item)
    }

    fn update(&mut self, id: &str, params: &FormParams) -> Result<Value> {
        let idx = self.position(id).ok_or_else(|| missing(id))?;
        self.ensure_mutable(&self.items[idx])?;

        let amount = parse_int(params, "amount")?;
        let unit_amount = parse_int(params, "unit_amount")?;
        let quantity = parse_int(params, "quantity")?;
        let discountable = parse_bool(params, "discountable")?;
        let period = period_from(params)?;
        let tax_rates = tax_rates_from(params);

        if unit_amount.is_some() && params.contains_key("unit_amount_decimal") {
            return Err(invalid(
                "unit_amount_decimal",
                "Only one of unit_amount and unit_amount_decimal can be set",
            ));
        }

        let item = self.items[idx].as_object_mut().unwrap();

        if let Some(description) = params.get("description") {
            item.insert("description".into(), json!(description));
        }
        if let Some(discountable) = discountable {
            item.insert("discountable".into(), json!(discountable));
        }
        if let Some(period) = period {
            item.insert("period".into(), period);
        }
        if let Some(rates) = tax_rates {
            item.insert("tax_rates".into(), json!(rates));
        }
        apply_metadata(item, params);

        let pricing_changed = amount.is_some()
            || unit_amount.is_some()
            || quantity.is_some()
            || params.contains_key("unit_amount_decimal");
        if let Some(amount) = amount {
            item.insert("unit_amount".into(), json!(amount));
            item.insert("unit_amount_decimal".into(), json!(amount.to_string()));
            item.insert("quantity".into(), json!(1));
        }
        if let Some(unit) = unit_amount {
            item.insert("unit_amount".into(), json!(unit));
            item.insert("unit_amount_decimal".into(), json!(unit.to_string()));
        }
        if let Some(decimal) = params.get("unit_amount_decimal") {
            item.insert("unit_amount".into(), Value::Null);
            item.insert("unit_amount_decimal".into(), json!(decimal));
        }
        if let Some(quantity) = quantity {
            item.insert("quantity".into(), json!(quantity));
        }
        if pricing_changed {
            recompute_amount(item);
        }

        Ok(self.items[idx].clone())
    }

    fn delete(&mut self, id: &str) -> Result<Value> {
        let idx = self.position(id).ok_or_else(|| missing(id))?;
        self.ensure_mutable(&self.items[idx])?;
        self.items.remove(idx);
        Ok(json!({"id": id, "object": "invoiceitem", "deleted": true}))
    }

    fn list(&self, params: &FormParams) -> Result<Value> {
        let limit = parse_int(params, "limit")?.unwrap_or(10);
        if !(1..=100).contains(&limit) {
            return Err(invalid("limit", "Limit must be between 1 and 100"));
        }
        let limit = limit as usize;

        let customer = params.get("customer");
        let invoice = params.get("invoice");
        let pending = parse_bool(params, "pending")?;
        let created = nested(params, "created");
        let created_exact = parse_int(params, "created")?;

        // Newest first
        let matching: Vec<&Value> = self
            .items
            .iter()
            .rev()
            .filter(|item| customer.map_or(true, |c| item["customer"] == c))
            .filter(|item| invoice.map_or(true, |i| item["invoice"] == i))
            .filter(|item| pending.map_or(true, |p| item["invoice"].is_null() == p))
            .filter(|item| {
                let date = item["date"].as_i64().unwrap_or_default();
                let bound = |key: &str| created.get(key).and_then(|v| v.parse::<i64>().ok());
                created_exact.map_or(true, |t| date == t)
                    && bound("gt").map_or(true, |t| date > t)
                    && bound("gte").map_or(true, |t| date >= t)
                    && bound("lt").map_or(true, |t| date < t)
                    && bound("lte").map_or(true, |t| date <= t)
            })
            .collect();

        let cursor_position = |cursor: &str| -> Result<usize> {
            matching
                .iter()
                .position(|item| item["id"] == cursor)
                .ok_or_else(|| missing(cursor))
        };

        let (page, has_more): (Vec<&Value>, bool) =
            if let Some(cursor) = params.get("starting_after") {
                let rest = &matching[cursor_position(cursor)? + 1..];
                (rest.iter().take(limit).copied().collect(), rest.len() > limit)
            } else if let Some(cursor) = params.get("ending_before") {
                let before = &matching[..cursor_position(cursor)?];
                let start = before.len().saturating_sub(limit);
                (before[start..].to_vec(), start > 0)
            } else {
                (matching.iter().take(limit).copied().collect(), matching.len() > limit)
            };

        Ok(json!({
            "object": "list",
            "data": page,
            "has_more": has_more,
            "url": PATH,
        }))
    }
}
