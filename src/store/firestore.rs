//! Firestore REST document store
//!
//! Reads use `GET` on the document resource. Writes go through `:commit` with
//! an update mask listing every `area.slot` field path, which gives merge
//! semantics: masked fields are written, all other fields of an existing
//! document are left alone.

use super::{DocumentStore, StoreError};
use crate::config::StoreConfig;
use crate::price::{AreaPrices, PriceDocument, COLLECTION};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Firestore client for the price collection
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.firestore_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    /// Full resource name of a document
    fn document_name(&self, id: &str) -> String {
        format!("{}/documents/{}/{}", self.database_path(), COLLECTION, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, id: &str) -> Result<Option<PriceDocument>, StoreError> {
        let url = format!("{}/{}", self.base_url, self.document_name(id));
        let response = self.authorize(self.client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let body: Value = response.json().await?;
        let fields = match body.get("fields") {
            Some(Value::Object(fields)) => fields.clone(),
            Some(_) => return Err(StoreError::Decode("fields is not an object".into())),
            None => Map::new(),
        };
        Ok(Some(decode_fields(&fields)))
    }

    async fn merge(&self, id: &str, doc: &PriceDocument) -> Result<(), StoreError> {
        let url = format!("{}/{}/documents:commit", self.base_url, self.database_path());
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(id),
                    "fields": encode_fields(doc),
                },
                "updateMask": { "fieldPaths": field_paths(doc) },
            }]
        });

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        tracing::debug!(document = %id, areas = doc.len(), "Committed price document");
        Ok(())
    }
}

/// Encode a document as Firestore typed fields
pub(crate) fn encode_fields(doc: &PriceDocument) -> Value {
    let fields: Map<String, Value> = doc
        .iter()
        .map(|(area, prices)| {
            let slots: Map<String, Value> = prices
                .iter()
                .map(|(time, price)| (time.clone(), json!({ "doubleValue": price })))
                .collect();
            (area.clone(), json!({ "mapValue": { "fields": slots } }))
        })
        .collect();
    Value::Object(fields)
}

/// Decode Firestore typed fields, skipping fields that are not price maps
pub(crate) fn decode_fields(fields: &Map<String, Value>) -> PriceDocument {
    let mut doc = PriceDocument::new();
    for (area, value) in fields {
        let Some(slots) = value
            .get("mapValue")
            .and_then(|m| m.get("fields"))
            .and_then(Value::as_object)
        else {
            // an empty map comes back without "fields"
            if value.get("mapValue").is_some() {
                doc.insert_area(area.clone(), AreaPrices::new());
            } else {
                tracing::warn!(field = %area, "Skipping non-map document field");
            }
            continue;
        };

        let mut prices = AreaPrices::new();
        for (time, price) in slots {
            match decode_number(price) {
                Some(price) => {
                    prices.insert(time.clone(), price);
                }
                None => tracing::warn!(field = %area, slot = %time, "Skipping non-numeric price"),
            }
        }
        doc.insert_area(area.clone(), prices);
    }
    doc
}

fn decode_number(value: &Value) -> Option<f64> {
    if let Some(v) = value.get("doubleValue") {
        return v.as_f64();
    }
    // int64 values are transported as strings
    let integer = match value.get("integerValue")? {
        Value::String(s) => s.parse::<i64>().ok()?,
        other => other.as_i64()?,
    };
    Some(integer as f64)
}

/// Update mask paths for every slot in the document
pub(crate) fn field_paths(doc: &PriceDocument) -> Vec<String> {
    doc.iter()
        .flat_map(|(area, prices)| {
            let area = quote_segment(area);
            prices
                .keys()
                .map(move |time| format!("{}.{}", area, quote_segment(time)))
        })
        .collect()
}

/// Quote a field path segment unless it is a simple identifier
fn quote_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        segment.to_string()
    } else {
        format!("`{}`", segment.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
