//! Firestore REST backend.
//!
//! Documents live in the `events` collection with every event field stored
//! as a string value and the document name carrying the id. The REST API
//! has no push channel, so subscriptions poll and only emit when the remote
//! set differs from the last snapshot sent.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::{BackendConfig, DocumentStore, Subscription, snapshot_channel, sort_by_start};
use crate::constants::BACKEND_COLLECTION;
use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";

#[derive(Clone)]
pub struct FirestoreBackend {
    client: reqwest::Client,
    project_id: String,
    api_key: String,
    poll_interval: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Value>,
    next_page_token: Option<String>,
}

impl FirestoreBackend {
    pub fn new(config: &BackendConfig, poll_interval: Duration) -> CalendarResult<Self> {
        let (Some(api_key), Some(project_id)) = (&config.api_key, &config.project_id) else {
            return Err(CalendarError::BackendNotEnabled);
        };

        let client = reqwest::Client::builder()
            .user_agent(format!("twacal/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(FirestoreBackend {
            client,
            project_id: project_id.clone(),
            api_key: api_key.clone(),
            poll_interval,
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_API, self.project_id, BACKEND_COLLECTION
        )
    }

    /// Every document in the collection, ordered by start.
    pub async fn list(&self) -> CalendarResult<Vec<Event>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.collection_url())
                .query(&[("key", self.api_key.as_str()), ("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(CalendarError::Backend(format!(
                    "listing documents failed (HTTP {})",
                    response.status()
                )));
            }

            let page: ListResponse = response.json().await?;
            events.extend(page.documents.iter().filter_map(event_from_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        sort_by_start(&mut events);
        Ok(events)
    }
}

impl DocumentStore for FirestoreBackend {
    async fn subscribe(&self) -> CalendarResult<Subscription> {
        let backend = self.clone();
        let (tx, rx) = snapshot_channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(backend.poll_interval);
            let mut last: Option<Vec<Event>> = None;

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }

                match backend.list().await {
                    Ok(snapshot) => {
                        if last.as_ref() == Some(&snapshot) {
                            continue;
                        }
                        debug!(count = snapshot.len(), "backend snapshot changed");
                        if tx.send(snapshot.clone()).await.is_err() {
                            break;
                        }
                        last = Some(snapshot);
                    }
                    Err(e) => warn!("backend poll failed: {e}"),
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }

    async fn add_document(&self, event: &Event) -> CalendarResult<String> {
        let response = self
            .client
            .post(self.collection_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "fields": event_to_fields(event)? }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CalendarError::Backend(format!(
                "adding document failed (HTTP {})",
                response.status()
            )));
        }

        let created: Value = response.json().await?;
        document_id(&created)
            .map(String::from)
            .ok_or_else(|| CalendarError::Backend("created document has no name".into()))
    }

    async fn delete_document(&self, id: &str) -> CalendarResult<()> {
        let url = format!("{}/{}", self.collection_url(), id);
        let response = self
            .client
            .delete(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CalendarError::Backend(format!(
                "deleting document {id} failed (HTTP {})",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Encode an event as Firestore fields. The id is left out; it belongs to
/// the document name.
fn event_to_fields(event: &Event) -> CalendarResult<Map<String, Value>> {
    let Value::Object(mut object) =
        serde_json::to_value(event).map_err(|e| CalendarError::Serialization(e.to_string()))?
    else {
        return Err(CalendarError::Serialization("event is not an object".into()));
    };
    object.remove("id");

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, json!({ "stringValue": text }))
        })
        .collect())
}

/// Last segment of `projects/.../documents/events/<id>`.
fn document_id(document: &Value) -> Option<&str> {
    document
        .get("name")?
        .as_str()?
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

/// Decode a Firestore document. Scalar values of any type are read as
/// text; maps and arrays are ignored.
fn event_from_document(document: &Value) -> Option<Event> {
    let id = document_id(document)?;

    let mut object = Map::new();
    if let Some(fields) = document.get("fields").and_then(Value::as_object) {
        for (key, typed) in fields {
            if let Some(value) = scalar_value(typed) {
                object.insert(key.clone(), value);
            }
        }
    }
    object.insert("id".into(), Value::String(id.to_string()));

    match serde_json::from_value(Value::Object(object)) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("skipping backend document {id}: {e}");
            None
        }
    }
}

fn scalar_value(typed: &Value) -> Option<Value> {
    let (kind, value) = typed.as_object()?.iter().next()?;
    match kind.as_str() {
        "stringValue" | "integerValue" | "timestampValue" | "doubleValue" | "booleanValue" => {
            Some(value.clone())
        }
        "nullValue" => Some(Value::Null),
        _ => None,
    }
}
