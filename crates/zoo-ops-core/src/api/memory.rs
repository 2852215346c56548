//! In-process implementation of the zoo API.
//!
//! Mirrors the backend's observable behaviour: server-assigned ids and
//! timestamps, collection ordering, `{success, id}` answers for alerts, and
//! automatic health alerts for logs submitted in poor condition. Every call
//! is recorded so tests can assert that validation short-circuits the network.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::debug;
use zoo_ops_ai::{MockSummarizer, MonitoringSummary};

use super::{ApiError, ApiResult, AudioObservation, ObservationSubmission, Upload, ZooApi};
use crate::models::Collection;

/// A recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List(Collection),
    Create(Collection),
    Update(Collection, String),
    Delete(Collection, String),
    ProcessText,
    ProcessAudio,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<Collection, Vec<Value>>,
    next_id: u64,
    animal_counter: u64,
    failing: HashSet<Collection>,
    fail_observation_processing: bool,
    calls: Vec<ApiCall>,
}

impl MemoryState {
    fn docs(&mut self, collection: Collection) -> &mut Vec<Value> {
        self.collections.entry(collection).or_default()
    }

    fn fresh_id(&mut self, collection: Collection) -> String {
        if collection == Collection::Animals {
            self.animal_counter += 1;
            return format!("A{:03}", self.animal_counter);
        }
        self.next_id += 1;
        format!("{}-{}", collection.path(), self.next_id)
    }

    fn check_failure(&self, collection: Collection) -> ApiResult<()> {
        if self.failing.contains(&collection) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{} unavailable", collection),
            });
        }
        Ok(())
    }

    fn animal_name(&mut self, animal_id: &str) -> String {
        self.docs(Collection::Animals)
            .iter()
            .find(|a| a["id"] == animal_id)
            .and_then(|a| a["name"].as_str())
            .unwrap_or("Unknown")
            .to_string()
    }
}

/// [`ZooApi`] backed by in-memory collections.
#[derive(Default)]
pub struct InMemoryZooApi {
    state: Mutex<MemoryState>,
}

impl InMemoryZooApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with the demo staff, animals and supplies.
    pub fn seeded() -> Self {
        let api = Self::new();
        let now = Utc::now();
        let hours_ago = |h: i64| (now - chrono::Duration::hours(h)).to_rfc3339();
        let days = |d: i64| (now + chrono::Duration::days(d)).format("%Y-%m-%d").to_string();

        api.insert(Collection::Users, json!({"id": "u1", "name": "Priya Sharma", "role": "admin"}));
        api.insert(Collection::Users, json!({"id": "u2", "name": "Rajesh Kumar", "role": "zookeeper"}));
        api.insert(Collection::Users, json!({"id": "u3", "name": "Dr. Anjali Verma", "role": "vet"}));
        api.insert(Collection::Users, json!({"id": "u4", "name": "Vikram Singh", "role": "officer"}));
        api.insert(Collection::Users, json!({"id": "u5", "name": "Sunita Devi", "role": "zookeeper"}));

        for animal in [
            json!({"id": "A001", "number": "001", "name": "Simba", "species": "Lion", "age": "5 years", "enclosure": "A-12", "health": "excellent", "assignedTo": "Rajesh Kumar"}),
            json!({"id": "A002", "number": "002", "name": "Raja", "species": "Bengal Tiger", "age": "8 years", "enclosure": "B-3", "health": "good", "assignedTo": "Sunita Devi"}),
            json!({"id": "A003", "number": "003", "name": "Moti", "species": "Elephant", "age": "15 years", "enclosure": "C-1", "health": "fair", "assignedTo": "Rajesh Kumar"}),
            json!({"id": "A004", "number": "004", "name": "Zara", "species": "Giraffe", "age": "7 years", "enclosure": "D-5", "health": "excellent", "assignedTo": "Sunita Devi"}),
        ] {
            api.insert(Collection::Animals, animal);
        }
        api.lock().animal_counter = 4;

        api.insert(Collection::Observations, json!({
            "id": "obs-1", "animalId": "A001", "submittedBy": "Rajesh Kumar",
            "createdAt": hours_ago(24), "healthStatus": "excellent",
            "moodPercentage": 85, "appetitePercentage": 90, "movementPercentage": 80,
            "injuriesText": "None observed.",
            "generalObservationText": "Simba was very playful today, especially with the new enrichment toy.",
            "sharedWith": ["u3"]
        }));
        api.insert(Collection::Alerts, json!({
            "id": "alert-1", "type": "sos", "animalName": "Simba",
            "message": "Emergency alert - Lion showing distress", "location": "Enclosure A-12",
            "status": "active", "createdAt": (now - chrono::Duration::minutes(5)).to_rfc3339(),
            "createdBy": "Rajesh Kumar"
        }));
        api.insert(Collection::Alerts, json!({
            "id": "alert-2", "type": "health", "animalName": "Raja",
            "message": "Health check due - Urgent attention needed", "location": "Enclosure B-3",
            "status": "active", "createdAt": hours_ago(2), "createdBy": "System"
        }));
        for record in [
            json!({"id": "feed-1", "animalId": "A001", "feedType": "Meat", "amount": "15 kg", "cost": 450, "status": "completed", "recordedAt": hours_ago(2), "recordedBy": "Vikram Singh"}),
            json!({"id": "feed-2", "animalId": "A002", "feedType": "Meat", "amount": "12 kg", "cost": 400, "status": "completed", "recordedAt": hours_ago(4), "recordedBy": "Vikram Singh"}),
            json!({"id": "feed-3", "animalId": "A003", "feedType": "Vegetables", "amount": "120 kg", "cost": 2400, "status": "pending", "recordedAt": hours_ago(6), "recordedBy": "System"}),
        ] {
            api.insert(Collection::FeedingRecords, record);
        }
        for item in [
            json!({"id": "inv-1", "name": "Raw Meat", "category": "food", "quantity": 150, "unit": "kg", "minThreshold": 50, "cost": 450, "lastRestocked": "2 days ago", "supplier": "Fresh Farms"}),
            json!({"id": "inv-2", "name": "Vegetables Mix", "category": "food", "quantity": 200, "unit": "kg", "minThreshold": 75, "cost": 120, "lastRestocked": "1 day ago", "supplier": "Green Harvest"}),
            json!({"id": "inv-3", "name": "Antibiotics (Amoxicillin)", "category": "medicine", "quantity": 25, "unit": "bottles", "minThreshold": 10, "cost": 1200, "lastRestocked": "1 week ago", "expiryDate": "2026-12-31", "supplier": "MediVet Supplies"}),
            json!({"id": "inv-4", "name": "Pain Relief (Ibuprofen)", "category": "medicine", "quantity": 8, "unit": "boxes", "minThreshold": 15, "cost": 800, "lastRestocked": "3 weeks ago", "expiryDate": "2026-06-30", "supplier": "MediVet Supplies"}),
        ] {
            api.insert(Collection::Inventory, item);
        }
        api.insert(Collection::Medications, json!({
            "id": "med-1", "animalId": "A003", "medicationName": "Pain Relief - Ibuprofen",
            "dosage": "200mg", "frequency": "As needed for limp",
            "startDate": days(-1), "endDate": days(6), "prescribedBy": "Dr. Anjali Verma",
            "purpose": "Joint pain management for observed limp.", "status": "active",
            "administrationLog": [], "notes": "Administer after meals. Monitor for improvement."
        }));
        api.insert(Collection::Tasks, json!({
            "id": "task-1", "title": "Deep clean enclosure A-12", "description": "Quarterly disinfection",
            "assignedTo": "Rajesh Kumar", "assignedBy": "Priya Sharma", "animalId": "A001",
            "priority": "high", "status": "pending", "dueDate": days(2),
            "createdAt": hours_ago(30), "comments": [], "attachments": []
        }));

        api.lock().calls.clear();
        api
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a document as-is, bypassing server defaults.
    pub fn insert(&self, collection: Collection, doc: Value) {
        self.lock().docs(collection).push(doc);
    }

    /// Current documents of a collection in insertion order.
    pub fn documents(&self, collection: Collection) -> Vec<Value> {
        self.lock().docs(collection).clone()
    }

    /// Make every call touching `collection` fail with a server error.
    pub fn fail_collection(&self, collection: Collection, failing: bool) {
        let mut state = self.lock();
        if failing {
            state.failing.insert(collection);
        } else {
            state.failing.remove(&collection);
        }
    }

    /// Make both observation processing endpoints fail.
    pub fn fail_observation_processing(&self, failing: bool) {
        self.lock().fail_observation_processing = failing;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn required_fields(collection: Collection) -> &'static [&'static str] {
        match collection {
            Collection::Animals => &["name", "species"],
            Collection::Users => &["name", "role"],
            Collection::Inventory => &["name", "category"],
            Collection::Medications => &["medicationName", "animalId"],
            Collection::Alerts => &["message", "type"],
            Collection::FeedingRecords => &["animalId", "feedType"],
            Collection::Tasks => &["title", "assignedTo"],
            Collection::Observations => &["animalId"],
        }
    }

    fn upload_url(file: &Upload) -> String {
        format!("memory://uploads/{}-{}", uuid::Uuid::new_v4(), file.file_name)
    }
}

fn sort_desc_by(docs: &mut [Value], key: &str) {
    docs.sort_by(|a, b| {
        let a = a[key].as_str().unwrap_or_default();
        let b = b[key].as_str().unwrap_or_default();
        b.cmp(a)
    });
}

fn missing_field(doc: &Value, field: &str) -> bool {
    match doc.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

#[async_trait]
impl ZooApi for InMemoryZooApi {
    async fn list(&self, collection: Collection) -> ApiResult<Vec<Value>> {
        let mut state = self.lock();
        state.calls.push(ApiCall::List(collection));
        state.check_failure(collection)?;

        let mut docs = state.docs(collection).clone();
        match collection {
            Collection::Observations | Collection::Alerts => sort_desc_by(&mut docs, "createdAt"),
            Collection::Medications => sort_desc_by(&mut docs, "startDate"),
            Collection::FeedingRecords => sort_desc_by(&mut docs, "recordedAt"),
            Collection::Inventory => docs.sort_by(|a, b| {
                a["name"].as_str().unwrap_or_default().cmp(b["name"].as_str().unwrap_or_default())
            }),
            _ => {}
        }
        debug!("[MemoryApi] list {} -> {} docs", collection, docs.len());
        Ok(docs)
    }

    async fn create(&self, collection: Collection, body: Value) -> ApiResult<Value> {
        let mut state = self.lock();
        state.calls.push(ApiCall::Create(collection));
        state.check_failure(collection)?;

        let mut doc = match body {
            Value::Object(map) => map,
            _ => {
                return Err(ApiError::Status {
                    status: 400,
                    message: format!("Missing required {} data", collection),
                })
            }
        };
        let as_value = Value::Object(doc.clone());
        if Self::required_fields(collection)
            .iter()
            .any(|f| missing_field(&as_value, f))
        {
            return Err(ApiError::Status {
                status: 400,
                message: format!("Missing required {} data", collection),
            });
        }

        let id = state.fresh_id(collection);
        let now = Utc::now().to_rfc3339();
        doc.insert("id".into(), Value::String(id.clone()));
        match collection {
            Collection::Animals => {
                let number = id.trim_start_matches('A').to_string();
                doc.insert("number".into(), Value::String(number));
            }
            Collection::Inventory => {
                doc.insert("lastRestocked".into(), Value::String(now));
            }
            Collection::Medications => {
                doc.insert("createdAt".into(), Value::String(now));
                doc.entry("administrationLog").or_insert_with(|| json!([]));
            }
            Collection::Alerts => {
                doc.insert("createdAt".into(), Value::String(now));
                doc.insert("status".into(), Value::String("active".into()));
            }
            Collection::FeedingRecords => {
                doc.insert("recordedAt".into(), Value::String(now));
            }
            Collection::Tasks => {
                doc.entry("createdAt").or_insert(Value::String(now));
            }
            Collection::Users | Collection::Observations => {}
        }

        let doc = Value::Object(doc);
        state.docs(collection).push(doc.clone());
        debug!("[MemoryApi] created {}/{}", collection, id);

        if collection == Collection::Alerts {
            return Ok(json!({"success": true, "id": id}));
        }
        Ok(doc)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> ApiResult<Value> {
        let mut state = self.lock();
        state.calls.push(ApiCall::Update(collection, id.to_string()));
        state.check_failure(collection)?;

        let fields = match &patch {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        let doc = state
            .docs(collection)
            .iter_mut()
            .find(|d| d["id"] == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("No document {}/{}", collection, id),
            })?;
        if let Value::Object(target) = doc {
            for (k, v) in fields {
                target.insert(k, v);
            }
        }
        Ok(json!({"success": true, "updated_data": patch}))
    }

    async fn delete(&self, collection: Collection, id: &str) -> ApiResult<()> {
        let mut state = self.lock();
        state.calls.push(ApiCall::Delete(collection, id.to_string()));
        state.check_failure(collection)?;
        state.docs(collection).retain(|d| d["id"] != id);
        Ok(())
    }

    async fn process_text_observation(&self, submission: ObservationSubmission) -> ApiResult<Value> {
        let mut state = self.lock();
        state.calls.push(ApiCall::ProcessText);
        if state.fail_observation_processing {
            return Err(ApiError::Status {
                status: 500,
                message: "AI processing failed".into(),
            });
        }

        let log = submission.log_data;
        if log.observation_text.trim().is_empty() {
            return Err(ApiError::Status {
                status: 400,
                message: "Missing observation text".into(),
            });
        }

        let mut data = match serde_json::to_value(&log)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Some(file) = &submission.gate_image {
            data.insert("gateImageUrl".into(), Value::String(Self::upload_url(file)));
        }
        if let Some(file) = &submission.animal_image {
            data.insert("imageUrl".into(), Value::String(Self::upload_url(file)));
        }
        if let Some(file) = &submission.animal_video {
            data.insert("videoUrl".into(), Value::String(Self::upload_url(file)));
        }

        let summary = MockSummarizer::summarize(&log.observation_text, &log.created_at);
        if let Value::Object(fields) = serde_json::to_value(&summary)? {
            data.extend(fields);
        }
        data.insert("observationText".into(), Value::String(log.observation_text.clone()));

        let animal_name = state.animal_name(&log.animal_id);
        if log.health_status == crate::models::HealthStatus::Poor {
            let alert_id = state.fresh_id(Collection::Alerts);
            state.docs(Collection::Alerts).push(json!({
                "id": alert_id,
                "type": "health",
                "animalName": animal_name,
                "animalId": log.animal_id,
                "message": format!("Health status marked as 'poor' for {}. Immediate attention required.", animal_name),
                "location": "N/A",
                "status": "active",
                "createdAt": Utc::now().to_rfc3339(),
                "createdBy": "System (Auto-generated)"
            }));
        }

        let obs_id = state.fresh_id(Collection::Observations);
        let mut stored = data.clone();
        stored.insert("id".into(), Value::String(obs_id));
        state.docs(Collection::Observations).push(Value::Object(stored));

        Ok(Value::Object(data))
    }

    async fn process_audio_observation(&self, request: AudioObservation) -> ApiResult<MonitoringSummary> {
        let mut state = self.lock();
        state.calls.push(ApiCall::ProcessAudio);
        if state.fail_observation_processing {
            return Err(ApiError::Status {
                status: 500,
                message: "Transcription failed".into(),
            });
        }
        if request.audio.bytes.is_empty() {
            return Err(ApiError::Status {
                status: 400,
                message: "No audio file provided".into(),
            });
        }
        if request.date.trim().is_empty() {
            return Err(ApiError::Status {
                status: 400,
                message: "Missing 'date' in request form data".into(),
            });
        }

        // No speech model here: audio bytes are read back as the transcript.
        let transcript = String::from_utf8_lossy(&request.audio.bytes);
        let text = format!("{}{}", request.prefix, transcript.trim());
        Ok(MockSummarizer::summarize(&text, &request.date))
    }
}
