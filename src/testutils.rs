/// Test doubles shared across module tests
use crate::clients::SpaceDataApi;
use crate::domain::{RequestParams, Rover};
use crate::errors::{QueryError, QueryResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Canned upstream that records every call
#[derive(Default)]
pub struct FakeApi {
    /// Shared so callers can inspect it after handing the fake away
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<u16>,
}

impl FakeApi {
    fn record(&self, call: String) -> QueryResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some(status) => Err(QueryError::Upstream {
                status: Some(status),
                message: format!("HTTP {}", status),
                body: Some(json!({"error": {"code": "API_KEY_INVALID"}})),
            }),
            None => Ok(()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpaceDataApi for FakeApi {
    async fn apod(&self, params: &RequestParams) -> QueryResult<Value> {
        self.record(format!("apod {} {}", params.api_key, params.date_str()))?;
        Ok(json!({
            "title": "Pillars",
            "date": params.date_str(),
            "explanation": "Gas and dust.",
            "url": "https://apod.nasa.gov/pillars.jpg",
            "media_type": "image"
        }))
    }

    async fn mars_photos(&self, params: &RequestParams, rover: Rover) -> QueryResult<Value> {
        self.record(format!("mars {} {}", rover, params.date_str()))?;
        let photos: Vec<Value> = (0..7)
            .map(|i| json!({"id": i, "img_src": format!("https://mars/{}.jpg", i)}))
            .collect();
        Ok(json!({ "photos": photos }))
    }

    async fn earth_assets(
        &self,
        params: &RequestParams,
        lat: &str,
        lon: &str,
    ) -> QueryResult<Value> {
        self.record(format!("earth {} {} {}", lat, lon, params.date_str()))?;
        Ok(json!({"url": "https://earth/tile.png"}))
    }

    async fn neo_feed(&self, params: &RequestParams) -> QueryResult<Value> {
        self.record(format!("neo {}", params.date_str()))?;
        Ok(json!({"near_earth_objects": {"1999-01-01": []}}))
    }

    async fn donki_flares(&self, params: &RequestParams) -> QueryResult<Value> {
        self.record(format!("flr {}", params.date_str()))?;
        Ok(json!([{"classType": "X1.0"}]))
    }

    async fn donki_cmes(&self, params: &RequestParams) -> QueryResult<Value> {
        self.record(format!("cme {}", params.date_str()))?;
        Ok(Value::Null)
    }
}

/// In-memory log sink usable as a tracing `MakeWriter`
#[derive(Clone, Default)]
pub struct CapturedLog(pub Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
