#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use chrono::{DateTime, Utc};
#[cfg(test)]
use serde_json::Value;

#[cfg(test)]
use crate::features::incidents::services::{BundleImporter, Clock};

/// Clock frozen at a given instant
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Repository stand-in that always answers the same way and records what it got
#[cfg(test)]
pub struct StubImporter {
    outcome: Result<Value, String>,
    received: Mutex<Vec<String>>,
}

#[cfg(test)]
impl StubImporter {
    pub fn succeeding(result: Value) -> Self {
        Self {
            outcome: Ok(result),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Bundles received so far, as serialized JSON
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl BundleImporter for StubImporter {
    async fn import_bundle(&self, bundle_json: String) -> anyhow::Result<Value> {
        self.received.lock().unwrap().push(bundle_json);
        match &self.outcome {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}
