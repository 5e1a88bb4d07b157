//! The data model shared by the store, the ranch state machine and the
//! reconciler: resources, dynamic resource life cycles (DRLCs), the
//! declarative configuration they are reconciled against, and the metrics
//! the ranch reports per resource type.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A leasable thing: a VM, a cluster, an API key, anything the ranch hands
/// out to exactly one owner at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub state: String,
    /// Empty string means unowned.
    #[serde(default)]
    pub owner: String,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub user_data: HashMap<String, String>,
    /// Set by the reconciler from the owning DRLC's lifespan on first
    /// release; governs eligibility for `update_all_dynamic_resources`'s
    /// expiry sweep.
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(name: impl Into<String>, rtype: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rtype: rtype.into(),
            state: state.into(),
            owner: String::new(),
            last_update: Utc::now(),
            user_data: HashMap::new(),
            expiration_date: None,
        }
    }
}

/// The policy governing a dynamically managed resource type: how many to
/// keep around, and how long a leased instance lives before it is
/// considered for recycling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drlc {
    #[serde(rename = "type")]
    pub rtype: String,
    pub min_count: u32,
    pub max_count: u32,
    #[serde(with = "humantime_serde_option", default)]
    pub lifespan: Option<Duration>,
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    /// Opaque requirements blob (e.g. machine shape, image) a dynamic
    /// resource's backing infrastructure must satisfy; passed through
    /// unexamined by the ranch.
    #[serde(default)]
    pub needs: Option<serde_json::Value>,
}

impl Drlc {
    pub fn initial_state(&self) -> &str {
        self.initial_state.as_deref().unwrap_or("free")
    }
}

/// One line of the declarative configuration the reconciler converges the
/// store towards: either a fixed set of named, statically-managed
/// resources, or a dynamic resource life cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(rename = "type")]
    pub rtype: String,
    #[serde(default)]
    pub state: Option<String>,
    /// Present for statically-managed entries: the exact set of resource
    /// names that should exist with this type.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    /// Present for dynamically-managed entries.
    #[serde(default)]
    pub min_count: Option<u32>,
    #[serde(default)]
    pub max_count: Option<u32>,
    #[serde(with = "humantime_serde_option", default)]
    pub lifespan: Option<Duration>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    /// Present for dynamically-managed entries: opaque infrastructure
    /// requirements, threaded straight through to the `Drlc` (§3, §6).
    #[serde(default)]
    pub needs: Option<serde_json::Value>,
}

impl ConfigEntry {
    pub fn is_dynamic(&self) -> bool {
        self.min_count.is_some() || self.max_count.is_some()
    }

    pub fn to_drlc(&self) -> Drlc {
        Drlc {
            rtype: self.rtype.clone(),
            min_count: self.min_count.unwrap_or(0),
            max_count: self.max_count.unwrap_or(0),
            lifespan: self.lifespan,
            initial_state: self.state.clone(),
            config: self.config.clone(),
            needs: self.needs.clone(),
        }
    }
}

/// The whole declarative configuration the reconciler is handed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoskosConfig {
    #[serde(default)]
    pub resources: Vec<ConfigEntry>,
}

/// Per-state and per-owner counts for one resource type, as surfaced to
/// callers via `Ranch::metric`/`Ranch::all_metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub rtype: String,
    pub current: HashMap<String, u32>,
    pub owners: HashMap<String, u32>,
}

/// `humantime` only ships a (de)serializer for `Duration`, not
/// `Option<Duration>`; this mirrors the small shim pattern used wherever the
/// teacher needs an optional human-readable duration in a serde struct.
mod humantime_serde_option {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => ser.serialize_str(&humantime::format_duration(*d).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(de)?;
        match raw {
            Some(s) => humantime::parse_duration(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
