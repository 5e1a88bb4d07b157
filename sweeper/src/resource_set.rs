//! The durable mark-and-sweep arena: `firstSeen` persists across runs,
//! `marked`/`swept` are run-local. One `ResourceSet` is constructed per run
//! and passed by reference through every `KindPipeline` — never shared
//! across concurrent runs (§5 "concurrent Sweepers must not share a Set
//! instance").

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::SweepError;
use crate::object_store::ObjectStore;
use crate::options::Options;
use crate::tag::Tags;

pub struct ResourceSet {
    first_seen: HashMap<String, DateTime<Utc>>,
    marked: HashSet<String>,
    swept: Vec<String>,
    ttl: Duration,
}

impl ResourceSet {
    pub fn new(ttl: Duration) -> Self {
        Self {
            first_seen: HashMap::new(),
            marked: HashSet::new(),
            swept: Vec::new(),
            ttl,
        }
    }

    /// Reads the durable `firstSeen` map from `path`. A missing blob yields
    /// an empty set, never an error.
    pub async fn load(store: &dyn ObjectStore, path: &str, ttl: Duration) -> Result<Self, SweepError> {
        let Some(bytes) = store.get(path).await? else {
            return Ok(Self::new(ttl));
        };
        let raw: HashMap<String, String> =
            serde_json::from_slice(&bytes).map_err(|e| SweepError::ObjectStore(e.to_string()))?;
        let mut first_seen = HashMap::with_capacity(raw.len());
        for (arn, timestamp) in raw {
            let parsed = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|e| SweepError::ObjectStore(e.to_string()))?
                .with_timezone(&Utc);
            first_seen.insert(arn, parsed);
        }
        Ok(Self {
            first_seen,
            marked: HashSet::new(),
            swept: Vec::new(),
            ttl,
        })
    }

    /// Writes `firstSeen` back as pretty-printed JSON keyed by ARN.
    pub async fn save(&self, store: &dyn ObjectStore, path: &str) -> Result<(), SweepError> {
        let raw: HashMap<&str, String> = self
            .first_seen
            .iter()
            .map(|(arn, ts)| (arn.as_str(), ts.to_rfc3339()))
            .collect();
        let bytes = serde_json::to_vec_pretty(&raw).map_err(|e| SweepError::ObjectStore(e.to_string()))?;
        store.put(path, bytes).await
    }

    /// Records `firstSeen[key]`, without affecting `marked`/`swept`:
    /// `created`, when a valid past timestamp, overrides a previously
    /// recorded entry (a more informative record beats a stale one);
    /// otherwise the existing record is kept, or `now` is used for a
    /// never-before-seen key. This is what `ListAll` calls to warm the
    /// durable set with newly visible resources ahead of the Mark phase
    /// (§4.E), independently of whether those resources turn out to be
    /// eligible for deletion.
    pub fn observe(&mut self, key: &str, created: Option<DateTime<Utc>>) {
        let now = Utc::now();
        let seen = match created {
            Some(created) if created.timestamp() > 0 && created <= now => created,
            _ => *self.first_seen.get(key).unwrap_or(&now),
        };
        self.first_seen.insert(key.to_string(), seen);
    }

    /// Records `key` as seen this run and decides whether it is eligible
    /// for deletion. See `observe` for how `firstSeen[key]` itself is
    /// computed.
    pub fn mark(
        &mut self,
        opts: &Options,
        key: &str,
        created: Option<DateTime<Utc>>,
        tags: &Tags,
    ) -> bool {
        self.marked.insert(key.to_string());
        self.observe(key, created);
        let seen = self.first_seen[key];
        let now = Utc::now();

        if !opts.managed_per_tags(tags) {
            return false;
        }

        let per_resource_ttl = opts
            .ttl_tag_key
            .as_deref()
            .and_then(|tag_key| tags.get(tag_key))
            .and_then(|raw| humantime::parse_duration(raw).ok())
            .unwrap_or(self.ttl);

        let expired = per_resource_ttl.is_zero() || (now - seen) > chrono::Duration::from_std(per_resource_ttl).unwrap_or(chrono::Duration::zero());
        if expired {
            self.swept.push(key.to_string());
            true
        } else {
            false
        }
    }

    /// Drops every `firstSeen` entry that wasn't touched by `mark` this
    /// run (the resource no longer exists upstream, so its durable record
    /// is stale) and returns the number of resources swept.
    pub fn mark_complete(&mut self) -> usize {
        self.first_seen.retain(|key, _| self.marked.contains(key));
        self.swept.len()
    }

    pub fn swept(&self) -> &[String] {
        &self.swept
    }

    pub fn first_seen(&self, key: &str) -> Option<DateTime<Utc>> {
        self.first_seen.get(key).copied()
    }
}
