//! Converges the store towards a declarative `BoskosConfig`: creating and
//! retiring statically-named resources, creating/updating/draining DRLCs,
//! and keeping each dynamically-managed pool within its configured
//! min/max bounds. Modeled on `storage-operator/src/clusters/reconcile.rs`'s
//! shape (diff current vs. desired, apply the delta) without the
//! kube-specific machinery, since there is no CRD/controller runtime here.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::RanchError;
use crate::id::NameGenerator;
use crate::store::Store;
use crate::types::{BoskosConfig, Drlc, Resource};

/// Serializes `sync_config` and `update_all_dynamic_resources` against each
/// other so two concurrent reconcile passes can't compute diffs against the
/// same stale snapshot and stomp on each other's writes.
pub struct Reconciler {
    store: Arc<dyn Store>,
    names: Arc<dyn NameGenerator>,
    lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn Store>, names: Arc<dyn NameGenerator>) -> Self {
        Self {
            store,
            names,
            lock: Mutex::new(()),
        }
    }

    /// Reconciles statically-named resources and DRLC definitions against
    /// `config`. Does not create or delete the dynamic resources a DRLC
    /// governs day to day; that's `update_all_dynamic_resources`'s job.
    pub async fn sync_config(&self, config: &BoskosConfig) -> Result<(), RanchError> {
        let _guard = self.lock.lock();

        let static_entries: Vec<_> = config.resources.iter().filter(|e| !e.is_dynamic()).collect();
        let dynamic_entries: Vec<_> = config.resources.iter().filter(|e| e.is_dynamic()).collect();

        let static_names: HashSet<&str> = static_entries
            .iter()
            .flat_map(|e| e.names.iter().flatten())
            .map(String::as_str)
            .collect();

        let current_resources = self.store.list_resources().await?;
        let current_drlcs = self.store.list_drlcs().await?;
        // A resource is dynamic if it's declared dynamic in the *new*
        // config, or if a DRLC for its type already exists in the store
        // (§4.C step 3: "has a DRLC" is a classification against current
        // store state, not against what's freshly declared). Without the
        // latter, removing a DRLC's config entry would route its still-extant,
        // unowned resources through the static-resource delete loop below
        // instead of `update_all_dynamic_resources`'s toBeDeleted → tombstone
        // path, even on the very cycle that drains the DRLC to min=max=0.
        let dynamic_types: HashSet<&str> = dynamic_entries
            .iter()
            .map(|e| e.rtype.as_str())
            .chain(current_drlcs.iter().map(|(d, _)| d.rtype.as_str()))
            .collect();

        // Static resources: create anything missing, migrate the type of
        // anything that kept its name but moved to a different config
        // entry (§4.C step 6 — retains first-seen and user data, just
        // renames `type` in place), retire anything present but no longer
        // named, unless it's currently leased (defer to the next pass
        // rather than yank a resource out from under its owner).
        for entry in &static_entries {
            let Some(names) = &entry.names else { continue };
            for name in names {
                match current_resources.iter().find(|(r, _)| &r.name == name) {
                    None => {
                        let resource = Resource::new(
                            name.clone(),
                            entry.rtype.clone(),
                            entry.state.clone().unwrap_or_else(|| "free".to_string()),
                        );
                        self.store.create_resource(resource).await?;
                    }
                    Some((current, revision)) if current.rtype != entry.rtype => {
                        let mut migrated = current.clone();
                        migrated.rtype = entry.rtype.clone();
                        migrated.last_update = Utc::now();
                        self.store.update_resource(&migrated, *revision).await?;
                    }
                    Some(_) => {}
                }
            }
        }
        for (resource, _) in &current_resources {
            let is_dynamic = dynamic_types.contains(resource.rtype.as_str());
            if is_dynamic {
                continue;
            }
            if !static_names.contains(resource.name.as_str()) && resource.owner.is_empty() {
                self.store.delete_resource(&resource.name).await?;
            }
        }

        // DRLCs: create missing, update existing spec fields, drain
        // (zero out min/max) anything no longer declared rather than
        // deleting it outright — `update_all_dynamic_resources` removes the
        // DRLC once its last managed resource is gone.
        let declared_types: HashSet<&str> = dynamic_entries.iter().map(|e| e.rtype.as_str()).collect();
        for entry in &dynamic_entries {
            let desired = entry.to_drlc();
            match current_drlcs.iter().find(|(d, _)| d.rtype == entry.rtype) {
                None => {
                    self.store.create_drlc(desired).await?;
                }
                Some((_, revision)) => {
                    self.store.update_drlc(&desired, *revision).await?;
                }
            }
        }
        for (drlc, revision) in &current_drlcs {
            if !declared_types.contains(drlc.rtype.as_str()) && (drlc.min_count > 0 || drlc.max_count > 0) {
                let mut drained = drlc.clone();
                drained.min_count = 0;
                drained.max_count = 0;
                self.store.update_drlc(&drained, *revision).await?;
            }
        }

        Ok(())
    }

    /// Brings every DRLC-managed pool to its configured min/max: deletes
    /// tombstoned resources, marks expired free resources and any surplus
    /// over `max_count` for deletion, creates fresh resources up to
    /// `min_count`, and drops a drained (min=0, max=0) DRLC once none of
    /// its resources remain.
    pub async fn update_all_dynamic_resources(&self) -> Result<(), RanchError> {
        let _guard = self.lock.lock();

        let drlcs = self.store.list_drlcs().await?;
        for (drlc, drlc_revision) in &drlcs {
            self.converge_one(drlc, *drlc_revision).await?;
        }
        Ok(())
    }

    async fn converge_one(&self, drlc: &Drlc, drlc_revision: crate::store::Revision) -> Result<(), RanchError> {
        let now = Utc::now();
        let resources = self.store.list_resources().await?;
        let mut of_type: Vec<_> = resources
            .into_iter()
            .filter(|(r, _)| r.rtype == drlc.rtype)
            .collect();

        // Tombstoned resources are fully removed first.
        let mut kept = Vec::with_capacity(of_type.len());
        for (resource, _) in of_type.drain(..) {
            if resource.state == "tombstone" {
                self.store.delete_resource(&resource.name).await?;
            } else {
                kept.push(resource);
            }
        }

        let owned: Vec<&Resource> = kept.iter().filter(|r| !r.owner.is_empty()).collect();
        let mut free: Vec<&Resource> = kept
            .iter()
            .filter(|r| r.owner.is_empty() && r.state != "toBeDeleted")
            .collect();
        let already_marked = kept.iter().filter(|r| r.state == "toBeDeleted").count();

        // Expired free resources are marked for deletion, not deleted
        // outright, so a lingering lease (if somehow still referenced)
        // gets one more reconcile pass to surface the conflict.
        let mut newly_marked = Vec::new();
        free.retain(|r| {
            let expired = r.expiration_date.map(|exp| exp <= now).unwrap_or(false);
            if expired {
                newly_marked.push((*r).clone());
                false
            } else {
                true
            }
        });
        for resource in &newly_marked {
            self.mark_to_be_deleted(resource).await?;
        }

        let active = owned.len() + free.len();
        let marked_total = already_marked + newly_marked.len();

        if (active as u32) < drlc.min_count {
            let deficit = drlc.min_count - active as u32;
            for _ in 0..deficit {
                let name = self.names.generate(&drlc.rtype);
                let mut resource = Resource::new(name, drlc.rtype.clone(), drlc.initial_state());
                resource.expiration_date = drlc.lifespan.map(|l| now + l);
                self.store.create_resource(resource).await?;
            }
        } else if active as u32 > drlc.max_count {
            let surplus = active as u32 - drlc.max_count;
            // Oldest-name-first so the choice is deterministic in tests;
            // never touches an owned resource.
            free.sort_by(|a, b| a.name.cmp(&b.name));
            for resource in free.into_iter().take(surplus as usize) {
                self.mark_to_be_deleted(resource).await?;
            }
        }

        let drained = drlc.min_count == 0 && drlc.max_count == 0;
        if drained && kept.is_empty() && marked_total == 0 {
            self.store.delete_drlc(&drlc.rtype).await.ok();
        } else {
            // touch nothing; the DRLC spec itself is unchanged by this pass.
            let _ = drlc_revision;
        }

        Ok(())
    }

    async fn mark_to_be_deleted(&self, resource: &Resource) -> Result<(), RanchError> {
        let (mut current, revision) = self.store.get_resource(&resource.name).await?;
        current.state = "toBeDeleted".to_string();
        current.last_update = Utc::now();
        self.store.update_resource(&current, revision).await?;
        Ok(())
    }
}
