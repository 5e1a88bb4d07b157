//! Drives one `KindSpec` through `ListAll → Mark → Sweep`, applying every
//! cross-kind rule from §4.E: feature-flag short-circuiting, the
//! management gate, dry-run, pre-delete fixups, and blocking waits for
//! lingering children.

use std::sync::Arc;
use std::time::Duration;

use crate::cloud_api::{CloudApi, CloudResource};
use crate::error::SweepError;
use crate::kind::{Kind, KindSpec};
use crate::options::Options;
use crate::resource_set::ResourceSet;

/// Bound on how long a blocking-delete kind (ASG, EKS, EFS) waits for its
/// children to disappear before giving up with a warning.
const MAX_CHILD_WAIT: Duration = Duration::from_secs(5 * 60);
const CHILD_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct Pipeline {
    pub spec: &'static KindSpec,
    cloud: Arc<dyn CloudApi>,
}

impl Pipeline {
    pub fn new(spec: &'static KindSpec, cloud: Arc<dyn CloudApi>) -> Self {
        Self { spec, cloud }
    }

    /// Enumerates every resource of this kind and records each one's
    /// `firstSeen[ARN]` into `set` ahead of the Mark phase (§4.E: "record
    /// `firstSeen[ARN] = now` ... Used to warm the durable store with
    /// newly visible resources before the Mark phase"). A `Forbidden`
    /// listing error is downgraded to a no-op; any other error propagates
    /// for the caller's aggregate.
    pub async fn list_all(&self, opts: &Options, set: &mut ResourceSet) -> Result<(), SweepError> {
        if self.feature_disabled(opts) {
            return Ok(());
        }
        let resources = match self.cloud.list(self.spec.kind, &opts.region).await {
            Ok(resources) => resources,
            Err(SweepError::Forbidden(msg)) => {
                tracing::warn!(kind = self.spec.label, %msg, "forbidden listing kind, skipping");
                return Ok(());
            }
            Err(other) => return Err(other),
        };
        for resource in &resources {
            set.observe(&resource.key, resource.created);
        }
        Ok(())
    }

    /// Enumerates again, marks every resource against `set`, and deletes
    /// whatever Mark says is eligible and managed.
    pub async fn mark_and_sweep(&self, opts: &Options, set: &mut ResourceSet) -> Result<(), SweepError> {
        if self.feature_disabled(opts) {
            return Ok(());
        }

        let resources = match self.cloud.list(self.spec.kind, &opts.region).await {
            Ok(resources) => resources,
            Err(SweepError::Forbidden(msg)) => {
                tracing::warn!(kind = self.spec.label, %msg, "forbidden listing kind, skipping");
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        let mut candidates = Vec::new();
        for resource in &resources {
            if self.spec.management_gated && !self.is_managed(opts, resource) {
                continue;
            }
            let should_delete = set.mark(opts, &resource.key, resource.created, &resource.tags);
            if should_delete {
                candidates.push(resource.clone());
            }
        }

        for resource in &candidates {
            if opts.dry_run {
                tracing::info!(kind = self.spec.label, key = %resource.key, "dry-run: would delete");
                continue;
            }
            self.delete_one(opts, resource).await;
        }

        Ok(())
    }

    async fn delete_one(&self, opts: &Options, resource: &CloudResource) {
        if self.spec.pre_delete_fixup {
            if let Err(err) = self.cloud.pre_delete_fixup(self.spec.kind, &opts.region, resource).await {
                tracing::warn!(kind = self.spec.label, key = %resource.key, %err, "pre-delete fixup failed, proceeding anyway");
            }
        }

        if let Err(err) = self.cloud.delete(self.spec.kind, &opts.region, resource).await {
            tracing::warn!(kind = self.spec.label, key = %resource.key, %err, "delete failed");
            return;
        }

        if self.spec.blocking_delete {
            self.wait_for_children(opts, resource).await;
        }
    }

    async fn wait_for_children(&self, opts: &Options, resource: &CloudResource) {
        let mut waited = Duration::ZERO;
        loop {
            match self.cloud.children_gone(self.spec.kind, &opts.region, resource).await {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(kind = self.spec.label, key = %resource.key, %err, "error polling for child resources");
                }
            }
            if waited >= MAX_CHILD_WAIT {
                tracing::warn!(kind = self.spec.label, key = %resource.key, "gave up waiting for child resources to clear");
                return;
            }
            tokio::time::sleep(CHILD_POLL_INTERVAL).await;
            waited += CHILD_POLL_INTERVAL;
        }
    }

    fn feature_disabled(&self, opts: &Options) -> bool {
        self.spec
            .feature_flag
            .is_some_and(|flag| !opts.feature_enabled(flag))
    }

    fn is_managed(&self, opts: &Options, resource: &CloudResource) -> bool {
        match self.spec.kind {
            Kind::DnsRecordSet => opts.management_gate.dns_name_is_managed(&resource.name),
            Kind::IamRole | Kind::IamInstanceProfile => opts.management_gate.iam_path_is_managed(&resource.name),
            Kind::OidcProvider => opts.management_gate.oidc_is_managed(&resource.tags),
            // Buckets are gated purely by tag filters (applied in `Mark`),
            // plus the run-level self-protection check in
            // `Sweeper::mark_and_sweep`.
            _ => true,
        }
    }
}
