//! The `CloudAPI` capability: enumerate and delete resources of a given
//! kind in a region. Treated as external per `spec.md` §1 ("the cloud-SDK
//! clients themselves; treated as a `CloudAPI` capability") — no AWS SDK
//! bindings live in this crate, only the trait and an in-memory fake used
//! by tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SweepError;
use crate::kind::Kind;
use crate::tag::Tags;

/// One cloud object as the sweeper sees it: its key (native ARN or a
/// synthesized one, §6 "ARN synthesis"), its tags, its creation time if
/// the API reports one, and any child resources still attached (used by
/// the blocking-wait kinds to decide when they've fully drained).
#[derive(Debug, Clone)]
pub struct CloudResource {
    pub key: String,
    pub name: String,
    pub tags: Tags,
    pub created: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Enumerates every resource of `kind` in `region`, draining the
    /// paginator fully. A page-level error is logged by the caller and
    /// processing continues with whatever pages succeeded (§9
    /// "Pagination").
    async fn list(&self, kind: Kind, region: &str) -> Result<Vec<CloudResource>, SweepError>;

    /// Issues the primary delete call for one resource.
    async fn delete(&self, kind: Kind, region: &str, resource: &CloudResource) -> Result<(), SweepError>;

    /// Best-effort pre-delete fixup (detach/disassociate/unlink). Failures
    /// are logged by the caller; the primary delete still proceeds.
    async fn pre_delete_fixup(&self, kind: Kind, region: &str, resource: &CloudResource) -> Result<(), SweepError> {
        let _ = (kind, region, resource);
        Ok(())
    }

    /// True once every lingering child of `resource` (ASG instances, EKS
    /// node groups, EFS mount targets) has disappeared. Kinds that don't
    /// need blocking waits can rely on the default.
    async fn children_gone(&self, kind: Kind, region: &str, resource: &CloudResource) -> Result<bool, SweepError> {
        let _ = (kind, region, resource);
        Ok(true)
    }
}
