//! Orchestrates `KindPipeline`s across regions and the global pass,
//! composing `ResourceSet` with the tag filters and TTL from `Options`.

use std::sync::Arc;
use std::time::Duration;

use crate::cloud_api::CloudApi;
use crate::error::SweepError;
use crate::kind::{global_kinds, regional_kinds, Kind};
use crate::object_store::ObjectStore;
use crate::options::{FeatureFlag, Options};
use crate::pipeline::Pipeline;
use crate::regions::RegionResolver;
use crate::resource_set::ResourceSet;
use crate::tag::Tags;

/// Accumulates every per-kind/per-region error across a run without
/// aborting the rest of the pass (§4.E "Failure model").
#[derive(Debug, Default)]
pub struct SweepReport {
    pub errors: Vec<(String, String, SweepError)>,
    pub swept: usize,
}

impl SweepReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, region: &str, kind: &str, err: SweepError) {
        self.errors.push((region.to_string(), kind.to_string(), err));
    }
}

pub struct Sweeper {
    cloud: Arc<dyn CloudApi>,
    regions: Arc<dyn RegionResolver>,
}

impl Sweeper {
    pub fn new(cloud: Arc<dyn CloudApi>, regions: Arc<dyn RegionResolver>) -> Self {
        Self { cloud, regions }
    }

    fn resolve_regions(&self, region: &str) -> Result<Vec<String>, SweepError> {
        if region.is_empty() {
            Ok(self.regions.all())
        } else if self.regions.is_valid(region) {
            Ok(vec![region.to_string()])
        } else {
            Err(SweepError::Configuration(format!("unknown region {region:?}")))
        }
    }

    /// One-shot cleanup with no durable state: every kind is treated as if
    /// never seen before (a fresh `ResourceSet` per call), so eligibility
    /// is decided purely by `Options`' TTL/tag rules against resources'
    /// own `created` timestamps where the cloud API reports one.
    pub async fn clean_all(&self, opts: &Options, region: &str, ttl: Duration) -> Result<SweepReport, SweepError> {
        let mut set = ResourceSet::new(ttl);
        let mut report = SweepReport::default();
        self.run_pass(opts, region, &mut set, &mut report).await?;
        report.swept = set.swept().len();
        Ok(report)
    }

    /// The durable variant used by the periodic janitor: loads the
    /// `ResourceSet` from `path`, runs the same fan-out, then saves it
    /// back. If bucket deletion is enabled, the state bucket itself must
    /// pass the exclude-tag predicate, or the run aborts before touching
    /// anything (self-deletion guard, §4.F rule 4).
    pub async fn mark_and_sweep(
        &self,
        object_store: &dyn ObjectStore,
        opts: &Options,
        region: &str,
        path: &str,
        ttl: Duration,
        state_bucket_tags: &Tags,
    ) -> Result<SweepReport, SweepError> {
        if opts.feature_enabled(FeatureFlag::Buckets) && !opts.managed_per_tags(state_bucket_tags) {
            return Err(SweepError::Configuration(
                "state bucket fails the exclude-tag predicate; aborting to avoid self-deletion".into(),
            ));
        }

        let mut set = ResourceSet::load(object_store, path, ttl).await?;
        let mut report = SweepReport::default();
        self.run_pass(opts, region, &mut set, &mut report).await?;
        report.swept = set.mark_complete();
        set.save(object_store, path).await?;
        Ok(report)
    }

    async fn run_pass(
        &self,
        opts: &Options,
        region: &str,
        set: &mut ResourceSet,
        report: &mut SweepReport,
    ) -> Result<(), SweepError> {
        let regions = self.resolve_regions(region)?;

        for region in &regions {
            let mut regional_opts = opts.clone();
            regional_opts.region = region.clone();
            for kind_spec in regional_kinds() {
                let pipeline = Pipeline::new(kind_spec, self.cloud.clone());
                if let Err(err) = pipeline.list_all(&regional_opts, set).await {
                    report.push(region, kind_spec.label, err);
                    continue;
                }
                if let Err(err) = pipeline.mark_and_sweep(&regional_opts, set).await {
                    report.push(region, kind_spec.label, err);
                }
            }
        }

        let mut global_opts = opts.clone();
        global_opts.region = self.regions.default_region();
        for kind_spec in global_kinds() {
            let pipeline = Pipeline::new(kind_spec, self.cloud.clone());
            if let Err(err) = pipeline.list_all(&global_opts, set).await {
                report.push(&global_opts.region, kind_spec.label, err);
                continue;
            }
            if let Err(err) = pipeline.mark_and_sweep(&global_opts, set).await {
                report.push(&global_opts.region, kind_spec.label, err);
            }
        }

        Ok(())
    }
}
