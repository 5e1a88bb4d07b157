use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;

use sweeper::args::SweeperArgs;
use sweeper::cloud_api::{CloudApi, CloudResource};
use sweeper::kind::Kind;
use sweeper::object_store::InMemoryObjectStore;
use sweeper::options::{FeatureFlag, Options};
use sweeper::regions::StaticRegionResolver;
use sweeper::tag::{Tags, TagMatcher};
use sweeper::Sweeper;

/// No real AWS SDK client lives in this crate (`spec.md` §1 treats it as
/// an external `CloudAPI` capability); this always-empty stub is what a
/// deployment wires a real client in behind.
struct NullCloudApi;

#[async_trait::async_trait]
impl CloudApi for NullCloudApi {
    async fn list(&self, _kind: Kind, _region: &str) -> Result<Vec<CloudResource>, sweeper::SweepError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _kind: Kind, _region: &str, _resource: &CloudResource) -> Result<(), sweeper::SweepError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let args = SweeperArgs::parse();
    if !args.all && args.path.is_none() {
        bail!("--path is required unless --all is given");
    }

    let mut opts = Options::new("000000000000", args.region.clone());
    opts.dry_run = args.dry_run;
    opts.include = TagMatcher::from_pairs(&args.include_tags);
    opts.exclude = TagMatcher::from_pairs(&args.exclude_tags);
    opts.ttl_tag_key = args.ttl_tag_key.clone();
    if args.enable_target_groups {
        opts.feature_flags.insert(FeatureFlag::TargetGroups);
    }
    if args.enable_key_pairs {
        opts.feature_flags.insert(FeatureFlag::KeyPairs);
    }
    if args.enable_vpc_endpoints {
        opts.feature_flags.insert(FeatureFlag::VpcEndpoints);
    }
    if args.enable_dns_zone_deletion {
        opts.feature_flags.insert(FeatureFlag::DnsZoneDeletion);
    }
    if args.enable_buckets {
        opts.feature_flags.insert(FeatureFlag::Buckets);
    }

    let cloud: Arc<dyn CloudApi> = Arc::new(NullCloudApi);
    let regions = Arc::new(StaticRegionResolver::new(
        vec![args.region.clone()].into_iter().filter(|r| !r.is_empty()).collect(),
        "us-east-1",
    ));
    let sweeper = Sweeper::new(cloud, regions);

    let report = if args.all {
        sweeper.clean_all(&opts, &args.region, args.ttl.into()).await?
    } else {
        let path = args.path.as_deref().expect("checked above");
        let object_store = InMemoryObjectStore::new();
        sweeper
            .mark_and_sweep(&object_store, &opts, &args.region, path, args.ttl.into(), &Tags::new())
            .await?
    };

    println!("Swept {} resources", report.swept);
    if !report.is_ok() {
        for (region, kind, err) in &report.errors {
            eprintln!("error: region={region} kind={kind}: {err}");
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
