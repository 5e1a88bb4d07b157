//! The ~25 AWS resource kinds the sweeper knows how to clean up,
//! represented as data rather than one hand-written pipeline per kind
//! (§9 "Polymorphism over Type"): a `Kind` tag plus a `KindSpec` carrying
//! every cross-kind rule (§4.E) that applies to it.

use crate::options::FeatureFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Stack,
    EksCluster,
    ClassicLoadBalancer,
    LoadBalancerV2,
    AutoScalingGroup,
    LaunchConfiguration,
    LaunchTemplate,
    Instance,
    VpcEndpoint,
    NetworkInterface,
    Subnet,
    SecurityGroup,
    InternetGateway,
    RouteTable,
    NatGateway,
    Vpc,
    DhcpOptions,
    Snapshot,
    Volume,
    ElasticIp,
    FileSystem,
    MessageQueue,
    TargetGroup,
    KeyPair,
    Bucket,
    DedicatedHost,
    IamInstanceProfile,
    IamRole,
    OidcProvider,
    DnsRecordSet,
}

impl Kind {
    pub fn label(&self) -> &'static str {
        KIND_TABLE
            .iter()
            .find(|s| s.kind == *self)
            .map(|s| s.label)
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub kind: Kind,
    pub label: &'static str,
    /// Global kinds run once, after all regions, in a region-agnostic
    /// context; regional kinds run per-region in dependency order.
    pub regional: bool,
    pub feature_flag: Option<FeatureFlag>,
    /// ASG/EKS/EFS-style kinds whose child resources linger after the
    /// delete call returns; `CloudApi::children_gone` is polled before
    /// moving on.
    pub blocking_delete: bool,
    /// Security groups, internet gateways, elastic IPs, file systems,
    /// message queues, IAM roles/instance-profiles: best-effort
    /// disassociation before the primary delete.
    pub pre_delete_fixup: bool,
    /// DNS zones/records, IAM roles/profiles, OIDC providers, buckets:
    /// gated by an additional `is_managed` predicate beyond tag filters.
    pub management_gated: bool,
}

const fn spec(
    kind: Kind,
    label: &'static str,
    regional: bool,
    feature_flag: Option<FeatureFlag>,
    blocking_delete: bool,
    pre_delete_fixup: bool,
    management_gated: bool,
) -> KindSpec {
    KindSpec {
        kind,
        label,
        regional,
        feature_flag,
        blocking_delete,
        pre_delete_fixup,
        management_gated,
    }
}

/// Regional kinds in the exact dependency order the sweeper must honor
/// (high-level to low-level), followed by the global kinds. This table
/// *is* the ordering contract — `Sweeper::clean_all` simply walks it.
pub static KIND_TABLE: &[KindSpec] = &[
    spec(Kind::Stack, "stack", true, None, false, false, false),
    spec(Kind::EksCluster, "eks-cluster", true, None, true, false, false),
    spec(Kind::ClassicLoadBalancer, "classic-load-balancer", true, None, false, false, false),
    spec(Kind::LoadBalancerV2, "load-balancer-v2", true, None, false, false, false),
    spec(Kind::AutoScalingGroup, "auto-scaling-group", true, None, true, false, false),
    spec(Kind::LaunchConfiguration, "launch-configuration", true, None, false, false, false),
    spec(Kind::LaunchTemplate, "launch-template", true, None, false, false, false),
    spec(Kind::Instance, "instance", true, None, false, false, false),
    spec(Kind::VpcEndpoint, "vpc-endpoint", true, Some(FeatureFlag::VpcEndpoints), false, false, false),
    spec(Kind::NetworkInterface, "network-interface", true, None, false, false, false),
    spec(Kind::Subnet, "subnet", true, None, false, false, false),
    spec(Kind::SecurityGroup, "security-group", true, None, false, true, false),
    spec(Kind::InternetGateway, "internet-gateway", true, None, false, true, false),
    spec(Kind::RouteTable, "route-table", true, None, false, false, false),
    spec(Kind::NatGateway, "nat-gateway", true, None, false, false, false),
    spec(Kind::Vpc, "vpc", true, None, false, false, false),
    spec(Kind::DhcpOptions, "dhcp-options", true, None, false, false, false),
    spec(Kind::Snapshot, "snapshot", true, None, false, false, false),
    spec(Kind::Volume, "volume", true, None, false, false, false),
    spec(Kind::ElasticIp, "elastic-ip", true, None, false, true, false),
    spec(Kind::FileSystem, "file-system", true, None, true, true, false),
    spec(Kind::MessageQueue, "message-queue", true, None, false, true, false),
    spec(Kind::TargetGroup, "target-group", true, Some(FeatureFlag::TargetGroups), false, false, false),
    spec(Kind::KeyPair, "key-pair", true, Some(FeatureFlag::KeyPairs), false, false, false),
    spec(Kind::Bucket, "bucket", true, Some(FeatureFlag::Buckets), false, false, true),
    spec(Kind::DedicatedHost, "dedicated-host", true, None, false, false, false),
    // Global kinds run after every region, region-agnostic.
    spec(Kind::IamInstanceProfile, "iam-instance-profile", false, None, false, true, true),
    spec(Kind::IamRole, "iam-role", false, None, false, true, true),
    spec(Kind::OidcProvider, "oidc-provider", false, None, false, false, true),
    spec(Kind::DnsRecordSet, "dns-record-set", false, Some(FeatureFlag::DnsZoneDeletion), false, false, true),
];

pub fn regional_kinds() -> impl Iterator<Item = &'static KindSpec> {
    KIND_TABLE.iter().filter(|s| s.regional)
}

pub fn global_kinds() -> impl Iterator<Item = &'static KindSpec> {
    KIND_TABLE.iter().filter(|s| !s.regional)
}
