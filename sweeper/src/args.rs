use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "eosin-sweeper")]
#[command(about = "Mark-and-sweep garbage collector for leaked AWS test resources")]
pub struct SweeperArgs {
    /// Region to sweep; empty means every valid region.
    #[arg(long, env = "SWEEPER_REGION", default_value = "")]
    pub region: String,

    /// Age at which an untagged-override resource becomes eligible for
    /// deletion. `0s` deletes everything not otherwise protected.
    #[arg(long, env = "SWEEPER_TTL", default_value = "24h")]
    pub ttl: humantime::Duration,

    /// One-shot `CleanAll` with no durable state file.
    #[arg(long)]
    pub all: bool,

    /// Object-store URL the durable mark state is loaded from and saved
    /// to. Required unless `--all` is given.
    #[arg(long, env = "SWEEPER_STATE_PATH")]
    pub path: Option<String>,

    /// Exercise Mark and update durable state, but issue no deletes.
    #[arg(long)]
    pub dry_run: bool,

    /// Repeatable `key` or `key=value` inclusion criteria.
    #[arg(long = "include-tags")]
    pub include_tags: Vec<String>,

    /// Repeatable `key` or `key=value` exclusion criteria.
    #[arg(long = "exclude-tags")]
    pub exclude_tags: Vec<String>,

    /// Tag key, if present on a resource, whose value overrides the TTL
    /// for that resource specifically.
    #[arg(long, env = "SWEEPER_TTL_TAG_KEY")]
    pub ttl_tag_key: Option<String>,

    #[arg(long)]
    pub enable_target_groups: bool,
    #[arg(long)]
    pub enable_key_pairs: bool,
    #[arg(long)]
    pub enable_vpc_endpoints: bool,
    #[arg(long)]
    pub enable_dns_zone_deletion: bool,
    #[arg(long)]
    pub enable_buckets: bool,
}
