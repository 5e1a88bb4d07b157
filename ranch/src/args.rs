use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "eosin-ranch")]
#[command(about = "Leasing and reclamation service for pooled test resources")]
pub struct RanchServerArgs {
    /// How long a caller's place in a `RequestQueue` is held without a
    /// refreshing `acquire` call before it's reaped.
    #[arg(long, env = "RANCH_REQUEST_TTL", default_value = "30s")]
    pub request_ttl: humantime::Duration,

    /// How often the request-queue GC sweep runs.
    #[arg(long, env = "RANCH_REQUEST_GC_INTERVAL", default_value = "10s")]
    pub request_gc_interval: humantime::Duration,

    /// How long a resource may sit untouched in a caller-owned state before
    /// `reset` reclaims it.
    #[arg(long, env = "RANCH_RESET_EXPIRY", default_value = "5m")]
    pub reset_expiry: humantime::Duration,

    /// How often the reset reaper sweeps the pool.
    #[arg(long, env = "RANCH_RESET_INTERVAL", default_value = "30s")]
    pub reset_interval: humantime::Duration,

    /// How often `update_all_dynamic_resources` runs.
    #[arg(long, env = "RANCH_RECONCILE_INTERVAL", default_value = "30s")]
    pub reconcile_interval: humantime::Duration,
}
