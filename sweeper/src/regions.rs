//! The `Regions` collaborator `Sweeper::clean_all` resolves a region
//! argument against: the full region list when none is given, or a single
//! validated region.

pub trait RegionResolver: Send + Sync {
    fn all(&self) -> Vec<String>;
    fn is_valid(&self, region: &str) -> bool;
    /// The region global (account-wide) kinds run under, e.g. IAM's
    /// `us-east-1`-as-default convention.
    fn default_region(&self) -> String;
}

pub struct StaticRegionResolver {
    regions: Vec<String>,
    default_region: String,
}

impl StaticRegionResolver {
    pub fn new(regions: Vec<String>, default_region: impl Into<String>) -> Self {
        Self {
            regions,
            default_region: default_region.into(),
        }
    }
}

impl RegionResolver for StaticRegionResolver {
    fn all(&self) -> Vec<String> {
        self.regions.clone()
    }

    fn is_valid(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    fn default_region(&self) -> String {
        self.default_region.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_known_regions_only() {
        let resolver = StaticRegionResolver::new(vec!["us-east-1".into(), "eu-west-1".into()], "us-east-1");
        assert!(resolver.is_valid("us-east-1"));
        assert!(!resolver.is_valid("mars-1"));
    }
}
