//! Naming for dynamically created resources and DRLC-managed children.
//! Injectable so tests can assert on deterministic names instead of UUIDs.

use uuid::Uuid;

pub trait NameGenerator: Send + Sync {
    fn generate(&self, rtype: &str) -> String;
}

/// `"{type}-{uuid}"`, the naming convention dynamic resources are created
/// under.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNameGenerator;

impl NameGenerator for UuidNameGenerator {
    fn generate(&self, rtype: &str) -> String {
        format!("{rtype}-{}", Uuid::new_v4())
    }
}
