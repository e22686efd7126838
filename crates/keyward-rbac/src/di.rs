//! Dependency injection support for keyward-rbac

use std::sync::Arc;

use keyward_common::di::{ServiceEntry, ServiceFactory};

use crate::RbacService;

inventory::submit! {
    ServiceFactory::with_priority("rbac", create_rbac_services, 10)
}

fn create_rbac_services() -> Vec<ServiceEntry> {
    vec![ServiceEntry::new::<RbacService>(Arc::new(RbacService::new()))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_common::di::{collect_all_services, list_discovered_factories, resolve};

    #[test]
    fn test_rbac_factory_registered() {
        assert!(list_discovered_factories().contains(&"rbac"));
    }

    #[test]
    fn test_rbac_service_resolves() {
        let services = collect_all_services();
        assert!(resolve::<RbacService>(&services).is_some());
    }
}
