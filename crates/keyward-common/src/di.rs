//! Service registration through `inventory`
//!
//! Each feature crate submits a [`ServiceFactory`] that builds its services
//! and hands them back as type-erased [`ServiceEntry`] values. The
//! application wiring calls [`collect_all_services`] once at startup and
//! passes the resolved services explicitly to its consumers. There is no
//! global container to reach into afterwards.
//!
//! ```rust,ignore
//! use keyward_common::di::{ServiceEntry, ServiceFactory};
//! use std::sync::Arc;
//!
//! inventory::submit! {
//!     ServiceFactory::new("rbac", create_rbac_services)
//! }
//!
//! fn create_rbac_services() -> Vec<ServiceEntry> {
//!     vec![ServiceEntry::new::<RbacService>(Arc::new(RbacService::new()))]
//! }
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{debug, info};

/// A type-erased service produced by a factory
pub struct ServiceEntry {
    /// Registration key
    pub type_id: TypeId,

    /// Human-readable type name for diagnostics
    pub type_name: &'static str,

    instance: Arc<dyn Any + Send + Sync>,
}

impl ServiceEntry {
    /// Wrap a concrete service instance
    pub fn new<T: Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance: instance as Arc<dyn Any + Send + Sync>,
        }
    }

    /// Whether this entry holds a `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Recover the concrete service, if this entry holds a `T`
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_id", &self.type_id)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Factory submitted by a feature crate via `inventory::submit!`
pub struct ServiceFactory {
    /// Service group name (e.g. "rbac", "directory")
    pub name: &'static str,

    /// Builds the group's services
    pub factory_fn: fn() -> Vec<ServiceEntry>,

    /// Lower runs earlier
    pub priority: u32,
}

impl ServiceFactory {
    /// Factory with the default priority (100)
    pub const fn new(name: &'static str, factory_fn: fn() -> Vec<ServiceEntry>) -> Self {
        Self {
            name,
            factory_fn,
            priority: 100,
        }
    }

    /// Factory with an explicit priority
    pub const fn with_priority(
        name: &'static str,
        factory_fn: fn() -> Vec<ServiceEntry>,
        priority: u32,
    ) -> Self {
        Self {
            name,
            factory_fn,
            priority,
        }
    }
}

inventory::collect!(ServiceFactory);

/// Run every discovered factory in priority order and gather their services.
pub fn collect_all_services() -> Vec<ServiceEntry> {
    let mut factories: Vec<&ServiceFactory> = inventory::iter::<ServiceFactory>().collect();
    // stable: equal priorities keep link order
    factories.sort_by_key(|f| f.priority);

    info!(factories = factories.len(), "Discovered service factories");

    let mut all_services = Vec::new();
    for factory in factories {
        let services = (factory.factory_fn)();
        debug!(
            factory = factory.name,
            priority = factory.priority,
            services = services.len(),
            "Factory created services"
        );
        all_services.extend(services);
    }

    all_services
}

/// Find the first collected service of type `T`.
pub fn resolve<T: Send + Sync + 'static>(services: &[ServiceEntry]) -> Option<Arc<T>> {
    services.iter().find(|s| s.is::<T>()).and_then(|s| s.downcast::<T>())
}

/// Names of all discovered factories
pub fn list_discovered_factories() -> Vec<&'static str> {
    inventory::iter::<ServiceFactory>().map(|f| f.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    inventory::submit! {
        ServiceFactory::with_priority("test_common_factory", create_test_services, 5)
    }

    fn create_test_services() -> Vec<ServiceEntry> {
        vec![ServiceEntry::new::<String>(Arc::new("probe".to_string()))]
    }

    #[test]
    fn test_discovered_factories_include_test() {
        let names = list_discovered_factories();
        assert!(names.contains(&"test_common_factory"));
    }

    #[test]
    fn test_resolve_collected_service() {
        let services = collect_all_services();
        let probe = resolve::<String>(&services).expect("String service registered");
        assert_eq!(probe.as_str(), "probe");
    }

    #[test]
    fn test_downcast_wrong_type_is_none() {
        let entry = ServiceEntry::new::<i32>(Arc::new(42));
        assert!(entry.is::<i32>());
        assert!(entry.downcast::<u64>().is_none());
        assert_eq!(entry.downcast::<i32>().map(|v| *v), Some(42));
        assert!(entry.type_name.contains("i32"));
    }
}
