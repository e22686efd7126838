//! Dependency injection support for keyward-directory

use std::sync::Arc;

use keyward_common::di::{ServiceEntry, ServiceFactory};

use crate::config::{DirectorySettings, SettingsManager};

inventory::submit! {
    ServiceFactory::new("directory", create_directory_services)
}

fn create_directory_services() -> Vec<ServiceEntry> {
    vec![
        ServiceEntry::new::<DirectorySettings>(Arc::new(DirectorySettings::default())),
        ServiceEntry::new::<SettingsManager>(Arc::new(SettingsManager::new())),
    ]
}
