//! Grouping applications for display
//!
//! Partitions the flat app list by `group` and orders both the groups and
//! the apps inside them with [`natural_cmp`].

use super::sort::natural_cmp;
use crate::models::App;
use serde::Serialize;
use std::collections::HashMap;

/// One named group and its ordered apps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppGroup {
    pub name: String,
    pub apps: Vec<App>,
}

/// Ordered mapping of group name to ordered apps
///
/// Groups are never empty, and their order is the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedApps {
    groups: Vec<AppGroup>,
}

impl GroupedApps {
    pub(crate) fn from_groups(groups: Vec<AppGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[AppGroup] {
        &self.groups
    }

    /// Apps of one group, matched byte-for-byte
    pub fn get(&self, name: &str) -> Option<&[App]> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.apps.as_slice())
    }

    /// Sorted distinct group names
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of apps across all groups
    pub fn app_count(&self) -> usize {
        self.groups.iter().map(|g| g.apps.len()).sum()
    }
}

/// Group and sort apps
pub fn group_apps(apps: &[App]) -> GroupedApps {
    let mut buckets: HashMap<&str, Vec<App>> = HashMap::new();
    for app in apps {
        buckets.entry(app.group.as_str()).or_default().push(app.clone());
    }

    let mut groups: Vec<AppGroup> = buckets
        .into_iter()
        .map(|(name, mut apps)| {
            apps.sort_by(|a, b| natural_cmp(&a.name, &b.name));
            AppGroup {
                name: name.to_string(),
                apps,
            }
        })
        .collect();
    groups.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    GroupedApps::from_groups(groups)
}
