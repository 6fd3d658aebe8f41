//! Search filter over grouped apps

use super::grouping::{AppGroup, GroupedApps};
use crate::models::App;

/// Whether an app matches an already lower-cased query
pub fn matches_query(app: &App, query_lower: &str) -> bool {
    query_lower.is_empty()
        || app.name.to_lowercase().contains(query_lower)
        || app.group.to_lowercase().contains(query_lower)
}

/// Keep apps whose name or group contains `query`, ignoring case
///
/// Order is preserved and groups left empty are dropped.
pub fn filter_groups(grouped: &GroupedApps, query: &str) -> GroupedApps {
    if query.is_empty() {
        return grouped.clone();
    }

    let query_lower = query.to_lowercase();
    let groups = grouped
        .groups()
        .iter()
        .filter_map(|group| {
            let apps: Vec<App> = group
                .apps
                .iter()
                .filter(|app| matches_query(app, &query_lower))
                .cloned()
                .collect();
            (!apps.is_empty()).then(|| AppGroup {
                name: group.name.clone(),
                apps,
            })
        })
        .collect();

    GroupedApps::from_groups(groups)
}
