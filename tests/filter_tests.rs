//! Tests for the search filter

use forecastle::dashboard::{filter_groups, group_apps};
use forecastle::{App, DiscoverySource};

fn app(name: &str, group: &str) -> App {
    App::new(name, group, "https://example.com", DiscoverySource::Config)
}

fn sample() -> Vec<App> {
    vec![app("A", "prod"), app("B", "prod"), app("C", "staging")]
}

#[test]
fn test_empty_query_matches_everything() {
    let grouped = group_apps(&sample());
    assert_eq!(filter_groups(&grouped, ""), grouped);
}

#[test]
fn test_group_query_drops_other_groups() {
    let grouped = group_apps(&sample());
    let filtered = filter_groups(&grouped, "prod");

    assert_eq!(filtered.group_names(), vec!["prod"]);
    let names: Vec<&str> = filtered.groups()[0]
        .apps
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_query_is_case_insensitive() {
    let grouped = group_apps(&[app("Grafana", "monitoring"), app("Vault", "security")]);
    let filtered = filter_groups(&grouped, "gRaF");

    assert_eq!(filtered.app_count(), 1);
    assert_eq!(filtered.groups()[0].apps[0].name, "Grafana");
}

#[test]
fn test_no_match_gives_empty_result() {
    let grouped = group_apps(&sample());
    let filtered = filter_groups(&grouped, "zzz");

    assert!(filtered.is_empty());
    assert_eq!(filtered.app_count(), 0);
}

#[test]
fn test_filter_is_idempotent_and_pure() {
    let grouped = group_apps(&sample());
    let before = grouped.clone();

    let once = filter_groups(&grouped, "a");
    let twice = filter_groups(&once, "a");

    assert_eq!(once, twice);
    assert_eq!(grouped, before);
}

#[test]
fn test_order_preserved() {
    let grouped = group_apps(&[
        app("app 10", "g"),
        app("app 2", "g"),
        app("other", "g"),
    ]);
    let filtered = filter_groups(&grouped, "app");

    let names: Vec<&str> = filtered.groups()[0]
        .apps
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["app 2", "app 10"]);
}
