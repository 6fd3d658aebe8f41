//! Natural ordering for names and groups
//!
//! Locale-aware, case-insensitive and numeric-aware, so "App 9" sorts before
//! "App 10" and "Élasticsearch" sorts with the other E names. Comparison uses
//! the CLDR collation with numeric ordering at secondary strength (case is
//! ignored, accents are not). Names that compare equal this way fall back to
//! raw byte order, keeping the ordering total.

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::preferences::CollationNumericOrdering;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

thread_local! {
    static COLLATOR: Option<CollatorBorrowed<'static>> = build_collator();
}

fn build_collator() -> Option<CollatorBorrowed<'static>> {
    let mut prefs = CollatorPreferences::default();
    prefs.numeric_ordering = Some(CollationNumericOrdering::True);

    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Secondary);

    match Collator::try_new(prefs, options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("Collation data unavailable, using simple ordering: {}", e);
            None
        }
    }
}

/// Compare two strings in natural order
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let collated = COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => simple_cmp(a, b),
    });
    collated.then_with(|| a.cmp(b))
}

/// Lowercased char-by-char comparison with numeric digit runs
fn simple_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut left);
                let r_digits = take_digits(&mut right);
                let ord = cmp_digit_runs(&l_digits, &r_digits);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Compare digit runs by numeric value without parsing (no overflow)
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(input: &[&str]) -> Vec<String> {
        let mut items: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        items.sort_by(|a, b| natural_cmp(a, b));
        items
    }

    #[test]
    fn test_numeric_aware() {
        assert_eq!(
            sorted(&["App 10", "App 2", "app 1"]),
            vec!["app 1", "App 2", "App 10"]
        );
        assert_eq!(natural_cmp("v7", "v10"), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(sorted(&["beta", "Alpha", "gamma"]), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_accented_names_sort_with_base_letter() {
        assert_eq!(natural_cmp("école", "zebra"), Ordering::Less);
        assert_eq!(
            sorted(&["Zabbix", "Élasticsearch", "Grafana", "Dex"]),
            vec!["Dex", "Élasticsearch", "Grafana", "Zabbix"]
        );
        // Accents still distinguish otherwise equal names
        assert_ne!(natural_cmp("resume", "résumé"), Ordering::Equal);
    }

    #[test]
    fn test_ties_broken_by_raw_order() {
        assert_eq!(natural_cmp("App", "app"), Ordering::Less);
        assert_eq!(natural_cmp("app", "App"), Ordering::Greater);
        assert_eq!(natural_cmp("app", "app"), Ordering::Equal);
    }

    #[test]
    fn test_huge_numbers() {
        assert_eq!(
            natural_cmp("n99999999999999999999999", "n100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
        assert_eq!(natural_cmp("app", "app 2"), Ordering::Less);
    }

    #[test]
    fn test_simple_ordering() {
        assert_eq!(simple_cmp("App 9", "app 10"), Ordering::Less);
        assert_eq!(simple_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(simple_cmp("beta", "Alpha"), Ordering::Greater);
    }
}
