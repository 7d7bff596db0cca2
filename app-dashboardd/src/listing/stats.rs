use std::collections::HashSet;
use chrono::{DateTime, Duration, Utc};
use shared::protocol::STATS_WINDOW_DAYS;
use shared::types::DerivedStats;
use crate::records::normalize::Application;

/// Summary counts over the full application list (never a filtered subset).
/// Both windows are open intervals: a timestamp exactly on a boundary doesn't count.
pub fn derive_stats(apps: &[Application], now: DateTime<Utc>) -> DerivedStats {
    let window = Duration::days(STATS_WINDOW_DAYS);
    let created_after = now - window;
    let expires_before = now + window;

    let unique_authorities = apps
        .iter()
        .map(|app| app.authority.as_str())
        .collect::<HashSet<_>>()
        .len();

    let recently_created = apps
        .iter()
        .filter(|app| app.created.is_some_and(|created| created > created_after))
        .count();

    let soon_expiring = apps
        .iter()
        .filter(|app| {
            app.expires
                .is_some_and(|expires| expires > now && expires < expires_before)
        })
        .count();

    DerivedStats {
        total_apps: apps.len(),
        unique_authorities,
        recently_created,
        soon_expiring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::listing::fixtures::app;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        assert_eq!(derive_stats(&[], now()), DerivedStats::default());
    }

    #[test]
    fn test_counts_and_unique_authorities() {
        let apps = vec![
            app("a", "cerc-io", "", None),
            app("b", "cerc-io", "", None),
            app("c", "Unknown", "", None),
            app("d", "Unknown", "", None),
            app("e", "laconic", "", None),
        ];

        let stats = derive_stats(&apps, now());
        assert_eq!(stats.total_apps, 5);
        assert_eq!(stats.unique_authorities, 3);
    }

    #[test]
    fn test_recently_created_boundary_is_exclusive() {
        let boundary = now() - Duration::days(30);
        let apps = vec![
            app("on-boundary", "x", "", Some(boundary)),
            app("inside", "x", "", Some(boundary + Duration::seconds(1))),
            app("outside", "x", "", Some(boundary - Duration::seconds(1))),
            app("undated", "x", "", None),
        ];

        assert_eq!(derive_stats(&apps, now()).recently_created, 1);
    }

    #[test]
    fn test_soon_expiring_window() {
        let mut expiring = app("expiring", "x", "", None);
        expiring.expires = Some(now() + Duration::days(10));
        let mut on_boundary = app("boundary", "x", "", None);
        on_boundary.expires = Some(now() + Duration::days(30));
        let mut far = app("far", "x", "", None);
        far.expires = Some(now() + Duration::days(90));
        let mut expired = app("expired", "x", "", None);
        expired.expires = Some(now() - Duration::days(1));

        let stats = derive_stats(&[expiring, on_boundary, far, expired], now());
        assert_eq!(stats.soon_expiring, 1);
    }
}
