//! Browse filter editing. The two operations are independent partial
//! updates: each creates the settings row on first use and leaves the
//! sibling field alone afterwards.

use ember_shared::errors::{AppError, AppResult};

use crate::models::FilterSettings;
use crate::repo::FilterRepo;

/// Replaces the viewer's acceptable-target set. Blank entries and
/// duplicates are dropped; an empty result means "all targets", never
/// "no targets".
pub async fn set_target_filters(
    filters: &dyn FilterRepo,
    identity: i64,
    targets: Vec<String>,
) -> AppResult<FilterSettings> {
    let mut normalized: Vec<String> = Vec::new();
    for t in targets {
        let t = t.trim().to_string();
        if t.is_empty() || normalized.contains(&t) {
            continue;
        }
        normalized.push(t);
    }

    tracing::debug!(identity, targets = ?normalized, "target filters updated");
    filters.set_targets(identity, normalized).await
}

/// Sets or clears the maximum candidate distance. `None` means unlimited.
pub async fn set_distance_filter(
    filters: &dyn FilterRepo,
    identity: i64,
    max_km: Option<f64>,
) -> AppResult<FilterSettings> {
    if let Some(km) = max_km {
        if !km.is_finite() || km <= 0.0 {
            return Err(AppError::Validation(
                "maximum distance must be a positive number of kilometers".to_string(),
            ));
        }
    }

    tracing::debug!(identity, max_km = ?max_km, "distance filter updated");
    filters.set_distance(identity, max_km).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::Repositories;

    #[tokio::test]
    async fn test_partial_updates_preserve_the_sibling_field() {
        let repos = Repositories::memory();

        set_target_filters(&*repos.filters, 1, vec!["Dating".to_string()])
            .await
            .unwrap();
        set_distance_filter(&*repos.filters, 1, Some(30.0)).await.unwrap();

        let settings = repos.filters.get(1).await.unwrap().expect("row exists");
        assert_eq!(settings.target_list(), vec!["Dating"]);
        assert_eq!(settings.max_distance_km, Some(30.0));

        // And in the other order.
        set_distance_filter(&*repos.filters, 2, Some(5.0)).await.unwrap();
        set_target_filters(&*repos.filters, 2, vec!["Friendship".to_string()])
            .await
            .unwrap();

        let settings = repos.filters.get(2).await.unwrap().expect("row exists");
        assert_eq!(settings.target_list(), vec!["Friendship"]);
        assert_eq!(settings.max_distance_km, Some(5.0));
    }

    #[tokio::test]
    async fn test_blank_and_duplicate_targets_are_dropped() {
        let repos = Repositories::memory();
        let settings = set_target_filters(
            &*repos.filters,
            1,
            vec![
                " Dating ".to_string(),
                "".to_string(),
                "Dating".to_string(),
                "Casual".to_string(),
            ],
        )
        .await
        .unwrap();
        assert_eq!(settings.target_list(), vec!["Dating", "Casual"]);
    }

    #[tokio::test]
    async fn test_empty_list_normalizes_to_all_targets() {
        let repos = Repositories::memory();
        let settings = set_target_filters(&*repos.filters, 1, vec!["  ".to_string()])
            .await
            .unwrap();
        assert!(settings.target_list().is_empty());
    }

    #[tokio::test]
    async fn test_distance_must_be_positive_and_finite() {
        let repos = Repositories::memory();
        assert!(set_distance_filter(&*repos.filters, 1, Some(0.0)).await.is_err());
        assert!(set_distance_filter(&*repos.filters, 1, Some(-3.0)).await.is_err());
        assert!(set_distance_filter(&*repos.filters, 1, Some(f64::NAN)).await.is_err());
        assert!(set_distance_filter(&*repos.filters, 1, None).await.is_ok());
    }
}
