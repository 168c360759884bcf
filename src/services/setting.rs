use crate::cache::ScopedCache;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::setting::{SettingKeyValue, SettingsMap, SiteSetting};
use crate::utils::time::current_timestamp_seconds;

/// Cache scope shared by every projection of the settings table.
pub const SETTINGS_SCOPE: &str = "settings";

pub struct SettingService<'a> {
    db: &'a Database,
    cache: &'a ScopedCache,
}

impl<'a> SettingService<'a> {
    pub fn new(db: &'a Database, cache: &'a ScopedCache) -> Self {
        SettingService { db, cache }
    }

    pub async fn list(&self) -> AppResult<Vec<SiteSetting>> {
        if let Some(cached) = self.cache.get::<Vec<SiteSetting>>("settings:list").await {
            return Ok(cached);
        }

        let settings = sqlx::query_as::<_, SiteSetting>(
            r#"
            SELECT id, key, value, label, category, created_at, updated_at
            FROM site_setting
            ORDER BY category ASC, key ASC
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        self.cache
            .set(SETTINGS_SCOPE, "settings:list", &settings)
            .await;

        Ok(settings)
    }

    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<SiteSetting>> {
        let cache_key = format!("settings:category:{}", category);
        if let Some(cached) = self.cache.get::<Vec<SiteSetting>>(&cache_key).await {
            return Ok(cached);
        }

        let settings = sqlx::query_as::<_, SiteSetting>(
            r#"
            SELECT id, key, value, label, category, created_at, updated_at
            FROM site_setting
            WHERE category = $1
            ORDER BY key ASC
            "#,
        )
        .bind(category)
        .fetch_all(&self.db.pool)
        .await?;

        self.cache.set(SETTINGS_SCOPE, &cache_key, &settings).await;

        Ok(settings)
    }

    /// Exactly one row per key; duplicates violate the uniqueness invariant
    /// and are surfaced, not repaired.
    pub async fn get(&self, key: &str) -> AppResult<Option<SiteSetting>> {
        let rows = sqlx::query_as::<_, SiteSetting>(
            r#"
            SELECT id, key, value, label, category, created_at, updated_at
            FROM site_setting
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_all(&self.db.pool)
        .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.into_iter().next()),
            n => Err(AppError::Internal(format!(
                "Settings key '{}' matches {} rows",
                key, n
            ))),
        }
    }

    /// Derived map projection. Keys with a NULL value map to `None`, not
    /// omitted, so consumers can tell "unset" from "unknown key".
    pub async fn get_all_as_map(&self) -> AppResult<SettingsMap> {
        if let Some(cached) = self.cache.get::<SettingsMap>("settings:map").await {
            return Ok(cached);
        }

        let map = settings_to_map(self.list().await?);

        self.cache.set(SETTINGS_SCOPE, "settings:map", &map).await;

        Ok(map)
    }

    pub async fn update_one(&self, key: &str, value: Option<&str>) -> AppResult<SiteSetting> {
        self.update_value(key, value).await?;
        self.cache.invalidate(SETTINGS_SCOPE).await;

        self.get(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Setting '{}' not found", key)))
    }

    /// Applies every update concurrently. Any single failure fails the whole
    /// call, but writes that already landed are not rolled back; the cache
    /// scope is invalidated either way since some writes may have applied.
    pub async fn update_many(&self, updates: &[SettingKeyValue]) -> AppResult<()> {
        let futures = updates
            .iter()
            .map(|u| self.update_value(&u.key, u.value.as_deref()));

        let results = futures::future::join_all(futures).await;

        self.cache.invalidate(SETTINGS_SCOPE).await;

        first_batch_error(results)
    }

    async fn update_value(&self, key: &str, value: Option<&str>) -> AppResult<()> {
        let now = current_timestamp_seconds();

        let result = sqlx::query(
            r#"
            UPDATE site_setting
            SET value = $1, updated_at = $2
            WHERE key = $3
            "#,
        )
        .bind(value)
        .bind(now)
        .bind(key)
        .execute(&self.db.pool)
        .await?;

        check_updated_rows(key, result.rows_affected())
    }
}

/// Folds the full settings list into the derived map. Keys with a NULL value
/// fold to `None` rather than being dropped, so the map agrees with the list
/// on exactly which keys exist.
fn settings_to_map(settings: Vec<SiteSetting>) -> SettingsMap {
    settings.into_iter().map(|s| (s.key, s.value)).collect()
}

/// First-error-wins aggregation for the batch update: one failure fails the
/// whole call, while updates that already landed stay applied.
fn first_batch_error(results: Vec<AppResult<()>>) -> AppResult<()> {
    for result in results {
        result?;
    }
    Ok(())
}

/// Same uniqueness handling as `get`: zero rows is a missing key, more than
/// one is a broken invariant.
fn check_updated_rows(key: &str, rows_affected: u64) -> AppResult<()> {
    match rows_affected {
        0 => Err(AppError::NotFound(format!("Setting '{}' not found", key))),
        1 => Ok(()),
        n => Err(AppError::Internal(format!(
            "Settings key '{}' matches {} rows",
            key, n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(key: &str, value: Option<&str>) -> SiteSetting {
        SiteSetting {
            id: format!("id-{}", key),
            key: key.to_string(),
            value: value.map(|v| v.to_string()),
            label: key.to_string(),
            category: "general".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_map_agrees_with_list() {
        let list = vec![
            setting("site_name", Some("Example")),
            setting("ticker_enabled", Some("true")),
            setting("ticker_text", None),
        ];

        let map = settings_to_map(list.clone());

        assert_eq!(map.len(), list.len());
        for s in list {
            assert_eq!(map.get(&s.key), Some(&s.value));
        }
    }

    #[test]
    fn test_map_keeps_null_values_as_none() {
        let map = settings_to_map(vec![setting("ticker_text", None)]);

        assert!(map.contains_key("ticker_text"));
        assert_eq!(map["ticker_text"], None);
    }

    #[test]
    fn test_batch_reports_first_error_and_keeps_landed_writes() {
        // Positions 0 and 2 landed; aggregation must fail without undoing
        // them, so only the error is surfaced.
        let results = vec![
            Ok(()),
            Err(AppError::NotFound("Setting 'missing' not found".to_string())),
            Ok(()),
            Err(AppError::NotFound("Setting 'also_missing' not found".to_string())),
        ];

        let err = first_batch_error(results).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("'missing'")));
    }

    #[test]
    fn test_batch_of_successes_is_ok() {
        assert!(first_batch_error(vec![Ok(()), Ok(())]).is_ok());
        assert!(first_batch_error(Vec::new()).is_ok());
    }

    #[test]
    fn test_update_row_count_checks() {
        assert!(check_updated_rows("site_name", 1).is_ok());
        assert!(matches!(
            check_updated_rows("missing", 0),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            check_updated_rows("dup", 2),
            Err(AppError::Internal(_))
        ));
    }
}
