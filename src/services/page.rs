use crate::cache::ScopedCache;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::page::PageContent;
use crate::utils::time::current_timestamp_seconds;

pub const PAGES_SCOPE: &str = "pages";

fn slug_cache_key(slug: &str) -> String {
    format!("pages:slug:{}", slug)
}

pub struct PageService<'a> {
    db: &'a Database,
    cache: &'a ScopedCache,
}

impl<'a> PageService<'a> {
    pub fn new(db: &'a Database, cache: &'a ScopedCache) -> Self {
        PageService { db, cache }
    }

    /// Absent content is an explicit `None`, not an error; callers must be
    /// able to tell "no content yet" apart from a fetch failure.
    pub async fn get(&self, slug: &str) -> AppResult<Option<PageContent>> {
        let cache_key = slug_cache_key(slug);
        if let Some(cached) = self.cache.get::<Option<PageContent>>(&cache_key).await {
            return Ok(cached);
        }

        let page = sqlx::query_as::<_, PageContent>(
            r#"
            SELECT id, page_slug, page_title, content, created_at, updated_at
            FROM page_content
            WHERE page_slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.db.pool)
        .await?;

        self.cache.set(PAGES_SCOPE, &cache_key, &page).await;

        Ok(page)
    }

    pub async fn list_all(&self) -> AppResult<Vec<PageContent>> {
        if let Some(cached) = self.cache.get::<Vec<PageContent>>("pages:list").await {
            return Ok(cached);
        }

        let pages = sqlx::query_as::<_, PageContent>(
            r#"
            SELECT id, page_slug, page_title, content, created_at, updated_at
            FROM page_content
            ORDER BY page_title ASC
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        self.cache.set(PAGES_SCOPE, "pages:list", &pages).await;

        Ok(pages)
    }

    /// Wholesale replace of the content document. Pages are seeded out of
    /// band; this layer never creates rows, so a missing slug is an error.
    pub async fn update(&self, slug: &str, content: &serde_json::Value) -> AppResult<PageContent> {
        let now = current_timestamp_seconds();

        let result = sqlx::query(
            r#"
            UPDATE page_content
            SET content = $1, updated_at = $2
            WHERE page_slug = $3
            "#,
        )
        .bind(content)
        .bind(now)
        .bind(slug)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Page '{}' not found", slug)));
        }

        self.cache.invalidate_key(&slug_cache_key(slug)).await;
        self.cache.invalidate_key("pages:list").await;

        self.get(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page '{}' not found", slug)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, body: &str) -> PageContent {
        PageContent {
            id: format!("id-{}", slug),
            page_slug: slug.to_string(),
            page_title: slug.to_string(),
            content: serde_json::json!({ "body": body }),
            created_at: 0,
            updated_at: 0,
        }
    }

    // `update` re-reads through `get`, so a read right after a write must not
    // be served the pre-write document out of the cache.
    #[tokio::test]
    async fn test_update_drops_stale_cached_document() {
        let cache = ScopedCache::new(None);
        let stale = Some(page("news", "old body"));
        cache.set(PAGES_SCOPE, &slug_cache_key("news"), &stale).await;
        cache
            .set(PAGES_SCOPE, "pages:list", &vec![page("news", "old body")])
            .await;

        // What `update` does after the row is written.
        cache.invalidate_key(&slug_cache_key("news")).await;
        cache.invalidate_key("pages:list").await;

        let cached: Option<Option<PageContent>> = cache.get(&slug_cache_key("news")).await;
        assert_eq!(cached, None);
        let list: Option<Vec<PageContent>> = cache.get("pages:list").await;
        assert_eq!(list, None);
    }

    #[tokio::test]
    async fn test_update_leaves_other_slugs_cached() {
        let cache = ScopedCache::new(None);
        cache
            .set(PAGES_SCOPE, &slug_cache_key("about"), &Some(page("about", "about body")))
            .await;

        cache.invalidate_key(&slug_cache_key("news")).await;

        let cached: Option<Option<PageContent>> = cache.get(&slug_cache_key("about")).await;
        assert_eq!(cached, Some(Some(page("about", "about body"))));
    }
}
