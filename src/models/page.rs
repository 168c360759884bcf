use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `page_content` table. The shape of `content` is a contract
/// between each page's renderer and its editor form; the store does not
/// enforce a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PageContent {
    pub id: String,
    pub page_slug: String,
    pub page_title: String,
    pub content: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Full-document replace form; field-level patching is not supported.
#[derive(Debug, Deserialize)]
pub struct PageContentUpdateForm {
    pub content: serde_json::Value,
}

/// Explicit "none" result for `GET /pages/{slug}`: callers must be able to
/// tell "page has no content yet" apart from a fetch failure.
#[derive(Debug, Serialize)]
pub struct PageContentResponse {
    pub page_slug: String,
    pub content: Option<PageContent>,
}
