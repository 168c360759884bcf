use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// One row of the `site_setting` table.
///
/// `value` is the only payload the API mutates; it is free text and any
/// typing (boolean flags, enums, delimited lists) is applied at the parse
/// boundary in `models::site`, not here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub id: String,
    pub key: String,
    pub value: Option<String>,
    pub label: String,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Derived map projection of the settings table: key -> raw value.
/// Keys whose value is NULL map to `None` rather than being omitted.
pub type SettingsMap = HashMap<String, Option<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct SettingUpdateForm {
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingBatchUpdateForm {
    pub updates: Vec<SettingKeyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingKeyValue {
    pub key: String,
    pub value: Option<String>,
}
