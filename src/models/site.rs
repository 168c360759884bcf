//! Typed view of the raw settings map.
//!
//! String-encoded settings are parsed exactly once, here, when a consumer
//! asks for its config; renderers never re-interpret raw values themselves.

use crate::models::setting::SettingsMap;
use crate::utils::text::{split_list, LIST_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Screen corner for the floating call-to-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CtaPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl CtaPosition {
    /// Unrecognized or absent tokens fall back to the default corner.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("bottom-right") => CtaPosition::BottomRight,
            Some("bottom-left") => CtaPosition::BottomLeft,
            Some("top-right") => CtaPosition::TopRight,
            Some("top-left") => CtaPosition::TopLeft,
            _ => CtaPosition::BottomRight,
        }
    }
}

/// Only the exact string "true" enables a boolean setting; NULL, absent and
/// every other value disable it.
pub fn parse_flag(map: &SettingsMap, key: &str) -> bool {
    matches!(raw(map, key), Some("true"))
}

fn raw<'a>(map: &'a SettingsMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(|v| v.as_deref())
}

fn text_or(map: &SettingsMap, key: &str, fallback: &str) -> String {
    raw(map, key).unwrap_or(fallback).to_string()
}

/// Scrolling news ticker shown on public pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    pub enabled: bool,
    pub items: Vec<String>,
}

impl TickerConfig {
    pub fn from_map(map: &SettingsMap) -> Self {
        TickerConfig {
            enabled: parse_flag(map, "ticker_enabled"),
            items: raw(map, "ticker_items")
                .map(|v| split_list(v, LIST_SEPARATOR))
                .unwrap_or_default(),
        }
    }
}

/// Floating call-to-action button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingCtaConfig {
    pub enabled: bool,
    pub position: CtaPosition,
    pub label: String,
    pub href: String,
}

impl FloatingCtaConfig {
    pub fn from_map(map: &SettingsMap) -> Self {
        FloatingCtaConfig {
            enabled: parse_flag(map, "cta_enabled"),
            position: CtaPosition::parse(raw(map, "cta_position")),
            label: text_or(map, "cta_label", "Support our work"),
            href: text_or(map, "cta_href", "/donations"),
        }
    }
}

/// Everything the public rendering surfaces need, derived in one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub ticker: TickerConfig,
    pub floating_cta: FloatingCtaConfig,
}

impl SiteConfig {
    pub fn from_map(map: &SettingsMap) -> Self {
        SiteConfig {
            ticker: TickerConfig::from_map(map),
            floating_cta: FloatingCtaConfig::from_map(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Option<&str>)]) -> SettingsMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
            .collect()
    }

    #[test]
    fn test_flag_only_exact_true_enables() {
        let m = map(&[
            ("a", Some("true")),
            ("b", Some("false")),
            ("c", Some("TRUE")),
            ("d", Some("yes")),
            ("e", None),
        ]);
        assert!(parse_flag(&m, "a"));
        assert!(!parse_flag(&m, "b"));
        assert!(!parse_flag(&m, "c"));
        assert!(!parse_flag(&m, "d"));
        assert!(!parse_flag(&m, "e"));
        assert!(!parse_flag(&m, "missing"));
    }

    #[test]
    fn test_position_fallback_on_unknown_token() {
        assert_eq!(CtaPosition::parse(Some("top-left")), CtaPosition::TopLeft);
        assert_eq!(
            CtaPosition::parse(Some("middle")),
            CtaPosition::BottomRight
        );
        assert_eq!(CtaPosition::parse(None), CtaPosition::BottomRight);
    }

    #[test]
    fn test_ticker_items_derived_from_delimited_string() {
        let m = map(&[
            ("ticker_enabled", Some("true")),
            ("ticker_items", Some("Open house • New term •  • Donations")),
        ]);
        let ticker = TickerConfig::from_map(&m);
        assert!(ticker.enabled);
        assert_eq!(ticker.items, vec!["Open house", "New term", "Donations"]);
    }

    #[test]
    fn test_cta_text_fallbacks() {
        let cta = FloatingCtaConfig::from_map(&map(&[("cta_label", None)]));
        assert!(!cta.enabled);
        assert_eq!(cta.label, "Support our work");
        assert_eq!(cta.href, "/donations");
        assert_eq!(cta.position, CtaPosition::BottomRight);
    }
}
