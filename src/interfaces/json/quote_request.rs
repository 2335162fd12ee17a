use crate::domain::package::{AiLevel, StorageLabel};
use crate::domain::selection::SelectedOptions;
use crate::error::{PricingError, Result, TierKind};
use serde::Deserialize;

/// Body of a price calculation request, as submitted by the storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub package_slug: Option<String>,
    #[serde(default)]
    pub options: RawOptions,
    /// Accepted for compatibility; promotions are not priced here.
    #[serde(default)]
    pub promo_code: Option<String>,
}

impl QuoteRequest {
    pub fn slug(&self) -> Result<&str> {
        match self.package_slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Ok(slug),
            _ => Err(PricingError::InvalidSelection(
                "package slug is required".to_string(),
            )),
        }
    }

    pub fn selection(&self) -> Result<SelectedOptions> {
        SelectedOptions::try_from(&self.options)
    }
}

/// Options exactly as they arrive over the wire, before any checking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    #[serde(default)]
    pub cameras: Option<i64>,
    #[serde(default)]
    pub ai_detection: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(default, alias = "installationIncluded")]
    pub installation: Option<bool>,
    #[serde(default)]
    pub maintenance: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TryFrom<&RawOptions> for SelectedOptions {
    type Error = PricingError;

    fn try_from(raw: &RawOptions) -> Result<Self> {
        let cameras = raw
            .cameras
            .map(|n| {
                u32::try_from(n).map_err(|_| {
                    PricingError::InvalidSelection(format!(
                        "cameras must be a non-negative whole number (got {})",
                        n
                    ))
                })
            })
            .transpose()?;

        let ai_detection = non_empty(&raw.ai_detection)
            .map(|level| {
                AiLevel::parse(level).ok_or_else(|| PricingError::UnknownTier {
                    kind: TierKind::Ai,
                    tier: level.to_string(),
                })
            })
            .transpose()?;

        Ok(SelectedOptions {
            cameras,
            ai_detection,
            storage: non_empty(&raw.storage).map(StorageLabel::new),
            selected_addon_ids: raw
                .addons
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            include_installation: raw.installation.unwrap_or(false),
            include_maintenance: raw.maintenance.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_storefront_body() {
        let body = r#"{
            "packageSlug": "house-pro",
            "options": {
                "cameras": 8,
                "aiDetection": "enterprise",
                "storage": "8TB",
                "addons": ["alarm-house", "ups-pro-house", "alarm-house"],
                "installationIncluded": true,
                "maintenance": true
            },
            "promoCode": "SPRING"
        }"#;
        let request: QuoteRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.slug().unwrap(), "house-pro");

        let selection = request.selection().unwrap();
        assert_eq!(selection.cameras, Some(8));
        assert_eq!(selection.ai_detection, Some(AiLevel::Enterprise));
        assert_eq!(selection.storage, Some(StorageLabel::new("8TB")));
        assert_eq!(selection.selected_addon_ids.len(), 2);
        assert!(selection.include_installation);
        assert!(selection.include_maintenance);
    }

    #[test]
    fn test_missing_options_mean_no_charge() {
        let request: QuoteRequest =
            serde_json::from_str(r#"{ "packageSlug": "apartment-basic" }"#).unwrap();
        assert_eq!(request.selection().unwrap(), SelectedOptions::default());
    }

    #[test]
    fn test_blank_strings_are_ignored() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{ "packageSlug": "x", "options": { "aiDetection": "", "storage": " " } }"#,
        )
        .unwrap();
        let selection = request.selection().unwrap();
        assert!(selection.ai_detection.is_none());
        assert!(selection.storage.is_none());
    }

    #[test]
    fn test_slug_required() {
        let request: QuoteRequest = serde_json::from_str(r#"{ "options": {} }"#).unwrap();
        assert!(matches!(
            request.slug(),
            Err(PricingError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_negative_cameras() {
        let raw = RawOptions {
            cameras: Some(-2),
            ..Default::default()
        };
        assert!(matches!(
            SelectedOptions::try_from(&raw),
            Err(PricingError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_unknown_ai_level() {
        let raw = RawOptions {
            ai_detection: Some("psychic".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SelectedOptions::try_from(&raw),
            Err(PricingError::UnknownTier { kind: TierKind::Ai, .. })
        ));
    }
}
