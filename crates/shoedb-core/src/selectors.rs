use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// CSS selectors for one listing item and its sub-fields.
///
/// Every field has a default matching the current catalog markup. A YAML file
/// may override any subset, which is the fix path when the storefront renames
/// its generated class names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub item_container: String,
    pub brand: String,
    pub name: String,
    pub original_price: String,
    pub discount: String,
    pub discounted_price: String,
    pub reviews_count: String,
    pub promotions: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item_container: ".css-f4s3gt".to_string(),
            brand: ".css-wfg91f span".to_string(),
            name: ".aqa-item-name".to_string(),
            original_price: ".css-1hu3vxw".to_string(),
            discount: ".css-1yjzpb2".to_string(),
            discounted_price: ".css-1xczz6l".to_string(),
            reviews_count: ".reviews-count".to_string(),
            promotions: ".e1i0l88z7".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Pairs of `(field, selector)` in a stable order, for validation and logging.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("item_container", self.item_container.as_str()),
            ("brand", self.brand.as_str()),
            ("name", self.name.as_str()),
            ("original_price", self.original_price.as_str()),
            ("discount", self.discount.as_str()),
            ("discounted_price", self.discounted_price.as_str()),
            ("reviews_count", self.reviews_count.as_str()),
            ("promotions", self.promotions.as_str()),
        ]
    }
}

/// Load selector overrides from a YAML file, falling back to defaults for
/// any field the file omits.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains a
/// blank selector.
pub fn load_selectors(path: &Path) -> Result<SelectorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SelectorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let selectors: SelectorConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::SelectorsFileParse)?;

    validate_selectors(&selectors)?;

    Ok(selectors)
}

fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in selectors.fields() {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{field}' must be non-empty"
            )));
        }
    }
    Ok(())
}
