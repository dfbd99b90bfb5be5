//! Tunable constants of the extraction heuristics.
//!
//! Every empirical threshold lives here with its default. A YAML file only
//! needs to name the fields it overrides:
//!
//! ```yaml
//! cluster_threshold: 20
//! max_colors: 12
//! ad_selectors:
//!   - '[class*="sponsor"]'
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds, caps and selector tables for one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// RGB distance under which two colors merge.
    pub cluster_threshold: f64,
    pub max_colors: usize,
    pub max_fonts: usize,
    pub max_spacing: usize,
    pub max_components: usize,
    /// Colors below this brightness are treated as system noise.
    pub min_color_brightness: f64,
    /// Colors above this brightness are treated as system noise.
    pub max_color_brightness: f64,
    /// Spacing lengths must be below this many pixels.
    pub max_spacing_px: f64,
    /// Pixel size of `1rem` and `1em`.
    pub root_font_px: f64,
    /// Inferred colors seen fewer times than this are dropped.
    pub min_frequency: u32,
    /// Frequency at which a color counts as intentional on its own.
    pub intentional_frequency: u32,
    /// Number of structural context groups that marks a color as intentional.
    pub min_context_groups: usize,
    /// Distance from both white and black that marks a color as intentional.
    pub min_extreme_distance: f64,
    /// Literal colors browsers paint by default.
    pub browser_default_colors: Vec<String>,
    /// Background brightness below which the page is dark.
    pub dark_brightness: f64,
    pub dark_mode_classes: Vec<String>,
    pub hero_min_height: f64,
    pub hero_min_width: f64,
    /// Frequency given to colors declared as custom properties.
    pub variable_priority: u32,
    pub max_accent_fonts: usize,
    pub ad_selectors: Vec<String>,
    pub media_selectors: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            cluster_threshold: 25.0,
            max_colors: 20,
            max_fonts: 10,
            max_spacing: 12,
            max_components: 15,
            min_color_brightness: 10.0,
            max_color_brightness: 250.0,
            max_spacing_px: 200.0,
            root_font_px: themesnatch_css::DEFAULT_ROOT_FONT_PX,
            min_frequency: 2,
            intentional_frequency: 5,
            min_context_groups: 2,
            min_extreme_distance: 50.0,
            browser_default_colors: strings(&["#000000", "#ffffff", "#0000ee", "#551a8b", "#008000"]),
            dark_brightness: 128.0,
            dark_mode_classes: strings(&["dark", "dark-mode", "theme-dark", "night-mode"]),
            hero_min_height: 200.0,
            hero_min_width: 300.0,
            variable_priority: 1000,
            max_accent_fonts: 2,
            ad_selectors: strings(&[
                r#"[class~="ad"], [class~="ads"], [class^="ad-"], [class*=" ad-"]"#,
                r#"[class*="advert"], [class*="sponsor"], [class*="promo"]"#,
                r#"[id="ad"], [id^="ad-"], [id^="ad_"]"#,
                "[data-ad], [data-ad-slot]",
                r#"iframe[src*="doubleclick"], iframe[src*="googlesyndication"]"#,
                "ins.adsbygoogle",
            ]),
            media_selectors: strings(&[
                "img, video, canvas, svg, picture",
                r#"[class*="icon"], [class*="emoji"]"#,
                "code, pre",
            ]),
        }
    }
}

impl ExtractionConfig {
    /// Parses YAML, filling unnamed fields with defaults, then validates.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    /// Reads and parses a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, Some(path))
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("cluster_threshold", self.cluster_threshold),
            ("min_color_brightness", self.min_color_brightness),
            ("max_color_brightness", self.max_color_brightness),
            ("min_extreme_distance", self.min_extreme_distance),
            ("dark_brightness", self.dark_brightness),
            ("hero_min_height", self.hero_min_height),
            ("hero_min_width", self.hero_min_width),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }

        for (field, value) in [
            ("max_spacing_px", self.max_spacing_px),
            ("root_font_px", self.root_font_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                });
            }
        }

        if self.min_color_brightness > self.max_color_brightness {
            return Err(ConfigError::Invalid {
                field: "min_color_brightness",
                reason: "must not exceed max_color_brightness".into(),
            });
        }
        if self.variable_priority == 0 {
            return Err(ConfigError::Invalid {
                field: "variable_priority",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.cluster_threshold, 25.0);
        assert_eq!(config.max_colors, 20);
        assert_eq!(config.variable_priority, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ExtractionConfig::from_yaml("max_colors: 8\ncluster_threshold: 12.5\n").unwrap();
        assert_eq!(config.max_colors, 8);
        assert_eq!(config.cluster_threshold, 12.5);
        assert_eq!(config.max_fonts, 10);
        assert_eq!(config.dark_mode_classes.len(), 4);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            ExtractionConfig::from_yaml("  \n").unwrap(),
            ExtractionConfig::default()
        );
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ExtractionConfig::from_yaml("max_colors: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn test_wrong_type() {
        let err = ExtractionConfig::from_yaml("max_colors: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validation() {
        let err = ExtractionConfig::from_yaml("cluster_threshold: -1").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cluster_threshold",
                ..
            }
        ));

        let err = ExtractionConfig::from_yaml("min_color_brightness: 200\nmax_color_brightness: 100")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ExtractionConfig::from_yaml("root_font_px: 0").unwrap_err();
        assert!(err.to_string().contains("root_font_px"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_components: 3").unwrap();
        let config = ExtractionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.max_components, 3);
    }

    #[test]
    fn test_from_missing_path() {
        let err = ExtractionConfig::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
