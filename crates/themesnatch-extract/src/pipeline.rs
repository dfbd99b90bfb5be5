//! The extraction run: sample, aggregate, detect, filter, merge, label.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::aggregate::Aggregation;
use crate::components::detect_components;
use crate::config::ExtractionConfig;
use crate::document::Document;
use crate::error::{ConfigError, Result};
use crate::filter::{detect_dark_mode, ColorFilter};
use crate::roles::{assign_color_roles, assign_font_roles};
use crate::sampler::Sampler;
use crate::theme::{ColorCandidate, ThemeSnapshot};
use crate::variables::{merge_variable_colors, variable_colors};

/// A validated configuration with its selector tables compiled.
///
/// One extractor can serve any number of documents; each call to
/// [`Extractor::extract`] owns its own aggregation state.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    sampler: Sampler,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let sampler = Sampler::new(&config);
        Ok(Extractor { config, sampler })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Infers the theme of `doc`.
    pub fn extract(&self, doc: &Document) -> ThemeSnapshot {
        let config = &self.config;

        let sampled = self.sampler.sample(doc);
        let mut aggregation = Aggregation::new(config);
        for element in &sampled {
            aggregation.observe(element);
        }
        let aggregated = aggregation.finish();

        let components = detect_components(doc, config);
        let inferred = ColorFilter::new(config, &self.sampler).apply(doc, aggregated.colors);
        let is_dark_mode = detect_dark_mode(doc, config);

        let mut colors = merge_variable_colors(inferred, variable_colors(doc, config));
        assign_color_roles(&mut colors);
        let colors = cap_palette(colors, config.max_colors);

        let mut fonts = aggregated.fonts;
        assign_font_roles(&mut fonts, config.max_accent_fonts);

        let theme = ThemeSnapshot {
            colors,
            fonts,
            spacing: aggregated.spacing,
            components,
            timestamp: doc.timestamp().unwrap_or_else(now_millis),
            url: doc.url().to_string(),
            is_dark_mode: Some(is_dark_mode),
        };

        info!(
            url = theme.url.as_str(),
            sampled = sampled.len(),
            colors = theme.colors.len(),
            fonts = theme.fonts.len(),
            spacing = theme.spacing.len(),
            components = theme.components.len(),
            dark = is_dark_mode,
            "extracted theme"
        );
        theme
    }
}

/// Runs one extraction with `config`.
pub fn extract_theme(doc: &Document, config: ExtractionConfig) -> Result<ThemeSnapshot> {
    Ok(Extractor::new(config)?.extract(doc))
}

/// Limits the palette to `max` colors, never dropping a color that holds a
/// role. Order is preserved.
fn cap_palette(colors: Vec<ColorCandidate>, max: usize) -> Vec<ColorCandidate> {
    let roled = colors.iter().filter(|c| c.role.is_some()).count();
    let mut free = max.saturating_sub(roled);
    colors
        .into_iter()
        .filter(|c| {
            if c.role.is_some() {
                return true;
            }
            if free == 0 {
                return false;
            }
            free -= 1;
            true
        })
        .collect()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
