//! Noise and relevance filtering of aggregated colors, plus dark-mode detection.

use themesnatch_css::{parse_color, parse_color_alpha, Rgb};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::document::{Document, ElementRef};
use crate::sampler::Sampler;
use crate::theme::ColorCandidate;

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Some contributing element is an advertisement.
    Advertisement,
    /// Every contributing element is media or decoration.
    Media,
    LowFrequency,
    BrowserDefault,
    /// Rare, confined to one structural group, and close to black or white.
    NotIntentional,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Advertisement => "advertisement",
            Rejection::Media => "media",
            Rejection::LowFrequency => "low frequency",
            Rejection::BrowserDefault => "browser default",
            Rejection::NotIntentional => "not intentional",
        }
    }
}

/// Applies the filter steps in order. Variable-sourced candidates are never
/// rejected.
#[derive(Debug)]
pub struct ColorFilter<'a> {
    config: &'a ExtractionConfig,
    sampler: &'a Sampler,
    defaults: Vec<Rgb>,
}

impl<'a> ColorFilter<'a> {
    pub fn new(config: &'a ExtractionConfig, sampler: &'a Sampler) -> Self {
        let defaults = config
            .browser_default_colors
            .iter()
            .filter_map(|value| match parse_color(value) {
                Ok(rgb) => Some(rgb),
                Err(err) => {
                    debug!(value = value.as_str(), error = %err, "ignoring browser default color");
                    None
                }
            })
            .collect();
        ColorFilter {
            config,
            sampler,
            defaults,
        }
    }

    /// Returns the first rule that rejects `candidate`, if any.
    pub fn verdict(&self, doc: &Document, candidate: &ColorCandidate) -> Option<Rejection> {
        if candidate.is_variable() {
            return None;
        }
        if any_source(doc, candidate, |el| self.sampler.is_ad(el)) {
            return Some(Rejection::Advertisement);
        }
        if all_sources(doc, candidate, |el| self.sampler.is_media(el)) {
            return Some(Rejection::Media);
        }
        if candidate.frequency < self.config.min_frequency {
            return Some(Rejection::LowFrequency);
        }
        if self.defaults.contains(&candidate.rgb) {
            return Some(Rejection::BrowserDefault);
        }
        if !self.is_intentional(candidate) {
            return Some(Rejection::NotIntentional);
        }
        None
    }

    fn is_intentional(&self, candidate: &ColorCandidate) -> bool {
        let config = self.config;
        if candidate.frequency >= config.intentional_frequency {
            return true;
        }
        if candidate.context_groups().len() >= config.min_context_groups {
            return true;
        }
        candidate.rgb.distance(Rgb::WHITE) > config.min_extreme_distance
            && candidate.rgb.distance(Rgb::BLACK) > config.min_extreme_distance
    }

    /// Keeps the candidates no rule rejects, preserving order.
    pub fn apply(&self, doc: &Document, candidates: Vec<ColorCandidate>) -> Vec<ColorCandidate> {
        let before = candidates.len();
        let kept: Vec<ColorCandidate> = candidates
            .into_iter()
            .filter(|candidate| match self.verdict(doc, candidate) {
                Some(reason) => {
                    debug!(color = candidate.value.as_str(), reason = reason.as_str(), "filtered color");
                    false
                }
                None => true,
            })
            .collect();
        debug!(before, after = kept.len(), "color filter finished");
        kept
    }
}

/// True when at least one contributor satisfies `test`.
fn any_source(
    doc: &Document,
    candidate: &ColorCandidate,
    test: impl Fn(&ElementRef<'_>) -> bool,
) -> bool {
    candidate
        .sources
        .iter()
        .filter_map(|&index| doc.element(index))
        .any(|el| test(&el))
}

/// True when the candidate has contributors and all of them satisfy `test`.
fn all_sources(
    doc: &Document,
    candidate: &ColorCandidate,
    test: impl Fn(&ElementRef<'_>) -> bool,
) -> bool {
    !candidate.sources.is_empty()
        && candidate
            .sources
            .iter()
            .filter_map(|&index| doc.element(index))
            .all(|el| test(&el))
}

/// Decides whether the page renders dark.
///
/// The body background is checked first, then the root's. Transparent or
/// missing backgrounds are skipped. Without a dark background, a dark-mode
/// class on either element decides.
pub fn detect_dark_mode(doc: &Document, config: &ExtractionConfig) -> bool {
    let candidates: Vec<ElementRef<'_>> = [doc.body(), doc.root()].into_iter().flatten().collect();

    for element in &candidates {
        let background = element.style("background-color").trim();
        if background.is_empty() {
            continue;
        }
        match parse_color_alpha(background) {
            Ok(color) if color.is_transparent() => {}
            Ok(color) => {
                if color.rgb.brightness() < config.dark_brightness {
                    return true;
                }
            }
            Err(err) => debug!(background, error = %err, "unreadable page background"),
        }
    }

    candidates.iter().any(|element| {
        config
            .dark_mode_classes
            .iter()
            .any(|class| element.classes().iter().any(|c| c == class))
    })
}
