//! Chooses which elements get their styles read.

use themesnatch_css::SelectorElement;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::document::{Document, ElementRef};
use crate::selectors::{SelectorSet, DESIGN_RELEVANT, KEY_ELEMENTS, NON_CONTENT, OPAQUE_CONTAINERS};

/// Class-name fragments that raise an element's priority.
const DESIGN_KEYWORDS: [&str; 8] = ["btn", "button", "card", "panel", "nav", "menu", "hero", "banner"];

/// Element selection and ordering for one run.
#[derive(Debug, Clone)]
pub struct Sampler {
    key: SelectorSet,
    relevant: SelectorSet,
    non_content: SelectorSet,
    opaque: SelectorSet,
    ads: SelectorSet,
    media: SelectorSet,
    interactive: SelectorSet,
    heading: SelectorSet,
    navigation: SelectorSet,
    card: SelectorSet,
    landmark: SelectorSet,
}

impl Sampler {
    pub fn new(config: &ExtractionConfig) -> Self {
        Sampler {
            key: SelectorSet::compile(KEY_ELEMENTS),
            relevant: SelectorSet::compile(DESIGN_RELEVANT),
            non_content: SelectorSet::compile(NON_CONTENT),
            opaque: SelectorSet::compile(OPAQUE_CONTAINERS),
            ads: SelectorSet::compile(&config.ad_selectors),
            media: SelectorSet::compile(&config.media_selectors),
            interactive: SelectorSet::compile(["button, input, select, textarea, a"]),
            heading: SelectorSet::compile(["h1, h2, h3, h4, h5, h6"]),
            navigation: SelectorSet::compile([r#"nav, [class*="nav"], [class*="menu"]"#]),
            card: SelectorSet::compile([r#"[class*="card"], [class*="panel"]"#]),
            landmark: SelectorSet::compile(["header, footer, main, section, article"]),
        }
    }

    /// Elements eligible for sampling, highest design priority first.
    ///
    /// Ties keep document order.
    pub fn sample<'a>(&self, doc: &'a Document) -> Vec<ElementRef<'a>> {
        let mut scored: Vec<(u32, ElementRef<'a>)> = doc
            .elements()
            .filter(|el| self.key.matches(el))
            .filter(|el| el.is_visible() && self.is_content(el))
            .filter(|el| !self.is_ad(el) && !self.is_media(el))
            .filter(|el| self.relevant.matches(el))
            .map(|el| (self.design_priority(&el), el))
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        debug!(
            total = doc.len(),
            sampled = scored.len(),
            "selected elements for sampling"
        );
        scored.into_iter().map(|(_, el)| el).collect()
    }

    /// Not a metadata element and not nested inside one that hides content.
    pub fn is_content(&self, element: &ElementRef<'_>) -> bool {
        !self.non_content.matches(element) && !self.opaque.matches_self_or_ancestor(element)
    }

    /// The element or an ancestor looks like an advertisement.
    pub fn is_ad(&self, element: &ElementRef<'_>) -> bool {
        self.ads.matches_self_or_ancestor(element)
    }

    /// Images, icons, code blocks and other non-design elements.
    pub fn is_media(&self, element: &ElementRef<'_>) -> bool {
        self.media.matches(element)
    }

    /// Sums the weights of every category the element falls into.
    pub fn design_priority(&self, element: &ElementRef<'_>) -> u32 {
        let mut priority = 0;
        if self.interactive.matches(element) {
            priority += 10;
        }
        if self.heading.matches(element) {
            priority += 8;
        }
        if self.navigation.matches(element) {
            priority += 7;
        }
        if self.card.matches(element) {
            priority += 6;
        }
        if self.landmark.matches(element) {
            priority += 5;
        }
        let classes = element.attribute("class").unwrap_or_default();
        priority
            + DESIGN_KEYWORDS
                .iter()
                .filter(|keyword| classes.contains(*keyword))
                .count() as u32
                * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentSnapshot, ElementData};

    fn visible(tag: &str, parent: usize) -> ElementData {
        ElementData::new(tag).with_parent(parent).with_rect(100.0, 20.0)
    }

    fn doc() -> Document {
        Document::new(DocumentSnapshot {
            elements: vec![
                ElementData::new("html").with_rect(1000.0, 1000.0), // 0
                visible("body", 0),                                  // 1
                visible("p", 1),                                     // 2
                visible("button", 1).with_class("btn"),              // 3
                visible("h1", 1),                                    // 4
                visible("div", 1).with_class("ad-banner"),           // 5
                visible("span", 5),                                  // 6
                visible("img", 1),                                   // 7
                visible("div", 1).with_class("icon-star"),           // 8
                visible("span", 1).with_style("display", "none"),    // 9
                visible("noscript", 1),                              // 10
                visible("div", 10),                                  // 11
                visible("a", 1),                                     // 12
                visible("div", 1).with_class("card"),                // 13
            ],
            ..Default::default()
        })
        .unwrap()
    }

    fn sampled(doc: &Document) -> Vec<usize> {
        Sampler::new(&ExtractionConfig::default())
            .sample(doc)
            .iter()
            .map(|el| el.index())
            .collect()
    }

    #[test]
    fn test_sample_order_and_exclusions() {
        let doc = doc();
        // button (10 + 2), then h1 (8) and card (6 + 2) in document order, p (0).
        // `a` is a key element but not design-relevant.
        assert_eq!(sampled(&doc), vec![3, 4, 13, 2]);
    }

    #[test]
    fn test_every_eligible_element_sampled() {
        let mut elements = vec![ElementData::new("html").with_rect(1000.0, 1000.0)];
        elements.extend((0..500).map(|_| visible("p", 0)));
        let doc = Document::new(DocumentSnapshot {
            elements,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sampled(&doc).len(), 500);
    }

    #[test]
    fn test_ad_ancestry() {
        let doc = doc();
        let sampler = Sampler::new(&ExtractionConfig::default());
        assert!(sampler.is_ad(&doc.element(6).unwrap()));
        assert!(!sampler.is_ad(&doc.element(2).unwrap()));
    }

    #[test]
    fn test_media() {
        let doc = doc();
        let sampler = Sampler::new(&ExtractionConfig::default());
        assert!(sampler.is_media(&doc.element(7).unwrap()));
        assert!(sampler.is_media(&doc.element(8).unwrap()));
        assert!(!sampler.is_media(&doc.element(2).unwrap()));
    }

    #[test]
    fn test_ad_selectors_do_not_overmatch() {
        let doc = Document::new(DocumentSnapshot {
            elements: vec![
                ElementData::new("div").with_class("header").with_class("shadow"),
                ElementData::new("div").with_parent(0).with_class("ads").with_id("x"),
            ],
            ..Default::default()
        })
        .unwrap();
        let sampler = Sampler::new(&ExtractionConfig::default());
        assert!(!sampler.is_ad(&doc.element(0).unwrap()));
        assert!(sampler.is_ad(&doc.element(1).unwrap()));
    }

    #[test]
    fn test_opaque_containers_hide_descendants() {
        let doc = doc();
        let sampler = Sampler::new(&ExtractionConfig::default());
        assert!(!sampler.is_content(&doc.element(11).unwrap()));
        assert!(sampler.is_content(&doc.element(2).unwrap()));
    }
}
