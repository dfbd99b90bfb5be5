//! Semantic role assignment.
//!
//! Roles are handed out in two passes. Custom-property colors whose name
//! carries a role keyword claim that role first, so an author's
//! `--brand-primary` always beats whatever the heuristics would pick. The
//! inferred pass then fills the remaining roles from structural evidence,
//! walking candidates from most to least frequent.
//!
//! A color role is held by at most one candidate.

use std::collections::BTreeSet;

use tracing::debug;

use crate::context::Context;
use crate::theme::{ColorCandidate, ColorCategory, ColorRole, FontCandidate, FontCategory, FontRole};

/// Name fragments that select a role, checked in this order.
const ROLE_KEYWORDS: [(&[&str], ColorRole); 7] = [
    (&["background", "bg"], ColorRole::Background),
    (&["surface"], ColorRole::Surface),
    (&["text", "foreground", "fg"], ColorRole::Text),
    (&["border"], ColorRole::Border),
    (&["primary"], ColorRole::Primary),
    (&["secondary"], ColorRole::Secondary),
    (&["accent"], ColorRole::Accent),
];

/// Role implied by a custom property name, if any.
pub fn keyword_role(name: &str) -> Option<ColorRole> {
    let name = name.to_ascii_lowercase();
    let role = ROLE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, role)| *role)?;

    // `--text-muted`, `--fg-secondary`
    if role == ColorRole::Text && (name.contains("secondary") || name.contains("muted")) {
        return Some(ColorRole::TextSecondary);
    }
    Some(role)
}

/// Tracks which roles are taken and hands out the free ones.
struct RoleBook<'a> {
    colors: &'a mut [ColorCandidate],
    /// Candidate indices, highest frequency first.
    ranked: Vec<usize>,
    taken: BTreeSet<ColorRole>,
}

impl<'a> RoleBook<'a> {
    fn new(colors: &'a mut [ColorCandidate], passed_over: &[usize]) -> Self {
        let mut ranked: Vec<usize> = (0..colors.len())
            .filter(|i| !passed_over.contains(i))
            .collect();
        ranked.sort_by(|&a, &b| colors[b].frequency.cmp(&colors[a].frequency));
        let taken = colors.iter().filter_map(|c| c.role).collect();
        RoleBook {
            colors,
            ranked,
            taken,
        }
    }

    /// Fills each free role in `roles`, in order, with the next unassigned
    /// candidate satisfying `wants`.
    fn fill(&mut self, roles: &[ColorRole], wants: impl Fn(&ColorCandidate) -> bool) {
        for &role in roles {
            if self.taken.contains(&role) {
                continue;
            }
            let next = self
                .ranked
                .iter()
                .copied()
                .find(|&i| self.colors[i].role.is_none() && wants(&self.colors[i]));
            if let Some(i) = next {
                self.colors[i].role = Some(role);
                self.taken.insert(role);
            }
        }
    }
}

/// Tags color candidates with roles in place.
///
/// A variable whose keyword role is already taken keeps only its name and
/// does not take part in inference.
pub fn assign_color_roles(colors: &mut [ColorCandidate]) {
    let mut taken = BTreeSet::new();
    let mut passed_over = Vec::new();
    for (index, candidate) in colors.iter_mut().enumerate() {
        let Some(name) = candidate.source_variable_name.as_deref() else {
            continue;
        };
        match keyword_role(name) {
            Some(role) if taken.insert(role) => candidate.role = Some(role),
            Some(role) => {
                debug!(variable = name, role = %role, "role already taken");
                passed_over.push(index);
            }
            None => {}
        }
    }

    let mut book = RoleBook::new(colors, &passed_over);
    book.fill(&[ColorRole::Button], |c| c.contexts.contains(&Context::Button));
    book.fill(&[ColorRole::Background, ColorRole::Surface], |c| {
        c.category == ColorCategory::Background
    });
    book.fill(&[ColorRole::Text, ColorRole::TextSecondary], |c| {
        c.category == ColorCategory::Text
    });
    book.fill(&[ColorRole::Primary], is_prominent);
    book.fill(&[ColorRole::Secondary, ColorRole::Accent], |c| {
        is_prominent(c) || c.category == ColorCategory::Accent
    });
    book.fill(&[ColorRole::Border], |c| c.category == ColorCategory::Border);
}

/// Seen in a heading or in navigation.
fn is_prominent(candidate: &ColorCandidate) -> bool {
    candidate.contexts.contains(&Context::Heading)
        || candidate.contexts.contains(&Context::Navigation)
}

/// Tags font candidates with roles in place.
///
/// Fonts are expected in rank order. Heading and body take the first font of
/// their category, mono the first monospace-looking family, and up to
/// `max_accent` further families become accents.
pub fn assign_font_roles(fonts: &mut [FontCandidate], max_accent: usize) {
    if let Some(font) = fonts.iter_mut().find(|f| f.category == FontCategory::Heading) {
        font.role = Some(FontRole::Heading);
    }
    if let Some(font) = fonts
        .iter_mut()
        .find(|f| f.role.is_none() && f.category == FontCategory::Body)
    {
        font.role = Some(FontRole::Body);
    }
    if let Some(font) = fonts.iter_mut().find(|f| f.role.is_none() && f.is_mono()) {
        font.role = Some(FontRole::Mono);
    }

    let mut seen: BTreeSet<String> = fonts
        .iter()
        .filter(|f| f.role.is_some())
        .map(|f| f.family.to_ascii_lowercase())
        .collect();
    let mut accents = 0;
    for font in fonts.iter_mut().filter(|f| f.role.is_none()) {
        if accents == max_accent {
            break;
        }
        if seen.insert(font.family.to_ascii_lowercase()) {
            font.role = Some(FontRole::Accent);
            accents += 1;
        }
    }
}
