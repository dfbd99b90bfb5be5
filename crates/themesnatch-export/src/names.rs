//! Token names for palette colors and roled fonts.

use std::collections::HashMap;

use themesnatch_css::{hue_family, Rgb};
use themesnatch_extract::{ColorCandidate, FontCandidate};

/// A palette color with its export name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub name: String,
    /// Lowercase `#rrggbb`.
    pub value: String,
    pub rgb: Rgb,
}

/// A roled font with its export name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFont {
    pub name: String,
    pub font: FontCandidate,
}

/// Names every palette color, in palette order.
///
/// The base name is the role, else the custom property name, else a status
/// name, else the hue family. Each status name goes to the first color of
/// its family. A base name already taken by a different value gets the next
/// free `-2`, `-3`, ... suffix; a repeat of the same value under the same
/// base name is emitted once.
pub fn name_colors(colors: &[ColorCandidate]) -> Vec<NamedColor> {
    let mut taken: HashMap<String, String> = HashMap::new();
    let mut statuses: HashMap<&'static str, String> = HashMap::new();
    let mut named = Vec::with_capacity(colors.len());

    for color in colors {
        let base = base_name(color, &taken, &mut statuses);
        let mut name = base.clone();
        let mut suffix = 1;
        loop {
            match taken.get(&name) {
                None => break,
                Some(value) if *value == color.value => break,
                Some(_) => {
                    suffix += 1;
                    name = format!("{}-{}", base, suffix);
                }
            }
        }
        if taken.contains_key(&name) {
            continue;
        }

        taken.insert(name.clone(), color.value.clone());
        named.push(NamedColor {
            name,
            value: color.value.clone(),
            rgb: color.rgb,
        });
    }
    named
}

fn base_name(
    color: &ColorCandidate,
    taken: &HashMap<String, String>,
    statuses: &mut HashMap<&'static str, String>,
) -> String {
    if let Some(role) = color.role {
        return role.token_name().to_string();
    }
    if let Some(variable) = color.source_variable_name.as_deref() {
        let name = sanitize(variable);
        if !name.is_empty() {
            return name;
        }
    }

    let family = hue_family(color.rgb);
    if let Some(status) = status_name(family) {
        let claim = match statuses.get(status) {
            Some(value) => *value == color.value,
            None => !taken.contains_key(status),
        };
        if claim {
            statuses
                .entry(status)
                .or_insert_with(|| color.value.clone());
            return status.to_string();
        }
    }
    family.to_string()
}

/// The status conventionally carried by a hue family.
fn status_name(family: &str) -> Option<&'static str> {
    match family {
        "green" => Some("success"),
        "red" => Some("error"),
        "yellow" | "orange" => Some("warning"),
        "gray" => Some("neutral"),
        _ => None,
    }
}

/// Lowercase, with anything outside `[a-z0-9_-]` replaced by `-`.
fn sanitize(name: &str) -> String {
    name.trim_matches('-')
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '_' | '-') => c,
            _ => '-',
        })
        .collect()
}

/// Names the fonts that hold a role. Repeated roles (accents) get suffixes.
pub fn name_fonts(fonts: &[FontCandidate]) -> Vec<NamedFont> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    fonts
        .iter()
        .filter_map(|font| {
            let role = font.role?.as_str();
            let count = counts.entry(role).or_insert(0);
            *count += 1;
            let name = match *count {
                1 => role.to_string(),
                n => format!("{}-{}", role, n),
            };
            Some(NamedFont {
                name,
                font: font.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use themesnatch_extract::{ColorCategory, ColorRole, FontCategory, FontRole};

    fn color(rgb: (u8, u8, u8)) -> ColorCandidate {
        ColorCandidate::new(Rgb::new(rgb.0, rgb.1, rgb.2), ColorCategory::Accent)
    }

    fn names(colors: &[ColorCandidate]) -> Vec<(String, String)> {
        name_colors(colors)
            .into_iter()
            .map(|c| (c.name, c.value))
            .collect()
    }

    #[test]
    fn test_role_then_variable_then_hue() {
        let mut primary = color((51, 102, 255));
        primary.role = Some(ColorRole::Primary);
        let variable = ColorCandidate::from_variable(
            "--Brand.Teal",
            Rgb::new(20, 184, 166),
            ColorCategory::Accent,
            1000,
        );
        let mut muted = color((100, 116, 139));
        muted.role = Some(ColorRole::TextSecondary);
        let plain = color((220, 38, 38));

        assert_eq!(
            names(&[primary, variable, muted, plain]),
            vec![
                ("primary".to_string(), "#3366ff".to_string()),
                ("brand-teal".to_string(), "#14b8a6".to_string()),
                ("text-secondary".to_string(), "#64748b".to_string()),
                ("error".to_string(), "#dc2626".to_string()),
            ]
        );
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let colors = [color((220, 38, 38)), color((185, 28, 28)), color((153, 27, 27))];
        let named: Vec<String> = name_colors(&colors).into_iter().map(|c| c.name).collect();
        assert_eq!(named, vec!["error", "red", "red-2"]);
    }

    #[test]
    fn test_identical_values_emitted_once() {
        let colors = [color((220, 38, 38)), color((220, 38, 38)), color((185, 28, 28))];
        let named: Vec<String> = name_colors(&colors).into_iter().map(|c| c.name).collect();
        assert_eq!(named, vec!["error", "red"]);
    }

    #[test]
    fn test_status_names() {
        let colors = [
            color((22, 163, 74)),
            color((220, 38, 38)),
            color((234, 179, 8)),
            color((107, 114, 128)),
            color((37, 99, 235)),
            color((21, 128, 61)),
        ];
        let named: Vec<String> = name_colors(&colors).into_iter().map(|c| c.name).collect();
        assert_eq!(
            named,
            vec!["success", "error", "warning", "neutral", "blue", "green"]
        );
    }

    #[test]
    fn test_status_name_yields_to_variable() {
        let variable = ColorCandidate::from_variable(
            "--success",
            Rgb::new(5, 150, 105),
            ColorCategory::Accent,
            1000,
        );
        let named: Vec<String> = name_colors(&[variable, color((22, 163, 74))])
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(named, vec!["success", "green"]);
    }

    #[test]
    fn test_font_names() {
        let font = |family: &str, role: Option<FontRole>| FontCandidate {
            family: family.to_string(),
            stack: vec![family.to_string()],
            weight: "400".into(),
            size: "16px".into(),
            line_height: "normal".into(),
            frequency: 1,
            contexts: Default::default(),
            category: FontCategory::Body,
            elements: Vec::new(),
            role,
        };
        let named: Vec<String> = name_fonts(&[
            font("Inter", Some(FontRole::Body)),
            font("Inter", None),
            font("Lobster", Some(FontRole::Accent)),
            font("Caveat", Some(FontRole::Accent)),
        ])
        .into_iter()
        .map(|f| f.name)
        .collect();
        assert_eq!(named, vec!["body", "accent", "accent-2"]);
    }
}
