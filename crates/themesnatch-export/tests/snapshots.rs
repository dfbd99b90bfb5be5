//! Snapshot tests for each export format over one hand-built theme.
//!
//! Run `cargo insta review` after an intentional change to the output.

use insta::assert_snapshot;
use themesnatch_css::{Rgb, SpacingKind};
use themesnatch_export::{export, export_with, ExportFormat, ExportOptions};
use themesnatch_extract::{
    ColorCandidate, ColorCategory, ColorRole, ComponentKind, ComponentPattern, FontCandidate,
    FontCategory, FontRole, SpacingCandidate, StyleSignature, ThemeSnapshot,
};

fn color(rgb: (u8, u8, u8), category: ColorCategory, role: Option<ColorRole>) -> ColorCandidate {
    let mut color = ColorCandidate::new(Rgb::new(rgb.0, rgb.1, rgb.2), category);
    color.frequency = 10;
    color.role = role;
    color
}

fn font(stack: &[&str], weight: &str, size: &str, role: Option<FontRole>) -> FontCandidate {
    FontCandidate {
        family: stack[0].to_string(),
        stack: stack.iter().map(|s| s.to_string()).collect(),
        weight: weight.into(),
        size: size.into(),
        line_height: "normal".into(),
        frequency: 4,
        contexts: Default::default(),
        category: match role {
            Some(FontRole::Heading) => FontCategory::Heading,
            _ => FontCategory::Body,
        },
        elements: Vec::new(),
        role,
    }
}

fn spacing(value: &str, pixels: f64, label: &str) -> SpacingCandidate {
    SpacingCandidate {
        kind: SpacingKind::Padding,
        raw_value: value.into(),
        pixels,
        frequency: 6,
        elements: vec![".card".into()],
        scale_label: label.into(),
    }
}

fn component(
    kind: ComponentKind,
    selector: &str,
    radius: &str,
    shadow: Option<&str>,
) -> ComponentPattern {
    ComponentPattern {
        kind,
        selector: selector.into(),
        styles: StyleSignature {
            border_radius: Some(radius.into()),
            box_shadow: shadow.map(String::from),
            ..Default::default()
        },
        frequency: 3,
    }
}

fn theme() -> ThemeSnapshot {
    ThemeSnapshot {
        colors: vec![
            color((0x33, 0x66, 0xff), ColorCategory::Accent, Some(ColorRole::Primary)),
            color((0x11, 0x18, 0x27), ColorCategory::Text, Some(ColorRole::Text)),
            ColorCandidate::from_variable(
                "--brand-teal",
                Rgb::new(0x14, 0xb8, 0xa6),
                ColorCategory::Accent,
                1000,
            ),
            color((0xdc, 0x26, 0x26), ColorCategory::Accent, None),
        ],
        fonts: vec![
            font(&["Playfair Display", "serif"], "700", "48px", Some(FontRole::Heading)),
            font(&["Inter", "system-ui", "sans-serif"], "400", "16px", Some(FontRole::Body)),
            font(&["Inter", "system-ui", "sans-serif"], "500", "14px", None),
        ],
        spacing: vec![
            spacing("16px", 16.0, "p-4"),
            spacing("24px", 24.0, "p-6"),
            spacing("8px", 8.0, "p-2"),
        ],
        components: vec![
            component(
                ComponentKind::Card,
                ".card",
                "8px",
                Some("rgba(0, 0, 0, 0.1) 0px 1px 3px 0px"),
            ),
            component(ComponentKind::Button, ".btn", "6px", None),
        ],
        timestamp: 1_700_000_000_000,
        url: "https://brand.example/".into(),
        is_dark_mode: Some(false),
    }
}

// ============================================================================
// Formats
// ============================================================================

#[test]
fn test_config_object_output() {
    let output = export(&theme(), "configObject");
    assert_snapshot!("config_object", output);
}

#[test]
fn test_variable_sheet_output() {
    let output = export(&theme(), "variableSheet");
    assert_snapshot!("variable_sheet", output);
}

#[test]
fn test_custom_properties_output() {
    let output = export(&theme(), "customProperties");
    assert_snapshot!("custom_properties", output);
}

#[test]
fn test_custom_properties_without_scale() {
    let output = export_with(
        &theme(),
        ExportFormat::CustomProperties,
        &ExportOptions { tonal_scale: false },
    )
    .unwrap();
    assert_snapshot!("custom_properties_without_scale", output);
}
