//! Declaration-sheet formats rendered from embedded templates.

use minijinja::{context, Environment};

use crate::error::ExportError;
use crate::tokens::TokenSet;

const VARIABLE_SHEET: &str = "variables.scss";
const CUSTOM_PROPERTIES: &str = "custom-properties.css";

fn environment() -> Result<Environment<'static>, ExportError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template(VARIABLE_SHEET, include_str!("templates/variables.scss.jinja"))?;
    env.add_template(
        CUSTOM_PROPERTIES,
        include_str!("templates/custom-properties.css.jinja"),
    )?;
    Ok(env)
}

fn render(template: &str, tokens: &TokenSet, url: &str) -> Result<String, ExportError> {
    let header = if url.is_empty() {
        "Generated by themesnatch".to_string()
    } else {
        format!("Generated by themesnatch from {}", url)
    };
    let env = environment()?;
    let output = env
        .get_template(template)?
        .render(context! { header => header, sections => tokens.sections() })?;
    Ok(output)
}

/// `$name: value;` declarations, one section per token group.
pub fn render_variable_sheet(tokens: &TokenSet, url: &str) -> Result<String, ExportError> {
    render(VARIABLE_SHEET, tokens, url)
}

/// `--name: value;` declarations inside a single `:root` rule.
pub fn render_custom_properties(tokens: &TokenSet, url: &str) -> Result<String, ExportError> {
    render(CUSTOM_PROPERTIES, tokens, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ExportOptions;
    use themesnatch_css::{Rgb, SpacingKind};
    use themesnatch_extract::{
        ColorCandidate, ColorCategory, ColorRole, SpacingCandidate, ThemeSnapshot,
    };

    fn theme() -> ThemeSnapshot {
        let mut primary = ColorCandidate::new(Rgb::new(0x11, 0x22, 0x33), ColorCategory::Text);
        primary.role = Some(ColorRole::Primary);
        ThemeSnapshot {
            colors: vec![primary],
            spacing: vec![SpacingCandidate {
                kind: SpacingKind::Padding,
                raw_value: "16px".into(),
                pixels: 16.0,
                frequency: 4,
                elements: vec![".card".into()],
                scale_label: "p-4".into(),
            }],
            url: "https://example.com/".into(),
            ..Default::default()
        }
    }

    fn tokens() -> TokenSet {
        TokenSet::from_theme(&theme(), &ExportOptions { tonal_scale: false })
    }

    #[test]
    fn test_variable_sheet_layout() {
        let output = render_variable_sheet(&tokens(), "https://example.com/").unwrap();
        assert_eq!(
            output,
            "// Generated by themesnatch from https://example.com/\n\
             \n\
             // Colors\n\
             $primary: #112233;\n\
             \n\
             // Spacing\n\
             $spacing-1: 16px;\n"
        );
    }

    #[test]
    fn test_custom_properties_layout() {
        let output = render_custom_properties(&tokens(), "").unwrap();
        assert_eq!(
            output,
            "/* Generated by themesnatch */\n\
             :root {\n  \
             /* Colors */\n  \
             --primary: #112233;\n\
             \n  \
             /* Spacing */\n  \
             --spacing-1: 16px;\n\
             }\n"
        );
    }

    #[test]
    fn test_empty_token_set() {
        let output = render_custom_properties(&TokenSet::default(), "").unwrap();
        assert_eq!(output, "/* Generated by themesnatch */\n:root {\n}\n");
    }
}
