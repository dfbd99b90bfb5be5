//! The utility-framework config module.
//!
//! Renders a JavaScript module whose default export carries the theme under
//! `theme.extend`, so the generated file can be dropped next to a project's
//! own config and merged with it.

use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::tokens::TokenSet;

const PREAMBLE: &str = "/** @type {import('tailwindcss').Config} */";

pub fn render_config_object(tokens: &TokenSet) -> Result<String, ExportError> {
    let mut extend = Map::new();
    extend.insert("colors".into(), Value::Object(colors(tokens)));
    extend.insert(
        "fontFamily".into(),
        Value::Object(
            tokens
                .fonts
                .iter()
                .map(|font| (font.name.clone(), Value::from(font.stack.clone())))
                .collect(),
        ),
    );
    extend.insert(
        "fontSize".into(),
        Value::Object(
            tokens
                .font_sizes
                .iter()
                .map(|(label, size)| (label.to_string(), Value::from(size.as_str())))
                .collect(),
        ),
    );
    extend.insert("spacing".into(), pairs(&tokens.spacing));
    extend.insert("borderRadius".into(), pairs(&tokens.radii));
    extend.insert("boxShadow".into(), pairs(&tokens.shadows));

    let mut theme = Map::new();
    theme.insert("extend".into(), Value::Object(extend));
    let mut config = Map::new();
    config.insert("theme".into(), Value::Object(theme));

    let body = serde_json::to_string_pretty(&Value::Object(config))?;
    Ok(format!("{}\nexport default {}\n", PREAMBLE, body))
}

/// `name -> hex`, or `name -> { DEFAULT, 50 ... 900 }` with tonal scales.
fn colors(tokens: &TokenSet) -> Map<String, Value> {
    tokens
        .colors
        .iter()
        .map(|color| {
            let value = match &color.scale {
                Some(scale) => {
                    let mut shades = Map::new();
                    shades.insert("DEFAULT".into(), Value::from(color.value.as_str()));
                    for (step, rgb) in scale.iter() {
                        shades.insert(step.to_string(), Value::from(rgb.to_hex()));
                    }
                    Value::Object(shades)
                }
                None => Value::from(color.value.as_str()),
            };
            (color.name.clone(), value)
        })
        .collect()
}

fn pairs(items: &[(String, String)]) -> Value {
    Value::Object(
        items
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
            .collect(),
    )
}
