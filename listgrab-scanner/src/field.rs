//! Per-field extraction from a single container node.
//!
//! Extraction never fails: a missing node, a missing attribute or a value
//! that transforms to nothing all fall back to the field's default, so one
//! broken listing cannot take down the rest of its page.

use crate::config::{FieldSpec, ValueSource};
use crate::result::FieldValue;
use scraper::ElementRef;
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor<'a> {
    page_url: Option<&'a Url>,
}

impl<'a> FieldExtractor<'a> {
    pub fn new() -> Self {
        Self { page_url: None }
    }

    /// Extractor that resolves relative links against `page_url`.
    pub fn for_page(page_url: &'a Url) -> Self {
        Self {
            page_url: Some(page_url),
        }
    }

    pub fn extract(&self, container: ElementRef<'_>, spec: &FieldSpec) -> FieldValue {
        let nodes: Vec<ElementRef<'_>> = match &spec.selector {
            None => vec![container],
            Some(selector) if spec.multiple => container.select(selector).collect(),
            Some(selector) => container.select(selector).take(1).collect(),
        };

        if spec.multiple {
            let values: Vec<String> = nodes
                .into_iter()
                .filter_map(|node| self.read(node, spec))
                .collect();
            if values.is_empty() {
                spec.default.clone()
            } else {
                FieldValue::List(values)
            }
        } else {
            nodes
                .into_iter()
                .next()
                .and_then(|node| self.read(node, spec))
                .map(FieldValue::Text)
                .unwrap_or_else(|| spec.default.clone())
        }
    }

    fn read(&self, node: ElementRef<'_>, spec: &FieldSpec) -> Option<String> {
        let value = match &spec.source {
            ValueSource::Text => {
                let raw: String = node.text().collect();
                // Substitutions must see the text as written, including
                // non-breaking and narrow spaces.
                collapse_whitespace(&apply_transforms(spec, raw.trim().to_string()))
            }
            ValueSource::Attribute(name) => {
                apply_transforms(spec, node.value().attr(name)?.trim().to_string())
            }
        };
        if value.is_empty() {
            return None;
        }

        if spec.resolve_urls {
            Some(self.resolve(value))
        } else {
            Some(value)
        }
    }

    fn resolve(&self, value: String) -> String {
        if value.starts_with("http://") || value.starts_with("https://") {
            return value;
        }
        match self.page_url.and_then(|base| base.join(&value).ok()) {
            Some(resolved) => resolved.to_string(),
            None => value,
        }
    }
}

/// Regex capture, then literal substitutions in order, then edge stripping.
pub(crate) fn apply_transforms(spec: &FieldSpec, text: String) -> String {
    let captured = spec.pattern.as_ref().and_then(|pattern| {
        pattern.captures(&text).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_string())
        })
    });
    let mut text = captured.unwrap_or(text);

    for (from, to) in &spec.substitutions {
        text = text.replace(from.as_str(), to);
    }

    if let Some(chars) = &spec.strip_chars {
        text = text.trim_matches(chars.as_slice()).to_string();
    }

    text.trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
