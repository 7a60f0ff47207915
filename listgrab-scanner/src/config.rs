//! Site definitions and their validated form.
//!
//! A [`SiteDefinition`] is the loose, serde-friendly description of a site
//! (usually loaded from JSON). [`SiteConfig::new`] checks it once and compiles
//! every selector, pattern, header and URL so the engine never has to
//! interpret configuration mid-run.

use crate::error::ConfigError;
use crate::result::FieldValue;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_PARAMETER: &str = "page";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const MISSING_VALUE: &str = "N/A";

/// Where a field's value comes from on the matched node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Text,
    Attribute,
}

/// One field as written in a site definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// CSS selector relative to the container. Empty selects the container itself.
    #[serde(default)]
    pub selector: String,
    #[serde(default, rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, with = "substitution_pairs", skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_chars: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_url: Option<bool>,
}

impl FieldDefinition {
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Self::default()
        }
    }

    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            kind: ValueKind::Attribute,
            attribute: Some(attribute.into()),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_replace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replace.push((from.into(), to.into()));
        self
    }

    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn with_strip_chars(mut self, chars: impl Into<String>) -> Self {
        self.strip_chars = Some(chars.into());
        self
    }

    pub fn with_absolute_url(mut self, absolute: bool) -> Self {
        self.absolute_url = Some(absolute);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}

/// Pagination as written in a site definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationDefinition {
    /// Set a query parameter to the 1-based page number.
    Parameter {
        #[serde(default = "default_page_parameter")]
        parameter: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    /// Follow the anchor matched by `next_selector`.
    #[serde(alias = "next-link")]
    NextLink {
        #[serde(default)]
        next_selector: String,
    },
}

fn default_page_parameter() -> String {
    DEFAULT_PAGE_PARAMETER.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_site_name() -> String {
    "scraped_data".to_string()
}

/// Declarative description of one target site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDefinition {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub container_selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationDefinition>,
    /// Field name to rule, in declaration order.
    #[serde(default, with = "ordered_fields")]
    pub fields: Vec<(String, FieldDefinition)>,
}

impl SiteDefinition {
    pub fn new(
        site_name: impl Into<String>,
        base_url: impl Into<String>,
        container_selector: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            base_url: base_url.into(),
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
            container_selector: container_selector.into(),
            pagination: None,
            fields: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = timeout_secs;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationDefinition) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldDefinition) -> Self {
        self.fields.push((name.into(), field));
        self
    }
}

/// How a value is read from a matched node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    Text,
    Attribute(String),
}

/// A validated field rule, ready for extraction.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) selector: Option<Selector>,
    pub(crate) selector_text: String,
    pub(crate) source: ValueSource,
    pub(crate) pattern: Option<Regex>,
    pub(crate) substitutions: Vec<(String, String)>,
    pub(crate) strip_chars: Option<Vec<char>>,
    pub(crate) default: FieldValue,
    pub(crate) multiple: bool,
    pub(crate) resolve_urls: bool,
}

impl FieldSpec {
    pub fn new(name: &str, definition: &FieldDefinition) -> Result<Self, ConfigError> {
        let selector_text = definition.selector.trim().to_string();
        let selector = if selector_text.is_empty() {
            None
        } else {
            Some(compile_selector(&format!("field '{}'", name), &selector_text)?)
        };

        let source = match definition.kind {
            ValueKind::Text => ValueSource::Text,
            ValueKind::Attribute => match definition.attribute.as_deref().map(str::trim) {
                Some(attr) if !attr.is_empty() => ValueSource::Attribute(attr.to_string()),
                _ => {
                    return Err(ConfigError::MissingAttributeName {
                        field: name.to_string(),
                    });
                }
            },
        };

        let pattern = definition
            .regex
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidRegex {
                    field: name.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        if let Some((from, _)) = definition.replace.iter().find(|(from, _)| from.is_empty()) {
            return Err(ConfigError::InvalidField {
                field: name.to_string(),
                reason: format!("empty substitution pattern ('{}')", from),
            });
        }

        let default = match &definition.default {
            Some(FieldValue::Text(s)) if definition.multiple => FieldValue::List(vec![s.clone()]),
            Some(value) => value.clone(),
            None if definition.multiple => FieldValue::List(Vec::new()),
            None => FieldValue::Text(MISSING_VALUE.to_string()),
        };

        let resolve_urls = definition.absolute_url.unwrap_or_else(|| {
            matches!(&source, ValueSource::Attribute(attr) if attr == "href" || attr == "src")
        });

        Ok(Self {
            name: name.to_string(),
            selector,
            selector_text,
            source,
            pattern,
            substitutions: definition.replace.clone(),
            strip_chars: definition.strip_chars.as_ref().map(|s| s.chars().collect()),
            default,
            multiple: definition.multiple,
            resolve_urls,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &str {
        &self.selector_text
    }

    pub fn source(&self) -> &ValueSource {
        &self.source
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }
}

/// A validated pagination strategy.
#[derive(Debug, Clone)]
pub enum PaginationSpec {
    Parameter {
        name: String,
        base_url: Option<Url>,
    },
    NextLink {
        selector: Selector,
        selector_text: String,
    },
}

impl PaginationSpec {
    pub fn new(definition: &PaginationDefinition) -> Result<Self, ConfigError> {
        match definition {
            PaginationDefinition::Parameter { parameter, base_url } => {
                let name = parameter.trim();
                if name.is_empty() {
                    return Err(ConfigError::InvalidPagination(
                        "parameter strategy needs a parameter name".to_string(),
                    ));
                }
                let base_url = base_url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .map(parse_url)
                    .transpose()?;
                Ok(PaginationSpec::Parameter {
                    name: name.to_string(),
                    base_url,
                })
            }
            PaginationDefinition::NextLink { next_selector } => {
                let selector_text = next_selector.trim();
                if selector_text.is_empty() {
                    return Err(ConfigError::InvalidPagination(
                        "next_link strategy needs a next_selector".to_string(),
                    ));
                }
                Ok(PaginationSpec::NextLink {
                    selector: compile_selector("next link", selector_text)?,
                    selector_text: selector_text.to_string(),
                })
            }
        }
    }
}

/// A validated, immutable site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    site_name: String,
    base_url: Option<Url>,
    headers: HeaderMap,
    timeout: Duration,
    container: Selector,
    container_text: String,
    pagination: Option<PaginationSpec>,
    fields: Vec<FieldSpec>,
}

impl SiteConfig {
    pub fn new(definition: SiteDefinition) -> Result<Self, ConfigError> {
        let container_text = definition.container_selector.trim().to_string();
        if container_text.is_empty() {
            return Err(ConfigError::MissingContainerSelector);
        }
        let container = compile_selector("container", &container_text)?;

        let base_url = if definition.base_url.trim().is_empty() {
            None
        } else {
            Some(parse_url(&definition.base_url)?)
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &definition.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        }

        if definition.timeout == 0 {
            return Err(ConfigError::InvalidField {
                field: "timeout".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        let pagination = definition
            .pagination
            .as_ref()
            .map(PaginationSpec::new)
            .transpose()?;

        if definition.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(definition.fields.len());
        for (name, field) in &definition.fields {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    field: name.clone(),
                    reason: "field name is empty".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::InvalidField {
                    field: name.clone(),
                    reason: "declared more than once".to_string(),
                });
            }
            fields.push(FieldSpec::new(name, field)?);
        }

        Ok(Self {
            site_name: definition.site_name,
            base_url,
            headers,
            timeout: Duration::from_secs(definition.timeout),
            container,
            container_text,
            pagination,
            fields,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let definition: SiteDefinition = serde_json::from_str(json)?;
        Self::new(definition)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn container(&self) -> &Selector {
        &self.container
    }

    pub fn container_selector(&self) -> &str {
        &self.container_text
    }

    pub fn pagination(&self) -> Option<&PaginationSpec> {
        self.pagination.as_ref()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Resolve a requested subset of field names against the declared ones.
    ///
    /// `None` selects every field in declaration order. A subset keeps the
    /// caller's order, drops repeats, and fails on any undeclared name.
    pub fn select_fields(&self, subset: Option<&[String]>) -> Result<Vec<&FieldSpec>, ConfigError> {
        let Some(subset) = subset else {
            return Ok(self.fields.iter().collect());
        };

        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(subset.len());
        for requested in subset {
            let requested = requested.trim();
            if !seen.insert(requested) {
                continue;
            }
            let spec = self
                .fields
                .iter()
                .find(|f| f.name == requested)
                .ok_or_else(|| ConfigError::UnknownField {
                    field: requested.to_string(),
                })?;
            selected.push(spec);
        }

        if selected.is_empty() {
            return Err(ConfigError::NoFields);
        }
        Ok(selected)
    }
}

impl TryFrom<SiteDefinition> for SiteConfig {
    type Error = ConfigError;

    fn try_from(definition: SiteDefinition) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}

pub(crate) fn compile_selector(context: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        context: context.to_string(),
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Fields are a JSON object whose key order is the declaration order.
mod ordered_fields {
    use super::FieldDefinition;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        fields: &[(String, FieldDefinition)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, field) in fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, FieldDefinition)>, D::Error> {
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, value)| {
                serde_json::from_value(value)
                    .map(|field| (name.clone(), field))
                    .map_err(|e| D::Error::custom(format!("field '{}': {}", name, e)))
            })
            .collect()
    }
}

/// Substitutions accept either an ordered object (`{"$": ""}`) or a list of
/// pairs (`[["$", ""]]`); they are written back as pairs.
mod substitution_pairs {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(
        pairs: &[(String, String)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Object(map) => map
                .into_iter()
                .map(|(from, to)| match to {
                    Value::String(to) => Ok((from, to)),
                    other => Err(D::Error::custom(format!(
                        "replacement for '{}' must be a string, got {}",
                        from, other
                    ))),
                })
                .collect(),
            value @ Value::Array(_) => {
                serde_json::from_value(value).map_err(|e| D::Error::custom(e.to_string()))
            }
            other => Err(D::Error::custom(format!(
                "replace must be an object or a list of pairs, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SiteDefinition {
        SiteDefinition::new("shop", "https://shop.example", "div.item")
            .with_field("title", FieldDefinition::text("h2"))
    }

    #[test]
    fn test_minimal_definition_validates() {
        let config = SiteConfig::new(minimal()).unwrap();
        assert_eq!(config.site_name(), "shop");
        assert_eq!(config.field_names(), vec!["title"]);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.pagination().is_none());
        assert_eq!(
            config.headers().get(USER_AGENT).unwrap(),
            DEFAULT_USER_AGENT
        );
    }

    #[test]
    fn test_missing_container_selector() {
        let mut def = minimal();
        def.container_selector = "   ".to_string();
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::MissingContainerSelector)
        ));
    }

    #[test]
    fn test_invalid_container_selector() {
        let mut def = minimal();
        def.container_selector = "div[".to_string();
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_attribute_without_name_is_rejected() {
        let mut field = FieldDefinition::text("a");
        field.kind = ValueKind::Attribute;
        let def = minimal().with_field("link", field);
        match SiteConfig::new(def) {
            Err(ConfigError::MissingAttributeName { field }) => assert_eq!(field, "link"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_next_link_without_selector_is_rejected() {
        let def = minimal().with_pagination(PaginationDefinition::NextLink {
            next_selector: String::new(),
        });
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let def = minimal().with_field("price", FieldDefinition::text(".p").with_regex("(unclosed"));
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_no_fields_is_rejected() {
        let def = SiteDefinition::new("shop", "", "div.item");
        assert!(matches!(SiteConfig::new(def), Err(ConfigError::NoFields)));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let def = minimal().with_field("title", FieldDefinition::text("h3"));
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let def = minimal().with_header("Bad Header", "x");
        assert!(matches!(
            SiteConfig::new(def),
            Err(ConfigError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_defaults_depend_on_multiplicity() {
        let def = minimal()
            .with_field("tags", FieldDefinition::text("span.tag").multiple())
            .with_field("seller", FieldDefinition::text(".seller").with_default("unknown"));
        let config = SiteConfig::new(def).unwrap();
        let fields = config.fields();
        assert_eq!(fields[0].default_value(), &FieldValue::Text("N/A".into()));
        assert_eq!(fields[1].default_value(), &FieldValue::List(vec![]));
        assert_eq!(fields[2].default_value(), &FieldValue::Text("unknown".into()));
    }

    #[test]
    fn test_href_and_src_resolve_by_default() {
        let def = minimal()
            .with_field("link", FieldDefinition::attribute("a", "href"))
            .with_field("id", FieldDefinition::attribute("div", "data-id"))
            .with_field(
                "raw",
                FieldDefinition::attribute("img", "src").with_absolute_url(false),
            );
        let config = SiteConfig::new(def).unwrap();
        let fields = config.fields();
        assert!(fields[1].resolve_urls);
        assert!(!fields[2].resolve_urls);
        assert!(!fields[3].resolve_urls);
    }

    #[test]
    fn test_json_preserves_field_order() {
        let json = r#"{
            "site_name": "demo",
            "base_url": "https://example.com",
            "container_selector": ".product-item",
            "pagination": {"type": "next_link", "next_selector": "a.next-page"},
            "fields": {
                "zeta": {"selector": ".z"},
                "alpha": {"selector": "a", "type": "attribute", "attribute": "href"},
                "mid": {"selector": ".m", "replace": {"$": "", ",": ""}, "multiple": true}
            }
        }"#;
        let config = SiteConfig::from_json_str(json).unwrap();
        assert_eq!(config.field_names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            config.fields()[2].substitutions,
            vec![("$".to_string(), String::new()), (",".to_string(), String::new())]
        );
        assert!(matches!(
            config.pagination(),
            Some(PaginationSpec::NextLink { .. })
        ));
    }

    #[test]
    fn test_json_parameter_pagination_defaults() {
        let json = r#"{
            "container_selector": "li",
            "pagination": {"type": "parameter"},
            "fields": {"name": {"selector": "span"}}
        }"#;
        let config = SiteConfig::from_json_str(json).unwrap();
        match config.pagination() {
            Some(PaginationSpec::Parameter { name, base_url }) => {
                assert_eq!(name, "page");
                assert!(base_url.is_none());
            }
            other => panic!("unexpected pagination: {:?}", other),
        }
        assert_eq!(config.site_name(), "scraped_data");
    }

    #[test]
    fn test_json_unknown_pagination_type_fails() {
        let json = r#"{
            "container_selector": "li",
            "pagination": {"type": "infinite_scroll"},
            "fields": {"name": {"selector": "span"}}
        }"#;
        assert!(matches!(
            SiteConfig::from_json_str(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_definition_serializes_back_in_order() {
        let def = minimal()
            .with_field("price", FieldDefinition::text(".price").with_replace("$", ""));
        let json = serde_json::to_string(&def).unwrap();
        let parsed: SiteDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, def);
    }

    #[test]
    fn test_select_fields_subset() {
        let def = minimal()
            .with_field("price", FieldDefinition::text(".price"))
            .with_field("link", FieldDefinition::attribute("a", "href"));
        let config = SiteConfig::new(def).unwrap();

        let all = config.select_fields(None).unwrap();
        assert_eq!(all.len(), 3);

        let subset = vec!["link".to_string(), "title".to_string(), "link".to_string()];
        let picked = config.select_fields(Some(&subset)).unwrap();
        let names: Vec<&str> = picked.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["link", "title"]);

        let unknown = vec!["rating".to_string()];
        assert!(matches!(
            config.select_fields(Some(&unknown)),
            Err(ConfigError::UnknownField { .. })
        ));
    }
}
