//! Built-in site definitions.
//!
//! A preset is plain data: the same [`SiteDefinition`] a user could write as
//! JSON, so adding a site never needs new extraction code.

use listgrab_scanner::config::{FieldDefinition, PaginationDefinition, SiteDefinition};

const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// (name, description) of every preset, in display order.
pub const PRESETS: &[(&str, &str)] = &[
    (
        "avito",
        "Avito.ma classified listings (paginated with ?o=N)",
    ),
    (
        "generic_ecommerce",
        "Template for product grids with a \"next page\" link",
    ),
];

pub fn preset(name: &str) -> Option<SiteDefinition> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "avito" | "avito_ma" => Some(avito()),
        "generic_ecommerce" => Some(generic_ecommerce()),
        _ => None,
    }
}

pub fn avito() -> SiteDefinition {
    SiteDefinition::new("avito_ma", "https://www.avito.ma", "a.sc-1jge648-0")
        .with_header("User-Agent", DESKTOP_USER_AGENT)
        .with_pagination(PaginationDefinition::Parameter {
            parameter: "o".to_string(),
            base_url: None,
        })
        .with_field("title", FieldDefinition::attribute("p[title]", "title"))
        .with_field(
            "price",
            FieldDefinition::text("p.sc-b57yxx-3").with_replace("\u{202f}", ""),
        )
        .with_field("location", FieldDefinition::text("div.sc-b57yxx-11 p"))
        .with_field(
            "details",
            FieldDefinition::text("div.sc-b57yxx-2 span span").multiple(),
        )
        // The card itself is the anchor.
        .with_field("link", FieldDefinition::attribute("", "href"))
        .with_field(
            "image",
            FieldDefinition::attribute("div.sc-bsm2tm-2 img", "src"),
        )
        .with_field("date", FieldDefinition::text("div.sc-1wnmz4-2 p"))
        .with_field("seller", FieldDefinition::text("p.sc-1wnmz4-5"))
}

pub fn generic_ecommerce() -> SiteDefinition {
    SiteDefinition::new("generic_ecommerce", "https://example.com", ".product-item")
        .with_header("User-Agent", DESKTOP_USER_AGENT)
        .with_pagination(PaginationDefinition::NextLink {
            next_selector: "a.next-page".to_string(),
        })
        .with_field(
            "title",
            FieldDefinition::text(".product-title").with_default("No Title"),
        )
        .with_field("price", FieldDefinition::text(".price").with_regex(r"[\d,.]+"))
        .with_field("image", FieldDefinition::attribute("img", "src"))
        .with_field("link", FieldDefinition::attribute("a", "href"))
        .with_field(
            "rating",
            FieldDefinition::text(".rating").with_regex(r"(\d+\.?\d*)"),
        )
}
