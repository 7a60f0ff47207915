use listgrab::ExportFormat;
use listgrab::handlers::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

const SITE_JSON: &str = r#"{
    "site_name": "books",
    "base_url": "https://books.example",
    "container_selector": "article.product_pod",
    "pagination": {"type": "next_link", "next_selector": "li.next a"},
    "fields": {
        "title": {"selector": "h3 a", "type": "attribute", "attribute": "title"},
        "price": {"selector": "p.price_color", "replace": {"£": ""}},
        "link": {"selector": "h3 a", "type": "attribute", "attribute": "href"}
    }
}"#;

// ============================================================================
// Site Loading Tests
// ============================================================================

#[test]
fn test_load_site_from_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    write!(temp_file, "{}", SITE_JSON)?;

    let path = PathBuf::from(temp_file.path());
    let site = load_site(Some(&path), None)?;

    assert_eq!(site.site_name(), "books");
    assert_eq!(site.field_names(), vec!["title", "price", "link"]);
    Ok(())
}

#[test]
fn test_load_site_from_preset() {
    let site = load_site(None, Some("generic_ecommerce")).unwrap();
    assert_eq!(site.site_name(), "generic_ecommerce");
}

#[test]
fn test_load_site_unknown_preset_lists_available() {
    let err = load_site(None, Some("ebay")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("unknown preset 'ebay'"));
    assert!(message.contains("avito"));
}

#[test]
fn test_load_site_requires_a_source() {
    let err = load_site(None, None).unwrap_err();
    assert!(err.to_string().contains("--config or --preset"));
}

#[test]
fn test_load_site_invalid_selector_is_reported() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        r#"{{"container_selector": "div[[", "fields": {{"t": {{"selector": "h1"}}}}}}"#
    )
    .unwrap();

    let path = PathBuf::from(temp_file.path());
    let err = load_site(Some(&path), None).unwrap_err();
    let rendered = format!("{:#}", err);
    assert!(rendered.contains("invalid site configuration"));
    assert!(rendered.contains("div[["));
}

#[test]
fn test_load_site_missing_file() {
    let path = PathBuf::from("/definitely/not/here/site.json");
    assert!(load_site(Some(&path), None).is_err());
}

// ============================================================================
// Argument Helper Tests
// ============================================================================

#[test]
fn test_parse_field_list() {
    assert_eq!(
        parse_field_list("title, price,,link "),
        vec!["title", "price", "link"]
    );
    assert!(parse_field_list(" , ").is_empty());
}

#[test]
fn test_resolve_output_path_default_name() {
    let path = resolve_output_path(None, "books", ExportFormat::Json);
    let name = path.to_string_lossy();
    assert!(name.starts_with("books_"));
    assert!(name.ends_with(".json"));
}

#[test]
fn test_resolve_output_path_directory() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().to_path_buf();
    let path = resolve_output_path(Some(&target), "books", ExportFormat::Csv);
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(path.to_string_lossy().ends_with(".csv"));
}

#[test]
fn test_resolve_output_path_explicit_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out.csv");
    assert_eq!(
        resolve_output_path(Some(&target), "books", ExportFormat::Csv),
        target
    );
}

#[test]
fn test_describe_site_outlines_fields() {
    let site = load_site(None, Some("avito")).unwrap();
    let outline = describe_site(&site);
    assert!(outline.contains("Container: a.sc-1jge648-0"));
    assert!(outline.contains("parameter 'o'"));
    assert!(outline.contains("link <container> @href"));
    assert!(outline.contains("details div.sc-b57yxx-2 span span text (multiple)"));
}
