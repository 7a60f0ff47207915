use scraper::{ElementRef, Html, Selector};

/// A parsed page. Parsing is best-effort: malformed or truncated markup still
/// yields a tree, and input with no usable structure simply has no
/// containers.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw_html: &str) -> Self {
        Self {
            html: Html::parse_document(raw_html),
        }
    }

    /// Repeating record nodes in document order. Empty is a valid answer.
    pub fn containers(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.select_first(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_in_document_order() {
        let doc = Document::parse(
            r#"<html><body>
                <div class="item" id="a"></div>
                <section><div class="item" id="b"></div></section>
                <div class="other"></div>
                <div class="item" id="c"></div>
            </body></html>"#,
        );
        let selector = Selector::parse("div.item").unwrap();
        let ids: Vec<&str> = doc
            .containers(&selector)
            .iter()
            .filter_map(|el| el.value().attr("id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_attribute_selectors() {
        let doc = Document::parse(
            r#"<ul><li data-kind="ad">1</li><li data-kind="listing">2</li><li>3</li></ul>"#,
        );
        let presence = Selector::parse("li[data-kind]").unwrap();
        let equality = Selector::parse(r#"li[data-kind="listing"]"#).unwrap();
        assert_eq!(doc.containers(&presence).len(), 2);
        assert_eq!(doc.containers(&equality).len(), 1);
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let doc = Document::parse(
            r#"<div class="card"><p>one<div class="card"><span>two</div><a href=>x"#,
        );
        let selector = Selector::parse("div.card").unwrap();
        assert_eq!(doc.containers(&selector).len(), 2);
    }

    #[test]
    fn test_garbage_input_has_no_containers() {
        let doc = Document::parse("\u{0}\u{1}}{ not html at all <<<>>>");
        let selector = Selector::parse("div.item").unwrap();
        assert!(doc.containers(&selector).is_empty());
    }

    #[test]
    fn test_title() {
        let doc = Document::parse("<html><head><title> Listings </title></head></html>");
        assert_eq!(doc.title(), Some("Listings".to_string()));
        assert_eq!(Document::parse("<p>x</p>").title(), None);
    }
}
