/// HTML → flat line list
use scraper::Html;

/// Flatten description HTML into trimmed, non-empty lines.
///
/// Entities are decoded and every tag boundary acts as a line break, so
/// `<ul>/<li>` markup collapses into one line per item. Newlines inside a
/// text node also split lines. Markup that only appears once entities are
/// decoded (`&lt;br&gt;`) is treated as markup too, so escaped tags break
/// lines instead of surviving as literal text.
pub fn normalize_lines(html: &str) -> Vec<String> {
    text_chunks(html)
        .iter()
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .map(|line| line.replace('\u{a0}', " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn text_chunks(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut chunks = Vec::new();

    for chunk in fragment.root_element().text() {
        if chunk.contains('<') {
            // Decoded text that still holds tags; one more pass strips them
            let inner = Html::parse_fragment(chunk);
            chunks.extend(inner.root_element().text().map(str::to_string));
        } else {
            chunks.push(chunk.to_string());
        }
    }

    chunks
}
