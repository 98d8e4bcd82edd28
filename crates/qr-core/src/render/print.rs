//! Standalone print view

use super::{code, escape_html, redirect_url};
use crate::entry::Entry;
use crate::error::Result;

/// Title used when an entry has none
pub const DEFAULT_TITLE: &str = "Scan QR Code";

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; background: white; }
.print-container { text-align: center; padding: 40px; max-width: 400px; }
.title { font-size: 32px; font-weight: 700; color: #111827; margin-bottom: 24px; word-wrap: break-word; }
.qr-wrapper { background: white; padding: 20px; border-radius: 16px; box-shadow: 0 4px 16px rgba(0, 0, 0, 0.1); display: inline-block; margin-bottom: 24px; }
.qr-id { font-size: 14px; color: #6b7280; font-family: 'Monaco', 'Courier New', monospace; margin-top: 16px; }
@media print { .print-container { padding: 0; } }
"#;

/// Render the page holding only the title, the code and the id.
/// The browser's print dialog opens once the page has loaded.
pub fn view(entry: &Entry, base: &str) -> Result<String> {
    let payload = redirect_url(base, &entry.id)?;
    let svg = code::svg(&payload, code::PRINT_SIZE)?;

    let title = if entry.title.is_empty() {
        DEFAULT_TITLE
    } else {
        entry.title.as_str()
    };
    let id = escape_html(&entry.id);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Print QR Code - {id}</title>
<style>{style}</style>
</head>
<body>
<div class="print-container">
  <h1 class="title">{title}</h1>
  <div class="qr-wrapper"><div id="qrcode">{svg}</div></div>
  <p class="qr-id">{id}</p>
</div>
<script>window.addEventListener("load", function () {{ window.print(); }});</script>
</body>
</html>
"#,
        id = id,
        style = STYLE,
        title = escape_html(title),
        svg = svg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_contents() {
        let mut entry = Entry::new();
        entry.title = "Invoice".to_string();
        entry.link_url("https://example.com/doc.pdf");

        let out = view(&entry, "http://localhost:3000").unwrap();
        assert!(out.contains(r#"<h1 class="title">Invoice</h1>"#));
        assert!(out.contains(&format!(r#"<p class="qr-id">{}</p>"#, entry.id)));
        assert!(out.contains("window.print()"));
        assert!(out.contains("<svg"));
        assert!(!out.contains("example.com/doc.pdf"));
    }

    #[test]
    fn test_view_default_title() {
        let entry = Entry::new();
        let out = view(&entry, "http://localhost:3000").unwrap();
        assert!(out.contains(DEFAULT_TITLE));
    }
}
