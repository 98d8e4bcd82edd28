//! Card grid page

use super::card::{self, Card};
use super::escape_html;
use crate::error::Result;

/// Shown when the collection is empty
pub const EMPTY_NOTICE: &str = r#"No QR codes yet. Click "Add QR Code" to get started!"#;

const STYLE: &str = r#"
body { font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #4f46e5; margin: 0; padding: 32px; }
h1 { color: white; }
.qr-grid { display: flex; flex-wrap: wrap; gap: 24px; }
.qr-card { background: white; border-radius: 16px; padding: 20px; width: 240px; text-align: center; }
.qr-id { font-family: 'Monaco', 'Courier New', monospace; color: #6b7280; font-size: 13px; }
.qr-document { color: #374151; font-size: 13px; word-break: break-all; margin-top: 4px; }
.qr-actions { margin-top: 12px; }
.empty { color: white; text-align: center; width: 100%; font-size: 18px; }
"#;

/// Render every card as a standalone HTML page
pub fn grid(cards: &[Card]) -> Result<String> {
    let body = if cards.is_empty() {
        format!(r#"<p class="empty">{}</p>"#, escape_html(EMPTY_NOTICE))
    } else {
        cards
            .iter()
            .map(card::html)
            .collect::<Result<Vec<_>>>()?
            .join("\n")
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>QR Docs</title>
<style>{style}</style>
</head>
<body>
<h1>QR Docs</h1>
<div class="qr-grid" id="qrGrid">
{body}
</div>
</body>
</html>
"#,
        style = STYLE,
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    #[test]
    fn test_empty_grid() {
        let out = grid(&[]).unwrap();
        assert!(out.contains("No QR codes yet."));
        assert!(!out.contains("qr-card"));
    }

    #[test]
    fn test_grid_has_one_card_per_entry() {
        let cards: Vec<Card> = (0..3)
            .map(|_| Card::from_entry(&Entry::new(), "http://localhost:3000").unwrap())
            .collect();

        let out = grid(&cards).unwrap();
        assert_eq!(out.matches(r#"class="qr-card""#).count(), 3);
    }
}
