//! Entry cards

use super::{code, escape_html, redirect_url};
use crate::entry::Entry;
use crate::error::Result;

/// Characters of the document URL shown on a card
pub const PREVIEW_CHARS: usize = 30;

/// Shown when an entry has no document
pub const NO_DOCUMENT: &str = "No document linked";

/// Actions offered on every card
pub const ACTIONS: [&str; 3] = ["edit", "print", "delete"];

/// Display model of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    /// URL encoded in the QR symbol
    pub payload: String,
    /// Truncated document URL, or the no-document notice
    pub document_preview: String,
}

impl Card {
    /// Build the card for `entry`; codes point below `base`
    pub fn from_entry(entry: &Entry, base: &str) -> Result<Self> {
        Ok(Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            payload: redirect_url(base, &entry.id)?,
            document_preview: document_preview(entry),
        })
    }
}

/// `Document: <first 30 chars>...` or the no-document notice
pub fn document_preview(entry: &Entry) -> String {
    match entry.document_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let head: String = url.chars().take(PREVIEW_CHARS).collect();
            format!("Document: {}...", head)
        }
        _ => NO_DOCUMENT.to_string(),
    }
}

/// Render a card for a terminal
pub fn text(card: &Card) -> Result<String> {
    let mut out = code::terminal(&card.payload)?;
    if !card.title.is_empty() {
        out.push_str(&card.title);
        out.push('\n');
    }
    out.push_str(&format!("ID: {}\n", card.id));
    out.push_str(&card.document_preview);
    out.push('\n');
    out.push_str(&format!("[{}]\n", ACTIONS.join("] [")));
    Ok(out)
}

/// CLI command performing a card action, for actions the web grid cannot run
pub fn cli_command(action: &str, id: &str) -> Option<String> {
    match action {
        "edit" => Some(format!("qr-cli update {}", id)),
        "delete" => Some(format!("qr-cli remove {}", id)),
        _ => None,
    }
}

/// One action button. The grid is read-only, so edit and delete point at the CLI.
fn action_html(action: &str, card: &Card) -> String {
    let label = match action {
        "edit" => "Edit",
        "print" => "Print",
        _ => "Delete",
    };

    match cli_command(action, &card.id) {
        Some(command) => format!(
            r#"<button class="btn btn-{action}" disabled title="Use {command}">{label}</button>"#,
            action = action,
            command = escape_html(&command),
            label = label,
        ),
        None => format!(
            r#"<a class="btn btn-{action}" href="print/{href}">{label}</a>"#,
            action = action,
            href = url::form_urlencoded::byte_serialize(card.id.as_bytes()).collect::<String>(),
            label = label,
        ),
    }
}

/// Render a card as an HTML fragment
pub fn html(card: &Card) -> Result<String> {
    let svg = code::svg(&card.payload, code::CARD_SIZE)?;
    let id = escape_html(&card.id);
    let actions = ACTIONS
        .iter()
        .map(|action| action_html(action, card))
        .collect::<Vec<_>>()
        .join("\n    ");

    Ok(format!(
        r#"<div class="qr-card">
  <div class="qr-code-container">{svg}</div>
  <div class="qr-info">
    <div class="qr-title">{title}</div>
    <div class="qr-id">ID: {id}</div>
    <div class="qr-document">{preview}</div>
  </div>
  <div class="qr-actions">
    {actions}
  </div>
</div>"#,
        svg = svg,
        title = escape_html(&card.title),
        id = id,
        preview = escape_html(&card.document_preview),
        actions = actions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let mut entry = Entry::new();
        entry.link_url("https://example.com/a/very/long/path/to/the/document.pdf");

        assert_eq!(
            document_preview(&entry),
            "Document: https://example.com/a/very/lon..."
        );
    }

    #[test]
    fn test_preview_without_document() {
        let entry = Entry::new();
        assert_eq!(document_preview(&entry), NO_DOCUMENT);
    }

    #[test]
    fn test_card_payload_points_at_redirect_page() {
        let entry = Entry::new();
        let card = Card::from_entry(&entry, "http://localhost:3000").unwrap();
        assert_eq!(
            card.payload,
            format!("http://localhost:3000/qr.html?id={}", entry.id)
        );
    }

    #[test]
    fn test_text_card() {
        let mut entry = Entry::new();
        entry.title = "Invoice".to_string();
        let card = Card::from_entry(&entry, "http://localhost:3000").unwrap();

        let out = text(&card).unwrap();
        assert!(out.contains("Invoice"));
        assert!(out.contains(&format!("ID: {}", entry.id)));
        assert!(out.contains(NO_DOCUMENT));
        assert!(out.contains("[edit] [print] [delete]"));
    }

    #[test]
    fn test_html_card_escapes_title() {
        let mut entry = Entry::new();
        entry.title = "<script>".to_string();
        let card = Card::from_entry(&entry, "http://localhost:3000").unwrap();

        let out = html(&card).unwrap();
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<script>"));
        assert!(out.contains("<svg"));
    }

    #[test]
    fn test_html_card_offers_every_action() {
        let entry = Entry::new();
        let card = Card::from_entry(&entry, "http://localhost:3000").unwrap();

        let out = html(&card).unwrap();
        assert!(out.contains(&format!(r#"href="print/{}""#, entry.id)));
        assert!(out.contains(&format!("Use qr-cli update {}", entry.id)));
        assert!(out.contains(&format!("Use qr-cli remove {}", entry.id)));
        for class in ["btn-edit", "btn-print", "btn-delete"] {
            assert!(out.contains(class), "missing {}", class);
        }
    }
}
