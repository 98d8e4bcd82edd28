//! Presentation: QR symbols, entry cards, the card grid and the print view

pub mod card;
pub mod code;
pub mod page;
pub mod print;

pub use card::Card;

use url::Url;

use crate::error::{QrError, Result};

/// Path of the page every printed code points at
pub const REDIRECT_PAGE: &str = "qr.html";

/// Build the payload encoded in an entry's QR code: `{base}/qr.html?id={id}`
pub fn redirect_url(base: &str, id: &str) -> Result<String> {
    let mut base =
        Url::parse(base).map_err(|e| QrError::InvalidConfig(format!("public URL {}: {}", base, e)))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base
        .join(REDIRECT_PAGE)
        .map_err(|e| QrError::InvalidConfig(e.to_string()))?;
    url.query_pairs_mut().clear().append_pair("id", id);

    Ok(url.into())
}

/// Escape text for interpolation into HTML
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_url() {
        assert_eq!(
            redirect_url("http://localhost:3000", "QR-ABC123XYZ").unwrap(),
            "http://localhost:3000/qr.html?id=QR-ABC123XYZ"
        );
        assert_eq!(
            redirect_url("https://docs.example.com/app", "QR-1").unwrap(),
            "https://docs.example.com/app/qr.html?id=QR-1"
        );
    }

    #[test]
    fn test_redirect_url_encodes_id() {
        let url = redirect_url("http://localhost:3000/", "a b&c").unwrap();
        assert_eq!(url, "http://localhost:3000/qr.html?id=a+b%26c");
    }

    #[test]
    fn test_redirect_url_bad_base() {
        assert!(matches!(
            redirect_url("not a url", "QR-1"),
            Err(QrError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
