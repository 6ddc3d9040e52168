//! Institutional branding: color palette and the optional report logo
//!
//! The logo is fetched from a configured URL with a short fixed timeout.
//! Fetch failure of any kind degrades to a report without the logo; this is
//! the only recovered failure in the rendering pipeline.

use std::time::Duration;

/// Primary institutional accent (guinda), 0.0-1.0 RGB
pub const GUINDA: (f32, f32, f32) = (0.412, 0.110, 0.196);
/// Primary accent as packed RGB for the spreadsheet renderer
pub const GUINDA_HEX: u32 = 0x691C32;

/// Secondary accent for divider bars (arena)
pub const ARENA: (f32, f32, f32) = (0.737, 0.584, 0.361);
pub const ARENA_HEX: u32 = 0xBC955C;

/// Light neutral used for zebra striping
pub const ZEBRA: (f32, f32, f32) = (0.957, 0.949, 0.937);
pub const ZEBRA_HEX: u32 = 0xF4F2EF;

/// Fetch the institutional logo, returning `None` on any failure
pub async fn fetch_logo(url: &str, timeout: Duration) -> Option<Vec<u8>> {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!("logo fetch skipped, client build failed: {err}");
            return None;
        }
    };

    match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(err) => {
                tracing::warn!("logo fetch failed reading body: {err}");
                None
            }
        },
        Err(err) => {
            tracing::warn!("logo fetch failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_logo_unreachable_returns_none() {
        // nothing listens on this port; the fetch must degrade, not error
        let logo = fetch_logo("http://127.0.0.1:9/escudo.png", Duration::from_secs(1)).await;
        assert!(logo.is_none());
    }

    #[tokio::test]
    async fn test_fetch_logo_bad_url_returns_none() {
        let logo = fetch_logo("not a url", Duration::from_secs(1)).await;
        assert!(logo.is_none());
    }
}
