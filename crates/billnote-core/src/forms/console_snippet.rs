//! One-click cookie import script.
//!
//! The returned JavaScript is pasted into the developer console of a video
//! site. It reads that site's `document.cookie`, infers the platform from
//! the hostname and relays both to the backend.

use crate::models::Platform;

/// Builds the console expression that posts `{platform, cookie}` to
/// `{api_base_url}/update_downloader_cookie`.
pub fn console_snippet(api_base_url: &str) -> String {
    let endpoint = format!(
        "{}/update_downloader_cookie",
        api_base_url.trim().trim_end_matches('/')
    );
    let endpoint = serde_json::Value::String(endpoint).to_string();

    let mut platform_chain = String::new();
    for platform in Platform::downloader_platforms() {
        let name = platform.as_str();
        platform_chain.push_str(&format!("h.includes('{name}') ? '{name}' : "));
    }
    platform_chain.push_str("'unknown'");

    format!(
        "(() => {{ const h = location.hostname; \
const platform = {platform_chain}; \
fetch({endpoint}, {{ method: 'POST', headers: {{ 'Content-Type': 'application/json' }}, \
body: JSON.stringify({{ platform, cookie: document.cookie }}) }})\
.then(r => r.json()).then(d => console.log('Cookie imported', d))\
.catch(e => console.error('Cookie import failed', e)); }})()"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_targets_configured_backend() {
        let script = console_snippet("http://localhost:8000/api/");
        assert!(script.contains("fetch(\"http://localhost:8000/api/update_downloader_cookie\""));
        assert!(script.contains("document.cookie"));
        assert!(script.contains("JSON.stringify({ platform, cookie: document.cookie })"));
    }

    #[test]
    fn snippet_infers_every_downloader_platform() {
        let script = console_snippet("http://localhost:8000/api");
        for name in ["bilibili", "youtube", "douyin", "kuaishou"] {
            assert!(script.contains(&format!("h.includes('{name}') ? '{name}'")));
        }
        assert!(script.contains(": 'unknown'"));
        assert!(!script.contains("'local'"));
    }
}
