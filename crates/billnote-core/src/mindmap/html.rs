//! Self-contained interactive HTML export.

use super::tree::MindNode;
use crate::error::Result;
use crate::util::escape_html;

pub const D3_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/d3@7";
pub const MARKMAP_VIEW_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/markmap-view@0.18.10";
const DEFAULT_DOCUMENT_TITLE: &str = "BillNote Mind Map";

/// HTML page that renders `root` with markmap-view and fits it on load.
pub fn export_html(root: &MindNode, title: Option<&str>) -> Result<String> {
    // `</` would close the inline script early.
    let data = serde_json::to_string(root)?.replace("</", "<\\/");
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_TITLE);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
  body {{
    margin: 0;
    padding: 0;
    font-family: sans-serif;
  }}
  #mindmap {{
    display: block;
    width: 100%;
    height: 100vh;
  }}
  </style>
  <script src="{D3_SCRIPT}"></script>
  <script src="{MARKMAP_VIEW_SCRIPT}"></script>
</head>
<body>
  <svg id="mindmap"></svg>
  <script>
  (async () => {{
    const {{ markmap }} = window;
    const {{ Markmap }} = markmap;
    const mm = Markmap.create(document.getElementById('mindmap'));
    mm.setData({data});
    mm.fit();
  }})();
  </script>
</body>
</html>"#,
        title = escape_html(title)
    ))
}
