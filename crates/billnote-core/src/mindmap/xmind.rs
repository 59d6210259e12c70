//! XMind (`.xmind`) export.
//!
//! An XMind file is a zip archive holding `content.json` (one sheet with a
//! topic tree), `metadata.json` and `manifest.json`. Topic titles are plain
//! text, so node HTML is decoded and stripped first.

use std::io::{Cursor, Write as _};

use serde::Serialize;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::entities::strip_html;
use super::tree::MindNode;
use crate::error::Result;

pub const DEFAULT_SHEET_TITLE: &str = "Mind Map";
const UNTITLED_TOPIC: &str = "Untitled";
const CREATOR_NAME: &str = "BillNote";

#[derive(Debug, Serialize)]
struct Sheet {
    id: String,
    class: &'static str,
    title: String,
    #[serde(rename = "rootTopic")]
    root_topic: Topic,
    #[serde(rename = "topicPositioning")]
    topic_positioning: &'static str,
}

#[derive(Debug, Serialize)]
struct Topic {
    id: String,
    class: &'static str,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<TopicChildren>,
}

#[derive(Debug, Serialize)]
struct TopicChildren {
    attached: Vec<Topic>,
}

fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

fn topic(node: &MindNode) -> Topic {
    let title = strip_html(&node.content);
    let title = if title.trim().is_empty() {
        UNTITLED_TOPIC.to_string()
    } else {
        title
    };
    let children = (!node.children.is_empty()).then(|| TopicChildren {
        attached: node.children.iter().map(topic).collect(),
    });
    Topic {
        id: new_id(),
        class: "topic",
        title,
        children,
    }
}

/// Builds the `.xmind` archive bytes for `root`.
pub fn export_xmind(root: &MindNode, title: Option<&str>) -> Result<Vec<u8>> {
    let sheet_title = title
        .map(strip_html)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHEET_TITLE.to_string());
    let content = vec![Sheet {
        id: new_id(),
        class: "sheet",
        title: sheet_title,
        root_topic: topic(root),
        topic_positioning: "fixed",
    }];
    let metadata = serde_json::json!({
        "creator": {
            "name": CREATOR_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }
    });
    let manifest = serde_json::json!({
        "file-entries": {
            "content.json": {},
            "metadata.json": {},
        }
    });

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in [
        ("content.json", serde_json::to_string_pretty(&content)?),
        ("metadata.json", serde_json::to_string_pretty(&metadata)?),
        ("manifest.json", serde_json::to_string_pretty(&manifest)?),
    ] {
        archive.start_file(name, options)?;
        archive.write_all(body.as_bytes())?;
    }
    Ok(archive.finish()?.into_inner())
}
