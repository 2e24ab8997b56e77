//! Menu tree navigation.
//!
//! The backend returns a menu tree of unknown depth. Pages wrap their
//! content in a `Root` node and terminal nodes carry the document URL in
//! `Detail`. We convert the wire tree into [`MenuNode`] once and walk that.

use tracing::debug;

use super::error::DsbError;
use super::types::{MenuItem, ResponseEnvelope};

/// A node of the menu tree after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    /// Terminal node pointing at a document.
    Leaf { url: String },
    /// Inner node.
    Branch { children: Vec<MenuNode> },
}

impl MenuNode {
    /// Convert a wire menu item.
    ///
    /// A node with children is a branch even if it also has a `Detail`.
    /// A `Root` wrapper contributes its children to the page node. Only a
    /// `Detail` that looks like a document reference makes a leaf; nodes
    /// without one (blank, or free text such as a news message) become
    /// empty branches.
    pub fn from_item(item: &MenuItem) -> Self {
        let mut children: Vec<MenuNode> = item.children.iter().map(Self::from_item).collect();

        if let Some(root) = &item.root {
            match Self::from_item(root) {
                MenuNode::Branch { children: inner } => children.extend(inner),
                leaf => children.push(leaf),
            }
        }

        if children.is_empty() {
            let detail = item.detail.as_deref().map(str::trim);
            if let Some(url) = detail.filter(|d| is_document_ref(d)) {
                return MenuNode::Leaf {
                    url: url.to_string(),
                };
            }
        }

        MenuNode::Branch { children }
    }

    /// All leaf URLs below this node, depth first, in document order.
    pub fn leaf_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        self.collect_urls(&mut urls);
        urls
    }

    fn collect_urls(&self, out: &mut Vec<String>) {
        match self {
            MenuNode::Leaf { url } => out.push(url.clone()),
            MenuNode::Branch { children } => {
                for child in children {
                    child.collect_urls(out);
                }
            }
        }
    }
}

/// Whether a `Detail` value names a document: an absolute URL or a relative
/// path such as `plans/subst_001.htm`.
pub fn is_document_ref(detail: &str) -> bool {
    !detail.is_empty()
        && !detail.chars().any(char::is_whitespace)
        && detail.contains(['/', '.'])
}

/// Whether a document URL points at an HTML timetable.
///
/// Accepts `.htm` pages, rejects `.html` and the `news.htm` notice board.
pub fn is_timetable_url(url: &str) -> bool {
    url.ends_with(".htm") && !url.ends_with(".html") && !url.ends_with("news.htm")
}

/// Collect every document URL under the first top-level menu item.
///
/// Fails with [`DsbError::NotFound`] when the tree has no leaves at all.
pub fn discover_urls(envelope: &ResponseEnvelope) -> Result<Vec<String>, DsbError> {
    let urls = envelope
        .result_menu_items
        .first()
        .map(|top| MenuNode::from_item(top).leaf_urls())
        .unwrap_or_default();

    if urls.is_empty() {
        return Err(DsbError::NotFound);
    }

    debug!(count = urls.len(), "discovered document URLs");
    Ok(urls)
}

/// [`discover_urls`] followed by the timetable filter.
pub fn discover_timetables(envelope: &ResponseEnvelope) -> Result<Vec<String>, DsbError> {
    let timetables: Vec<String> = discover_urls(envelope)?
        .into_iter()
        .filter(|url| is_timetable_url(url))
        .collect();

    debug!(count = timetables.len(), "timetable URLs after filtering");
    Ok(timetables)
}
