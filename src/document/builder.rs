//! Fluent construction of documents.

use crate::document::Document;
use crate::error::Result;
use crate::node::TextRange;
use crate::raw::{RawDocument, RawNode, RawRange};

/// Builder for [`Document`].
///
/// # Examples
///
/// ```
/// use richdoc::{Document, Marks, TextRange};
///
/// let doc = Document::builder()
///     .block("heading", [TextRange::new("Notes", Marks::BOLD)])
///     .paragraph("First line")
///     .build()
///     .unwrap();
/// assert_eq!(doc.text(), "Notes\nFirst line");
/// ```
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    nodes: Vec<RawNode>,
}

impl DocumentBuilder {
    /// Append a paragraph of unmarked text.
    #[must_use]
    pub fn paragraph(mut self, text: &str) -> Self {
        self.nodes.push(RawNode::paragraph(text));
        self
    }

    /// Append a block of `kind` holding one Text node made of `ranges`.
    #[must_use]
    pub fn block<I>(mut self, kind: &str, ranges: I) -> Self
    where
        I: IntoIterator<Item = TextRange>,
    {
        let ranges = ranges.into_iter().map(|range| RawRange::from(&range)).collect();
        self.nodes
            .push(RawNode::container(kind, vec![RawNode::Text { ranges }]));
        self
    }

    /// Append an arbitrary top-level node.
    #[must_use]
    pub fn node(mut self, node: RawNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Build the document, checking its structure.
    pub fn build(self) -> Result<Document> {
        Document::from_raw(&RawDocument { nodes: self.nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::Marks;

    #[test]
    fn test_builder_marks() {
        let doc = Document::builder()
            .block(
                "paragraph",
                [TextRange::plain("a "), TextRange::new("b", Marks::CODE)],
            )
            .build()
            .unwrap();
        let text = doc.get_first_text().unwrap();
        assert_eq!(text.ranges()[1], TextRange::new("b", Marks::CODE));
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        assert!(Document::builder().build().is_err());
    }
}
