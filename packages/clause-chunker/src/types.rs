//! Core data types for the clause chunker.
//!
//! Input side: the block tree produced by the layout converter. Output side:
//! clauses, their content records and the per-document schema.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::extract::strip_html;

/// Block types the layout converter emits that the builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Running page header.
    PageHeader,

    /// Running page footer.
    PageFooter,

    /// Section heading, carrying a clause number and/or title.
    SectionHeader,

    /// Body paragraph.
    Text,

    /// Caption attached to a table or figure.
    Caption,

    /// Table.
    Table,

    /// Figure.
    Figure,

    /// Embedded picture.
    Picture,

    /// Anything else (lists, groups, pages, equations, ...).
    Other,
}

impl BlockType {
    /// Classify a converter `block_type` tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "PageHeader" => Self::PageHeader,
            "PageFooter" => Self::PageFooter,
            "SectionHeader" => Self::SectionHeader,
            "Text" => Self::Text,
            "Caption" => Self::Caption,
            "Table" => Self::Table,
            "Figure" => Self::Figure,
            "Picture" => Self::Picture,
            _ => Self::Other,
        }
    }

    /// Get the converter tag for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageHeader => "PageHeader",
            Self::PageFooter => "PageFooter",
            Self::SectionHeader => "SectionHeader",
            Self::Text => "Text",
            Self::Caption => "Caption",
            Self::Table => "Table",
            Self::Figure => "Figure",
            Self::Picture => "Picture",
            Self::Other => "Other",
        }
    }
}

/// A node of the converter's block tree.
///
/// Every field is optional on the wire; wrongly typed values and non-object
/// children are dropped instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Block {
    /// Raw `block_type` tag.
    #[serde(default, deserialize_with = "lenient_string")]
    pub block_type: Option<String>,

    /// HTML-ish markup payload.
    #[serde(default, deserialize_with = "lenient_string")]
    pub html: Option<String>,

    /// Child blocks in reading order.
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub children: Vec<Block>,

    /// Base64 image payloads keyed by image name.
    #[serde(default, deserialize_with = "lenient_images")]
    pub images: IndexMap<String, String>,
}

impl Block {
    /// Create a block of the given type with markup and no children.
    #[must_use]
    pub fn new(block_type: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            block_type: Some(block_type.into()),
            html: Some(html.into()),
            ..Self::default()
        }
    }

    /// Set the child blocks.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Add a base64 image payload.
    #[must_use]
    pub fn with_image(mut self, name: impl Into<String>, data: impl Into<String>) -> Self {
        self.images.insert(name.into(), data.into());
        self
    }

    /// Classification of this block.
    #[must_use]
    pub fn kind(&self) -> BlockType {
        self.block_type
            .as_deref()
            .map_or(BlockType::Other, BlockType::from_tag)
    }

    /// Markup with tags removed and surrounding whitespace trimmed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.html.as_deref().map(strip_html).unwrap_or_default()
    }
}

/// Root of a converter document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockTree {
    /// Top-level blocks (usually pages). `None` when the root has no array.
    #[serde(default, deserialize_with = "lenient_root_blocks")]
    pub children: Option<Vec<Block>>,
}

impl BlockTree {
    /// Create a tree from top-level blocks.
    #[must_use]
    pub fn new(children: Vec<Block>) -> Self {
        Self {
            children: Some(children),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| v.as_str().map(ToString::to_string)))
}

fn blocks_from_value(value: Option<Value>) -> Option<Vec<Block>> {
    match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    }
}

fn lenient_blocks<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Block>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(blocks_from_value(value).unwrap_or_default())
}

fn lenient_root_blocks<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Block>>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(blocks_from_value(value))
}

fn lenient_images<'de, D: Deserializer<'de>>(d: D) -> Result<IndexMap<String, String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Object(map)) = value else {
        return Ok(IndexMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(name, data)| data.as_str().map(|s| (name, s.to_string())))
        .collect())
}

/// One content record of a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Plain paragraph text.
    Paragraph { text: String },
}

impl ContentItem {
    /// Create a paragraph record.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }
}

/// Normative category of a requirement, keyed by its modal verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// "shall not"
    Prohibition,
    /// "shall"
    Mandatory,
    /// "should"
    Recommendation,
    /// "may"
    Permission,
}

impl RequirementKind {
    /// Map a lowercase modal keyword to its category.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "shall not" => Some(Self::Prohibition),
            "shall" => Some(Self::Mandatory),
            "should" => Some(Self::Recommendation),
            "may" => Some(Self::Permission),
            _ => None,
        }
    }

    /// Category name as written in schema and chunk files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prohibition => "prohibition",
            Self::Mandatory => "mandatory",
            Self::Recommendation => "recommendation",
            Self::Permission => "permission",
        }
    }
}

/// A classified normative statement taken from one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub kind: RequirementKind,

    /// Lowercased keyword that triggered the classification.
    pub keyword: String,

    /// Full paragraph text.
    pub text: String,
}

/// Reference to a table found inside a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Table number from the caption (e.g. "4", "B2").
    pub number: Option<String>,

    pub caption: Option<String>,
}

/// Reference to a figure found inside a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureRef {
    /// Figure number from the caption.
    pub number: Option<String>,

    pub caption: Option<String>,

    /// Extracted image file name, relative to the document's asset directory.
    pub file: Option<String>,
}

/// A numbered section of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Dotted clause id (e.g. "4.2.1", "A.1").
    pub id: String,

    pub title: Option<String>,

    /// Nested clauses, in document order.
    #[serde(default)]
    pub children: Vec<Clause>,

    #[serde(default)]
    pub content: Vec<ContentItem>,

    #[serde(default)]
    pub tables: Vec<TableRef>,

    #[serde(default)]
    pub figures: Vec<FigureRef>,

    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl Clause {
    /// Create an empty clause.
    #[must_use]
    pub fn new(id: impl Into<String>, title: Option<String>) -> Self {
        Self {
            id: id.into(),
            title,
            children: Vec::new(),
            content: Vec::new(),
            tables: Vec::new(),
            figures: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Set the nested clauses.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Clause>) -> Self {
        self.children = children;
        self
    }

    /// Ids of the direct children, in order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<String> {
        self.children.iter().map(|c| c.id.clone()).collect()
    }
}

/// Image and table counters for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStatistics {
    pub total_images: usize,
    pub clause_images: usize,
    pub misc_images: usize,
    pub total_tables: usize,
}

/// Clause hierarchy of one document, as written between the two stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSchema {
    pub document_id: String,

    pub statistics: DocumentStatistics,

    /// Top-level clauses in first-seen order.
    pub clauses: Vec<Clause>,
}

impl DocumentSchema {
    /// Number of clauses anywhere in the hierarchy.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        fn count(clauses: &[Clause]) -> usize {
            clauses.iter().map(|c| 1 + count(&c.children)).sum()
        }
        count(&self.clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_type_from_tag() {
        assert_eq!(BlockType::from_tag("SectionHeader"), BlockType::SectionHeader);
        assert_eq!(BlockType::from_tag("PageFooter"), BlockType::PageFooter);
        assert_eq!(BlockType::from_tag("ListGroup"), BlockType::Other);
        assert_eq!(BlockType::from_tag("text"), BlockType::Other);
    }

    #[test]
    fn test_block_deserialize_full() {
        let block: Block = serde_json::from_value(json!({
            "id": "/page/0/SectionHeader/1",
            "block_type": "SectionHeader",
            "html": "<h2>4.2 Scope</h2>",
            "polygon": [[0, 0], [1, 1]],
            "children": null,
        }))
        .unwrap();

        assert_eq!(block.kind(), BlockType::SectionHeader);
        assert_eq!(block.plain_text(), "4.2 Scope");
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_block_deserialize_is_lenient() {
        let block: Block = serde_json::from_value(json!({
            "block_type": 7,
            "html": ["not", "a", "string"],
            "children": [
                "junk",
                42,
                {"block_type": "Text", "html": "<p>kept</p>"},
                ["also", "junk"]
            ],
            "images": {"a": "aGVsbG8=", "b": null}
        }))
        .unwrap();

        assert_eq!(block.kind(), BlockType::Other);
        assert_eq!(block.plain_text(), "");
        assert_eq!(block.children.len(), 1);
        assert_eq!(block.children[0].plain_text(), "kept");
        assert_eq!(block.images.len(), 1);
    }

    #[test]
    fn test_block_tree_without_children() {
        let tree: BlockTree = serde_json::from_value(json!({"block_type": "Document"})).unwrap();
        assert!(tree.children.is_none());

        let tree: BlockTree = serde_json::from_value(json!({"children": []})).unwrap();
        assert_eq!(tree.children, Some(Vec::new()));
    }

    #[test]
    fn test_requirement_serialization() {
        let req = Requirement {
            kind: RequirementKind::Prohibition,
            keyword: "shall not".to_string(),
            text: "X shall not Y.".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "prohibition", "keyword": "shall not", "text": "X shall not Y."})
        );
    }

    #[test]
    fn test_content_item_serialization() {
        assert_eq!(
            serde_json::to_value(ContentItem::paragraph("Hello")).unwrap(),
            json!({"type": "paragraph", "text": "Hello"})
        );
    }

    #[test]
    fn test_requirement_kind_from_keyword() {
        assert_eq!(
            RequirementKind::from_keyword("shall not"),
            Some(RequirementKind::Prohibition)
        );
        assert_eq!(
            RequirementKind::from_keyword("may"),
            Some(RequirementKind::Permission)
        );
        assert_eq!(RequirementKind::from_keyword("must"), None);
    }

    #[test]
    fn test_clause_serialization_shape() {
        let clause = Clause::new("4.2", Some("Scope".to_string()));
        assert_eq!(
            serde_json::to_value(&clause).unwrap(),
            json!({
                "id": "4.2",
                "title": "Scope",
                "children": [],
                "content": [],
                "tables": [],
                "figures": [],
                "requirements": []
            })
        );
    }

    #[test]
    fn test_clause_count_includes_nested() {
        let schema = DocumentSchema {
            document_id: "doc".to_string(),
            statistics: DocumentStatistics::default(),
            clauses: vec![
                Clause::new("1", None).with_children(vec![Clause::new("1.1", None)]),
                Clause::new("2", None),
            ],
        };
        assert_eq!(schema.clause_count(), 3);
    }
}
