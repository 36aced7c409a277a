use serde::{Deserialize, Serialize};

use super::sink::ChunkSink;
use crate::error::Result;
use crate::types::{Clause, ContentItem, FigureRef, Requirement, TableRef};

/// Standalone projection of one clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Clause id, unmodified.
    pub chunk_id: String,
    pub document_id: String,
    pub title: Option<String>,
    pub parent_id: Option<String>,
    pub content: Vec<ContentItem>,
    pub tables: Vec<TableRef>,
    pub figures: Vec<FigureRef>,
    pub requirements: Vec<Requirement>,
    /// Ids of the direct children, in order.
    pub children_ids: Vec<String>,
}

impl Chunk {
    /// Project `clause` into a chunk of `document_id`.
    #[must_use]
    pub fn from_clause(document_id: &str, clause: &Clause) -> Self {
        Self {
            chunk_id: clause.id.clone(),
            document_id: document_id.to_string(),
            title: clause.title.clone(),
            parent_id: parent_id(&clause.id),
            content: clause.content.clone(),
            tables: clause.tables.clone(),
            figures: clause.figures.clone(),
            requirements: clause.requirements.clone(),
            children_ids: clause.child_ids(),
        }
    }
}

/// Parent of a dotted clause id: everything before the last `.`.
///
/// # Examples
/// ```
/// use clause_chunker::chunk::parent_id;
///
/// assert_eq!(parent_id("5.1.2").as_deref(), Some("5.1"));
/// assert_eq!(parent_id("A.1").as_deref(), Some("A"));
/// assert_eq!(parent_id("A"), None);
/// ```
#[must_use]
pub fn parent_id(clause_id: &str) -> Option<String> {
    clause_id
        .rsplit_once('.')
        .map(|(parent, _)| parent.to_string())
}

/// Emit one chunk per clause, depth-first in pre-order.
///
/// Returns the number of chunks emitted.
///
/// # Errors
///
/// Returns the first error reported by the sink.
pub fn emit_chunks<S: ChunkSink + ?Sized>(
    document_id: &str,
    clauses: &[Clause],
    sink: &mut S,
) -> Result<usize> {
    let mut emitted = 0;
    for clause in clauses {
        sink.accept(Chunk::from_clause(document_id, clause))?;
        emitted += 1 + emit_chunks(document_id, &clause.children, sink)?;
    }
    Ok(emitted)
}

/// Collect the chunks of a clause hierarchy in emission order.
#[must_use]
pub fn flatten(document_id: &str, clauses: &[Clause]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    collect(document_id, clauses, &mut chunks);
    chunks
}

fn collect(document_id: &str, clauses: &[Clause], out: &mut Vec<Chunk>) {
    for clause in clauses {
        out.push(Chunk::from_clause(document_id, clause));
        collect(document_id, &clause.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequirementKind;
    use pretty_assertions::assert_eq;

    fn hierarchy() -> Vec<Clause> {
        vec![
            Clause::new("5", Some("Tests".to_string())).with_children(vec![
                Clause::new("5.1", None).with_children(vec![Clause::new(
                    "5.1.2",
                    Some("Impulse".to_string()),
                )]),
                Clause::new("5.2", None),
            ]),
            Clause::new("A", Some("Annex".to_string())),
        ]
    }

    fn ids(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.chunk_id.as_str()).collect()
    }

    #[test]
    fn test_parent_id() {
        assert_eq!(parent_id("5.1.2").as_deref(), Some("5.1"));
        assert_eq!(parent_id("4").as_deref(), None);
        assert_eq!(parent_id("A/1.3").as_deref(), Some("A/1"));
    }

    #[test]
    fn test_from_clause() {
        let mut clause = Clause::new("4.2", Some("Scope".to_string()))
            .with_children(vec![Clause::new("4.2.1", None), Clause::new("4.2.2", None)]);
        clause.content.push(ContentItem::paragraph("Devices may be sealed."));
        clause.requirements.push(Requirement {
            kind: RequirementKind::Permission,
            keyword: "may".to_string(),
            text: "Devices may be sealed.".to_string(),
        });

        let chunk = Chunk::from_clause("doc", &clause);

        assert_eq!(chunk.chunk_id, "4.2");
        assert_eq!(chunk.document_id, "doc");
        assert_eq!(chunk.title.as_deref(), Some("Scope"));
        assert_eq!(chunk.parent_id.as_deref(), Some("4"));
        assert_eq!(chunk.children_ids, vec!["4.2.1", "4.2.2"]);
        assert_eq!(chunk.content, clause.content);
        assert_eq!(chunk.requirements, clause.requirements);
    }

    #[test]
    fn test_flatten_is_preorder() {
        let chunks = flatten("doc", &hierarchy());
        assert_eq!(ids(&chunks), vec!["5", "5.1", "5.1.2", "5.2", "A"]);
        assert_eq!(chunks[0].children_ids, vec!["5.1", "5.2"]);
        assert!(chunks[4].parent_id.is_none());
    }

    #[test]
    fn test_emit_chunks_counts_all() {
        let mut sink: Vec<Chunk> = Vec::new();
        let emitted = emit_chunks("doc", &hierarchy(), &mut sink).unwrap();

        assert_eq!(emitted, 5);
        assert_eq!(sink, flatten("doc", &hierarchy()));
    }

    #[test]
    fn test_chunk_json_shape() {
        let chunk = Chunk::from_clause("doc", &Clause::new("A", None));
        let value = serde_json::to_value(&chunk).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "chunk_id": "A",
                "document_id": "doc",
                "title": null,
                "parent_id": null,
                "content": [],
                "tables": [],
                "figures": [],
                "requirements": [],
                "children_ids": []
            })
        );
    }

    #[test]
    fn test_emission_is_deterministic() {
        let first = serde_json::to_string(&flatten("doc", &hierarchy())).unwrap();
        let second = serde_json::to_string(&flatten("doc", &hierarchy())).unwrap();
        assert_eq!(first, second);
    }
}
