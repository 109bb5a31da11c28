//! Editing operations.
//!
//! An [`EditOp`] either builds a complete replacement [`Document`] from the
//! current one (add, move, resize, ...) or drives the history itself (undo,
//! redo, select). Document-building ops reject bad indexes and non-finite
//! values here, before anything reaches [`crate::history::EditorState`].
//!
//! Ops serialize with an `"op"` tag so editing scripts can be written as
//! JSON lines:
//!
//! ```text
//! {"op": "move", "index": 0, "dx": 10, "dy": -5}
//! {"op": "undo"}
//! ```

use crate::error::{CardifyError, Result};
use crate::model::{Document, Geometry, Node};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Append a node on top of the paint order.
    Add { node: Node },
    Insert { index: usize, node: Node },
    Remove { index: usize },
    Move { index: usize, dx: f64, dy: f64 },
    Resize { index: usize, width: f64, height: f64 },
    Rotate { index: usize, degrees: f64 },
    SetText { index: usize, content: String },
    /// Swap with the node above.
    Raise { index: usize },
    /// Swap with the node below.
    Lower { index: usize },
    Select { index: Option<usize> },
    Undo,
    Redo,
}

impl EditOp {
    /// Builds the document this op produces from `document`.
    ///
    /// Returns `Ok(None)` for ops that do not produce a document (history and
    /// selection control).
    pub fn transform(&self, document: &Document) -> Result<Option<Document>> {
        let mut nodes = document.nodes().to_vec();
        match self {
            EditOp::Add { node } => {
                check_node(node)?;
                nodes.push(node.clone());
            }
            EditOp::Insert { index, node } => {
                check_node(node)?;
                if *index > nodes.len() {
                    return Err(out_of_range(*index, nodes.len()));
                }
                nodes.insert(*index, node.clone());
            }
            EditOp::Remove { index } => {
                check_index(*index, nodes.len())?;
                nodes.remove(*index);
            }
            EditOp::Move { index, dx, dy } => {
                check_finite(&[*dx, *dy])?;
                let geometry = node_at(&mut nodes, *index)?.geometry_mut();
                geometry.x += dx;
                geometry.y += dy;
                check_result(*index, geometry)?;
            }
            EditOp::Resize {
                index,
                width,
                height,
            } => {
                check_finite(&[*width, *height])?;
                if *width < 0.0 || *height < 0.0 {
                    return Err(CardifyError::Edit(format!(
                        "Size must not be negative (got {} x {})",
                        width, height
                    )));
                }
                let geometry = node_at(&mut nodes, *index)?.geometry_mut();
                geometry.width = *width;
                geometry.height = *height;
                check_result(*index, geometry)?;
            }
            EditOp::Rotate { index, degrees } => {
                check_finite(&[*degrees])?;
                let geometry = node_at(&mut nodes, *index)?.geometry_mut();
                geometry.rotation = (geometry.rotation + degrees).rem_euclid(360.0);
                check_result(*index, geometry)?;
            }
            EditOp::SetText { index, content } => match node_at(&mut nodes, *index)? {
                Node::Text(text) => text.content = content.clone(),
                other => {
                    return Err(CardifyError::Edit(format!(
                        "Node {} is {}, not text",
                        index,
                        other.kind()
                    )))
                }
            },
            EditOp::Raise { index } => {
                check_index(*index, nodes.len())?;
                if index + 1 < nodes.len() {
                    nodes.swap(*index, index + 1);
                }
            }
            EditOp::Lower { index } => {
                check_index(*index, nodes.len())?;
                if *index > 0 {
                    nodes.swap(*index, index - 1);
                }
            }
            EditOp::Select { .. } | EditOp::Undo | EditOp::Redo => return Ok(None),
        }
        Ok(Some(Document::from_nodes(nodes)))
    }
}

/// Parses a script of ops: one JSON object per line, blank lines and lines
/// starting with `#` ignored.
pub fn parse_script(script: &str) -> Result<Vec<EditOp>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line.trim())
                .map_err(|e| CardifyError::Api(format!("Line {}: {}", n + 1, e)))
        })
        .collect()
}

fn node_at(nodes: &mut [Node], index: usize) -> Result<&mut Node> {
    let len = nodes.len();
    nodes.get_mut(index).ok_or_else(|| out_of_range(index, len))
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(out_of_range(index, len))
    }
}

fn check_node(node: &Node) -> Result<()> {
    if !node.geometry().is_finite() {
        return Err(CardifyError::Edit(format!(
            "{} node has non-finite geometry",
            node.kind()
        )));
    }
    let geometry = node.geometry();
    if geometry.width < 0.0 || geometry.height < 0.0 {
        return Err(CardifyError::Edit(format!(
            "{} node has negative size",
            node.kind()
        )));
    }
    Ok(())
}

fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CardifyError::Edit("Values must be finite numbers".into()))
    }
}

// Adjusting ops add to stored values, so a finite delta can still overflow.
fn check_result(index: usize, geometry: &Geometry) -> Result<()> {
    if geometry.is_finite() {
        Ok(())
    } else {
        Err(CardifyError::Edit(format!(
            "Node {} would end up with non-finite geometry",
            index
        )))
    }
}

fn out_of_range(index: usize, len: usize) -> CardifyError {
    CardifyError::Edit(format!(
        "Node index {} out of range (document has {} nodes)",
        index, len
    ))
}
