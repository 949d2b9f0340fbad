// src/manifest/render.rs

//! Graph rendering backend for the manifest's `dot_dag` field.

use std::fmt::Write;

use crate::dag::Workflow;

/// Renders the final job/edge set as text.
///
/// The contract is minimal: one node per job id and one directed edge per
/// `(parent, child)` pair, identified by id only.
pub trait GraphRenderer {
    fn render(&self, workflow: &Workflow) -> String;
}

/// Default renderer producing `strict digraph "" { ... }`.
///
/// Nodes are listed in job order; edges are grouped by parent in job order,
/// children in job order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictDigraph;

impl GraphRenderer for StrictDigraph {
    fn render(&self, workflow: &Workflow) -> String {
        let position = |id: &str| workflow.jobs.iter().position(|j| j.id == id);

        let mut out = String::from("strict digraph \"\" {\n");

        for job in workflow.jobs.iter() {
            let _ = writeln!(out, "\t{};", quote_id(&job.id));
        }

        for job in workflow.jobs.iter() {
            let Some(children) = workflow.deps.get(&job.id) else {
                continue;
            };
            let mut children: Vec<&String> = children.iter().collect();
            children.sort_by_key(|c| position(c.as_str()));

            for child in children {
                let _ = writeln!(out, "\t{} -> {};", quote_id(&job.id), quote_id(child));
            }
        }

        out.push_str("}\n");
        out
    }
}

/// Emit plain identifiers bare, quote everything else.
fn quote_id(id: &str) -> String {
    let mut chars = id.chars();
    let bare = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if bare {
        id.to_string()
    } else {
        format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
