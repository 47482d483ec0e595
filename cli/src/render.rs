//! Text rendering of game trees

use abprune_engine::node::{Bound, GameTree, Node, NodeId};
use colored::Colorize;
use termtree::Tree;

/// Render the whole tree, one line per node, with the current annotation.
///
/// Nodes below a pruned edge are still listed so the subtree stays visible.
pub fn render_tree(tree: &GameTree) -> Tree<String> {
    subtree(tree, 0, false)
}

fn subtree(tree: &GameTree, id: NodeId, under_pruned: bool) -> Tree<String> {
    let Some(node) = tree.get(id) else {
        return Tree::new(format!("[{}] ?", id));
    };
    let cut = under_pruned || node.is_pruned();
    let mut out = Tree::new(label(node, cut));
    for &child in node.children() {
        out.push(subtree(tree, child, cut));
    }
    out
}

/// One-line description of a node.
fn label(node: &Node, under_pruned: bool) -> String {
    let text = match node {
        Node::Leaf { id, value, .. } => format!("[{}] {}", id, value),
        Node::Internal { id, side, value, alpha, beta, .. } => {
            let value = value.map_or_else(|| "?".to_string(), |v| v.to_string());
            let mut text = format!("[{}] {} {}", id, side.to_string().to_uppercase(), value);
            if alpha.is_some() || beta.is_some() {
                text.push_str(&format!(" (α={} β={})", bound(*alpha), bound(*beta)));
            }
            text
        }
    };
    if node.is_pruned() {
        format!("{} {}", text.dimmed(), "✂ pruned".red())
    } else if under_pruned {
        text.dimmed().to_string()
    } else {
        text
    }
}

fn bound(b: Option<Bound>) -> String {
    b.map_or_else(|| "?".to_string(), |b| b.to_string())
}
