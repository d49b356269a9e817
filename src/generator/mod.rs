//! What an emitter needs on top of the resolved trees: which definitions to generate, and how
//! fields refer to them.

pub mod naming;

pub use naming::{normalize, NamingPolicy};

use std::collections::HashSet;

use crate::resolver::TreeNode;

/// Nodes needing a generated definition, in pre-order, one per definition name.
///
/// The first node with a given name wins. Reference nodes are skipped: the definition they name
/// is given by an enclosing node. Scalar leaves need no definition, but their subtrees are
/// still walked.
pub fn definitions(roots: &[TreeNode]) -> Vec<&TreeNode> {
    let mut seen = HashSet::new();
    roots
        .iter()
        .flat_map(TreeNode::iter)
        .filter(|node| !node.reference)
        .filter(|node| node.definition_name().is_some_and(|name| seen.insert(name)))
        .collect()
}

/// The type a field holding `node` is declared with.
pub fn type_name(policy: &NamingPolicy, node: &TreeNode) -> String {
    let name = match node.definition_name() {
        Some(definition) => policy.normalize(definition),
        None => node.type_.name().to_string(),
    };
    // A reference node sits inside the definition it names.
    let name = if node.reference && !node.repeated {
        format!("Box<{name}>")
    } else {
        name
    };

    if node.repeated {
        format!("Vec<{name}>")
    } else if node.optional {
        format!("Option<{name}>")
    } else {
        name
    }
}
