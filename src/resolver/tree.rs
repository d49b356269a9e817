use super::builtins::Builtin;

/// What a node's value resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// One of the builtin scalars.
    Builtin(Builtin),
    /// A structural type, named after the declared complex type, or after the element for an
    /// anonymous type. Nodes with the same composite name share one generated definition.
    Composite(String),
    /// A name that is neither declared nor builtin, passed through unchanged.
    Opaque(String),
}

impl ResolvedType {
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.rust_type(),
            Self::Composite(name) | Self::Opaque(name) => name.as_str(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Composite(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: String,
    /// Always scalar: [`ResolvedType::Builtin`] or [`ResolvedType::Opaque`].
    pub type_: ResolvedType,
    pub required: bool,
}

/// A resolved, emission-ready description of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub type_: ResolvedType,
    /// The element's maximum occurrence is unbounded.
    pub repeated: bool,
    /// The element's minimum occurrence is zero.
    pub optional: bool,
    /// The value is character data carried next to the attributes; `type_` is its scalar.
    pub text_content: bool,
    /// The type was already being resolved further up the tree. The node carries the type name
    /// only; its body is the one of the enclosing node with the same `type_`.
    pub reference: bool,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeDescriptor>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// An empty node, typed as an anonymous composite named after itself.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            type_: ResolvedType::Composite(name.clone()),
            name,
            repeated: false,
            optional: false,
            text_content: false,
            reference: false,
            documentation: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The name of the definition an emitter generates for this node, or `None` for plain
    /// scalar leaves.
    ///
    /// Text-content nodes have a scalar `type_` but still need a definition holding the
    /// attributes next to the value; it is named after the node.
    pub fn definition_name(&self) -> Option<&str> {
        match &self.type_ {
            ResolvedType::Composite(name) => Some(name.as_str()),
            _ if self.text_content => Some(self.name.as_str()),
            _ => None,
        }
    }

    /// Pre-order iterator over this node and all its descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
