//! Resolution of a merged set of schemas into one [`TreeNode`] tree per top-level element.

pub mod builtins;
pub mod error;
pub mod tree;

mod lookup;

pub use builtins::Builtin;
pub use error::ResolveError;
pub use tree::{AttributeDescriptor, ResolvedType, TreeNode};

use tracing::{debug, trace};

use crate::xsd::{
    Attribute, AttributeUse, ComplexType, Derivation, Element, Extension, Flatten, Occurs, QName,
    Schema, SimpleType,
};
use lookup::{Found, TypeDefinition, TypeIndex};

/// What to do when two type declarations share a name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicateTypeAction {
    /// Report [`ResolveError::AmbiguousName`].
    #[default]
    Deny,
    /// Use the last declaration and log a warning.
    Warn,
    /// Use the last declaration.
    Allow,
}

#[derive(Clone, Debug, Default)]
pub struct ResolverOptions {
    pub duplicate_types: DuplicateTypeAction,
}

/// Resolves `schemas` with the default options.
pub fn resolve(schemas: &[Schema]) -> Result<Vec<TreeNode>, ResolveError> {
    Resolver::new(schemas, ResolverOptions::default())?.resolve()
}

pub struct Resolver<'a> {
    schemas: &'a [Schema],
    index: TypeIndex<'a>,
}

impl<'a> Resolver<'a> {
    /// Indexes the type declarations of all `schemas`.
    pub fn new(schemas: &'a [Schema], options: ResolverOptions) -> Result<Self, ResolveError> {
        Ok(Self {
            schemas,
            index: TypeIndex::build(schemas, options.duplicate_types)?,
        })
    }

    /// Resolves every top-level element, in declaration order.
    pub fn resolve(&self) -> Result<Vec<TreeNode>, ResolveError> {
        let mut context = ResolveContext::new(&self.index);
        let mut roots = Vec::new();
        for schema in self.schemas {
            let namespace = schema.target_namespace.as_deref();
            for element in &schema.elements {
                roots.push(context.resolve_element(element, namespace)?);
            }
        }
        Ok(roots)
    }
}

struct ResolveContext<'r, 'a> {
    index: &'r TypeIndex<'a>,
    /// Named types whose bodies are being expanded, outermost first.
    resolving: Vec<QName>,
    /// Where the current node's entries in `resolving` start. The entries from here on are the
    /// derivation chain of the node being built.
    node_start: usize,
}

impl<'r, 'a> ResolveContext<'r, 'a> {
    fn new(index: &'r TypeIndex<'a>) -> Self {
        Self {
            index,
            resolving: Vec::new(),
            node_start: 0,
        }
    }

    fn resolve_element(
        &mut self,
        element: &Element,
        namespace: Option<&str>,
    ) -> Result<TreeNode, ResolveError> {
        trace!(element = %element.name, type_ref = ?element.type_ref, "resolving element");

        let mut node = TreeNode::new(&element.name);
        node.repeated = element.is_unbounded();
        node.optional = element.occurs.min_occurs == 0;
        node.documentation = element.annotation.clone();

        let parent_start = std::mem::replace(&mut self.node_start, self.resolving.len());
        let result = self.resolve_element_type(&mut node, element, namespace);
        self.node_start = parent_start;

        result.map(|()| node)
    }

    fn resolve_element_type(
        &mut self,
        node: &mut TreeNode,
        element: &Element,
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        if let Some(type_ref) = element.type_ref() {
            match self.index.find(type_ref, namespace)? {
                Found::Declared(key, definition) => {
                    if self.resolving.contains(&key) {
                        debug!(element = %element.name, type_name = %key, "recursive type, emitting a reference node");
                        node.type_ = ResolvedType::Composite(key.local_name);
                        node.reference = true;
                        return Ok(());
                    }
                    self.resolve_declared(node, &key, definition)?;
                    if !node.type_.is_scalar() {
                        node.type_ = ResolvedType::Composite(key.local_name);
                    }
                }
                Found::Builtin(builtin) => node.type_ = ResolvedType::Builtin(builtin),
                Found::Opaque(name) => node.type_ = ResolvedType::Opaque(name),
            }
        } else if let Some(complex_type) = &element.complex_type {
            self.resolve_complex_type(node, complex_type, namespace)?;
        } else if let Some(simple_type) = &element.simple_type {
            self.resolve_simple_type(node, simple_type, namespace)?;
        }
        Ok(())
    }

    /// Expands a named type onto `node`, keeping it on the `resolving` stack meanwhile.
    fn resolve_declared(
        &mut self,
        node: &mut TreeNode,
        key: &QName,
        definition: TypeDefinition<'_>,
    ) -> Result<(), ResolveError> {
        trace!(type_name = %key, "expanding declared type");

        self.resolving.push(key.clone());
        let namespace = key.namespace_name.as_deref();
        let result = match definition {
            TypeDefinition::Complex(complex_type) => {
                self.resolve_complex_type(node, complex_type, namespace)
            }
            TypeDefinition::Simple(simple_type) => {
                self.resolve_simple_type(node, simple_type, namespace)
            }
        };
        self.resolving.pop();

        result
    }

    /// Resolves the base of a derivation onto `node`.
    fn resolve_base(
        &mut self,
        node: &mut TreeNode,
        base: &QName,
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        match self.index.find(base, namespace)? {
            Found::Declared(key, definition) => {
                if self.resolving[self.node_start..].contains(&key) {
                    return Err(ResolveError::CircularDerivation(key));
                }
                self.resolve_declared(node, &key, definition)
            }
            Found::Builtin(builtin) => {
                node.type_ = ResolvedType::Builtin(builtin);
                Ok(())
            }
            Found::Opaque(name) => {
                node.type_ = ResolvedType::Opaque(name);
                Ok(())
            }
        }
    }

    fn resolve_complex_type(
        &mut self,
        node: &mut TreeNode,
        complex_type: &ComplexType,
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        for element in complex_type.content.flatten() {
            let child = self.resolve_element(element, namespace)?;
            node.children.push(child);
        }

        self.resolve_attributes(node, &complex_type.attributes, namespace)?;

        if let Some(complex_content) = &complex_type.complex_content {
            match &complex_content.derivation {
                Some(Derivation::Extension(extension)) => {
                    self.resolve_extension(node, extension, namespace)?;
                }
                Some(Derivation::Restriction(_)) => {
                    return Err(unsupported(node, "restriction of complex content"));
                }
                None => {}
            }
        }

        if let Some(simple_content) = &complex_type.simple_content {
            match &simple_content.derivation {
                Some(Derivation::Extension(extension)) => {
                    self.resolve_extension(node, extension, namespace)?;
                }
                Some(Derivation::Restriction(restriction)) => {
                    // Facets are not enforced; the shape is the base's.
                    self.resolve_base(node, &restriction.base, namespace)?;
                }
                None => {}
            }
        }

        Ok(())
    }

    fn resolve_extension(
        &mut self,
        node: &mut TreeNode,
        extension: &Extension,
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        self.resolve_base(node, &extension.base, namespace)?;

        // A scalar with attributes is carried as a text field next to them.
        if node.type_.is_scalar() && !extension.attributes.is_empty() {
            node.text_content = true;
        }

        for element in extension.content.flatten() {
            let child = self.resolve_element(element, namespace)?;
            node.children.push(child);
        }

        self.resolve_attributes(node, &extension.attributes, namespace)
    }

    fn resolve_simple_type(
        &mut self,
        node: &mut TreeNode,
        simple_type: &SimpleType,
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        let Some(restriction) = &simple_type.restriction else {
            return Err(unsupported(node, "simple type without restriction (list or union)"));
        };
        self.resolve_base(node, &restriction.base, namespace)
    }

    fn resolve_attributes(
        &self,
        node: &mut TreeNode,
        attributes: &[Attribute],
        namespace: Option<&str>,
    ) -> Result<(), ResolveError> {
        for attribute in attributes {
            if attribute.use_ == AttributeUse::Prohibited {
                continue;
            }
            node.attributes.push(AttributeDescriptor {
                name: attribute.name.clone(),
                type_: self.resolve_attribute_type(attribute, namespace)?,
                required: attribute.use_ == AttributeUse::Required,
            });
        }
        Ok(())
    }

    /// Attribute values are always scalar: named simple types are walked down their restriction
    /// chain to a builtin or opaque base.
    fn resolve_attribute_type(
        &self,
        attribute: &Attribute,
        namespace: Option<&str>,
    ) -> Result<ResolvedType, ResolveError> {
        let context = || format!("attribute {:?}", attribute.name);

        let mut reference = match (attribute.type_ref(), &attribute.simple_type) {
            (Some(type_ref), _) => type_ref,
            (None, Some(simple_type)) => match &simple_type.restriction {
                Some(restriction) => &restriction.base,
                None => {
                    return Err(ResolveError::UnsupportedConstruct {
                        context: context(),
                        construct: "simple type without restriction (list or union)",
                    })
                }
            },
            // No type at all means xs:anySimpleType.
            (None, None) => return Ok(ResolvedType::Builtin(Builtin::String)),
        };
        let mut namespace = namespace.map(str::to_owned);
        let mut chain: Vec<QName> = Vec::new();

        loop {
            match self.index.find(reference, namespace.as_deref())? {
                Found::Builtin(builtin) => return Ok(ResolvedType::Builtin(builtin)),
                Found::Opaque(name) => return Ok(ResolvedType::Opaque(name)),
                Found::Declared(_, TypeDefinition::Complex(_)) => {
                    return Err(ResolveError::UnsupportedConstruct {
                        context: context(),
                        construct: "attribute of complex type",
                    });
                }
                Found::Declared(key, TypeDefinition::Simple(simple_type)) => {
                    if chain.contains(&key) {
                        return Err(ResolveError::CircularDerivation(key));
                    }
                    let Some(restriction) = &simple_type.restriction else {
                        return Err(ResolveError::UnsupportedConstruct {
                            context: context(),
                            construct: "simple type without restriction (list or union)",
                        });
                    };
                    trace!(attribute = %attribute.name, type_name = %key, "walking attribute type");
                    reference = &restriction.base;
                    namespace = key.namespace_name.clone();
                    chain.push(key);
                }
            }
        }
    }
}

fn unsupported(node: &TreeNode, construct: &'static str) -> ResolveError {
    ResolveError::UnsupportedConstruct {
        context: format!("element {:?}", node.name),
        construct,
    }
}
