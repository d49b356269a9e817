//! Turns XSD schemas into normalized type trees for data-binding code generation.
//!
//! [`xsd`] holds the schema object model, [`resolver`] walks it into one [`TreeNode`] tree per
//! top-level element, and [`generator`] carries the naming rules and the walk an emitter uses
//! to render those trees.

pub mod generator;
pub mod resolver;
pub mod xsd;

pub use generator::{definitions, normalize, type_name, NamingPolicy};
pub use resolver::{
    resolve, AttributeDescriptor, Builtin, DuplicateTypeAction, ResolveError, ResolvedType,
    Resolver, ResolverOptions, TreeNode,
};
pub use xsd::{Schema, XsdError};
