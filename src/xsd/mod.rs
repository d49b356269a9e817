//! The schema object model: a passive, read-only representation of the supported XSD subset.
//!
//! Every component can be built by hand or mapped from XSD text through [`Schema::parse`].

pub mod attribute_decl;
pub mod complex_type_def;
pub mod element_decl;
pub mod error;
pub mod model_group;
pub mod particle;
pub mod schema;
pub mod simple_type_def;
pub mod xstypes;

mod values;

pub use attribute_decl::{Attribute, AttributeUse};
pub use complex_type_def::{ComplexContent, ComplexType, Derivation, Extension, SimpleContent};
pub use element_decl::Element;
pub use error::XsdError;
pub use model_group::{All, Any, Choice, Flatten, Group, ModelGroup, Sequence};
pub use particle::{MaxOccurs, Occurrence, Occurs};
pub use schema::{Import, Schema};
pub use simple_type_def::{Enumeration, Pattern, Restriction, SimpleType};
pub use xstypes::QName;

// The XML Schema namespace (XSD 1.1 Part 1, §1.3.1)
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
