use std::collections::HashMap;

use tracing::{debug, warn};

use super::{builtins::Builtin, error::ResolveError, DuplicateTypeAction};
use crate::xsd::{ComplexType, QName, Schema, SimpleType, XS_NAMESPACE};

/// A declared type, simple and complex types sharing one symbol space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum TypeDefinition<'a> {
    Simple(&'a SimpleType),
    Complex(&'a ComplexType),
}

/// The outcome of looking up a type reference.
#[derive(Clone, Debug)]
pub(crate) enum Found<'a> {
    Declared(QName, TypeDefinition<'a>),
    Builtin(Builtin),
    Opaque(String),
}

/// Type declarations of all merged schemas, keyed by target namespace and local name.
pub(crate) struct TypeIndex<'a> {
    definitions: HashMap<QName, TypeDefinition<'a>>,
    /// Qualified keys per local name, in declaration order.
    by_local_name: HashMap<String, Vec<QName>>,
    duplicate_types: DuplicateTypeAction,
}

impl<'a> TypeIndex<'a> {
    pub(crate) fn build(
        schemas: &'a [Schema],
        duplicate_types: DuplicateTypeAction,
    ) -> Result<Self, ResolveError> {
        let mut index = Self {
            definitions: HashMap::new(),
            by_local_name: HashMap::new(),
            duplicate_types,
        };

        for schema in schemas {
            let namespace = schema.target_namespace.as_deref();
            for complex_type in &schema.complex_types {
                if let Some(name) = complex_type.name.as_deref() {
                    index.register(
                        QName::new(namespace, name),
                        TypeDefinition::Complex(complex_type),
                    )?;
                }
            }
            for simple_type in &schema.simple_types {
                if let Some(name) = simple_type.name.as_deref() {
                    index.register(
                        QName::new(namespace, name),
                        TypeDefinition::Simple(simple_type),
                    )?;
                }
            }
        }

        debug!(types = index.definitions.len(), "indexed type declarations");
        Ok(index)
    }

    fn register(&mut self, key: QName, value: TypeDefinition<'a>) -> Result<(), ResolveError> {
        match self.definitions.get(&key) {
            // The same document reached twice through an import closure.
            Some(previous) if *previous == value => return Ok(()),
            Some(_) => match self.duplicate_types {
                DuplicateTypeAction::Deny => {
                    return Err(ResolveError::AmbiguousName {
                        name: key.local_name.clone(),
                        candidates: vec![key],
                    });
                }
                DuplicateTypeAction::Warn => {
                    warn!(name = %key, "overwriting duplicate type declaration");
                }
                DuplicateTypeAction::Allow => {}
            },
            None => {
                self.by_local_name
                    .entry(key.local_name.clone())
                    .or_default()
                    .push(key.clone());
            }
        }
        self.definitions.insert(key, value);
        Ok(())
    }

    /// Resolves a type reference, checking declared types before the builtin table.
    ///
    /// A namespace-qualified reference is looked up exactly first. Otherwise the local name is
    /// used: a single declaration is taken as is, several are disambiguated by `context_namespace`,
    /// the namespace of the declaration the reference appears in.
    pub(crate) fn find(
        &self,
        reference: &QName,
        context_namespace: Option<&str>,
    ) -> Result<Found<'a>, ResolveError> {
        let local_name = reference.local_name.as_str();

        if let Some(namespace) = reference.namespace_name.as_deref() {
            if let Some(definition) = self.definitions.get(reference) {
                return Ok(Found::Declared(reference.clone(), *definition));
            }
            // Unprefixed references in schemas defaulting to the XML Schema namespace land here
            // too, so only builtins end the lookup.
            if namespace == XS_NAMESPACE {
                if let Some(builtin) = Builtin::from_xsd_name(local_name) {
                    return Ok(Found::Builtin(builtin));
                }
            }
        }

        let Some(candidates) = self.by_local_name.get(local_name) else {
            return Ok(Self::find_builtin(local_name));
        };
        let key = match candidates.as_slice() {
            [key] => key,
            _ => match candidates
                .iter()
                .find(|key| key.namespace_name.as_deref() == context_namespace)
            {
                Some(key) => key,
                None => self.pick_ambiguous(local_name, candidates)?,
            },
        };
        Ok(Found::Declared(key.clone(), self.definitions[key]))
    }

    fn pick_ambiguous<'k>(
        &self,
        local_name: &str,
        candidates: &'k [QName],
    ) -> Result<&'k QName, ResolveError> {
        let ambiguous = || ResolveError::AmbiguousName {
            name: local_name.to_string(),
            candidates: candidates.to_vec(),
        };
        match self.duplicate_types {
            DuplicateTypeAction::Deny => Err(ambiguous()),
            DuplicateTypeAction::Warn => {
                warn!(name = local_name, "ambiguous type reference, using the last declaration");
                candidates.last().ok_or_else(ambiguous)
            }
            DuplicateTypeAction::Allow => candidates.last().ok_or_else(ambiguous),
        }
    }

    fn find_builtin(local_name: &str) -> Found<'a> {
        match Builtin::from_xsd_name(local_name) {
            Some(builtin) => Found::Builtin(builtin),
            None => Found::Opaque(local_name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_complex(name: &str) -> ComplexType {
        ComplexType {
            name: Some(name.into()),
            ..ComplexType::default()
        }
    }

    fn schema(namespace: Option<&str>, types: Vec<ComplexType>) -> Schema {
        Schema {
            target_namespace: namespace.map(Into::into),
            complex_types: types,
            ..Schema::default()
        }
    }

    #[test]
    fn declared_types_shadow_builtins() {
        let schemas = [schema(None, vec![named_complex("date")])];
        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Deny).unwrap();

        assert!(matches!(
            index.find(&QName::local("date"), None),
            Ok(Found::Declared(..))
        ));
        assert!(matches!(
            index.find(&QName::with_namespace(XS_NAMESPACE, "date"), None),
            Ok(Found::Builtin(Builtin::Date))
        ));
        assert!(matches!(
            index.find(&QName::local("Unknown"), None),
            Ok(Found::Opaque(name)) if name == "Unknown"
        ));
    }

    #[test]
    fn default_xs_namespace_still_finds_declared_types() {
        let schemas = [schema(None, vec![named_complex("Order")])];
        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Deny).unwrap();

        assert!(matches!(
            index.find(&QName::with_namespace(XS_NAMESPACE, "Order"), None),
            Ok(Found::Declared(key, _)) if key == QName::local("Order")
        ));
        assert!(matches!(
            index.find(&QName::with_namespace(XS_NAMESPACE, "gDay"), None),
            Ok(Found::Opaque(name)) if name == "gDay"
        ));
    }

    #[test]
    fn qualified_reference_picks_its_namespace() {
        let schemas = [
            schema(Some("urn:a"), vec![named_complex("Item")]),
            schema(Some("urn:b"), vec![named_complex("Item")]),
        ];
        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Deny).unwrap();

        let Ok(Found::Declared(key, _)) = index.find(&QName::with_namespace("urn:b", "Item"), None)
        else {
            panic!("expected a declaration");
        };
        assert_eq!(key.namespace_name.as_deref(), Some("urn:b"));

        let Ok(Found::Declared(key, _)) = index.find(&QName::local("Item"), Some("urn:a")) else {
            panic!("expected a declaration");
        };
        assert_eq!(key.namespace_name.as_deref(), Some("urn:a"));
    }

    #[test]
    fn unqualified_reference_across_namespaces_is_ambiguous() {
        let schemas = [
            schema(Some("urn:a"), vec![named_complex("Item")]),
            schema(Some("urn:b"), vec![named_complex("Item")]),
        ];
        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Deny).unwrap();
        assert_eq!(
            index.find(&QName::local("Item"), None).unwrap_err(),
            ResolveError::AmbiguousName {
                name: "Item".into(),
                candidates: vec![
                    QName::with_namespace("urn:a", "Item"),
                    QName::with_namespace("urn:b", "Item"),
                ],
            }
        );

        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Allow).unwrap();
        let Ok(Found::Declared(key, _)) = index.find(&QName::local("Item"), None) else {
            panic!("expected a declaration");
        };
        assert_eq!(key.namespace_name.as_deref(), Some("urn:b"));
    }

    #[test]
    fn conflicting_redeclaration_is_denied() {
        let mut other = named_complex("Item");
        other.abstract_ = true;
        let schemas = [
            schema(None, vec![named_complex("Item")]),
            schema(None, vec![other]),
        ];

        assert!(matches!(
            TypeIndex::build(&schemas, DuplicateTypeAction::Deny),
            Err(ResolveError::AmbiguousName { .. })
        ));

        let index = TypeIndex::build(&schemas, DuplicateTypeAction::Warn).unwrap();
        let Ok(Found::Declared(_, TypeDefinition::Complex(found))) =
            index.find(&QName::local("Item"), None)
        else {
            panic!("expected a complex type");
        };
        assert!(found.abstract_);
    }

    #[test]
    fn identical_redeclaration_is_accepted() {
        let schemas = [
            schema(None, vec![named_complex("Item")]),
            schema(None, vec![named_complex("Item")]),
        ];
        assert!(TypeIndex::build(&schemas, DuplicateTypeAction::Deny).is_ok());
    }
}
