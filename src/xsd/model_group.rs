use roxmltree::Node;
use tracing::warn;

use super::{
    error::XsdError,
    particle::{Occurrence, Occurs},
    values::{attribute_value, children_named, documentation},
    Element,
};

/// `<sequence>`: elements in document order, plus nested compositions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence {
    pub id: Option<String>,
    pub annotation: Option<String>,
    pub occurs: Occurrence,
    pub elements: Vec<Element>,
    pub groups: Vec<Group>,
    pub choices: Vec<Choice>,
    pub sequences: Vec<Sequence>,
    pub anys: Vec<Any>,
}

/// `<choice>`: exactly one of its members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Choice {
    pub id: Option<String>,
    pub annotation: Option<String>,
    pub occurs: Occurrence,
    pub elements: Vec<Element>,
    pub groups: Vec<Group>,
    pub choices: Vec<Choice>,
    pub sequences: Vec<Sequence>,
    pub anys: Vec<Any>,
}

/// `<all>`: elements in any order. May only contain elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct All {
    pub id: Option<String>,
    pub annotation: Option<String>,
    pub occurs: Occurrence,
    pub elements: Vec<Element>,
}

/// An inline `<group>`. Named group references are not expanded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    pub annotation: Option<String>,
    pub occurs: Occurrence,
    pub elements: Vec<Element>,
    pub choices: Vec<Choice>,
    pub sequences: Vec<Sequence>,
    pub alls: Vec<All>,
}

/// `<any>` wildcard. Carried for occurrence reporting only; it contributes no elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Any {
    pub id: Option<String>,
    pub annotation: Option<String>,
    pub occurs: Occurrence,
    pub namespace: Option<String>,
    pub process_contents: Option<String>,
}

/// The primary content model of a complex type or extension.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelGroup {
    Sequence(Sequence),
    Choice(Choice),
    All(All),
    Group(Group),
}

/// Element flattening: the ordered elements a node directly or transitively contains.
///
/// Composition nodes yield their own elements first, then the flattened nested groups, choices
/// and sequences, in that order.
pub trait Flatten {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>);

    fn flatten(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

impl Flatten for Sequence {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.extend(&self.elements);
        self.groups.iter().for_each(|g| g.flatten_into(out));
        self.choices.iter().for_each(|c| c.flatten_into(out));
        self.sequences.iter().for_each(|s| s.flatten_into(out));
    }
}

impl Flatten for Choice {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.extend(&self.elements);
        self.groups.iter().for_each(|g| g.flatten_into(out));
        self.choices.iter().for_each(|c| c.flatten_into(out));
        self.sequences.iter().for_each(|s| s.flatten_into(out));
    }
}

impl Flatten for All {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.extend(&self.elements);
    }
}

impl Flatten for Group {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.extend(&self.elements);
        self.choices.iter().for_each(|c| c.flatten_into(out));
        self.sequences.iter().for_each(|s| s.flatten_into(out));
        self.alls.iter().for_each(|a| a.flatten_into(out));
    }
}

impl Flatten for ModelGroup {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        match self {
            Self::Sequence(sequence) => sequence.flatten_into(out),
            Self::Choice(choice) => choice.flatten_into(out),
            Self::All(all) => all.flatten_into(out),
            Self::Group(group) => group.flatten_into(out),
        }
    }
}

impl<T: Flatten> Flatten for Option<T> {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let Some(inner) = self {
            inner.flatten_into(out);
        }
    }
}

impl Occurs for ModelGroup {
    fn occurrence(&self) -> Occurrence {
        match self {
            Self::Sequence(s) => s.occurs,
            Self::Choice(c) => c.occurs,
            Self::All(a) => a.occurs,
            Self::Group(g) => g.occurs,
        }
    }
}

impl ModelGroup {
    pub const TAG_NAMES: [&'static str; 4] = ["sequence", "choice", "all", "group"];

    /// Maps the first `<sequence>`, `<choice>`, `<all>` or `<group>` child of `parent`, if any.
    pub(super) fn map_from_xml_first_child(parent: Node) -> Result<Option<Self>, XsdError> {
        parent
            .children()
            .find(|child| child.is_element() && Self::TAG_NAMES.contains(&child.tag_name().name()))
            .map(Self::map_from_xml)
            .transpose()
    }

    pub(super) fn map_from_xml(node: Node) -> Result<Self, XsdError> {
        Ok(match node.tag_name().name() {
            "sequence" => Self::Sequence(Sequence::map_from_xml(node)?),
            "choice" => Self::Choice(Choice::map_from_xml(node)?),
            "all" => Self::All(All::map_from_xml(node)?),
            _ => Self::Group(Group::map_from_xml(node)?),
        })
    }
}

fn map_all<T>(
    node: Node,
    tag_name: &'static str,
    map: impl Fn(Node) -> Result<T, XsdError>,
) -> Result<Vec<T>, XsdError> {
    children_named(node, tag_name).map(map).collect()
}

impl Sequence {
    pub const TAG_NAME: &'static str = "sequence";

    pub(super) fn map_from_xml(sequence: Node) -> Result<Self, XsdError> {
        Ok(Self {
            id: attribute_value(sequence, "id")?,
            annotation: documentation(sequence),
            occurs: Occurrence::map_from_xml(sequence)?,
            elements: Element::map_from_xml_children(sequence)?,
            groups: map_all(sequence, Group::TAG_NAME, Group::map_from_xml)?,
            choices: map_all(sequence, Choice::TAG_NAME, Choice::map_from_xml)?,
            sequences: map_all(sequence, Sequence::TAG_NAME, Sequence::map_from_xml)?,
            anys: map_all(sequence, Any::TAG_NAME, Any::map_from_xml)?,
        })
    }
}

impl Choice {
    pub const TAG_NAME: &'static str = "choice";

    pub(super) fn map_from_xml(choice: Node) -> Result<Self, XsdError> {
        Ok(Self {
            id: attribute_value(choice, "id")?,
            annotation: documentation(choice),
            occurs: Occurrence::map_from_xml(choice)?,
            elements: Element::map_from_xml_children(choice)?,
            groups: map_all(choice, Group::TAG_NAME, Group::map_from_xml)?,
            choices: map_all(choice, Choice::TAG_NAME, Choice::map_from_xml)?,
            sequences: map_all(choice, Sequence::TAG_NAME, Sequence::map_from_xml)?,
            anys: map_all(choice, Any::TAG_NAME, Any::map_from_xml)?,
        })
    }
}

impl All {
    pub const TAG_NAME: &'static str = "all";

    pub(super) fn map_from_xml(all: Node) -> Result<Self, XsdError> {
        Ok(Self {
            id: attribute_value(all, "id")?,
            annotation: documentation(all),
            occurs: Occurrence::map_from_xml(all)?,
            elements: Element::map_from_xml_children(all)?,
        })
    }
}

impl Group {
    pub const TAG_NAME: &'static str = "group";

    pub(super) fn map_from_xml(group: Node) -> Result<Self, XsdError> {
        if let Some(reference) = group.attribute("ref") {
            // TODO expand references once named <group> definitions are indexed per schema
            warn!(reference, "group references are not expanded; the group contributes no elements");
        }

        Ok(Self {
            id: attribute_value(group, "id")?,
            annotation: documentation(group),
            occurs: Occurrence::map_from_xml(group)?,
            elements: Element::map_from_xml_children(group)?,
            choices: map_all(group, Choice::TAG_NAME, Choice::map_from_xml)?,
            sequences: map_all(group, Sequence::TAG_NAME, Sequence::map_from_xml)?,
            alls: map_all(group, All::TAG_NAME, All::map_from_xml)?,
        })
    }
}

impl Any {
    pub const TAG_NAME: &'static str = "any";

    pub(super) fn map_from_xml(any: Node) -> Result<Self, XsdError> {
        Ok(Self {
            id: attribute_value(any, "id")?,
            annotation: documentation(any),
            occurs: Occurrence::map_from_xml(any)?,
            namespace: attribute_value(any, "namespace")?,
            process_contents: attribute_value(any, "processContents")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> Element {
        Element {
            name: name.into(),
            ..Element::default()
        }
    }

    fn names(elements: Vec<&Element>) -> Vec<&str> {
        elements.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn choice_nested_in_sequence_keeps_group_after_choice_members() {
        let sequence = Sequence {
            choices: vec![Choice {
                elements: vec![element("A"), element("B")],
                groups: vec![Group {
                    elements: vec![element("C")],
                    ..Group::default()
                }],
                ..Choice::default()
            }],
            ..Sequence::default()
        };

        assert_eq!(names(sequence.flatten()), ["A", "B", "C"]);
    }

    #[test]
    fn own_elements_come_before_groups_choices_and_sequences() {
        let sequence = Sequence {
            elements: vec![element("X")],
            groups: vec![Group {
                elements: vec![element("G")],
                ..Group::default()
            }],
            choices: vec![Choice {
                elements: vec![element("C1"), element("C2")],
                ..Choice::default()
            }],
            sequences: vec![Sequence {
                elements: vec![element("S")],
                ..Sequence::default()
            }],
            anys: vec![Any::default()],
            ..Sequence::default()
        };

        assert_eq!(names(sequence.flatten()), ["X", "G", "C1", "C2", "S"]);
    }

    #[test]
    fn group_flattens_choices_then_sequences_then_alls() {
        let group = Group {
            alls: vec![All {
                elements: vec![element("all")],
                ..All::default()
            }],
            sequences: vec![Sequence {
                elements: vec![element("seq")],
                ..Sequence::default()
            }],
            choices: vec![Choice {
                elements: vec![element("choice")],
                ..Choice::default()
            }],
            ..Group::default()
        };

        assert_eq!(names(group.flatten()), ["choice", "seq", "all"]);
    }

    #[test]
    fn empty_compositions_flatten_to_nothing() {
        assert!(Sequence::default().flatten().is_empty());
        assert!(ModelGroup::All(All::default()).flatten().is_empty());
        assert!(None::<ModelGroup>.flatten().is_empty());
    }

    #[test]
    fn reports_unbounded_compositions() {
        let choice = Choice {
            occurs: Occurrence::unbounded(),
            ..Choice::default()
        };
        assert!(choice.is_unbounded());
        assert!(ModelGroup::Choice(choice).is_unbounded());
        assert!(!Sequence::default().is_unbounded());
    }
}
