//! Type-Template Algebra
//!
//! A [`Template`] is an immutable description of a data shape. Templates never
//! embed another type reference's template directly; [`Template::Reference`]
//! defers the lookup until a walk reaches it, which keeps recursive and
//! mutually-recursive shapes finite.
//!
//! Templates compare structurally. Two hooks are equal when their inner
//! templates are equal and their transform pairs carry the same name.

pub mod dsl;
pub mod hook;
pub mod ops;
pub mod walk;

pub use hook::{HookFn, HookPair};
pub use ops::{DynamicOps, JsonOps, ValueKind};
pub use walk::{format_path, PathSegment, Walker, MAX_INDIRECTION, MAX_NESTING};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::type_ref::TypeReference;

/// Leaf scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    ByteArray,
    IntArray,
    LongArray,
    /// Accepts any value without looking inside it
    Any,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::ByteArray => "byte_array",
            Primitive::IntArray => "int_array",
            Primitive::LongArray => "long_array",
            Primitive::Any => "any",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The per-node registries a tagged union can draw its variants from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Entities,
    BlockEntities,
}

impl RegistryKind {
    /// Singular label used in messages and graph keys
    pub fn label(&self) -> &'static str {
        match self {
            RegistryKind::Entities => "entity",
            RegistryKind::BlockEntities => "block_entity",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a tagged union finds its variants.
///
/// Keys are open strings: new concrete types arrive release over release.
#[derive(Debug, Clone, PartialEq)]
pub enum Variants {
    /// Variants declared with the union itself (keys already normalized)
    Inline(BTreeMap<String, Template>),
    /// Variants are the schema node's own entity or block-entity registry
    Registry(RegistryKind),
}

/// A discriminated union keyed by the string value of `field`
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedUnion {
    /// Name of the discriminator member
    pub field: String,
    /// Template the discriminator value is read through
    pub tag: Box<Template>,
    pub variants: Variants,
}

/// One node of the template algebra
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Required named member
    Field(String, Box<Template>),
    /// Member that may be entirely absent
    OptionalField(String, Box<Template>),
    /// All listed members required
    Record(Vec<Template>),
    /// Each listed member independently optional
    OptionalRecord(Vec<Template>),
    /// Homogeneous ordered sequence
    List(Box<Template>),
    /// Ordered `[key, value]` pairs; never deduplicated or reordered
    OrderedPairs(Box<Template>, Box<Template>),
    /// Exactly one alternative must match; the first match wins when reading
    Either(Box<Template>, Box<Template>),
    TaggedUnion(TaggedUnion),
    Constant(Primitive),
    /// Lazily resolved link to another reference's template at the same version
    Reference(TypeReference),
    /// `inner` wrapped with an unpack/repack transform pair
    Hook(Box<Template>, HookPair),
}

impl Template {
    /// Visit this node and every node below it, stopping at references
    pub fn visit<'t>(&'t self, f: &mut impl FnMut(&'t Template)) {
        f(self);
        match self {
            Template::Field(_, child)
            | Template::OptionalField(_, child)
            | Template::List(child)
            | Template::Hook(child, _) => child.visit(f),
            Template::Record(children) | Template::OptionalRecord(children) => {
                for child in children {
                    child.visit(f);
                }
            }
            Template::OrderedPairs(a, b) | Template::Either(a, b) => {
                a.visit(f);
                b.visit(f);
            }
            Template::TaggedUnion(union) => {
                union.tag.visit(f);
                if let Variants::Inline(variants) = &union.variants {
                    for variant in variants.values() {
                        variant.visit(f);
                    }
                }
            }
            Template::Constant(_) | Template::Reference(_) => {}
        }
    }

    /// Type references mentioned anywhere in this tree, sorted and deduplicated
    pub fn references(&self) -> Vec<TypeReference> {
        let mut refs = Vec::new();
        self.visit(&mut |node| {
            if let Template::Reference(r) = node {
                refs.push(*r);
            }
        });
        refs.sort();
        refs.dedup();
        refs
    }

    /// Registries this tree draws tagged-union variants from
    pub fn registries(&self) -> Vec<RegistryKind> {
        let mut kinds = Vec::new();
        self.visit(&mut |node| {
            if let Template::TaggedUnion(TaggedUnion {
                variants: Variants::Registry(kind),
                ..
            }) = node
            {
                kinds.push(*kind);
            }
        });
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// The template of a direct member, looking through records and hooks.
    ///
    /// Does not follow references or descend into the member's own children.
    pub fn member(&self, name: &str) -> Option<&Template> {
        match self {
            Template::Field(field, child) | Template::OptionalField(field, child) => {
                (field == name).then_some(child.as_ref())
            }
            Template::Record(children) | Template::OptionalRecord(children) => {
                children.iter().find_map(|c| c.member(name))
            }
            Template::Hook(inner, _) => inner.member(name),
            _ => None,
        }
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// The tagged union at the top of this template, looking through hooks
    pub fn as_tagged_union(&self) -> Option<&TaggedUnion> {
        match self {
            Template::TaggedUnion(union) => Some(union),
            Template::Hook(inner, _) => inner.as_tagged_union(),
            _ => None,
        }
    }

    /// Multi-line rendering used by diffs
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            Template::Record(children) | Template::OptionalRecord(children) => {
                let head = if matches!(self, Template::Record(_)) {
                    "record"
                } else {
                    "optional"
                };
                if children.is_empty() {
                    out.push_str(&format!("{}{} {{}}\n", pad, head));
                    return;
                }
                out.push_str(&format!("{}{} {{\n", pad, head));
                for child in children {
                    child.write_pretty(out, indent + 1);
                }
                out.push_str(&format!("{}}}\n", pad));
            }
            Template::Field(name, child) | Template::OptionalField(name, child) => {
                let marker = if matches!(self, Template::Field(..)) { "" } else { "?" };
                match child.as_ref() {
                    Template::Record(_) | Template::OptionalRecord(_) => {
                        out.push_str(&format!("{}{:?}{}:\n", pad, name, marker));
                        child.write_pretty(out, indent + 1);
                    }
                    _ => out.push_str(&format!("{}{:?}{}: {}\n", pad, name, marker, child)),
                }
            }
            Template::TaggedUnion(TaggedUnion {
                field,
                tag,
                variants: Variants::Inline(variants),
            }) => {
                out.push_str(&format!("{}tagged[{:?}: {}] {{\n", pad, field, tag));
                for (key, variant) in variants {
                    out.push_str(&format!("{}  {:?} =>\n", pad, key));
                    variant.write_pretty(out, indent + 2);
                }
                out.push_str(&format!("{}}}\n", pad));
            }
            Template::Hook(inner, pair) => {
                out.push_str(&format!("{}hook:{}\n", pad, pair.name()));
                inner.write_pretty(out, indent + 1);
            }
            other => out.push_str(&format!("{}{}\n", pad, other)),
        }
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Template]) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

/// Canonical single-line text. Stable across runs; fingerprints are taken from it.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Field(name, child) => write!(f, "{:?}: {}", name, child),
            Template::OptionalField(name, child) => write!(f, "{:?}?: {}", name, child),
            Template::Record(children) => {
                f.write_str("record{")?;
                write_children(f, children)?;
                f.write_str("}")
            }
            Template::OptionalRecord(children) => {
                f.write_str("optional{")?;
                write_children(f, children)?;
                f.write_str("}")
            }
            Template::List(child) => write!(f, "list<{}>", child),
            Template::OrderedPairs(key, value) => write!(f, "pairs<{}, {}>", key, value),
            Template::Either(a, b) => write!(f, "either<{} | {}>", a, b),
            Template::TaggedUnion(union) => {
                write!(f, "tagged[{:?}: {}]", union.field, union.tag)?;
                match &union.variants {
                    Variants::Registry(kind) => write!(f, "@{}", kind),
                    Variants::Inline(variants) => {
                        f.write_str("{")?;
                        for (i, (key, variant)) in variants.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{:?} => {}", key, variant)?;
                        }
                        f.write_str("}")
                    }
                }
            }
            Template::Constant(kind) => write!(f, "{}", kind),
            Template::Reference(r) => write!(f, "&{}", r),
            Template::Hook(inner, pair) => write!(f, "hook:{}({})", pair.name(), inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::dsl::*;
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = opt_record(vec![opt("Health", float()), opt("Item", reference(TypeReference::ItemStack))]);
        let b = opt_record(vec![opt("Health", float()), opt("Item", reference(TypeReference::ItemStack))]);
        assert_eq!(a, b);
        assert_ne!(a, opt_record(vec![opt("Health", double())]));
    }

    #[test]
    fn test_hooks_compare_by_name() {
        assert_eq!(namespaced_string(), namespaced_string());
        assert_ne!(namespaced_string(), hook(string(), HookPair::identity()));
    }

    #[test]
    fn test_member_lookup_through_hooks() {
        let t = hook(
            opt_record(vec![field("id", string()), opt("tag", opt_record(vec![opt("x", int())]))]),
            HookPair::identity(),
        );
        assert!(t.has_member("id"));
        assert!(t.has_member("tag"));
        assert!(!t.has_member("x"));
    }

    #[test]
    fn test_references_are_collected() {
        let t = opt_record(vec![
            opt("Passengers", list(reference(TypeReference::EntityTree))),
            reference(TypeReference::Entity),
            opt("Item", reference(TypeReference::ItemStack)),
            opt("Other", reference(TypeReference::ItemStack)),
        ]);
        assert_eq!(
            t.references(),
            vec![TypeReference::ItemStack, TypeReference::EntityTree, TypeReference::Entity]
        );
    }

    #[test]
    fn test_display_is_canonical() {
        let t = opt_record(vec![opt("Items", list(reference(TypeReference::ItemStack)))]);
        assert_eq!(t.to_string(), "optional{\"Items\"?: list<&item_stack>}");
        assert_eq!(
            tagged_registry("id", namespaced_string(), RegistryKind::Entities).to_string(),
            "tagged[\"id\": hook:namespaced_id(string)]@entity"
        );
    }

    #[test]
    fn test_pretty_string_is_multiline() {
        let t = record(vec![field("Level", opt_record(vec![opt("Entities", list(int()))]))]);
        let pretty = t.to_pretty_string();
        assert!(pretty.lines().count() > 2);
        assert!(pretty.contains("\"Entities\"?: list<int>"));
    }
}
