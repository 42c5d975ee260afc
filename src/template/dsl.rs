//! Constructor functions for building templates declaratively.
//!
//! ```
//! use datafix_schemas::template::dsl::*;
//! use datafix_schemas::TypeReference;
//!
//! let furnace = opt_record(vec![
//!     opt("Items", list(reference(TypeReference::ItemStack))),
//!     opt("BurnTime", short()),
//! ]);
//! assert!(furnace.has_member("Items"));
//! ```

use std::collections::BTreeMap;

use super::{HookPair, Primitive, RegistryKind, TaggedUnion, Template, Variants};
use crate::namespace;
use crate::type_ref::TypeReference;

pub fn field(name: &str, child: Template) -> Template {
    Template::Field(name.to_string(), Box::new(child))
}

/// Optional member
pub fn opt(name: &str, child: Template) -> Template {
    Template::OptionalField(name.to_string(), Box::new(child))
}

pub fn record(children: Vec<Template>) -> Template {
    Template::Record(children)
}

pub fn opt_record(children: Vec<Template>) -> Template {
    Template::OptionalRecord(children)
}

/// A record with no declared members; any map matches
pub fn empty() -> Template {
    Template::OptionalRecord(Vec::new())
}

pub fn list(child: Template) -> Template {
    Template::List(Box::new(child))
}

pub fn pairs(key: Template, value: Template) -> Template {
    Template::OrderedPairs(Box::new(key), Box::new(value))
}

pub fn either(first: Template, second: Template) -> Template {
    Template::Either(Box::new(first), Box::new(second))
}

pub fn reference(type_ref: TypeReference) -> Template {
    Template::Reference(type_ref)
}

pub fn hook(inner: Template, pair: HookPair) -> Template {
    Template::Hook(Box::new(inner), pair)
}

/// Tagged union with its variants declared in place. Keys are normalized.
pub fn tagged<I, K>(field: &str, tag: Template, variants: I) -> Template
where
    I: IntoIterator<Item = (K, Template)>,
    K: AsRef<str>,
{
    let variants: BTreeMap<String, Template> = variants
        .into_iter()
        .map(|(key, t)| (namespace::normalize(key.as_ref()).into_owned(), t))
        .collect();
    Template::TaggedUnion(TaggedUnion {
        field: field.to_string(),
        tag: Box::new(tag),
        variants: Variants::Inline(variants),
    })
}

/// Tagged union whose variants are the node's entity or block-entity registry
pub fn tagged_registry(field: &str, tag: Template, kind: RegistryKind) -> Template {
    Template::TaggedUnion(TaggedUnion {
        field: field.to_string(),
        tag: Box::new(tag),
        variants: Variants::Registry(kind),
    })
}

pub fn constant(kind: Primitive) -> Template {
    Template::Constant(kind)
}

pub fn bool() -> Template {
    constant(Primitive::Bool)
}

pub fn byte() -> Template {
    constant(Primitive::Byte)
}

pub fn short() -> Template {
    constant(Primitive::Short)
}

pub fn int() -> Template {
    constant(Primitive::Int)
}

pub fn long() -> Template {
    constant(Primitive::Long)
}

pub fn float() -> Template {
    constant(Primitive::Float)
}

pub fn double() -> Template {
    constant(Primitive::Double)
}

pub fn string() -> Template {
    constant(Primitive::String)
}

pub fn any() -> Template {
    constant(Primitive::Any)
}

/// A string leaf that may be unnamespaced in old data
pub fn namespaced_string() -> Template {
    hook(string(), HookPair::namespaced_id())
}
