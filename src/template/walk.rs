//! Structural interpretation of templates
//!
//! Reading takes an on-disk value to its canonical shape (running hook
//! `unpack`s); writing goes the other way (running `repack`s). Both directions
//! validate structure as they go and leave members a template does not mention
//! untouched.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::hook::HookPair;
use super::ops::{DynamicOps, ValueKind};
use super::{Primitive, TaggedUnion, Template, Variants};
use crate::error::ShapeError;
use crate::namespace;
use crate::schema::Schema;
use crate::type_ref::TypeReference;

/// Deepest data nesting a walk enters (members, elements, pair halves)
pub const MAX_NESTING: usize = 64;

/// Template steps allowed between two data levels; stops reference loops that
/// never consume any data
pub const MAX_INDIRECTION: usize = 8;

/// A step on the way from the root value to the one being walked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named member of a map
    Field(String),
    /// A list element
    Index(usize),
    /// The key of an ordered pair
    PairKey(usize),
    /// The value of an ordered pair
    PairValue(usize),
    /// The variant selected by a tagged union
    Variant(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{}", name),
            Self::Index(i) => write!(f, "[{}]", i),
            Self::PairKey(i) => write!(f, "[{}].key", i),
            Self::PairValue(i) => write!(f, "[{}].value", i),
            Self::Variant(id) => write!(f, "<{}>", id),
        }
    }
}

/// Format a path as a string
pub fn format_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return String::from("<root>");
    }
    path.iter().map(|s| s.to_string()).collect::<String>()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Read,
    Write,
}

/// Data levels entered so far, and template steps taken since the last one.
///
/// Recursion is bounded by `MAX_NESTING * MAX_INDIRECTION` template steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Depth {
    nesting: usize,
    hops: usize,
}

impl Depth {
    fn hop(self) -> Self {
        Self {
            hops: self.hops + 1,
            ..self
        }
    }

    fn enter(self) -> Self {
        Self {
            nesting: self.nesting + 1,
            hops: 0,
        }
    }

    fn exceeded(self) -> Option<usize> {
        if self.nesting > MAX_NESTING {
            Some(MAX_NESTING)
        } else if self.hops > MAX_INDIRECTION {
            Some(MAX_INDIRECTION)
        } else {
            None
        }
    }
}

/// Walks one value against templates resolved in one schema node
pub struct Walker<'a> {
    schema: &'a Schema,
    ops: &'a dyn DynamicOps,
    direction: Direction,
    path: Vec<PathSegment>,
}

impl<'a> Walker<'a> {
    /// On-disk to canonical
    pub fn reader(schema: &'a Schema, ops: &'a dyn DynamicOps) -> Self {
        Self::new(schema, ops, Direction::Read)
    }

    /// Canonical to on-disk
    pub fn writer(schema: &'a Schema, ops: &'a dyn DynamicOps) -> Self {
        Self::new(schema, ops, Direction::Write)
    }

    fn new(schema: &'a Schema, ops: &'a dyn DynamicOps, direction: Direction) -> Self {
        Self {
            schema,
            ops,
            direction,
            path: Vec::new(),
        }
    }

    pub fn walk(&mut self, template: &Template, value: Value) -> Result<Value, ShapeError> {
        self.path.clear();
        self.walk_at(template, value, Depth::default())
    }

    // Kept to a bare dispatch: this frame is on the stack once per template step.
    fn walk_at(&mut self, template: &Template, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        if let Some(limit) = depth.exceeded() {
            return Err(ShapeError::TooDeep {
                path: format_path(&self.path),
                limit,
            });
        }

        match template {
            Template::Field(..)
            | Template::OptionalField(..)
            | Template::Record(_)
            | Template::OptionalRecord(_) => self.record(template, value, depth),
            Template::List(child) => self.list(child, value, depth),
            Template::OrderedPairs(key, member) => self.ordered_pairs(key, member, value, depth),
            Template::Either(first, second) => self.either(first, second, value, depth),
            Template::TaggedUnion(union) => self.tagged(union, value, depth),
            Template::Constant(kind) => self.constant(*kind, value),
            Template::Reference(type_ref) => self.reference(*type_ref, value, depth),
            Template::Hook(inner, pair) => self.hook(inner, pair, value, depth),
        }
    }

    fn record(&mut self, template: &Template, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        self.expect_kind(&value, ValueKind::Map)?;
        self.members(template, value, false, depth)
    }

    fn list(&mut self, child: &Template, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        self.expect_kind(&value, ValueKind::List)?;
        let items = self.ops.as_list(&value).map(|items| items.to_vec()).unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            out.push(self.descend(PathSegment::Index(i), child, item, depth)?);
        }
        Ok(self.ops.create_list(out))
    }

    fn ordered_pairs(
        &mut self,
        key_template: &Template,
        value_template: &Template,
        value: Value,
        depth: Depth,
    ) -> Result<Value, ShapeError> {
        self.expect_kind(&value, ValueKind::List)?;
        let items = self.ops.as_list(&value).map(|items| items.to_vec()).unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let Some((key, member)) = self.ops.as_pair(item) else {
                self.path.push(PathSegment::Index(i));
                let err = self.mismatch("[key, value] pair", item);
                self.path.pop();
                return Err(err);
            };
            let key = self.descend(PathSegment::PairKey(i), key_template, key.clone(), depth)?;
            let member = self.descend(PathSegment::PairValue(i), value_template, member.clone(), depth)?;
            out.push(self.ops.create_pair(key, member));
        }
        Ok(self.ops.create_list(out))
    }

    /// First match wins; schema errors and depth limits are never treated as a mismatch
    fn either(
        &mut self,
        first: &Template,
        second: &Template,
        value: Value,
        depth: Depth,
    ) -> Result<Value, ShapeError> {
        let mark = self.path.len();
        for alternative in [first, second] {
            match self.walk_at(alternative, value.clone(), depth.hop()) {
                Ok(walked) => return Ok(walked),
                Err(err @ (ShapeError::Schema(_) | ShapeError::TooDeep { .. })) => return Err(err),
                Err(_) => self.path.truncate(mark),
            }
        }
        Err(ShapeError::NoAlternativeMatched {
            path: format_path(&self.path),
        })
    }

    fn constant(&self, kind: Primitive, value: Value) -> Result<Value, ShapeError> {
        if self.ops.matches(&value, kind) {
            Ok(value)
        } else {
            Err(self.mismatch(kind.name(), &value))
        }
    }

    fn reference(&mut self, type_ref: TypeReference, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        let resolved = self.schema.type_template(type_ref)?;
        self.walk_at(&resolved, value, depth.hop())
    }

    fn hook(&mut self, inner: &Template, pair: &HookPair, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        match self.direction {
            Direction::Read => {
                let unpacked = pair.unpack(self.ops, value);
                self.walk_at(inner, unpacked, depth.hop())
            }
            Direction::Write => {
                let written = self.walk_at(inner, value, depth.hop())?;
                Ok(pair.repack(self.ops, written))
            }
        }
    }

    /// Apply a member-level template to a map value.
    ///
    /// Inside an optional record every directly listed field is optional.
    /// Non-member children (references, unions, hooks) apply to the same map.
    fn members(
        &mut self,
        template: &Template,
        value: Value,
        all_optional: bool,
        depth: Depth,
    ) -> Result<Value, ShapeError> {
        match template {
            Template::Field(name, child) | Template::OptionalField(name, child) => {
                let required = matches!(template, Template::Field(..)) && !all_optional;
                match self.ops.get(&value, name).cloned() {
                    Some(member) => {
                        let walked = self.descend(PathSegment::Field(name.clone()), child, member, depth)?;
                        Ok(self.ops.set(value, name, walked))
                    }
                    None if required => Err(ShapeError::MissingField {
                        path: format_path(&self.path),
                        field: name.clone(),
                    }),
                    None => Ok(value),
                }
            }
            // Nested records are finite within one template tree, so they take no step
            Template::Record(children) => children
                .iter()
                .try_fold(value, |acc, child| self.members(child, acc, false, depth)),
            Template::OptionalRecord(children) => children
                .iter()
                .try_fold(value, |acc, child| self.members(child, acc, true, depth)),
            other => self.walk_at(other, value, depth.hop()),
        }
    }

    fn tagged(&mut self, union: &TaggedUnion, value: Value, depth: Depth) -> Result<Value, ShapeError> {
        self.expect_kind(&value, ValueKind::Map)?;
        let Some(raw_tag) = self.ops.get(&value, &union.field).cloned() else {
            return Err(ShapeError::MissingField {
                path: format_path(&self.path),
                field: union.field.clone(),
            });
        };

        let tag = self.descend(PathSegment::Field(union.field.clone()), &union.tag, raw_tag, depth)?;
        let Some(tag_str) = self.ops.as_str(&tag).map(str::to_string) else {
            self.path.push(PathSegment::Field(union.field.clone()));
            let err = self.mismatch("string discriminator", &tag);
            self.path.pop();
            return Err(err);
        };

        let key = namespace::normalize(&tag_str).into_owned();
        let variant: Option<Arc<Template>> = match &union.variants {
            Variants::Inline(variants) => variants.get(&key).cloned().map(Arc::new),
            Variants::Registry(kind) => self.schema.registry_entry(*kind, &key),
        };
        let Some(variant) = variant else {
            return Err(ShapeError::UnrecognizedVariant {
                path: format_path(&self.path),
                tag: tag_str,
            });
        };

        let value = self.ops.set(value, &union.field, tag);
        self.path.push(PathSegment::Variant(key));
        let walked = self.members(&variant, value, false, depth.hop());
        self.path.pop();
        walked
    }

    fn descend(
        &mut self,
        segment: PathSegment,
        template: &Template,
        value: Value,
        depth: Depth,
    ) -> Result<Value, ShapeError> {
        self.path.push(segment);
        let walked = self.walk_at(template, value, depth.enter());
        self.path.pop();
        walked
    }

    fn expect_kind(&self, value: &Value, expected: ValueKind) -> Result<(), ShapeError> {
        if self.ops.kind(value) == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected.name(), value))
        }
    }

    fn mismatch(&self, expected: &str, found: &Value) -> ShapeError {
        ShapeError::KindMismatch {
            path: format_path(&self.path),
            expected: expected.to_string(),
            found: self.ops.kind(found).name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_display() {
        assert_eq!(PathSegment::Field("Level".into()).to_string(), ".Level");
        assert_eq!(PathSegment::Index(3).to_string(), "[3]");
        assert_eq!(PathSegment::PairKey(1).to_string(), "[1].key");
        assert_eq!(PathSegment::Variant("minecraft:cow".into()).to_string(), "<minecraft:cow>");
    }

    #[test]
    fn test_format_path() {
        let path = vec![
            PathSegment::Field("Level".into()),
            PathSegment::Field("Entities".into()),
            PathSegment::Index(0),
        ];
        assert_eq!(format_path(&path), ".Level.Entities[0]");
        assert_eq!(format_path(&[]), "<root>");
    }

    #[test]
    fn test_entering_data_resets_steps() {
        let mut depth = Depth::default();
        for _ in 0..MAX_INDIRECTION {
            depth = depth.hop();
        }
        assert_eq!(depth.exceeded(), None);
        assert_eq!(depth.hop().exceeded(), Some(MAX_INDIRECTION));

        let entered = depth.enter();
        assert_eq!(entered, Depth { nesting: 1, hops: 0 });
        assert_eq!(entered.exceeded(), None);
    }

    #[test]
    fn test_nesting_limit_wins_over_steps() {
        let depth = Depth {
            nesting: MAX_NESTING + 1,
            hops: MAX_INDIRECTION + 1,
        };
        assert_eq!(depth.exceeded(), Some(MAX_NESTING));
    }
}
