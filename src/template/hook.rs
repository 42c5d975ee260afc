//! Hook transform pairs
//!
//! A hook bridges a version's on-disk shape to its canonical structural shape.
//! `unpack` runs on the raw value right before the inner template is read;
//! `repack` runs right after the inner template is written.
//!
//! Hooks are best-effort: when the value does not look the way a hook expects
//! (a nested member is missing, a leaf has the wrong kind) the hook returns its
//! input unchanged instead of failing.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::ops::DynamicOps;
use crate::namespace;

/// A pure, total transform over `(ops, value)`
pub type HookFn = Arc<dyn Fn(&dyn DynamicOps, Value) -> Value + Send + Sync>;

/// A named unpack/repack pair.
///
/// The name is the pair's identity for structural equality, so two different
/// transforms must never share a name.
#[derive(Clone)]
pub struct HookPair {
    name: String,
    unpack: HookFn,
    repack: HookFn,
}

impl HookPair {
    pub fn new<U, R>(name: impl Into<String>, unpack: U, repack: R) -> Self
    where
        U: Fn(&dyn DynamicOps, Value) -> Value + Send + Sync + 'static,
        R: Fn(&dyn DynamicOps, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            unpack: Arc::new(unpack),
            repack: Arc::new(repack),
        }
    }

    /// A pair that only transforms on the way in
    pub fn unpack_only<U>(name: impl Into<String>, unpack: U) -> Self
    where
        U: Fn(&dyn DynamicOps, Value) -> Value + Send + Sync + 'static,
    {
        Self::new(name, unpack, |_: &dyn DynamicOps, value: Value| value)
    }

    pub fn identity() -> Self {
        Self::unpack_only("identity", |_: &dyn DynamicOps, value: Value| value)
    }

    /// Qualifies string leaves with the default namespace
    pub fn namespaced_id() -> Self {
        Self::unpack_only("namespaced_id", |ops: &dyn DynamicOps, value: Value| {
            let qualified = ops
                .as_str(&value)
                .and_then(|raw| match namespace::normalize(raw) {
                    Cow::Owned(qualified) => Some(qualified),
                    Cow::Borrowed(_) => None,
                });
            match qualified {
                Some(qualified) => ops.create_string(&qualified),
                None => value,
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unpack(&self, ops: &dyn DynamicOps, value: Value) -> Value {
        (self.unpack)(ops, value)
    }

    pub fn repack(&self, ops: &dyn DynamicOps, value: Value) -> Value {
        (self.repack)(ops, value)
    }
}

impl PartialEq for HookPair {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for HookPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HookPair").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ops::JsonOps;
    use serde_json::json;

    #[test]
    fn test_namespaced_id_unpack() {
        let pair = HookPair::namespaced_id();
        assert_eq!(pair.unpack(&JsonOps, json!("stone")), json!("minecraft:stone"));
        assert_eq!(pair.unpack(&JsonOps, json!("Cow")), json!("Cow"));
        assert_eq!(pair.unpack(&JsonOps, json!(7)), json!(7));
    }

    #[test]
    fn test_well_formed_round_trip() {
        let pair = HookPair::namespaced_id();
        let value = json!("minecraft:stone");
        let unpacked = pair.unpack(&JsonOps, value.clone());
        assert_eq!(pair.repack(&JsonOps, unpacked), value);
    }

    #[test]
    fn test_debug_shows_name() {
        assert_eq!(format!("{:?}", HookPair::identity()), "HookPair(\"identity\")");
    }
}
