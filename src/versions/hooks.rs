//! Hooks used by the historical schemas

use serde_json::Value;

use crate::namespace;
use crate::template::{DynamicOps, HookPair};

/// `(item id, concrete id)` pairs for item stacks that carry a nested tag
pub(super) type IdTable = &'static [(&'static str, &'static str)];

/// Fills in missing ids of nested `BlockEntityTag` / `EntityTag` compounds.
///
/// Old item stacks stored those compounds without an `id`; the concrete type
/// was implied by the item. Items not in the tables, stacks without a `tag`
/// and tags that already carry an id pass through unchanged.
pub(super) fn item_stack_names(name: &str, block_entities: IdTable, entities: IdTable) -> HookPair {
    HookPair::unpack_only(name, move |ops: &dyn DynamicOps, value: Value| {
        let Some(item) = ops
            .get(&value, "id")
            .and_then(|id| ops.as_str(id))
            .map(|id| namespace::normalize(id).into_owned())
        else {
            return value;
        };
        let Some(tag) = ops.get(&value, "tag").cloned() else {
            return value;
        };

        let tag = fill_id(ops, tag, "BlockEntityTag", lookup(block_entities, &item));
        let tag = fill_id(ops, tag, "EntityTag", lookup(entities, &item));
        ops.set(value, "tag", tag)
    })
}

fn lookup(table: IdTable, item: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == item).map(|(_, id)| *id)
}

fn fill_id(ops: &dyn DynamicOps, tag: Value, member: &str, id: Option<&str>) -> Value {
    let (Some(id), Some(nested)) = (id, ops.get(&tag, member)) else {
        return tag;
    };
    if ops.get(nested, "id").is_some() {
        return tag;
    }
    let nested = ops.set(nested.clone(), "id", ops.create_string(id));
    ops.set(tag, member, nested)
}

/// Splits legacy criteria names such as `stat.mineBlock.minecraft.stone` into
/// `{"type": "mineBlock", "id": "minecraft:stone"}` and joins them back.
///
/// Anything else (`dummy`, `stat.walkOneCm`, non-strings) passes through.
pub(super) fn legacy_stat_criterion() -> HookPair {
    HookPair::new("legacy_stat_criterion", unpack_criterion, repack_criterion)
}

fn unpack_criterion(ops: &dyn DynamicOps, value: Value) -> Value {
    let Some(rest) = ops.as_str(&value).and_then(|s| s.strip_prefix("stat.")) else {
        return value;
    };
    let mut parts = rest.splitn(3, '.');
    let (Some(kind), Some(ns), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return value;
    };
    if kind.is_empty() || ns.is_empty() || path.is_empty() {
        return value;
    }

    let id = format!("{}:{}", ns, path);
    let record = ops.set(ops.empty_map(), "type", ops.create_string(kind));
    ops.set(record, "id", ops.create_string(&id))
}

fn repack_criterion(ops: &dyn DynamicOps, value: Value) -> Value {
    let kind = ops.get(&value, "type").and_then(|v| ops.as_str(v));
    let id = ops.get(&value, "id").and_then(|v| ops.as_str(v));
    // Case survives the round trip; ids are not normalized here
    let legacy = match (kind, id.and_then(|id| id.split_once(':'))) {
        (Some(kind), Some((ns, path))) if !ns.is_empty() && !path.is_empty() => {
            Some(format!("stat.{}.{}.{}", kind, ns, path))
        }
        _ => None,
    };
    match legacy {
        Some(legacy) => ops.create_string(&legacy),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::JsonOps;
    use serde_json::json;

    const BLOCK_ENTITIES: IdTable = &[("minecraft:furnace", "Furnace")];
    const ENTITIES: IdTable = &[("minecraft:armor_stand", "ArmorStand")];

    #[test]
    fn test_item_stack_names_fills_missing_ids() {
        let hook = item_stack_names("test_names", BLOCK_ENTITIES, ENTITIES);
        let stack = json!({"id": "furnace", "tag": {"BlockEntityTag": {"BurnTime": 3}}});
        assert_eq!(
            hook.unpack(&JsonOps, stack),
            json!({"id": "furnace", "tag": {"BlockEntityTag": {"BurnTime": 3, "id": "Furnace"}}})
        );

        let stand = json!({"id": "minecraft:armor_stand", "tag": {"EntityTag": {}}});
        assert_eq!(
            hook.unpack(&JsonOps, stand)["tag"]["EntityTag"]["id"],
            json!("ArmorStand")
        );
    }

    #[test]
    fn test_item_stack_names_passes_through() {
        let hook = item_stack_names("test_names", BLOCK_ENTITIES, ENTITIES);
        for value in [
            json!({"id": "furnace"}),
            json!({"id": 61, "tag": {"BlockEntityTag": {}}}),
            json!({"id": "stone", "tag": {"BlockEntityTag": {}}}),
            json!({"id": "furnace", "tag": {"BlockEntityTag": {"id": "Chest"}}}),
            json!("furnace"),
        ] {
            assert_eq!(hook.unpack(&JsonOps, value.clone()), value);
        }
    }

    #[test]
    fn test_legacy_stat_literal_round_trip() {
        let hook = legacy_stat_criterion();
        let literal = json!("stat.mineBlock.minecraft.stone");
        let unpacked = hook.unpack(&JsonOps, literal.clone());
        assert_eq!(unpacked, json!({"type": "mineBlock", "id": "minecraft:stone"}));
        assert_eq!(hook.repack(&JsonOps, unpacked), literal);

        for literal in ["stat.mineBlock.MyMod.Stone", "stat.craftItem.minecraft.Stone"] {
            let unpacked = hook.unpack(&JsonOps, json!(literal));
            assert_eq!(hook.repack(&JsonOps, unpacked), json!(literal));
        }

        let canonical = json!({"type": "craftItem", "id": "minecraft:Stone"});
        assert_eq!(hook.repack(&JsonOps, canonical), json!("stat.craftItem.minecraft.Stone"));
    }

    #[test]
    fn test_legacy_stat_passes_through() {
        let hook = legacy_stat_criterion();
        for value in [json!("dummy"), json!("stat.walkOneCm"), json!("stat..x.y"), json!(3)] {
            assert_eq!(hook.unpack(&JsonOps, value.clone()), value);
        }
        for partial in [json!({"type": "mineBlock"}), json!({"type": "mineBlock", "id": "stone"})] {
            assert_eq!(hook.repack(&JsonOps, partial.clone()), partial);
        }
    }
}
