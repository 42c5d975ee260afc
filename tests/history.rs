//! Historical Chain Tests
//!
//! Builds the declared format history and checks that each revision shapes
//! real save data the way that revision wrote it.

use std::sync::Arc;

use serde_json::json;

use datafix_schemas::namespace;
use datafix_schemas::{
    build_schema_chain, diff_schemas, recursive_groups, ChangeType, DataVersion, JsonOps, NodeKey,
    ReferenceGraph, RegistryKind, Schema, SchemaChain, ShapeError, TypeReference,
};

fn chain() -> SchemaChain {
    build_schema_chain().expect("declared history must build")
}

fn at(chain: &SchemaChain, version: u32) -> &Arc<Schema> {
    chain.get(DataVersion::new(version)).unwrap()
}

// =============================================================================
// Chain shape
// =============================================================================

#[test]
fn test_declared_versions() {
    let chain = chain();
    let versions: Vec<String> = chain.versions().iter().map(|v| v.to_string()).collect();
    assert_eq!(
        versions,
        vec![
            "99", "100", "102", "107", "135", "143", "501", "700", "701", "702", "703", "704",
            "705", "1022", "1451.6"
        ]
    );
    assert_eq!(chain.first().unwrap().parent().map(|p| p.version()), None);
    for (older, newer) in chain.adjacent() {
        assert_eq!(newer.parent().unwrap().version(), older.version());
    }
}

#[test]
fn test_version_lookup() {
    let chain = chain();
    assert_eq!(chain.schema_for(DataVersion::new(1000)).unwrap().version(), DataVersion::new(705));
    assert_eq!(chain.schema_for(DataVersion::new(99)).unwrap().version(), DataVersion::new(99));
    assert!(chain.schema_for(DataVersion::new(50)).is_none());
    assert_eq!(chain.resolve("latest").unwrap().version(), DataVersion::with_sub(1451, 6));
    assert_eq!(chain.resolve("1451.6").unwrap().version(), DataVersion::with_sub(1451, 6));
    assert!(chain.resolve("1000").is_err());
}

#[test]
fn test_every_revision_changes_the_fingerprint() {
    let chain = chain();
    for (older, newer) in chain.adjacent() {
        assert_ne!(
            older.fingerprint(),
            newer.fingerprint(),
            "{} -> {} declares nothing",
            older.version(),
            newer.version()
        );
    }
}

#[test]
fn test_type_coverage_never_shrinks() {
    let chain = chain();
    for (older, newer) in chain.adjacent() {
        for type_ref in older.type_refs() {
            assert!(newer.has_type(type_ref), "{} lost {}", newer.version(), type_ref);
        }
    }
    for schema in &chain {
        assert!(!schema.has_type(TypeReference::PoiChunk));
        assert!(schema.type_template(TypeReference::WorldGenSettings).is_err());
    }
}

// =============================================================================
// Registry history
// =============================================================================

#[test]
fn test_entities_are_namespaced_at_v705() {
    let chain = chain();
    let v99 = at(&chain, 99);
    assert!(v99.entity("Cow").is_some());
    assert!(v99.entity("minecraft:cow").is_none());

    let v705 = at(&chain, 705);
    assert!(v705.entity("Cow").is_none());
    assert_eq!(v705.entity("cow"), at(&chain, 704).entity("Cow"));
    for schema in chain.iter().skip_while(|s| s.version() < DataVersion::new(705)) {
        for id in schema.entity_ids() {
            assert!(namespace::is_namespaced(id), "{} at {}", id, schema.version());
        }
    }
}

#[test]
fn test_block_entities_are_namespaced_at_v704() {
    let chain = chain();
    assert!(at(&chain, 703).block_entity("Chest").is_some());
    let v704 = at(&chain, 704);
    assert!(v704.block_entity("Chest").is_none());
    assert!(v704.block_entity("chest").is_some());
    for id in v704.block_entity_ids() {
        assert!(namespace::is_namespaced(id), "{}", id);
    }
    // Entities keep their legacy names for one more revision
    assert!(v704.entity("Cow").is_some());
}

#[test]
fn test_removed_and_added_entities() {
    let chain = chain();
    assert!(at(&chain, 102).entity("Minecart").is_some());
    assert!(at(&chain, 107).entity("Minecart").is_none());
    assert!(at(&chain, 107).entity("MinecartRideable").is_some());
    assert!(at(&chain, 135).entity("TippedArrow").is_some());
    assert!(at(&chain, 143).entity("TippedArrow").is_none());
    assert!(at(&chain, 143).entity("PolarBear").is_none());
    assert!(at(&chain, 501).entity("PolarBear").is_some());

    assert!(at(&chain, 702).entity("EntityHorse").is_some());
    let v703 = at(&chain, 703);
    assert!(v703.entity("EntityHorse").is_none());
    for id in ["Horse", "Donkey", "Mule", "ZombieHorse", "SkeletonHorse"] {
        assert!(v703.entity(id).is_some(), "{}", id);
    }
    assert!(v703.entity("Horse").unwrap().has_member("ArmorItem"));
    assert!(v703.entity("Donkey").unwrap().has_member("Items"));
}

#[test]
fn test_equipment_split_diff() {
    let chain = chain();
    let diff = diff_schemas(at(&chain, 99), at(&chain, 100));
    assert_eq!(diff.count(ChangeType::Changed), 34);
    assert_eq!(diff.count(ChangeType::Added), 0);
    assert_eq!(diff.count(ChangeType::Removed), 0);
    assert!(at(&chain, 100).entity("Zombie").unwrap().has_member("HandItems"));
    assert!(!at(&chain, 100).entity("Zombie").unwrap().has_member("Equipment"));
}

#[test]
fn test_namespacing_diff_is_all_renames() {
    let chain = chain();
    let diff = diff_schemas(at(&chain, 704), at(&chain, 705));
    let entity_renames = diff
        .changes
        .iter()
        .filter(|c| c.change_type == ChangeType::Renamed)
        .filter(|c| matches!(c.key, NodeKey::Entry(RegistryKind::Entities, _)))
        .count();
    assert_eq!(entity_renames, 75);
    assert_eq!(diff.count(ChangeType::Added), 0);
    assert_eq!(diff.count(ChangeType::Removed), 0);

    let cow = diff
        .changes
        .iter()
        .find(|c| c.key == NodeKey::Entry(RegistryKind::Entities, "minecraft:cow".into()))
        .unwrap();
    assert_eq!(
        cow.renamed_from,
        Some(NodeKey::Entry(RegistryKind::Entities, "Cow".into()))
    );
}

// =============================================================================
// Reading historical data
// =============================================================================

#[test]
fn test_v99_chunk() {
    let chain = chain();
    let chunk = json!({
        "Level": {
            "Entities": [{"id": "Cow", "Riding": {"id": "Pig", "Equipment": []}}],
            "TileEntities": [{
                "id": "Chest",
                "Items": [
                    {"id": 54, "Count": 1},
                    {"id": "minecraft:chest", "tag": {"BlockEntityTag": {"Items": []}}}
                ]
            }],
            "TileTicks": [{"i": 1}, {"i": "stone"}]
        }
    });
    let read = at(&chain, 99).read(TypeReference::Chunk, &JsonOps, chunk).unwrap();
    let level = &read["Level"];
    assert_eq!(level["Entities"][0]["id"], json!("Cow"));
    assert_eq!(level["TileEntities"][0]["Items"][1]["tag"]["BlockEntityTag"]["id"], json!("Chest"));
    assert_eq!(level["TileTicks"][1]["i"], json!("minecraft:stone"));
}

#[test]
fn test_v99_rejects_namespaced_entity_ids() {
    let chain = chain();
    let err = at(&chain, 99)
        .read(TypeReference::EntityTree, &JsonOps, json!({"id": "minecraft:cow"}))
        .unwrap_err();
    assert!(matches!(err, ShapeError::UnrecognizedVariant { .. }));
}

#[test]
fn test_v705_item_stack_fills_namespaced_ids() {
    let chain = chain();
    let stack = json!({
        "id": "minecraft:chest",
        "tag": {"BlockEntityTag": {"Items": [{"id": "stone"}]}}
    });
    let read = at(&chain, 705).read(TypeReference::ItemStack, &JsonOps, stack).unwrap();
    assert_eq!(read["tag"]["BlockEntityTag"]["id"], json!("minecraft:chest"));
    assert_eq!(read["tag"]["BlockEntityTag"]["Items"][0]["id"], json!("minecraft:stone"));

    let rider = json!({"id": "cow", "Passengers": [{"id": "minecraft:pig"}]});
    let read = at(&chain, 705).read(TypeReference::EntityTree, &JsonOps, rider).unwrap();
    assert_eq!(read["id"], json!("minecraft:cow"));
}

#[test]
fn test_v1022_hotbar_keeps_slot_order() {
    let chain = chain();
    let hotbar = json!([
        ["2", [{"id": "stone"}]],
        ["0", []],
        ["2", [{"id": "minecraft:dirt"}]]
    ]);
    let schema = at(&chain, 1022);
    let read = schema.read(TypeReference::Hotbar, &JsonOps, hotbar).unwrap();
    assert_eq!(
        read,
        json!([
            ["2", [{"id": "minecraft:stone"}]],
            ["0", []],
            ["2", [{"id": "minecraft:dirt"}]]
        ])
    );
    assert!(at(&chain, 705).read(TypeReference::Hotbar, &JsonOps, json!([])).is_err());
}

#[test]
fn test_stats_and_criteria_at_1451_6() {
    let chain = chain();
    let schema = chain.resolve("1451.6").unwrap();

    let stats = json!({"stats": {"minecraft:mined": [["stone", 3], ["minecraft:dirt", 1], ["stone", 2]]}});
    let read = schema.read(TypeReference::Stats, &JsonOps, stats).unwrap();
    assert_eq!(
        read["stats"]["minecraft:mined"],
        json!([["minecraft:stone", 3], ["minecraft:dirt", 1], ["minecraft:stone", 2]])
    );

    let objective = json!({"CriteriaName": "stat.mineBlock.minecraft.stone", "Name": "mined"});
    let read = schema.read(TypeReference::Objective, &JsonOps, objective.clone()).unwrap();
    assert_eq!(read["CriteriaName"], json!({"type": "mineBlock", "id": "minecraft:stone"}));
    assert_eq!(read["Name"], json!("mined"));
    let written = schema.write(TypeReference::Objective, &JsonOps, read).unwrap();
    assert_eq!(written, objective);

    let dummy = json!({"CriteriaName": "dummy"});
    assert_eq!(schema.read(TypeReference::Objective, &JsonOps, dummy.clone()).unwrap(), dummy);
}

// =============================================================================
// References
// =============================================================================

#[test]
fn test_entity_tree_is_recursive_everywhere() {
    let chain = chain();
    for schema in &chain {
        let graph = ReferenceGraph::from_schema(schema);
        assert!(graph.dangling().is_empty(), "{}", schema.version());

        let groups = recursive_groups(&graph);
        let tree = NodeKey::Type(TypeReference::EntityTree);
        assert!(
            groups.iter().any(|g| g.contains(&tree)),
            "entity_tree not recursive at {}",
            schema.version()
        );
    }
}
