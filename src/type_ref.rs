//! Type-reference catalog
//!
//! The closed set of recurring structural roles in persisted data. A reference
//! keeps its meaning forever; only its template changes from version to version.
//! New roles are added here, at build time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Identity of a recurring structural role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeReference {
    Level,
    Player,
    Chunk,
    Hotbar,
    Options,
    Structure,
    Stats,
    SavedData,
    Advancements,
    PoiChunk,
    EntityChunk,
    BlockEntity,
    ItemStack,
    BlockState,
    EntityName,
    EntityTree,
    Entity,
    BlockName,
    ItemName,
    UntaggedSpawner,
    StructureFeature,
    Objective,
    Team,
    Recipe,
    Biome,
    WorldGenSettings,
    TextComponent,
}

impl TypeReference {
    /// Every catalog entry, in declaration order
    pub const ALL: [TypeReference; 27] = [
        TypeReference::Level,
        TypeReference::Player,
        TypeReference::Chunk,
        TypeReference::Hotbar,
        TypeReference::Options,
        TypeReference::Structure,
        TypeReference::Stats,
        TypeReference::SavedData,
        TypeReference::Advancements,
        TypeReference::PoiChunk,
        TypeReference::EntityChunk,
        TypeReference::BlockEntity,
        TypeReference::ItemStack,
        TypeReference::BlockState,
        TypeReference::EntityName,
        TypeReference::EntityTree,
        TypeReference::Entity,
        TypeReference::BlockName,
        TypeReference::ItemName,
        TypeReference::UntaggedSpawner,
        TypeReference::StructureFeature,
        TypeReference::Objective,
        TypeReference::Team,
        TypeReference::Recipe,
        TypeReference::Biome,
        TypeReference::WorldGenSettings,
        TypeReference::TextComponent,
    ];

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            TypeReference::Level => "level",
            TypeReference::Player => "player",
            TypeReference::Chunk => "chunk",
            TypeReference::Hotbar => "hotbar",
            TypeReference::Options => "options",
            TypeReference::Structure => "structure",
            TypeReference::Stats => "stats",
            TypeReference::SavedData => "saved_data",
            TypeReference::Advancements => "advancements",
            TypeReference::PoiChunk => "poi_chunk",
            TypeReference::EntityChunk => "entity_chunk",
            TypeReference::BlockEntity => "block_entity",
            TypeReference::ItemStack => "item_stack",
            TypeReference::BlockState => "block_state",
            TypeReference::EntityName => "entity_name",
            TypeReference::EntityTree => "entity_tree",
            TypeReference::Entity => "entity",
            TypeReference::BlockName => "block_name",
            TypeReference::ItemName => "item_name",
            TypeReference::UntaggedSpawner => "untagged_spawner",
            TypeReference::StructureFeature => "structure_feature",
            TypeReference::Objective => "objective",
            TypeReference::Team => "team",
            TypeReference::Recipe => "recipe",
            TypeReference::Biome => "biome",
            TypeReference::WorldGenSettings => "world_gen_settings",
            TypeReference::TextComponent => "text_component",
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeReference {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        TypeReference::ALL
            .iter()
            .copied()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| SchemaError::UnknownTypeReference(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = TypeReference::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), TypeReference::ALL.len());
    }

    #[test]
    fn test_parse_round_trip() {
        for r in TypeReference::ALL {
            assert_eq!(r.name().parse::<TypeReference>().unwrap(), r);
        }
        assert_eq!("item-stack".parse::<TypeReference>().unwrap(), TypeReference::ItemStack);
        assert!("villager".parse::<TypeReference>().is_err());
    }

    #[test]
    fn test_serde_uses_stable_names() {
        let json = serde_json::to_string(&TypeReference::EntityTree).unwrap();
        assert_eq!(json, "\"entity_tree\"");
    }
}
