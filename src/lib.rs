//! Datafix Schema Registry
//!
//! Describes how persisted save data (chunks, players, item stacks, entities)
//! is shaped at every historical format revision, so old data can be migrated
//! forward one revision at a time.
//!
//! ## Features
//!
//! - **Template Algebra**: Records, optional members, lists, ordered pairs, tagged unions and hooks
//! - **Structural Inheritance**: Each revision copies its parent's registries, then applies its own changes
//! - **Lazy References**: Recursive and mutually recursive shapes without eager construction
//! - **Namespaced Ids**: Lookups match `"cow"` and `"minecraft:cow"` alike
//! - **Reference Validation**: Dangling references fail the chain build
//!
//! ## Architecture
//!
//! ```text
//! SchemaChain
//! ├── V99    (root)
//! ├── V100   parent: V99
//! ├── ...
//! ├── V705   parent: V704
//! └── V1451.6
//!     ├── types:          TypeReference -> Template
//!     ├── entities:       id -> Template
//!     └── block_entities: id -> Template
//! ```
//!
//! ```no_run
//! use datafix_schemas::{build_schema_chain, DataVersion, TypeReference};
//!
//! let chain = build_schema_chain()?;
//! let schema = chain.schema_for(DataVersion::new(1000)).expect("chain starts at 99");
//! assert!(schema.entity("cow").is_some());
//! let chunk = schema.type_template(TypeReference::Chunk)?;
//! println!("{}", chunk);
//! # Ok::<(), datafix_schemas::SchemaError>(())
//! ```

pub mod chain;
pub mod checksum;
pub mod config;
pub mod diff;
pub mod error;
pub mod graph;
pub mod namespace;
pub mod schema;
pub mod template;
pub mod type_ref;
pub mod version;
pub mod versions;

pub use chain::{SchemaChain, SchemaChainBuilder};
pub use checksum::Checksum;
pub use config::ToolConfig;
pub use diff::{diff_schemas, ChangeType, RegistryChange, SchemaDiff};
pub use error::{Result, SchemaError, ShapeError};
pub use graph::{recursive_groups, NodeKey, RecursiveGroup, ReferenceGraph};
pub use schema::{Schema, SchemaBuilder, Thunk};
pub use template::{DynamicOps, HookPair, JsonOps, Primitive, RegistryKind, Template};
pub use type_ref::TypeReference;
pub use version::DataVersion;
pub use versions::{build_schema_chain, build_schema_chain_with};
