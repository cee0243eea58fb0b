//! Per-chunk geology storage: two-band rock layers, soil and sand per column,
//! and a palette-compressed codec for persisting them into a tag container.

pub mod codec;
pub mod layers;
pub mod registry;
pub mod resource_id;
pub mod soil;
pub mod tag;

pub use codec::{DecodeError, EncodeError, LayerCodec, MalformedLayerData, StorageFormat};
pub use layers::{CHUNK_COLUMNS, CHUNK_SIDE, ColumnGeology, LayerStore, local_index};
pub use registry::{RegistryError, RockCategory, RockDef, RockId, RockRegistry, RockTypeRegistry};
pub use resource_id::{DEFAULT_NAMESPACE, ResourceId, ResourceIdError};
pub use soil::{SandType, SoilVariant};
pub use tag::{Compound, Tag, TagContainer};
