// ABOUTME: Core library for biomedic: equipment records, persisted identity sets, and the list view-model.
// ABOUTME: Storage is reached only through the KeyValueStore adapter; rendering only through ViewSnapshot.

pub mod codec;
pub mod command;
pub mod highlight;
pub mod id_set;
pub mod images;
pub mod inventory;
pub mod kv;
pub mod record;
pub mod records;
pub mod render;
pub mod theme;
pub mod view;

pub use codec::{CodecError, ImportError, ImportFormat};
pub use command::Command;
pub use highlight::{Highlights, Span};
pub use id_set::IdSet;
pub use images::{ImageListing, ImagePicker};
pub use inventory::{ExportFile, Inventory, InventoryError, Outcome, Reply, ViewState};
pub use kv::{KeyValueStore, KvError, MemoryStore};
pub use record::{DeleteKey, EditKey, EquipmentRecord};
pub use records::{RecordError, RecordStore};
pub use render::{CardView, RenderScheduler, RenderToken, Renderer, ViewSnapshot};
pub use theme::Theme;
pub use view::{ViewPage, ViewQuery, compute_view};
