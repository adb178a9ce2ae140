//! Label file format and storage.
//!
//! - `yolo`: parse/serialize of the line-oriented YOLO TXT format
//! - `store`: the `LabelStore` seam with directory and in-memory backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use labelscope::format::{self, DirectoryStore, LabelStore};
//!
//! let mut store = DirectoryStore::open("dataset/labels")?;
//! let labels = format::parse(&store.get("frame_001")?.unwrap_or_default());
//! store.set("frame_001", &format::serialize(&labels))?;
//! ```

mod store;
mod yolo;

pub use store::{CLASSES_FILE, DirectoryStore, LABEL_EXTENSION, LabelStore, MemoryStore};
pub use yolo::{ParseReport, parse, parse_report, serialize};
