//! labelscope - YOLO label review engine
//!
//! Geometry and interaction core for reviewing and correcting object-detection
//! labels: a normalized label model with YOLO text I/O, pan/zoom viewports, a
//! pointer-driven editing state machine, magnified crops with a grid
//! slideshow, and an overlay compositor. Windowing and storage backends plug
//! in through [`format::LabelStore`] and [`detection::Detector`].

pub mod color;
pub mod config;
pub mod coords;
pub mod decode;
pub mod detection;
pub mod error;
pub mod format;
pub mod grid;
pub mod interaction;
pub mod magnifier;
pub mod model;
pub mod overlay;
pub mod viewport;

pub use config::{EngineConfig, LogLevel};
pub use coords::ContentFrame;
pub use error::{ConfigError, DetectionError, LabelError, RenderError};
pub use interaction::{Effect, Interaction, PointerEvent, Session, WheelEvent};
pub use magnifier::Magnifier;
pub use model::{Label, NormPoint};
pub use viewport::{ScaleBounds, Viewport};
