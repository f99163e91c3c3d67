pub mod autoscroll;
pub mod config;
pub mod document;
pub mod error;

pub use autoscroll::{ScrollSpeedController, ScrollState, Speed, ViewportAdapter};
pub use config::{AppConfig, EasingType};
pub use document::{Document, DocumentKind};
pub use error::{Error, Result};
