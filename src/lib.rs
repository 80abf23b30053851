//! Wish Card - an animated birthday greeting page
//!
//! Core modules:
//! - `tween`: Time-based property animation (tweens, timelines, delayed calls)
//! - `stage`: Virtual element store that turns animated props into DOM updates
//! - `fx`: Ambient particles and click sparkles
//! - `card`: Card choreography (entrance, open/close, tilt, music, modal)
//! - `app`: The `Greeting` controller tying it all together
//! - `settings`: Variant presets and page-supplied overrides

pub mod app;
pub mod audio;
pub mod card;
pub mod error;
pub mod event;
pub mod fx;
pub mod settings;
pub mod stage;
pub mod tween;

pub use app::{ClickTarget, Greeting};
pub use error::{CardError, Result};
pub use event::CardEvent;
pub use settings::{Settings, Variant};
pub use stage::{DomOp, ElementId, Role, Stage};
