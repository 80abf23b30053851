//! Card choreography
//!
//! - `entrance`: loader and one-shot entrance reveal
//! - `lifecycle`: open/close state machine and the ending reveal
//! - `tilt`: pointer/orientation to 3D rotation
//! - `music`, `heart`, `modal`: smaller interactions

pub mod entrance;
pub mod heart;
pub mod lifecycle;
pub mod markup;
pub mod modal;
pub mod music;
pub mod tilt;

pub use entrance::{EntrancePhase, EntranceSequencer};
pub use lifecycle::{CardController, CardState};
pub use markup::Markup;
pub use modal::{ModalHost, RevealGate};
pub use music::MusicToggle;
pub use tilt::{Tilt, TiltMapper, Viewport};
