//! Background music playback
//!
//! The page ships an `<audio>` element; this module wraps it behind
//! `Playback` so the toggle logic can be tested without a browser.

use crate::error::Result;

/// Something that can start and stop the background track
pub trait Playback {
    /// Request playback. Browsers may refuse (autoplay policy); callers log
    /// and ignore the error.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
}

/// Playback that does nothing (native builds, missing audio)
#[derive(Debug, Default)]
pub struct SilentPlayback;

impl Playback for SilentPlayback {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::MediaPlayback;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::HtmlAudioElement;

    use super::Playback;
    use crate::error::{CardError, Result};

    /// Playback backed by an `HtmlAudioElement`
    pub struct MediaPlayback {
        element: HtmlAudioElement,
    }

    impl MediaPlayback {
        pub fn new(element: HtmlAudioElement) -> Self {
            Self { element }
        }
    }

    impl Playback for MediaPlayback {
        fn play(&mut self) -> Result<()> {
            let promise = self
                .element
                .play()
                .map_err(|e| CardError::Media(format!("{:?}", e)))?;
            // Autoplay rejections arrive asynchronously
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Audio playback rejected: {:?}", e);
                }
            });
            Ok(())
        }

        fn pause(&mut self) -> Result<()> {
            self.element
                .pause()
                .map_err(|e| CardError::Media(format!("{:?}", e)))
        }
    }
}
