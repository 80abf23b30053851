//! Two-state music button

use super::markup::Markup;
use crate::audio::Playback;
use crate::stage::Stage;

pub const PLAY_LABEL: &str = "Play Music";
pub const PAUSE_LABEL: &str = "Pause Music";
pub const PLAYING_CLASS: &str = "playing";

/// Mirrors the user's play/pause intent into the button.
///
/// The flag follows clicks, not actual playback: a refused `play()` still
/// leaves the button showing "Pause Music".
#[derive(Debug, Default)]
pub struct MusicToggle {
    playing: bool,
}

impl MusicToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip state, drive the media element and update the button
    pub fn toggle(&mut self, stage: &mut Stage, markup: &Markup, media: &mut dyn Playback) -> bool {
        if self.playing {
            if let Err(e) = media.pause() {
                log::warn!("Pause failed: {}", e);
            }
            stage.set_text(markup.music_label, PLAY_LABEL);
            stage.remove_class(markup.music_button, PLAYING_CLASS);
        } else {
            if let Err(e) = media.play() {
                log::warn!("Play failed: {}", e);
            }
            stage.set_text(markup.music_label, PAUSE_LABEL);
            stage.add_class(markup.music_button, PLAYING_CLASS);
        }
        self.playing = !self.playing;
        log::debug!("Music {}", if self.playing { "on" } else { "off" });
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CardError, Result};

    /// Media that always refuses to play
    #[derive(Default)]
    struct BlockedMedia {
        plays: u32,
        pauses: u32,
    }

    impl Playback for BlockedMedia {
        fn play(&mut self) -> Result<()> {
            self.plays += 1;
            Err(CardError::Media("NotAllowedError".into()))
        }

        fn pause(&mut self) -> Result<()> {
            self.pauses += 1;
            Ok(())
        }
    }

    #[test]
    fn test_toggle_flips_label_and_class_despite_refusal() {
        let mut stage = Stage::new();
        let markup = Markup::build(&mut stage, 1, 1).expect("markup");
        let mut media = BlockedMedia::default();
        let mut music = MusicToggle::new();

        assert!(music.toggle(&mut stage, &markup, &mut media));
        assert_eq!(stage.text(markup.music_label), Some(PAUSE_LABEL));
        assert!(stage.has_class(markup.music_button, PLAYING_CLASS));

        assert!(!music.toggle(&mut stage, &markup, &mut media));
        assert_eq!(stage.text(markup.music_label), Some(PLAY_LABEL));
        assert!(!stage.has_class(markup.music_button, PLAYING_CLASS));

        assert_eq!(media.plays, 1);
        assert_eq!(media.pauses, 1);
    }
}
