//! Every element the page choreography touches

use serde::{Deserialize, Serialize};

/// Element role, tying a stage record to its markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Body,
    // Loading screen
    Loader,
    Progress,
    // Entrance
    MainTitle,
    CakeContainer,
    CardControls,
    AudioPlayer,
    // Card
    Card,
    CardFront,
    WishTitle,
    WishParagraph,
    Signature,
    Heart,
    EndingScene,
    EndingItem,
    // Ambient decoration
    CursorLight,
    OrbLeft,
    OrbRight,
    ParticleField,
    // Music
    MusicButton,
    MusicLabel,
    // Surprise section + modal
    SurpriseSection,
    FunModal,
    FunFrame,
    // Spawned at runtime
    Particle,
    Sparkle,
    Toast,
}

impl Role {
    /// Roles bound to existing markup at startup
    pub const MARKUP: [Role; 24] = [
        Role::Body,
        Role::Loader,
        Role::Progress,
        Role::MainTitle,
        Role::CakeContainer,
        Role::CardControls,
        Role::AudioPlayer,
        Role::Card,
        Role::CardFront,
        Role::WishTitle,
        Role::WishParagraph,
        Role::Signature,
        Role::Heart,
        Role::EndingScene,
        Role::EndingItem,
        Role::CursorLight,
        Role::OrbLeft,
        Role::OrbRight,
        Role::ParticleField,
        Role::MusicButton,
        Role::MusicLabel,
        Role::SurpriseSection,
        Role::FunModal,
        Role::FunFrame,
    ];

    /// CSS selector locating the markup for this role
    pub fn selector(self) -> Option<&'static str> {
        let sel = match self {
            Role::Body => "body",
            Role::Loader => "#loader",
            Role::Progress => ".progress",
            Role::MainTitle => ".main-title",
            Role::CakeContainer => ".cake-container",
            Role::CardControls => ".card-controls",
            Role::AudioPlayer => ".audio-player",
            Role::Card => "#card",
            Role::CardFront => "#card-front",
            Role::WishTitle => ".wish-title",
            Role::WishParagraph => ".wish-text p",
            Role::Signature => "#signature",
            Role::Heart => "#heart-trigger",
            Role::EndingScene => "#ending-scene",
            Role::EndingItem => ".ending-content > *",
            Role::CursorLight => ".cursor-light",
            Role::OrbLeft => ".orb-1",
            Role::OrbRight => ".orb-2",
            Role::ParticleField => "#particles-container",
            Role::MusicButton => "#music-toggle",
            Role::MusicLabel => "#music-toggle .music-text",
            Role::SurpriseSection => "#fun-surprise",
            Role::FunModal => "#fun-modal",
            Role::FunFrame => "#fun-iframe",
            Role::Particle | Role::Sparkle | Role::Toast => return None,
        };
        Some(sel)
    }

    /// Class name given to elements spawned for this role
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Role::Particle => Some("particle"),
            Role::Sparkle => Some("sparkle"),
            Role::Toast => Some("love-toast"),
            _ => None,
        }
    }
}
