//! Handles to the page's static elements

use crate::error::{CardError, Result};
use crate::stage::{ElementId, Role, Stage};

/// Stage ids for every element present in the page markup
#[derive(Debug, Clone)]
pub struct Markup {
    pub body: ElementId,
    pub loader: ElementId,
    pub progress: Vec<ElementId>,
    pub main_title: Vec<ElementId>,
    pub cake: Vec<ElementId>,
    pub controls: Vec<ElementId>,
    pub audio_player: Vec<ElementId>,
    pub card: ElementId,
    pub card_front: ElementId,
    pub wish_title: Vec<ElementId>,
    pub paragraphs: Vec<ElementId>,
    pub signature: ElementId,
    pub heart: ElementId,
    pub ending_scene: ElementId,
    pub ending_items: Vec<ElementId>,
    pub cursor_light: ElementId,
    pub orb_left: Vec<ElementId>,
    pub orb_right: Vec<ElementId>,
    pub particle_field: ElementId,
    pub music_button: ElementId,
    pub music_label: ElementId,
    pub surprise: ElementId,
    pub modal: ElementId,
    pub frame: ElementId,
}

fn one(stage: &Stage, role: Role) -> Result<ElementId> {
    stage
        .find(role)
        .ok_or(CardError::MissingElement(role.selector().unwrap_or("?")))
}

fn many(stage: &Stage, role: Role) -> Result<Vec<ElementId>> {
    let ids = stage.find_all(role);
    if ids.is_empty() {
        Err(CardError::MissingElement(role.selector().unwrap_or("?")))
    } else {
        Ok(ids)
    }
}

impl Markup {
    /// Collect handles from a stage whose markup roles were already adopted
    pub fn from_stage(stage: &Stage) -> Result<Self> {
        Ok(Self {
            body: one(stage, Role::Body)?,
            loader: one(stage, Role::Loader)?,
            progress: many(stage, Role::Progress)?,
            main_title: many(stage, Role::MainTitle)?,
            cake: many(stage, Role::CakeContainer)?,
            controls: many(stage, Role::CardControls)?,
            audio_player: many(stage, Role::AudioPlayer)?,
            card: one(stage, Role::Card)?,
            card_front: one(stage, Role::CardFront)?,
            wish_title: many(stage, Role::WishTitle)?,
            paragraphs: many(stage, Role::WishParagraph)?,
            signature: one(stage, Role::Signature)?,
            heart: one(stage, Role::Heart)?,
            ending_scene: one(stage, Role::EndingScene)?,
            ending_items: many(stage, Role::EndingItem)?,
            cursor_light: one(stage, Role::CursorLight)?,
            orb_left: many(stage, Role::OrbLeft)?,
            orb_right: many(stage, Role::OrbRight)?,
            particle_field: one(stage, Role::ParticleField)?,
            music_button: one(stage, Role::MusicButton)?,
            music_label: one(stage, Role::MusicLabel)?,
            surprise: one(stage, Role::SurpriseSection)?,
            modal: one(stage, Role::FunModal)?,
            frame: one(stage, Role::FunFrame)?,
        })
    }

    /// Adopt a stand-in for the page: one node per role, with
    /// `paragraphs` wish lines and `ending_items` ending children
    pub fn build(stage: &mut Stage, paragraphs: usize, ending_items: usize) -> Result<Self> {
        for role in Role::MARKUP {
            let count = match role {
                Role::WishParagraph => paragraphs,
                Role::EndingItem => ending_items,
                _ => 1,
            };
            for _ in 0..count {
                stage.adopt(role);
            }
        }
        Self::from_stage(stage)
    }
}
