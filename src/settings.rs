//! Card settings and effect presets
//!
//! Every randomized visual parameter lives here so tests can pin ranges.
//! The page may override any section with an embedded JSON block.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::fx::Span;
use crate::tween::Ease;

/// Sparkle colors (rose palette)
pub const ROSE_PALETTE: [&str; 5] = ["#ff4d6d", "#ff758f", "#ffb3c1", "#ffc8dd", "#fb6f92"];

/// Page variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Plain card: smaller pool, reset on pointer leave, no ending scene
    Classic,
    /// Full card: heart reward, ending scene, controls excluded from sparkles
    #[default]
    Deluxe,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Deluxe => "Deluxe",
        }
    }

    pub fn features(&self) -> Features {
        match self {
            Variant::Classic => Features {
                ending_reveal: false,
                heart_reward: false,
                exclude_controls: false,
                reset_on_leave: true,
            },
            Variant::Deluxe => Features {
                ending_reveal: true,
                heart_reward: true,
                exclude_controls: true,
                reset_on_leave: false,
            },
        }
    }

    pub fn effects(&self) -> EffectConfig {
        match self {
            Variant::Classic => EffectConfig {
                particles: ParticleConfig {
                    pool_size: 20,
                    size: Span::new(2.0, 7.0),
                    opacity: Span::new(0.1, 0.6),
                    rise: Span::new(100.0, 150.0),
                    drift: Span::around_zero(15.0),
                    duration: Span::new(3.0, 8.0),
                    reset_top: 110.0,
                    ease: Ease::Linear,
                },
                sparkles: SparkleConfig {
                    size: Span::new(4.0, 15.0),
                    palette: ROSE_PALETTE.iter().map(|c| c.to_string()).collect(),
                    spread: 100.0,
                    duration: Span::new(0.5, 1.5),
                    click_burst: 8,
                    reward_burst: 10,
                    ease: Ease::PowerOut(2),
                },
            },
            Variant::Deluxe => EffectConfig {
                particles: ParticleConfig {
                    pool_size: 25,
                    size: Span::new(2.0, 5.0),
                    opacity: Span::new(0.1, 0.4),
                    rise: Span::fixed(150.0),
                    drift: Span::around_zero(20.0),
                    duration: Span::new(3.0, 8.0),
                    reset_top: 110.0,
                    ease: Ease::PowerOut(1),
                },
                sparkles: SparkleConfig {
                    size: Span::new(4.0, 10.0),
                    palette: ROSE_PALETTE.iter().map(|c| c.to_string()).collect(),
                    spread: 100.0,
                    duration: Span::new(0.8, 1.5),
                    click_burst: 10,
                    reward_burst: 10,
                    ease: Ease::PowerOut(2),
                },
            },
        }
    }
}

/// Behavior switches that differ per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// Show the ending scene a while after the card opens
    pub ending_reveal: bool,
    /// Heart tap pops a toast and a sparkle burst
    pub heart_reward: bool,
    /// Clicks on buttons/links do not emit sparkles
    pub exclude_controls: bool,
    /// Ease the card flat again when the pointer leaves the page
    pub reset_on_leave: bool,
}

/// Ambient particle pool parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub pool_size: usize,
    /// Diameter (px)
    pub size: Span,
    pub opacity: Span,
    /// Upward travel per cycle (px)
    pub rise: Span,
    /// Horizontal drift per cycle (px)
    pub drift: Span,
    /// Cycle length (s)
    pub duration: Span,
    /// Restart height after each cycle (% of container)
    pub reset_top: f32,
    pub ease: Ease,
}

/// Click sparkle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparkleConfig {
    /// Diameter (px)
    pub size: Span,
    pub palette: Vec<String>,
    /// Max offset on each axis (px)
    pub spread: f32,
    /// Flight time (s)
    pub duration: Span,
    /// Sparkles per qualifying click
    pub click_burst: usize,
    /// Sparkles for the heart reward
    pub reward_burst: usize,
    pub ease: Ease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub particles: ParticleConfig,
    pub sparkles: SparkleConfig,
}

/// Pointer/orientation to transform mapping constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltConfig {
    /// Below this viewport width pointer tilt is disabled (px)
    pub min_viewport_width: f32,
    /// Pixels of offset per degree while closed
    pub closed_factor: f32,
    /// Pixels of offset per degree while open (gentler, keeps text readable)
    pub open_factor: f32,
    pub card_duration: f32,
    pub light_duration: f32,
    /// Orb parallax as a multiple of card rotation
    pub orb_factor: f32,
    pub orb_duration: f32,
    /// Degrees of device tilt to pixels of virtual pointer offset
    pub orientation_gain: f32,
    pub leave_duration: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            min_viewport_width: 1024.0,
            closed_factor: 40.0,
            open_factor: 60.0,
            card_duration: 0.7,
            light_duration: 0.3,
            orb_factor: 1.5,
            orb_duration: 2.0,
            orientation_gain: 2.0,
            leave_duration: 1.0,
        }
    }
}

/// Complete card settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub variant: Variant,
    pub features: Features,
    pub effects: EffectConfig,
    pub tilt: TiltConfig,
    /// Seconds between the open sequence finishing and the ending scene
    pub ending_delay: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl Settings {
    /// Settings for a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            features: variant.features(),
            effects: variant.effects(),
            tilt: TiltConfig::default(),
            ending_delay: 3.0,
        }
    }

    /// Parse a (possibly partial) JSON override on top of its variant preset.
    ///
    /// Objects merge field by field, so `{"tilt": {"open_factor": 80}}`
    /// keeps every other tilt constant. An object carrying a key the preset
    /// lacks (an enum variant such as `{"BackOut": 1.7}`) replaces the value.
    pub fn from_json(json: &str) -> Result<Self> {
        let patch: Value = serde_json::from_str(json)?;
        let variant = match patch.get("variant") {
            Some(v) => Variant::deserialize(v)?,
            None => Variant::default(),
        };
        let mut merged = serde_json::to_value(Self::from_variant(variant))?;
        merge(&mut merged, patch);

        let mut settings: Self = serde_json::from_value(merged)?;
        settings.ending_delay = settings.ending_delay.max(0.0);
        Ok(settings)
    }

    /// Element id of the optional embedded configuration
    pub const CONFIG_ELEMENT_ID: &'static str = "card-config";

    /// Load settings from the page's JSON block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded {} card settings from page", settings.variant.as_str());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring card settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Overlay `patch` onto `base`, recursing only where `base` already has every key
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch))
            if patch.keys().all(|k| base.contains_key(k)) =>
        {
            for (key, value) in patch {
                if let Some(slot) = base.get_mut(&key) {
                    merge(slot, value);
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
