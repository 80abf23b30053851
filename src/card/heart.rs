//! Heart tap micro-interaction: pulse, then a short-lived toast

use super::markup::Markup;
use crate::event::CardEvent;
use crate::stage::{ElementId, Prop, Role, Stage};
use crate::tween::{Ease, Tween, TweenEngine};

pub const TOAST_TEXT: &str = "You are my everything! ✨";

const PULSE_COLOR: &str = "#ff0000";

/// Pulse the heart; the engine reports `HeartPopped` when it settles
pub fn pulse(stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) {
    // Colors are not tweenable props: the red holds for the whole pulse
    // instead of easing in and out with the scale.
    stage.set_style(markup.heart, "color", PULSE_COLOR);
    engine.add(
        stage,
        Tween::new(markup.heart)
            .to(Prop::Scale, 1.8)
            .duration(0.3)
            .repeat(1)
            .yoyo(true)
            .on_complete(CardEvent::HeartPopped),
    );
}

/// Restore the heart color and pop a toast that removes itself
pub fn pop_toast(stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) -> ElementId {
    stage.set_style(markup.heart, "color", "");

    let toast = stage.spawn(Role::Toast, None);
    stage.set_text(toast, TOAST_TEXT);
    for (name, value) in [
        ("position", "fixed"),
        ("top", "50%"),
        ("left", "50%"),
        ("translate", "-50% -50%"),
        ("color", "white"),
        ("background", "#ff4d6d"),
        ("padding", "15px 30px"),
        ("border-radius", "50px"),
        ("z-index", "3000"),
        ("font-weight", "600"),
        ("box-shadow", "0 10px 25px rgba(255, 77, 109, 0.4)"),
    ] {
        stage.set_style(toast, name, value);
    }

    engine.add(
        stage,
        Tween::new(toast)
            .from(Prop::Scale, 0.0)
            .from(Prop::Opacity, 0.0)
            .duration(0.5)
            .ease(Ease::BackOut(1.7)),
    );
    engine.add(
        stage,
        Tween::new(toast)
            .to(Prop::Y, -40.0)
            .to(Prop::Opacity, 0.0)
            .delay(1.5)
            .duration(0.8)
            .on_complete(CardEvent::Despawn(toast)),
    );
    toast
}
