//! Animatable element properties and their CSS rendering

use serde::{Deserialize, Serialize};

/// Length unit for positional/size properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Unit {
    Px,
    Percent,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
        }
    }
}

/// A numeric property the tween engine can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Prop {
    /// Transform translateX (px)
    X,
    /// Transform translateY (px)
    Y,
    /// Uniform transform scale
    Scale,
    /// Transform rotateX (degrees)
    RotationX,
    /// Transform rotateY (degrees)
    RotationY,
    Opacity,
    /// CSS blur filter radius (px)
    Blur,
    Left(Unit),
    Top(Unit),
    Width(Unit),
    Height(Unit),
}

impl Prop {
    /// Value an element has before anything assigns the property
    pub fn initial(self) -> f32 {
        match self {
            Prop::Scale | Prop::Opacity => 1.0,
            _ => 0.0,
        }
    }

    /// True if the property is folded into the `transform` declaration
    pub fn is_transform(self) -> bool {
        matches!(
            self,
            Prop::X | Prop::Y | Prop::Scale | Prop::RotationX | Prop::RotationY
        )
    }

    /// CSS property name for non-transform props
    pub fn css_name(self) -> &'static str {
        match self {
            Prop::X | Prop::Y | Prop::Scale | Prop::RotationX | Prop::RotationY => "transform",
            Prop::Opacity => "opacity",
            Prop::Blur => "filter",
            Prop::Left(_) => "left",
            Prop::Top(_) => "top",
            Prop::Width(_) => "width",
            Prop::Height(_) => "height",
        }
    }

    /// Render a standalone (non-transform) value as CSS text
    pub fn css_value(self, value: f32) -> String {
        match self {
            Prop::Opacity => format!("{}", round3(value)),
            Prop::Blur => format!("blur({}px)", round3(value)),
            Prop::Left(unit) | Prop::Top(unit) | Prop::Width(unit) | Prop::Height(unit) => {
                format!("{}{}", round3(value), unit.suffix())
            }
            _ => String::new(),
        }
    }
}

/// Compose the transform channels in GSAP order: translate, rotate, scale
pub fn transform_css(x: f32, y: f32, rotation_x: f32, rotation_y: f32, scale: f32) -> String {
    format!(
        "translate({}px, {}px) rotateX({}deg) rotateY({}deg) scale({})",
        round3(x),
        round3(y),
        round3(rotation_x),
        round3(rotation_y),
        round3(scale)
    )
}

#[inline]
fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        assert_eq!(Prop::Opacity.initial(), 1.0);
        assert_eq!(Prop::Scale.initial(), 1.0);
        assert_eq!(Prop::Top(Unit::Percent).initial(), 0.0);
    }

    #[test]
    fn test_css_values() {
        assert_eq!(Prop::Left(Unit::Percent).css_value(42.5), "42.5%");
        assert_eq!(Prop::Width(Unit::Px).css_value(4.0), "4px");
        assert_eq!(Prop::Blur.css_value(5.0), "blur(5px)");
        assert_eq!(Prop::Opacity.css_value(0.25), "0.25");
    }

    #[test]
    fn test_transform_order() {
        let css = transform_css(10.0, -5.0, 2.0, -180.0, 1.1);
        assert_eq!(
            css,
            "translate(10px, -5px) rotateX(2deg) rotateY(-180deg) scale(1.1)"
        );
    }
}
