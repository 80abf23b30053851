//! Decorative effects: ambient particles and click sparkles

pub mod particles;
pub mod span;
pub mod sparkles;

pub use particles::ParticleRecycler;
pub use span::Span;
pub use sparkles::SparkleEmitter;
