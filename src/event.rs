//! Completion events routed back from the tween engine

use crate::stage::ElementId;

/// Something the choreography must react to once an animation or timer ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    /// Loading bar finished and the loader faded out
    LoaderDone,
    /// The one-shot entrance timeline finished
    EntranceDone,
    /// The open timeline reached its final step
    OpenSequenceDone,
    /// The post-open delay elapsed; show the ending if still open
    EndingDue,
    /// A particle finished one upward cycle
    ParticleCycled(ElementId),
    /// A transient element finished animating and must be removed
    Despawn(ElementId),
    /// The heart pulse finished; show the toast
    HeartPopped,
}
