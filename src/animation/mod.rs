pub mod interpolation;
pub mod transitions;

pub use interpolation::{EasingFunction, Interpolatable, Interpolation};
pub use transitions::{
    ImmediatePresenter, RecordingPresenter, Transition, TransitionKind, TransitionPresenter,
    TransitionValue, Tween,
};
