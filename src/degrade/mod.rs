pub mod chain;
pub mod controls;
pub mod filter;
pub mod mode;
pub mod stages;

pub use chain::{ChannelState, DegradationChain, MAX_CHANNELS};
pub use controls::{BlockControls, FrameControls, Smoothers};
pub use filter::{FilterSettings, FilterStage};
pub use mode::{Mode, ModeProfile};
