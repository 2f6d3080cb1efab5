pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod traits;

pub use crate::core::clock::MonotonicClock;
pub use crate::core::fixed_step::{FixedStepLoop, LoopConfig, LoopController, LoopError, LoopHooks};
pub use crate::core::fps::FpsCounter;
pub use crate::core::framebuffer::{Framebuffer, FramebufferError};
pub use crate::core::surface_renderer::{SharedSurface, WindowSurface};
pub use crate::traits::clock::ClockSource;
pub use crate::traits::lifecycle::LifecycleSignal;
pub use crate::traits::surface::{PresentError, PresentationSurface};
