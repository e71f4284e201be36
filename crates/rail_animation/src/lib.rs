//! Rail Animation System
//!
//! Scheduling and tween math for the workspace rail.
//!
//! # Features
//!
//! - **Two-phase motion**: an elastic stretch toward the target followed by a
//!   shrink to the resting size, with an overshoot curve
//! - **Coalescing**: selections arriving mid-animation collapse into one
//!   pending request, latest wins
//! - **Layout-aware**: targets whose geometry is not laid out yet are polled
//!   on later loop turns instead of failing
//! - **Cooperative**: no threads, no sleeping; every wait is a [`RailTask`]
//!   handed to a [`Clock`]
//! - **Style sinks**: emitted styles go to any [`StyleSink`], with CSS and
//!   recording sinks included

pub mod clock;
pub mod config;
pub mod easing;
pub mod scheduler;
pub mod style;
pub mod tween;

pub use clock::{Clock, RailTask, TaskQueue};
pub use config::RailConfig;
pub use easing::Easing;
pub use scheduler::{AnimationPhase, RailScheduler};
pub use style::{render_css, CssSink, RailStyle, RecordingSink, StyleSink, Transition};
pub use tween::{StretchFrame, TweenParams};
