//! Style emission
//!
//! The scheduler describes each visual step as a [`RailStyle`] and hands it
//! to a [`StyleSink`]. Sinks render however they like; the scheduler never
//! reads a style back.

use crate::easing::Easing;
use crate::tween::StretchFrame;
use rail_core::{Axis, RailState, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

/// How a style change should be animated by the renderer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration_ms: duration.as_millis() as u64,
            easing,
        }
    }
}

/// One emitted rail style
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RailStyle {
    /// Offset along the axis
    pub position: f64,
    /// Length along the axis
    pub size: f64,
    /// Thickness across the axis, if it changes
    pub cross_size: Option<f64>,
    /// `None` applies the style instantly
    pub transition: Option<Transition>,
}

impl RailStyle {
    /// Instant placement with no animation
    pub fn placed(state: RailState) -> Self {
        Self {
            position: state.position,
            size: state.size,
            cross_size: Some(state.size),
            transition: None,
        }
    }

    pub fn stretched(frame: StretchFrame, transition: Transition) -> Self {
        Self {
            position: frame.position,
            size: frame.size,
            cross_size: Some(frame.cross_size),
            transition: Some(transition),
        }
    }

    /// Contract to a round resting state
    pub fn settled(rest: RailState, transition: Transition) -> Self {
        Self {
            position: rest.position,
            size: rest.size,
            cross_size: Some(rest.size),
            transition: Some(transition),
        }
    }
}

/// Receiver of emitted styles
///
/// Errors are reported back to the scheduler, which logs them and keeps
/// animating.
pub trait StyleSink {
    fn apply(&mut self, style: &RailStyle) -> Result<()>;
}

impl<F> StyleSink for F
where
    F: FnMut(&RailStyle) -> Result<()>,
{
    fn apply(&mut self, style: &RailStyle) -> Result<()> {
        self(style)
    }
}

/// Sink that keeps every emitted style in order
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    styles: Vec<RailStyle>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &[RailStyle] {
        &self.styles
    }

    pub fn last(&self) -> Option<&RailStyle> {
        self.styles.last()
    }

    /// Remove and return everything recorded so far
    pub fn take(&mut self) -> Vec<RailStyle> {
        std::mem::take(&mut self.styles)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleSink for RecordingSink {
    fn apply(&mut self, style: &RailStyle) -> Result<()> {
        self.styles.push(*style);
        Ok(())
    }
}

/// Render a style as a CSS rule for `selector`
pub fn render_css(style: &RailStyle, axis: Axis, selector: &str) -> String {
    let position = axis.position_property();
    let size = axis.size_property();
    let cross = axis.cross_size_property();

    let mut css = format!("{} {{\n", selector);
    match style.transition {
        Some(transition) => {
            css.push_str(&format!(
                "    transition-property: {}, {}, {};\n",
                position, size, cross
            ));
            css.push_str(&format!(
                "    transition-duration: {}s;\n",
                transition.duration_ms as f64 / 1000.0
            ));
            css.push_str(&format!(
                "    transition-timing-function: {};\n",
                transition.easing.to_css()
            ));
        }
        None => css.push_str("    transition-property: none;\n"),
    }
    css.push_str(&format!("    {}: {}px;\n", position, style.position));
    css.push_str(&format!("    {}: {}px;\n", size, style.size));
    if let Some(cross_size) = style.cross_size {
        css.push_str(&format!("    {}: {}px;\n", cross, cross_size));
    }
    css.push_str("}\n");
    css
}

/// Sink that writes every style as a CSS rule
pub struct CssSink<W: Write> {
    axis: Axis,
    selector: String,
    writer: W,
}

impl<W: Write> CssSink<W> {
    pub fn new(axis: Axis, selector: impl Into<String>, writer: W) -> Self {
        Self {
            axis,
            selector: selector.into(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> StyleSink for CssSink<W> {
    fn apply(&mut self, style: &RailStyle) -> Result<()> {
        let css = render_css(style, self.axis, &self.selector);
        self.writer.write_all(css.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_core::RailError;

    #[test]
    fn test_placed_style_has_no_transition() {
        let style = RailStyle::placed(RailState::new(108.0, 24.0));
        let css = render_css(&style, Axis::Horizontal, "#workspace-rail");

        assert_eq!(
            css,
            "#workspace-rail {\n    transition-property: none;\n    margin-left: 108px;\n    min-width: 24px;\n    min-height: 24px;\n}\n"
        );
    }

    #[test]
    fn test_stretch_css_vertical() {
        let frame = StretchFrame {
            position: 0.0,
            size: 224.0,
            cross_size: 11.5,
        };
        let style = RailStyle::stretched(
            frame,
            Transition::new(Duration::from_millis(100), Easing::EaseOut),
        );
        let css = render_css(&style, Axis::Vertical, "#rail");

        assert!(css.contains("transition-property: margin-top, min-height, min-width;"));
        assert!(css.contains("transition-duration: 0.1s;"));
        assert!(css.contains("transition-timing-function: ease-out;"));
        assert!(css.contains("margin-top: 0px;"));
        assert!(css.contains("min-height: 224px;"));
        assert!(css.contains("min-width: 11.5px;"));
    }

    #[test]
    fn test_css_sink_writes_rules() {
        let mut sink = CssSink::new(Axis::Horizontal, "#workspace-rail", Vec::new());
        let rest = RailState::new(108.0, 24.0);
        sink.apply(&RailStyle::settled(
            rest,
            Transition::new(Duration::from_millis(150), Easing::overshoot()),
        ))
        .unwrap();

        let css = String::from_utf8(sink.into_inner()).unwrap();
        assert!(css.starts_with("#workspace-rail {"));
        assert!(css.contains("transition-duration: 0.15s;"));
        assert!(css.contains("cubic-bezier(0.34, 1.56, 0.64, 1)"));
    }

    #[test]
    fn test_recording_sink_take() {
        let mut sink = RecordingSink::new();
        let style = RailStyle::placed(RailState::new(0.0, 24.0));
        sink.apply(&style).unwrap();
        assert_eq!(sink.len(), 1);

        let taken = sink.take();
        assert_eq!(taken.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut failing = |_: &RailStyle| -> Result<()> { Err(RailError::Sink("gone".into())) };
        assert!(failing
            .apply(&RailStyle::placed(RailState::new(0.0, 24.0)))
            .is_err());
    }

    #[test]
    fn test_style_serializes_easing_as_css() {
        let style = RailStyle::settled(
            RailState::new(108.0, 24.0),
            Transition::new(Duration::from_millis(150), Easing::EaseOut),
        );
        let json = serde_json::to_value(style).unwrap();

        assert_eq!(json["transition"]["easing"], "ease-out");
        assert_eq!(json["transition"]["duration_ms"], 150);
        assert_eq!(json["position"], 108.0);
    }
}
