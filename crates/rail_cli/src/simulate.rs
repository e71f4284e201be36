//! Headless rail simulation
//!
//! Lays out a row of equally sized items, feeds a selection script through
//! the scheduler on a virtual clock and writes every emitted style with the
//! virtual time it was emitted at.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rail_animation::{
    render_css, Clock, RailConfig, RailScheduler, RailStyle, RailTask, RecordingSink, TaskQueue,
};
use rail_core::{Axis, GeometryMap, ItemId, RailState};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// How emitted styles are written
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One CSS rule per style
    #[default]
    Css,
    /// One JSON object per line
    Json,
}

/// Shape of the simulated item row and selection script
#[derive(Clone, Debug)]
pub struct Scenario {
    pub items: u32,
    pub extent: f64,
    pub spacing: f64,
    /// Delay between consecutive selections
    pub interval: Duration,
    /// Layout polls each item answers "not laid out" before its bounds appear
    pub unready_polls: u32,
    pub selections: Vec<ItemId>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            items: 5,
            extent: 40.0,
            spacing: 20.0,
            interval: Duration::from_millis(500),
            unready_polls: 0,
            selections: Vec::new(),
        }
    }
}

/// What a finished simulation ended with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub emitted: usize,
    pub rail: Option<RailState>,
    pub elapsed: Duration,
}

#[derive(Serialize)]
struct Emission<'a> {
    t_ms: u64,
    #[serde(flatten)]
    style: &'a RailStyle,
}

type SimRail = RailScheduler<GeometryMap, RecordingSink>;

/// Run `scenario` to completion, writing styles to `out`
pub fn run<W: Write>(
    config: RailConfig,
    scenario: &Scenario,
    format: OutputFormat,
    out: &mut W,
) -> Result<Summary> {
    let axis = config.axis;
    let selector = config.selector.clone();

    let mut geometry = GeometryMap::row(axis, scenario.items, scenario.extent, scenario.spacing);
    if scenario.unready_polls > 0 {
        for id in 1..=scenario.items {
            geometry.defer(ItemId::new(id), scenario.unready_polls);
        }
    }

    let mut rail: SimRail =
        RailScheduler::new(config, geometry, RecordingSink::new(), TaskQueue::new());
    for (k, item) in scenario.selections.iter().enumerate() {
        let delay = scenario.interval * k as u32;
        rail.clock_mut().after(delay, RailTask::Select(*item));
    }

    let mut emitted = 0;
    loop {
        while rail.clock().has_ready() {
            rail.pump();
            let now = rail.clock().now();
            for style in rail.sink_mut().take() {
                write_style(out, format, now, &style, axis, &selector)?;
                emitted += 1;
            }
        }
        match rail.clock().next_deadline() {
            Some(deadline) => rail.clock_mut().advance_to(deadline),
            None => break,
        }
    }

    let summary = Summary {
        emitted,
        rail: rail.rail_state(),
        elapsed: rail.clock().now(),
    };
    tracing::debug!("Simulation finished: {:?}", summary);
    Ok(summary)
}

fn write_style<W: Write>(
    out: &mut W,
    format: OutputFormat,
    now: Duration,
    style: &RailStyle,
    axis: Axis,
    selector: &str,
) -> Result<()> {
    match format {
        OutputFormat::Css => {
            writeln!(out, "/* t={}ms */", now.as_millis())?;
            out.write_all(render_css(style, axis, selector).as_bytes())?;
        }
        OutputFormat::Json => {
            let line = serde_json::to_string(&Emission {
                t_ms: now.as_millis() as u64,
                style,
            })
            .context("Failed to serialize style")?;
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
