// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Animate command - run the particle background headlessly

use super::Output;
use crate::animation::{self, Engine, Frame, Input};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// Options for a headless run
#[derive(Debug, Clone)]
pub struct AnimateOptions {
    /// Frames to simulate
    pub frames: u64,
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
    /// Pointer position applied before the first frame
    pub pointer: Option<(f64, f64)>,
    /// Clicks applied before the first frame
    pub clicks: Vec<(f64, f64)>,
    /// RNG seed for reproducible output
    pub seed: Option<u64>,
    /// Drive the engine with the timed loop instead of ticking directly
    pub realtime: bool,
}

/// Parse `X,Y`
pub fn parse_point(s: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y in {s:?}: {e}"))?;
    Ok((x, y))
}

/// Run the animate command
pub async fn run(settings: &Settings, opts: AnimateOptions, out: Output) -> Result<()> {
    let anim = settings.animation.clone();
    let interval = Duration::from_millis(anim.frame_interval_ms.max(1));
    let mut engine = match opts.seed {
        Some(seed) => Engine::with_seed(opts.width, opts.height, anim, seed),
        None => Engine::new(opts.width, opts.height, anim),
    };

    if let Some((x, y)) = opts.pointer {
        engine.apply(Input::PointerMove { x, y });
    }
    for &(x, y) in &opts.clicks {
        engine.apply(Input::Click { x, y });
    }

    info!("Simulating {} frames", opts.frames);
    let frame = if opts.realtime {
        run_timed(engine, opts.frames, interval).await?
    } else {
        for _ in 0..opts.frames {
            engine.tick();
        }
        engine.frame()
    };

    if out.json {
        return out.print_json(&frame);
    }

    println!("Frame {} ({}x{})", frame.index, frame.width, frame.height);
    println!("  ambient particles: {}", frame.ambient.len());
    println!("  burst particles:   {}", frame.bursts.len());
    if let Some(p) = frame.ambient.first() {
        println!(
            "  first ambient:     ({:.1}, {:.1}) {}",
            p.x,
            p.y,
            out.dim(&p.color.to_css())
        );
    }
    Ok(())
}

/// Drive `engine` on the timed loop until `frames` ticks have been published
///
/// Inputs must already be applied to `engine`; the loop ticks as soon as it starts.
async fn run_timed(engine: Engine, frames: u64, interval: Duration) -> Result<Frame> {
    let handle = animation::spawn(engine, interval);

    let mut rx = handle.frames();
    while rx.borrow().index < frames {
        rx.changed().await.context("Animation loop ended early")?;
    }

    let frame = handle.latest();
    handle.stop();
    Ok(frame)
}
