// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Background particle animation
//!
//! Two populations share one [`Engine`]:
//!
//! - ambient particles live forever, drift toward the pointer and wrap at the
//!   viewport edges;
//! - burst particles are spawned in a batch by a click, slow down and fade,
//!   and are dropped when their lifetime runs out.
//!
//! The engine is a plain state machine advanced by [`Engine::tick`]. The
//! [`spawn`] driver runs it on a tokio interval and publishes every frame.

use crate::config::{AnimationSettings, Span};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::f64::consts::TAU;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Initial ambient speed per axis, in pixels per frame
const AMBIENT_DRIFT: Span = Span::new(-0.3, 0.3);

/// HSL colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    /// Hue in degrees
    pub h: f64,
    /// Saturation percent
    pub s: f64,
    /// Lightness percent
    pub l: f64,
}

impl Hsl {
    /// CSS `hsl()` notation
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("hsl({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

/// One particle of either population
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Horizontal velocity
    pub vx: f64,
    /// Vertical velocity
    pub vy: f64,
    /// Radius in pixels
    pub size: f64,
    /// Fill colour
    pub color: Hsl,
    /// 0.0 (transparent) to 1.0
    pub opacity: f64,
    /// Frames left to live; `None` for ambient particles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life: Option<u32>,
}

/// Pointer and viewport events fed to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Pointer moved; only recorded, read on the next tick
    PointerMove {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
    },
    /// Click; spawns a burst at the coordinates
    Click {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
    },
    /// Viewport changed size
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Frames simulated so far
    pub index: u64,
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
    /// Ambient population
    pub ambient: Vec<Particle>,
    /// Burst population
    pub bursts: Vec<Particle>,
}

/// The particle simulation
#[derive(Debug)]
pub struct Engine {
    settings: AnimationSettings,
    width: f64,
    height: f64,
    pointer: Option<(f64, f64)>,
    ambient: Vec<Particle>,
    bursts: Vec<Particle>,
    frame: u64,
    rng: StdRng,
}

impl Engine {
    /// Engine for a `width` × `height` viewport, seeded from the OS
    #[must_use]
    pub fn new(width: f64, height: f64, settings: AnimationSettings) -> Self {
        Self::with_rng(width, height, settings, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and replays
    #[must_use]
    pub fn with_seed(width: f64, height: f64, settings: AnimationSettings, seed: u64) -> Self {
        Self::with_rng(width, height, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f64, height: f64, settings: AnimationSettings, rng: StdRng) -> Self {
        let mut engine = Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
            pointer: None,
            ambient: Vec::with_capacity(settings.ambient_count),
            bursts: Vec::new(),
            frame: 0,
            rng,
            settings,
        };

        for _ in 0..engine.settings.ambient_count {
            let particle = engine.ambient_particle();
            engine.ambient.push(particle);
        }
        debug!(
            "Animation engine: {} ambient particles in {}x{}",
            engine.ambient.len(),
            engine.width,
            engine.height
        );
        engine
    }

    fn ambient_particle(&mut self) -> Particle {
        let s = &self.settings;
        let (size, opacity, hue) = (s.ambient_size, s.ambient_opacity, s.ambient_hue);
        Particle {
            x: draw(&mut self.rng, Span::new(0.0, self.width)),
            y: draw(&mut self.rng, Span::new(0.0, self.height)),
            vx: draw(&mut self.rng, AMBIENT_DRIFT),
            vy: draw(&mut self.rng, AMBIENT_DRIFT),
            size: draw(&mut self.rng, size),
            color: Hsl {
                h: draw(&mut self.rng, hue),
                s: 70.0,
                l: 60.0,
            },
            opacity: draw(&mut self.rng, opacity),
            life: None,
        }
    }

    /// Viewport size
    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Last known pointer position
    #[must_use]
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    /// Ambient population
    #[must_use]
    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }

    /// Burst population
    #[must_use]
    pub fn bursts(&self) -> &[Particle] {
        &self.bursts
    }

    /// Frames simulated so far
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Record the pointer position for the next tick
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    /// Spawn a burst at `(x, y)`
    pub fn click(&mut self, x: f64, y: f64) {
        let s = &self.settings;
        let (count, speed, size, life) = (s.burst_count, s.burst_speed, s.burst_size, s.burst_lifetime);

        self.bursts.reserve(count);
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..TAU);
            let speed = draw(&mut self.rng, speed);
            let particle = Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                size: draw(&mut self.rng, size),
                color: Hsl {
                    h: self.rng.gen_range(0.0..360.0),
                    s: 90.0,
                    l: 65.0,
                },
                opacity: 1.0,
                life: Some(life),
            };
            self.bursts.push(particle);
        }
        trace!("Burst of {} at ({}, {})", count, x, y);
    }

    /// Change the viewport and wrap ambient particles into it
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = clamp_extent(width);
        self.height = clamp_extent(height);
        for p in &mut self.ambient {
            p.x = wrap(p.x, self.width);
            p.y = wrap(p.y, self.height);
        }
    }

    /// Feed one input event
    pub fn apply(&mut self, input: Input) {
        match input {
            Input::PointerMove { x, y } => self.pointer_move(x, y),
            Input::Click { x, y } => self.click(x, y),
            Input::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self) {
        self.step_ambient();
        self.step_bursts();
        self.frame += 1;
    }

    fn step_ambient(&mut self) {
        let s = &self.settings;
        for p in &mut self.ambient {
            if let Some((px, py)) = self.pointer {
                let dx = px - p.x;
                let dy = py - p.y;
                let distance = dx.hypot(dy);
                if distance > 0.0 {
                    let force = (s.attraction / (distance + 1.0)).min(s.attraction_cap);
                    p.vx += dx / distance * force;
                    p.vy += dy / distance * force;
                }
            }

            p.vx *= s.friction;
            p.vy *= s.friction;
            p.x = wrap(p.x + p.vx, self.width);
            p.y = wrap(p.y + p.vy, self.height);
        }
    }

    fn step_bursts(&mut self) {
        let s = &self.settings;
        let mut i = 0;
        while i < self.bursts.len() {
            let p = &mut self.bursts[i];
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= s.burst_velocity_damping;
            p.vy *= s.burst_velocity_damping;
            p.opacity *= s.burst_opacity_damping;

            let life = p.life.unwrap_or(0).saturating_sub(1);
            p.life = Some(life);

            if life == 0 {
                self.bursts.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Copy of the current state for rendering
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            index: self.frame,
            width: self.width,
            height: self.height,
            ambient: self.ambient.clone(),
            bursts: self.bursts.clone(),
        }
    }
}

fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() && v >= 1.0 {
        v
    } else {
        1.0
    }
}

fn draw(rng: &mut StdRng, span: Span) -> f64 {
    if span.max > span.min {
        rng.gen_range(span.min..span.max)
    } else {
        span.min
    }
}

/// Wrap `v` into `[0, extent)`
#[must_use]
pub fn wrap(v: f64, extent: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if r >= extent {
        0.0
    } else {
        r
    }
}

/// A running animation loop
///
/// Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct AnimationHandle {
    input: mpsc::UnboundedSender<Input>,
    frames: watch::Receiver<Frame>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// Queue an input event for the loop
    pub fn send(&self, input: Input) -> bool {
        self.input.send(input).is_ok()
    }

    /// Subscribe to frames
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Most recently published frame
    #[must_use]
    pub fn latest(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Whether the loop is still scheduled
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the loop
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Animation loop stopped");
    }
}

/// Run `engine` every `interval` until the handle is dropped
///
/// Inputs are applied between ticks in arrival order; each tick publishes a
/// new [`Frame`].
#[must_use]
pub fn spawn(mut engine: Engine, interval: Duration) -> AnimationHandle {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let (frame_tx, frame_rx) = watch::channel(engine.frame());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    engine.tick();
                    if frame_tx.send(engine.frame()).is_err() {
                        break;
                    }
                }
                input = input_rx.recv() => match input {
                    Some(input) => engine.apply(input),
                    None => break,
                },
            }
        }
    });

    AnimationHandle {
        input: input_tx,
        frames: frame_rx,
        task,
    }
}
