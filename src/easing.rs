//! Easing functions
//!
//! Every function maps `(t, start, end, duration)` to an interpolated value,
//! where `t` is the elapsed time in `[0, duration]`. The span covered is
//! `end - start`; callers that animate a delta pass `start = 0.0`.

use serde::{Deserialize, Serialize};

/// Named easing curves, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    BounceIn,
    #[default]
    BounceOut,
    BounceInOut,
}

impl Easing {
    pub fn apply(self, t: f64, start: f64, end: f64, duration: f64) -> f64 {
        match self {
            Easing::Linear => linear(t, start, end, duration),
            Easing::BounceIn => ease_in_bounce(t, start, end, duration),
            Easing::BounceOut => ease_out_bounce(t, start, end, duration),
            Easing::BounceInOut => ease_in_out_bounce(t, start, end, duration),
        }
    }
}

pub fn linear(t: f64, start: f64, end: f64, duration: f64) -> f64 {
    let c = end - start;
    c * t / duration + start
}

/// Decelerating bounce that settles on `end` at `t == duration`
pub fn ease_out_bounce(t: f64, start: f64, end: f64, duration: f64) -> f64 {
    let c = end - start;
    let t = t / duration;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + start
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + start
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + start
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + start
    }
}

/// Mirror image of [`ease_out_bounce`]
pub fn ease_in_bounce(t: f64, start: f64, end: f64, duration: f64) -> f64 {
    let c = end - start;
    let v = ease_out_bounce(duration - t, 0.0, c, duration);
    c - v + start
}

pub fn ease_in_out_bounce(t: f64, start: f64, end: f64, duration: f64) -> f64 {
    let c = end - start;
    if t < duration / 2.0 {
        ease_in_bounce(t * 2.0, 0.0, c, duration) * 0.5 + start
    } else {
        ease_out_bounce(t * 2.0 - duration, 0.0, c, duration) * 0.5 + c * 0.5 + start
    }
}
