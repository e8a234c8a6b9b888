use std::collections::BTreeMap;

use crate::config::PlayerConfig;
use crate::foundation::error::{PoseplayError, PoseplayResult};
use crate::playback::sample::{clamp_time, sample_at_time};
use crate::playback::sink::PoseSink;
use crate::pose::model::{Animation, Pose};
use crate::pose::normalize::PoseNormalizer;

/// Transport state of an [`AnimationPlayer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Time is at 0 and ticks do nothing.
    #[default]
    Stopped,
    /// Ticks advance time and apply poses.
    Playing,
    /// Ticks do nothing; time is held.
    Paused,
}

/// Drives a [`PoseSink`] from a library of animations.
///
/// Time only moves in [`AnimationPlayer::tick`], [`AnimationPlayer::seek`] and the
/// transitions. Every pose handed to the sink has been normalized. Selecting an animation
/// primes the sink with its default pose and applies frame 0 at once, so the consumer
/// never renders a stale or bind-pose frame after a switch.
#[derive(Clone, Debug, Default)]
pub struct AnimationPlayer {
    library: BTreeMap<String, Animation>,
    active: Option<String>,
    state: PlaybackState,
    time: f64,
    config: PlayerConfig,
    normalizer: PoseNormalizer,
    last_pose: Option<Pose>,
}

impl AnimationPlayer {
    /// Create an empty player.
    pub fn new(config: PlayerConfig, normalizer: PoseNormalizer) -> PoseplayResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            normalizer,
            ..Self::default()
        })
    }

    /// Add `animation` under its metadata name, replacing any animation of the same name.
    ///
    /// Frame count and duration are recomputed from the frames. Animations without frames
    /// or with an invalid frame rate are rejected.
    pub fn add_animation(&mut self, mut animation: Animation) -> PoseplayResult<()> {
        if animation.is_empty() {
            return Err(PoseplayError::animation(format!(
                "animation '{}' has no frames",
                animation.name()
            )));
        }
        animation
            .refresh_metadata()
            .map_err(|e| PoseplayError::animation(e.to_string()))?;
        let name = animation.name().to_owned();
        tracing::debug!(animation = %name, frames = animation.len(), "animation added");
        self.library.insert(name, animation);
        Ok(())
    }

    /// Remove an animation. Removing the active one stops playback.
    pub fn remove_animation(&mut self, name: &str) -> Option<Animation> {
        let removed = self.library.remove(name)?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
            self.state = PlaybackState::Stopped;
            self.time = 0.0;
        }
        Some(removed)
    }

    /// Names of all loaded animations.
    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.library.keys().map(String::as_str)
    }

    /// Make `name` the active animation.
    ///
    /// Resets the sink to its default pose, rewinds to 0 and applies frame 0. The transport
    /// state is kept, so a playing player continues with the new animation.
    pub fn select(&mut self, name: &str, sink: &mut dyn PoseSink) -> PoseplayResult<()> {
        let animation = self
            .library
            .get(name)
            .ok_or_else(|| PoseplayError::validation(format!("unknown animation '{name}'")))?;
        let first = self.normalizer.normalize(&sample_at_time(animation, 0.0)?);

        self.active = Some(name.to_owned());
        self.time = 0.0;
        sink.reset_to_default();
        sink.apply_pose(&first);
        self.last_pose = Some(first);
        tracing::debug!(animation = name, "animation selected");
        Ok(())
    }

    /// Add `animation` and select it.
    pub fn load(&mut self, animation: Animation, sink: &mut dyn PoseSink) -> PoseplayResult<()> {
        let name = animation.name().to_owned();
        self.add_animation(animation)?;
        self.select(&name, sink)
    }

    /// Start or resume playback. Restarts from 0 when a non-looping animation sits at its end.
    pub fn play(&mut self) -> PoseplayResult<()> {
        let duration = self
            .active_animation()
            .map(Animation::duration)
            .ok_or_else(|| PoseplayError::animation("no animation selected"))?;
        if !self.config.looping && self.time >= duration {
            self.time = 0.0;
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Pause playback, holding the current time. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback, rewind to 0 and apply frame 0.
    pub fn stop(&mut self, sink: &mut dyn PoseSink) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
        self.apply_current(sink);
    }

    /// Jump to `t` seconds (clamped to the animation) and apply the pose there.
    pub fn seek(&mut self, t: f64, sink: &mut dyn PoseSink) {
        let Some(duration) = self.active_animation().map(Animation::duration) else {
            return;
        };
        self.time = clamp_time(t, duration);
        self.apply_current(sink);
    }

    /// Advance by `dt` wall-clock seconds and apply the resulting pose.
    ///
    /// Reaching the end wraps to 0 when looping; otherwise time holds at the end and the
    /// player pauses. Sampling failures are logged and the last good pose stays in place.
    pub fn tick(&mut self, dt: f64, sink: &mut dyn PoseSink) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(duration) = self.active_animation().map(Animation::duration) else {
            return;
        };
        if dt.is_finite() && dt > 0.0 {
            self.time += dt * self.config.speed;
        }
        if self.time >= duration {
            if self.config.looping {
                self.time = 0.0;
            } else {
                self.time = duration;
                self.state = PlaybackState::Paused;
            }
        }
        self.apply_current(sink);
    }

    /// Set the playback speed multiplier; must be finite and positive.
    pub fn set_speed(&mut self, speed: f64) -> PoseplayResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PoseplayError::validation(format!(
                "playback speed must be finite and > 0, got {speed}"
            )));
        }
        self.config.speed = speed;
        Ok(())
    }

    /// Playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    /// Enable or disable looping.
    pub fn set_looping(&mut self, looping: bool) {
        self.config.looping = looping;
    }

    /// Return `true` when playback wraps at the end.
    pub fn is_looping(&self) -> bool {
        self.config.looping
    }

    /// Transport state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current time in seconds.
    pub fn current_time(&self) -> f64 {
        self.time
    }

    /// Name of the active animation.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active animation.
    pub fn active_animation(&self) -> Option<&Animation> {
        self.active.as_ref().and_then(|name| self.library.get(name))
    }

    /// Last normalized pose handed to the sink.
    pub fn last_pose(&self) -> Option<&Pose> {
        self.last_pose.as_ref()
    }

    fn apply_current(&mut self, sink: &mut dyn PoseSink) {
        let Some(animation) = self.active_animation() else {
            return;
        };
        match sample_at_time(animation, self.time) {
            Ok(raw) => {
                let pose = self.normalizer.normalize(&raw);
                sink.apply_pose(&pose);
                self.last_pose = Some(pose);
            }
            Err(e) => {
                tracing::warn!(error = %e, time = self.time, "sampling failed; holding last pose");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
