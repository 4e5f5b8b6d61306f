//! Playback control methods

use std::time::Instant;

use super::{AppController, PlayerCommand, Request};

impl AppController {
    pub(super) fn toggle_play(&mut self) -> Vec<Request> {
        let command = if self.model.playback.is_playing() {
            PlayerCommand::Pause
        } else {
            PlayerCommand::Resume
        };
        vec![Request::Command(command)]
    }

    /// Flip locally right away; the next poll confirms or corrects it.
    pub(super) fn toggle_shuffle(&mut self) -> Vec<Request> {
        let shuffle = !self.model.playback.shuffle;
        self.model.playback.shuffle = shuffle;
        vec![Request::Command(PlayerCommand::Shuffle(shuffle))]
    }

    pub(super) fn cycle_repeat(&mut self) -> Vec<Request> {
        let repeat = self.model.playback.repeat.cycle();
        self.model.playback.repeat = repeat;
        vec![Request::Command(PlayerCommand::Repeat(repeat))]
    }

    pub(super) fn toggle_autoplay(&mut self) -> Vec<Request> {
        let autoplay = &mut self.model.autoplay;
        autoplay.enabled = !autoplay.enabled;
        tracing::info!(enabled = autoplay.enabled, "Autoplay toggled");
        Vec::new()
    }

    pub(super) fn change_volume(&mut self, delta: i16) -> Vec<Request> {
        let Some(current) = self.model.devices.volume else {
            return Vec::new();
        };
        let volume = (current as i16 + delta).clamp(0, 100) as u8;
        if volume == current {
            return Vec::new();
        }
        self.model.devices.volume = Some(volume);
        vec![Request::Command(PlayerCommand::Volume(volume))]
    }

    pub(super) fn seek_relative(&mut self, delta_ms: i64, now: Instant) -> Vec<Request> {
        if self.model.playback.track.is_none() {
            return Vec::new();
        }
        let clock = &self.model.playback.clock;
        let target = (clock.position_at(now) as i64 + delta_ms).clamp(0, clock.duration_ms() as i64);
        vec![Request::Command(PlayerCommand::Seek(target as u32))]
    }

    pub(super) fn transfer_to_next_device(&mut self) -> Vec<Request> {
        match self.model.devices.next_after_active() {
            Some(device) if !device.id.is_empty() => {
                tracing::info!(device = %device.name, "Transferring playback");
                vec![Request::Command(PlayerCommand::Transfer(device.id.clone()))]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::super::test_support::*;
    use super::super::{AppEvent, Intent};
    use super::*;
    use crate::model::{DeviceInfo, RepeatMode};

    #[test]
    fn space_pauses_when_playing_and_resumes_otherwise() {
        let t0 = Instant::now();
        let mut c = playing_controller(t0, "a");
        assert_eq!(
            c.handle_intent(Intent::TogglePlay, t0),
            vec![Request::Command(PlayerCommand::Pause)]
        );

        let mut idle = controller(t0);
        assert_eq!(
            idle.handle_intent(Intent::TogglePlay, t0),
            vec![Request::Command(PlayerCommand::Resume)]
        );
    }

    #[test]
    fn shuffle_and_repeat_update_optimistically() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        assert_eq!(
            c.handle_intent(Intent::ToggleShuffle, t0),
            vec![Request::Command(PlayerCommand::Shuffle(true))]
        );
        assert!(c.model().playback.shuffle);

        c.handle_intent(Intent::CycleRepeat, t0);
        assert_eq!(c.model().playback.repeat, RepeatMode::Context);
        assert_eq!(
            c.handle_intent(Intent::CycleRepeat, t0),
            vec![Request::Command(PlayerCommand::Repeat(RepeatMode::Track))]
        );
    }

    #[test]
    fn successful_command_refreshes_playback() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let requests = c.handle(
            AppEvent::CommandFinished { command: PlayerCommand::Pause, result: Ok(()) },
            t0,
        );
        assert_eq!(requests, vec![Request::FetchPlayback]);
    }

    #[test]
    fn volume_steps_from_mirrored_value_and_clamps() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        assert!(c.handle_intent(Intent::VolumeUp, t0).is_empty());

        model_mut(&mut c).set_devices(vec![DeviceInfo {
            id: "d".into(),
            name: "Desk".into(),
            kind: "Computer".into(),
            is_active: true,
            volume: Some(98),
        }]);
        assert_eq!(
            c.handle_intent(Intent::VolumeUp, t0),
            vec![Request::Command(PlayerCommand::Volume(100))]
        );
        assert!(c.handle_intent(Intent::VolumeUp, t0).is_empty());
        assert_eq!(
            c.handle_intent(Intent::VolumeDown, t0),
            vec![Request::Command(PlayerCommand::Volume(95))]
        );
    }

    #[test]
    fn seek_uses_interpolated_position() {
        let t0 = Instant::now();
        let mut c = playing_controller(t0, "a");
        let requests = c.handle_intent(Intent::SeekForward, t0 + Duration::from_secs(2));
        assert_eq!(requests, vec![Request::Command(PlayerCommand::Seek(13_000))]);

        let requests = c.handle_intent(Intent::SeekBackward, t0);
        assert_eq!(requests, vec![Request::Command(PlayerCommand::Seek(0))]);
    }

    #[test]
    fn autoplay_key_toggles_flag() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        c.handle_intent(Intent::ToggleAutoplay, t0);
        assert!(c.model().autoplay.enabled);
        c.handle_intent(Intent::ToggleAutoplay, t0);
        assert!(!c.model().autoplay.enabled);
    }
}
