//! Surface configurator: four wiring passes over a host surface slot.
//!
//! The configurator is a flat sequence of construction and binding calls.
//! It builds the mixer, session grid, device, and transport components from
//! the profile table, registers them with the host, and steps aside; the
//! host's dispatch loop drives everything afterwards.

use log::{debug, info};
use thiserror::Error;

use crate::element::{Button, ControlSpec, Fader};
use crate::host::{ComponentId, HighlightBounds, SurfaceHost};
use crate::profile::ControllerProfile;

/// Feedback value the host shows on a scene while one of its clips is
/// triggered but not yet playing.
pub const SCENE_TRIGGERED_VALUE: u8 = 2;

/// Surface lifecycle. One transition, taken when the session grid is fully
/// bound; host callbacks arriving earlier are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    Building,
    Active,
}

/// Wiring errors. All are initialization-time faults; nothing is retried.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("profile validation failed: {}", .0.join("; "))]
    InvalidProfile(Vec<String>),
    #[error("{0} already wired")]
    AlreadyWired(&'static str),
    #[error("session wiring requires the mixer to be wired first")]
    MixerNotWired,
}

/// Declarative binding layer between one hardware controller and a host
/// surface slot.
///
/// [`Surface::connect`] performs the whole setup in one call. The individual
/// passes are public so a host integration can interleave its own steps;
/// only mixer-before-session is a hard ordering requirement.
#[derive(Debug)]
pub struct Surface {
    profile: ControllerProfile,
    phase: SurfacePhase,
    mixer_id: Option<ComponentId>,
    session_id: Option<ComponentId>,
    device_id: Option<ComponentId>,
    transport_wired: bool,
}

impl Surface {
    /// Validate the profile and open the muted construction window.
    ///
    /// Device-follows-track is enabled up front, and MIDI feedback toward
    /// the controller is gated off until the session grid is fully bound.
    pub fn begin(
        host: &mut dyn SurfaceHost,
        profile: ControllerProfile,
    ) -> Result<Self, SurfaceError> {
        profile.validate().map_err(SurfaceError::InvalidProfile)?;

        info!(
            "wiring control surface '{}' ({}x{} grid)",
            profile.name, profile.grid.width, profile.grid.height
        );
        host.set_device_follows_track(true);
        host.set_midi_feedback(false);

        Ok(Self {
            profile,
            phase: SurfacePhase::Building,
            mixer_id: None,
            session_id: None,
            device_id: None,
            transport_wired: false,
        })
    }

    /// Perform all four wiring passes in order and return the active surface.
    pub fn connect(
        host: &mut dyn SurfaceHost,
        profile: ControllerProfile,
    ) -> Result<Self, SurfaceError> {
        let mut surface = Self::begin(host, profile)?;
        surface.wire_mixer(host)?;
        surface.wire_session(host)?;
        surface.wire_device(host)?;
        surface.wire_transport(host)?;
        Ok(surface)
    }

    /// Mixer pass: one strip per grid column plus master and prehear.
    ///
    /// Also selects the first track slot as the host's active track.
    pub fn wire_mixer(&mut self, host: &mut dyn SurfaceHost) -> Result<(), SurfaceError> {
        if self.mixer_id.is_some() {
            return Err(SurfaceError::AlreadyWired("mixer"));
        }

        let width = self.profile.grid.width;
        let ch = self.profile.channels;
        let map = &self.profile.mixer;

        let mut mixer = host.create_mixer(width);
        mixer.set_track_offset(0);
        host.select_track(0);

        mixer
            .master()
            .set_volume_control(Fader::new(ch.user, map.master_volume));
        mixer.set_prehear_volume_control(Fader::new(ch.user, map.prehear));

        for index in 0..width {
            let strip = mixer.strip(index);
            strip.set_volume_control(Fader::new(ch.mixer, map.volume[index]));
            strip.set_pan_control(Fader::new(ch.mixer, map.pan[index]));
            strip.set_arm_button(Button::momentary(ControlSpec::control(
                ch.instrument,
                map.arm[index],
            )));
            strip.set_solo_button(Button::momentary(ControlSpec::control(
                ch.instrument,
                map.solo[index],
            )));
            strip.set_mute_button(Button::momentary(ControlSpec::control(
                ch.instrument,
                map.mute[index],
            )));
            strip.set_select_button(Button::momentary(ControlSpec::control(
                ch.instrument,
                map.select[index],
            )));
            strip.set_send_controls(
                map.sends[index]
                    .iter()
                    .map(|&number| Fader::new(ch.mixer, number))
                    .collect(),
            );
        }

        debug!("mixer wired: {} strips", width);
        self.mixer_id = Some(mixer.id());
        host.install_mixer(mixer);
        Ok(())
    }

    /// Session pass: grid, bank navigation, scene and track-stop buttons.
    ///
    /// Ends with the single BUILDING -> ACTIVE transition: feedback and
    /// highlighting stay muted until every session sub-object is bound, so
    /// no callback can observe a half-built grid.
    pub fn wire_session(&mut self, host: &mut dyn SurfaceHost) -> Result<(), SurfaceError> {
        let mixer = self.mixer_id.ok_or(SurfaceError::MixerNotWired)?;
        if self.session_id.is_some() {
            return Err(SurfaceError::AlreadyWired("session"));
        }

        let width = self.profile.grid.width;
        let height = self.profile.grid.height;
        let ch = self.profile.channels;
        let map = &self.profile.session;

        let mut session = host.create_session(width, height);

        let up = Button::momentary(ControlSpec::control(ch.mixer, map.bank_up));
        let down = Button::momentary(ControlSpec::control(ch.mixer, map.bank_down));
        let left = Button::momentary(ControlSpec::control(ch.mixer, map.bank_left));
        let right = Button::momentary(ControlSpec::control(ch.mixer, map.bank_right));
        session.set_scene_bank_buttons(down, up);
        session.set_track_bank_buttons(right, left);

        for row in 0..height {
            let scene = session.scene(row);
            scene.set_launch_button(Button::momentary(ControlSpec::note(
                ch.mixer,
                map.scene_launch[row],
            )));
            scene.set_triggered_value(SCENE_TRIGGERED_VALUE);

            for column in 0..width {
                scene
                    .clip_slot(column)
                    .set_launch_button(Button::momentary(ControlSpec::note(
                        ch.mixer,
                        map.launch[row][column],
                    )));
            }
        }

        let stop_buttons: Vec<Button> = map
            .track_stop
            .iter()
            .map(|&note| Button::momentary(ControlSpec::note(ch.mixer, note)))
            .collect();

        // Grid fully bound: re-enable feedback and highlighting.
        self.phase = SurfacePhase::Active;
        host.set_midi_feedback(true);
        host.set_highlighting_session(session.id());

        session.set_stop_track_clip_buttons(stop_buttons);
        session.set_mixer(mixer);

        debug!("session wired: {}x{} grid", width, height);
        self.session_id = Some(session.id());
        host.install_session(session);
        Ok(())
    }

    /// Device pass: eight macro controls, toggles, bank and nav buttons.
    pub fn wire_device(&mut self, host: &mut dyn SurfaceHost) -> Result<(), SurfaceError> {
        if self.device_id.is_some() {
            return Err(SurfaceError::AlreadyWired("device"));
        }

        let ch = self.profile.channels;
        let map = &self.profile.device;

        let mut device = host.create_device();
        device.set_parameter_controls(
            map.macros
                .iter()
                .map(|&number| Fader::new(ch.fx, number))
                .collect(),
        );
        device.set_on_off_button(Button::momentary(ControlSpec::control(ch.fx, map.on_off)));
        device.set_lock_button(Button::momentary(ControlSpec::control(ch.fx, map.lock)));
        device.set_bank_buttons(
            Button::momentary(ControlSpec::control(ch.fx, map.bank_prev)),
            Button::momentary(ControlSpec::control(ch.fx, map.bank_next)),
        );

        debug!("device wired: {} macro controls", map.macros.len());
        self.device_id = Some(device.id());
        host.install_device(device);

        let mut nav = host.create_device_navigator();
        nav.set_device_nav_buttons(
            Button::momentary(ControlSpec::control(ch.fx, map.nav_prev)),
            Button::momentary(ControlSpec::control(ch.fx, map.nav_next)),
        );
        host.install_device_navigator(nav);
        Ok(())
    }

    /// Transport pass: tempo bound first, then the transport buttons.
    pub fn wire_transport(&mut self, host: &mut dyn SurfaceHost) -> Result<(), SurfaceError> {
        if self.transport_wired {
            return Err(SurfaceError::AlreadyWired("transport"));
        }

        let ch = self.profile.channels;
        let map = &self.profile.transport;

        let mut transport = host.create_transport();
        transport.set_tempo_top(map.tempo_top);

        transport.set_stop_button(Button::toggle(ControlSpec::control(ch.mixer, map.stop)));
        transport.set_play_button(Button::toggle(ControlSpec::control(ch.mixer, map.play)));
        transport.set_record_button(Button::toggle(ControlSpec::control(ch.mixer, map.record)));
        transport.set_overdub_button(Button::toggle(ControlSpec::control(ch.mixer, map.overdub)));
        transport.set_seek_buttons(
            Button::toggle(ControlSpec::control(ch.mixer, map.seek_back)),
            Button::toggle(ControlSpec::control(ch.mixer, map.seek_forward)),
        );
        transport.set_tempo_control(Fader::new(ch.user, map.tempo));
        transport.set_metronome_button(Button::toggle(ControlSpec::control(ch.user, map.metronome)));
        transport.set_tap_tempo_button(Button::toggle(ControlSpec::control(ch.user, map.tap_tempo)));

        debug!("transport wired, tempo top {}", map.tempo_top);
        self.transport_wired = true;
        host.install_transport(transport);
        Ok(())
    }

    /// Host callback override for session view highlighting.
    ///
    /// A no-op while the grid is still being built; afterwards it delegates
    /// unchanged to the host's default behavior.
    pub fn request_session_highlight(&self, host: &mut dyn SurfaceHost, bounds: HighlightBounds) {
        if self.phase == SurfacePhase::Active {
            host.highlight_session(bounds);
        }
    }

    /// Tear the surface down, delegating entirely to the host.
    ///
    /// Consumes the surface: there is no crate-owned state to release, and
    /// no control can be rebound afterwards.
    pub fn disconnect(self, host: &mut dyn SurfaceHost) {
        info!("disconnecting control surface '{}'", self.profile.name);
        host.disconnect();
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn profile(&self) -> &ControllerProfile {
        &self.profile
    }

    pub fn mixer_id(&self) -> Option<ComponentId> {
        self.mixer_id
    }

    pub fn session_id(&self) -> Option<ComponentId> {
        self.session_id
    }

    pub fn device_id(&self) -> Option<ComponentId> {
        self.device_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        ClipSlotHandle, DeviceHandle, DeviceNavHandle, MixerHandle, SceneHandle, SessionHandle,
        StripHandle, TransportHandle,
    };

    struct NoopStrip;

    impl StripHandle for NoopStrip {
        fn set_volume_control(&mut self, _control: Fader) {}
        fn set_pan_control(&mut self, _control: Fader) {}
        fn set_arm_button(&mut self, _button: Button) {}
        fn set_solo_button(&mut self, _button: Button) {}
        fn set_mute_button(&mut self, _button: Button) {}
        fn set_select_button(&mut self, _button: Button) {}
        fn set_send_controls(&mut self, _controls: Vec<Fader>) {}
    }

    struct NoopMixer {
        id: ComponentId,
        strip: NoopStrip,
    }

    impl MixerHandle for NoopMixer {
        fn id(&self) -> ComponentId {
            self.id
        }
        fn set_track_offset(&mut self, _offset: usize) {}
        fn strip(&mut self, _index: usize) -> &mut dyn StripHandle {
            &mut self.strip
        }
        fn master(&mut self) -> &mut dyn StripHandle {
            &mut self.strip
        }
        fn set_prehear_volume_control(&mut self, _control: Fader) {}
    }

    struct NoopSlot;

    impl ClipSlotHandle for NoopSlot {
        fn set_launch_button(&mut self, _button: Button) {}
    }

    struct NoopScene {
        slot: NoopSlot,
    }

    impl SceneHandle for NoopScene {
        fn set_launch_button(&mut self, _button: Button) {}
        fn set_triggered_value(&mut self, _value: u8) {}
        fn clip_slot(&mut self, _column: usize) -> &mut dyn ClipSlotHandle {
            &mut self.slot
        }
    }

    struct NoopSession {
        id: ComponentId,
        scene: NoopScene,
    }

    impl SessionHandle for NoopSession {
        fn id(&self) -> ComponentId {
            self.id
        }
        fn set_scene_bank_buttons(&mut self, _down: Button, _up: Button) {}
        fn set_track_bank_buttons(&mut self, _right: Button, _left: Button) {}
        fn scene(&mut self, _row: usize) -> &mut dyn SceneHandle {
            &mut self.scene
        }
        fn set_stop_track_clip_buttons(&mut self, _buttons: Vec<Button>) {}
        fn set_mixer(&mut self, _mixer: ComponentId) {}
    }

    struct NoopTransport;

    impl TransportHandle for NoopTransport {
        fn set_tempo_top(&mut self, _bpm: f64) {}
        fn set_stop_button(&mut self, _button: Button) {}
        fn set_play_button(&mut self, _button: Button) {}
        fn set_record_button(&mut self, _button: Button) {}
        fn set_overdub_button(&mut self, _button: Button) {}
        fn set_seek_buttons(&mut self, _back: Button, _forward: Button) {}
        fn set_tempo_control(&mut self, _control: Fader) {}
        fn set_metronome_button(&mut self, _button: Button) {}
        fn set_tap_tempo_button(&mut self, _button: Button) {}
    }

    struct NoopDevice {
        id: ComponentId,
    }

    impl DeviceHandle for NoopDevice {
        fn id(&self) -> ComponentId {
            self.id
        }
        fn set_parameter_controls(&mut self, _controls: Vec<Fader>) {}
        fn set_on_off_button(&mut self, _button: Button) {}
        fn set_lock_button(&mut self, _button: Button) {}
        fn set_bank_buttons(&mut self, _prev: Button, _next: Button) {}
    }

    struct NoopNav;

    impl DeviceNavHandle for NoopNav {
        fn set_device_nav_buttons(&mut self, _prev: Button, _next: Button) {}
    }

    #[derive(Default)]
    struct NoopHost {
        next_id: u64,
        highlight_calls: usize,
    }

    impl NoopHost {
        fn next_id(&mut self) -> ComponentId {
            self.next_id += 1;
            ComponentId(self.next_id)
        }
    }

    impl SurfaceHost for NoopHost {
        fn create_mixer(&mut self, _strips: usize) -> Box<dyn MixerHandle> {
            Box::new(NoopMixer {
                id: self.next_id(),
                strip: NoopStrip,
            })
        }
        fn create_session(&mut self, _width: usize, _height: usize) -> Box<dyn SessionHandle> {
            Box::new(NoopSession {
                id: self.next_id(),
                scene: NoopScene { slot: NoopSlot },
            })
        }
        fn create_transport(&mut self) -> Box<dyn TransportHandle> {
            Box::new(NoopTransport)
        }
        fn create_device(&mut self) -> Box<dyn DeviceHandle> {
            Box::new(NoopDevice { id: self.next_id() })
        }
        fn create_device_navigator(&mut self) -> Box<dyn DeviceNavHandle> {
            Box::new(NoopNav)
        }
        fn install_mixer(&mut self, _mixer: Box<dyn MixerHandle>) {}
        fn install_session(&mut self, _session: Box<dyn SessionHandle>) {}
        fn install_transport(&mut self, _transport: Box<dyn TransportHandle>) {}
        fn install_device(&mut self, _device: Box<dyn DeviceHandle>) {}
        fn install_device_navigator(&mut self, _nav: Box<dyn DeviceNavHandle>) {}
        fn set_highlighting_session(&mut self, _session: ComponentId) {}
        fn select_track(&mut self, _index: usize) {}
        fn set_device_follows_track(&mut self, _follows: bool) {}
        fn set_midi_feedback(&mut self, _enabled: bool) {}
        fn highlight_session(&mut self, _bounds: HighlightBounds) {
            self.highlight_calls += 1;
        }
        fn disconnect(&mut self) {}
    }

    fn bounds() -> HighlightBounds {
        HighlightBounds {
            track_offset: 0,
            scene_offset: 0,
            width: 8,
            height: 5,
            include_return_tracks: false,
        }
    }

    #[test]
    fn test_connect_activates_surface() {
        let mut host = NoopHost::default();
        let surface = Surface::connect(&mut host, ControllerProfile::default()).unwrap();

        assert_eq!(surface.phase(), SurfacePhase::Active);
        assert!(surface.mixer_id().is_some());
        assert!(surface.session_id().is_some());
        assert!(surface.device_id().is_some());
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut host = NoopHost::default();
        let mut profile = ControllerProfile::default();
        profile.session.scene_launch.clear();

        let err = Surface::connect(&mut host, profile).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidProfile(_)));
    }

    #[test]
    fn test_session_requires_mixer() {
        let mut host = NoopHost::default();
        let mut surface = Surface::begin(&mut host, ControllerProfile::default()).unwrap();

        let err = surface.wire_session(&mut host).unwrap_err();
        assert!(matches!(err, SurfaceError::MixerNotWired));
    }

    #[test]
    fn test_passes_cannot_rebind() {
        let mut host = NoopHost::default();
        let mut surface = Surface::connect(&mut host, ControllerProfile::default()).unwrap();

        assert!(matches!(
            surface.wire_mixer(&mut host),
            Err(SurfaceError::AlreadyWired("mixer"))
        ));
        assert!(matches!(
            surface.wire_session(&mut host),
            Err(SurfaceError::AlreadyWired("session"))
        ));
        assert!(matches!(
            surface.wire_device(&mut host),
            Err(SurfaceError::AlreadyWired("device"))
        ));
        assert!(matches!(
            surface.wire_transport(&mut host),
            Err(SurfaceError::AlreadyWired("transport"))
        ));
    }

    #[test]
    fn test_highlight_gated_by_phase() {
        let mut host = NoopHost::default();
        let mut surface = Surface::begin(&mut host, ControllerProfile::default()).unwrap();
        surface.wire_mixer(&mut host).unwrap();

        surface.request_session_highlight(&mut host, bounds());
        assert_eq!(host.highlight_calls, 0);

        surface.wire_session(&mut host).unwrap();
        surface.request_session_highlight(&mut host, bounds());
        assert_eq!(host.highlight_calls, 1);
    }
}
