//! Host boundary traits.
//!
//! The host owns MIDI dispatch, session state, and all component behavior.
//! This crate only creates handles through [`SurfaceHost`], binds controls
//! onto them, and registers them back; after installation, ownership and
//! lifecycle pass to the host. Raw MIDI never crosses this boundary in
//! either direction.

use crate::element::{Button, Fader};

/// Opaque identifier the host assigns to each created component handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub u64);

/// The visible session window, as reported to highlight callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightBounds {
    pub track_offset: i32,
    pub scene_offset: i32,
    pub width: usize,
    pub height: usize,
    pub include_return_tracks: bool,
}

/// One mixer channel strip.
pub trait StripHandle {
    fn set_volume_control(&mut self, control: Fader);
    fn set_pan_control(&mut self, control: Fader);
    fn set_arm_button(&mut self, button: Button);
    fn set_solo_button(&mut self, button: Button);
    fn set_mute_button(&mut self, button: Button);
    fn set_select_button(&mut self, button: Button);
    fn set_send_controls(&mut self, controls: Vec<Fader>);
}

/// The mixer: one strip per track slot plus a master strip.
pub trait MixerHandle {
    fn id(&self) -> ComponentId;
    fn set_track_offset(&mut self, offset: usize);
    fn strip(&mut self, index: usize) -> &mut dyn StripHandle;
    fn master(&mut self) -> &mut dyn StripHandle;
    fn set_prehear_volume_control(&mut self, control: Fader);
}

/// One clip slot in the session grid.
pub trait ClipSlotHandle {
    fn set_launch_button(&mut self, button: Button);
}

/// One scene row in the session grid.
pub trait SceneHandle {
    fn set_launch_button(&mut self, button: Button);
    /// Feedback value the host emits while a clip in this scene is triggered.
    fn set_triggered_value(&mut self, value: u8);
    fn clip_slot(&mut self, column: usize) -> &mut dyn ClipSlotHandle;
}

/// The session grid component.
pub trait SessionHandle {
    fn id(&self) -> ComponentId;
    fn set_scene_bank_buttons(&mut self, down: Button, up: Button);
    fn set_track_bank_buttons(&mut self, right: Button, left: Button);
    fn scene(&mut self, row: usize) -> &mut dyn SceneHandle;
    fn set_stop_track_clip_buttons(&mut self, buttons: Vec<Button>);
    /// Attach the mixer so clip-launch feedback reflects mixer state.
    fn set_mixer(&mut self, mixer: ComponentId);
}

/// The transport component.
pub trait TransportHandle {
    fn set_tempo_top(&mut self, bpm: f64);
    fn set_stop_button(&mut self, button: Button);
    fn set_play_button(&mut self, button: Button);
    fn set_record_button(&mut self, button: Button);
    fn set_overdub_button(&mut self, button: Button);
    fn set_seek_buttons(&mut self, back: Button, forward: Button);
    fn set_tempo_control(&mut self, control: Fader);
    fn set_metronome_button(&mut self, button: Button);
    fn set_tap_tempo_button(&mut self, button: Button);
}

/// The device-parameter component for the currently selected device.
pub trait DeviceHandle {
    fn id(&self) -> ComponentId;
    fn set_parameter_controls(&mut self, controls: Vec<Fader>);
    fn set_on_off_button(&mut self, button: Button);
    fn set_lock_button(&mut self, button: Button);
    fn set_bank_buttons(&mut self, prev: Button, next: Button);
}

/// Navigation between devices on the selected track.
pub trait DeviceNavHandle {
    fn set_device_nav_buttons(&mut self, prev: Button, next: Button);
}

/// Capability object for one host-managed control surface slot.
///
/// Factories hand out fresh component handles; install methods pass them
/// back for the host to own and drive. All calls are host-serialized: the
/// host never invokes this surface concurrently.
pub trait SurfaceHost {
    fn create_mixer(&mut self, strips: usize) -> Box<dyn MixerHandle>;
    fn create_session(&mut self, width: usize, height: usize) -> Box<dyn SessionHandle>;
    fn create_transport(&mut self) -> Box<dyn TransportHandle>;
    fn create_device(&mut self) -> Box<dyn DeviceHandle>;
    fn create_device_navigator(&mut self) -> Box<dyn DeviceNavHandle>;

    fn install_mixer(&mut self, mixer: Box<dyn MixerHandle>);
    fn install_session(&mut self, session: Box<dyn SessionHandle>);
    fn install_transport(&mut self, transport: Box<dyn TransportHandle>);
    fn install_device(&mut self, device: Box<dyn DeviceHandle>);
    fn install_device_navigator(&mut self, nav: Box<dyn DeviceNavHandle>);

    /// Mark which session component drives the host's view highlight.
    fn set_highlighting_session(&mut self, session: ComponentId);
    /// Change the host's active track selection.
    fn select_track(&mut self, index: usize);
    /// When enabled, the host re-targets the device component at the
    /// selected track's selected device.
    fn set_device_follows_track(&mut self, follows: bool);
    /// Gate MIDI feedback emission toward the controller.
    fn set_midi_feedback(&mut self, enabled: bool);
    /// The host's default view-highlighting behavior.
    fn highlight_session(&mut self, bounds: HighlightBounds);
    /// Release the surface slot; the base teardown behavior.
    fn disconnect(&mut self);
}
