//! Declarative control-surface wiring for grid MIDI controllers.
//!
//! `gridlink-core` binds a hardware controller's pads, faders, buttons, and
//! encoders to a DAW-style host's session grid, mixer, transport, and device
//! views. The crate is a thin configuration layer: it reads an immutable
//! [`ControllerProfile`] mapping table, wires each logical control to its
//! (kind, channel, number) triple on host-created component handles, and
//! registers the result through the [`SurfaceHost`] capability object. The
//! host owns MIDI dispatch, session state, and all runtime behavior.

pub use element::{Button, ControlSpec, Fader, MidiKind};
pub use host::{
    ClipSlotHandle, ComponentId, DeviceHandle, DeviceNavHandle, HighlightBounds, MixerHandle,
    SceneHandle, SessionHandle, StripHandle, SurfaceHost, TransportHandle,
};
pub use profile::{
    ChannelMap, ControllerProfile, DeviceMap, GridSize, MixerMap, ProfileError, ProfileFile,
    ProfileManager, SessionMap, TransportMap, DEFAULT_TEMPO_TOP,
};
pub use surface::{Surface, SurfaceError, SurfacePhase, SCENE_TRIGGERED_VALUE};

mod element;
mod host;
mod profile;
mod surface;
