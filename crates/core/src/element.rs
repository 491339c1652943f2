//! Control element types.
//!
//! An element describes one physical control on the hardware surface: which
//! MIDI message it transmits and whether it is momentary. Elements carry no
//! runtime behavior; the host's dispatch loop owns all input handling and
//! feedback emission.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI message kind a control transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidiKind {
    /// Note on/off messages (pads, launch buttons).
    Note,
    /// Continuous controller messages (faders, encoders, most buttons).
    Control,
}

impl fmt::Display for MidiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiKind::Note => write!(f, "note"),
            MidiKind::Control => write!(f, "cc"),
        }
    }
}

/// One immutable (kind, channel, number) binding triple.
///
/// Channels are 0-15, numbers 0-127. No two controls intended for distinct
/// simultaneous functions may share a triple within an active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlSpec {
    pub kind: MidiKind,
    pub channel: u8,
    pub number: u8,
}

impl ControlSpec {
    pub const fn note(channel: u8, number: u8) -> Self {
        Self {
            kind: MidiKind::Note,
            channel,
            number,
        }
    }

    pub const fn control(channel: u8, number: u8) -> Self {
        Self {
            kind: MidiKind::Control,
            channel,
            number,
        }
    }
}

impl fmt::Display for ControlSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ch.{} #{}", self.kind, self.channel, self.number)
    }
}

/// A pad or button on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub spec: ControlSpec,
    /// Momentary buttons report press and release; toggles report press only.
    pub momentary: bool,
}

impl Button {
    pub const fn momentary(spec: ControlSpec) -> Self {
        Self {
            spec,
            momentary: true,
        }
    }

    pub const fn toggle(spec: ControlSpec) -> Self {
        Self {
            spec,
            momentary: false,
        }
    }
}

/// A fader or encoder transmitting continuous controller values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fader {
    pub spec: ControlSpec,
}

impl Fader {
    pub const fn new(channel: u8, number: u8) -> Self {
        Self {
            spec: ControlSpec::control(channel, number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_display() {
        assert_eq!(ControlSpec::note(0, 53).to_string(), "note ch.0 #53");
        assert_eq!(ControlSpec::control(2, 14).to_string(), "cc ch.2 #14");
    }

    #[test]
    fn test_button_momentary_flag() {
        let spec = ControlSpec::note(0, 36);
        assert!(Button::momentary(spec).momentary);
        assert!(!Button::toggle(spec).momentary);
    }

    #[test]
    fn test_fader_is_control_kind() {
        let fader = Fader::new(3, 71);
        assert_eq!(fader.spec.kind, MidiKind::Control);
        assert_eq!(fader.spec.channel, 3);
        assert_eq!(fader.spec.number, 71);
    }
}
