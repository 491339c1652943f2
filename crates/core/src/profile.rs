//! Controller profile: the static mapping table for one hardware surface.
//!
//! A profile is the sole customization point of the crate. It enumerates the
//! grid dimensions and one MIDI (kind, channel, number) triple per logical
//! control. Changing the hardware mapping means editing the profile, never
//! the wiring logic. Profiles are immutable once handed to the configurator.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::ControlSpec;

/// Default upper bound for the mapped tempo fader, in BPM.
pub const DEFAULT_TEMPO_TOP: f64 = 188.0;

/// Session grid dimensions: columns are tracks, rows are scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

/// The four MIDI channels the controller transmits on.
///
/// Grouping follows the hardware's factory layout: grid and faders on the
/// mixer channel, track buttons on the instrument channel, global controls
/// on the user channel, device controls on the fx channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMap {
    pub mixer: u8,
    pub instrument: u8,
    pub user: u8,
    pub fx: u8,
}

/// Note and controller numbers for the session grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMap {
    /// Launch note per (row, column) cell; `height` rows of `width` entries.
    pub launch: Vec<Vec<u8>>,
    /// Scene launch note per row.
    pub scene_launch: Vec<u8>,
    /// Track stop note per column.
    pub track_stop: Vec<u8>,
    pub bank_up: u8,
    pub bank_down: u8,
    pub bank_left: u8,
    pub bank_right: u8,
}

/// Controller numbers for the mixer strips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerMap {
    pub volume: Vec<u8>,
    pub pan: Vec<u8>,
    pub arm: Vec<u8>,
    pub solo: Vec<u8>,
    pub mute: Vec<u8>,
    pub select: Vec<u8>,
    /// Exactly four send controls per strip.
    pub sends: Vec<[u8; 4]>,
    pub master_volume: u8,
    pub prehear: u8,
}

/// Controller numbers for the transport section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMap {
    pub stop: u8,
    pub play: u8,
    pub record: u8,
    pub overdub: u8,
    pub seek_back: u8,
    pub seek_forward: u8,
    pub tempo: u8,
    pub metronome: u8,
    pub tap_tempo: u8,
    /// Upper bound of the mapped tempo range in BPM.
    pub tempo_top: f64,
}

/// Controller numbers for the device section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMap {
    /// The selected device's first eight macro parameters.
    pub macros: [u8; 8],
    pub on_off: u8,
    pub lock: u8,
    pub bank_prev: u8,
    pub bank_next: u8,
    pub nav_prev: u8,
    pub nav_next: u8,
}

/// Complete mapping table for one hardware controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerProfile {
    pub name: String,
    /// MIDI port name fragment to suggest for input, empty if none.
    pub suggested_input_port: String,
    /// MIDI port name fragment to suggest for output, empty if none.
    pub suggested_output_port: String,
    pub grid: GridSize,
    pub channels: ChannelMap,
    pub session: SessionMap,
    pub mixer: MixerMap,
    pub transport: TransportMap,
    pub device: DeviceMap,
}

impl Default for ControllerProfile {
    /// Built-in mapping for a generic 8x5 grid controller.
    fn default() -> Self {
        let width = 8usize;
        let height = 5usize;

        Self {
            name: "Generic Grid 8x5".to_string(),
            suggested_input_port: String::new(),
            suggested_output_port: String::new(),
            grid: GridSize { width, height },
            channels: ChannelMap {
                mixer: 0,
                instrument: 1,
                user: 2,
                fx: 3,
            },
            session: SessionMap {
                launch: (0..height)
                    .map(|row| (0..width).map(|col| (row * width + col) as u8).collect())
                    .collect(),
                scene_launch: (0..height).map(|row| (40 + row) as u8).collect(),
                track_stop: (0..width).map(|col| (48 + col) as u8).collect(),
                bank_up: 104,
                bank_down: 105,
                bank_left: 106,
                bank_right: 107,
            },
            mixer: MixerMap {
                volume: (0..width).map(|i| (20 + i) as u8).collect(),
                pan: (0..width).map(|i| (28 + i) as u8).collect(),
                arm: (0..width).map(|i| (8 + i) as u8).collect(),
                solo: (0..width).map(|i| (16 + i) as u8).collect(),
                mute: (0..width).map(|i| (24 + i) as u8).collect(),
                select: (0..width).map(|i| (32 + i) as u8).collect(),
                sends: (0..width)
                    .map(|i| {
                        let base = (40 + i * 4) as u8;
                        [base, base + 1, base + 2, base + 3]
                    })
                    .collect(),
                master_volume: 14,
                prehear: 15,
            },
            transport: TransportMap {
                stop: 114,
                play: 115,
                record: 116,
                overdub: 117,
                seek_back: 118,
                seek_forward: 119,
                tempo: 16,
                metronome: 17,
                tap_tempo: 18,
                tempo_top: DEFAULT_TEMPO_TOP,
            },
            device: DeviceMap {
                macros: [71, 72, 73, 74, 75, 76, 77, 78],
                on_off: 102,
                lock: 103,
                bank_prev: 104,
                bank_next: 105,
                nav_prev: 106,
                nav_next: 107,
            },
        }
    }
}

impl ControllerProfile {
    /// Enumerate every active binding as a (role, spec) pair.
    ///
    /// Iterates the declared tables rather than the grid dimensions so a
    /// malformed profile can still be listed and diagnosed.
    pub fn bindings(&self) -> Vec<(String, ControlSpec)> {
        let ch = self.channels;
        let mut out = Vec::new();

        // Session grid
        for (row, notes) in self.session.launch.iter().enumerate() {
            for (col, &note) in notes.iter().enumerate() {
                out.push((
                    format!("clip launch ({}, {})", row, col),
                    ControlSpec::note(ch.mixer, note),
                ));
            }
        }
        for (row, &note) in self.session.scene_launch.iter().enumerate() {
            out.push((
                format!("scene launch {}", row),
                ControlSpec::note(ch.mixer, note),
            ));
        }
        for (col, &note) in self.session.track_stop.iter().enumerate() {
            out.push((
                format!("track stop {}", col),
                ControlSpec::note(ch.mixer, note),
            ));
        }
        out.push((
            "bank up".to_string(),
            ControlSpec::control(ch.mixer, self.session.bank_up),
        ));
        out.push((
            "bank down".to_string(),
            ControlSpec::control(ch.mixer, self.session.bank_down),
        ));
        out.push((
            "bank left".to_string(),
            ControlSpec::control(ch.mixer, self.session.bank_left),
        ));
        out.push((
            "bank right".to_string(),
            ControlSpec::control(ch.mixer, self.session.bank_right),
        ));

        // Mixer strips
        for (i, &n) in self.mixer.volume.iter().enumerate() {
            out.push((format!("volume {}", i), ControlSpec::control(ch.mixer, n)));
        }
        for (i, &n) in self.mixer.pan.iter().enumerate() {
            out.push((format!("pan {}", i), ControlSpec::control(ch.mixer, n)));
        }
        for (i, &n) in self.mixer.arm.iter().enumerate() {
            out.push((format!("arm {}", i), ControlSpec::control(ch.instrument, n)));
        }
        for (i, &n) in self.mixer.solo.iter().enumerate() {
            out.push((format!("solo {}", i), ControlSpec::control(ch.instrument, n)));
        }
        for (i, &n) in self.mixer.mute.iter().enumerate() {
            out.push((format!("mute {}", i), ControlSpec::control(ch.instrument, n)));
        }
        for (i, &n) in self.mixer.select.iter().enumerate() {
            out.push((
                format!("select {}", i),
                ControlSpec::control(ch.instrument, n),
            ));
        }
        for (i, sends) in self.mixer.sends.iter().enumerate() {
            for (j, &n) in sends.iter().enumerate() {
                out.push((
                    format!("send {} strip {}", j, i),
                    ControlSpec::control(ch.mixer, n),
                ));
            }
        }
        out.push((
            "master volume".to_string(),
            ControlSpec::control(ch.user, self.mixer.master_volume),
        ));
        out.push((
            "prehear volume".to_string(),
            ControlSpec::control(ch.user, self.mixer.prehear),
        ));

        // Transport
        let t = &self.transport;
        for (role, n) in [
            ("transport stop", t.stop),
            ("transport play", t.play),
            ("transport record", t.record),
            ("transport overdub", t.overdub),
            ("seek back", t.seek_back),
            ("seek forward", t.seek_forward),
        ] {
            out.push((role.to_string(), ControlSpec::control(ch.mixer, n)));
        }
        for (role, n) in [
            ("tempo", t.tempo),
            ("metronome", t.metronome),
            ("tap tempo", t.tap_tempo),
        ] {
            out.push((role.to_string(), ControlSpec::control(ch.user, n)));
        }

        // Device
        for (i, &n) in self.device.macros.iter().enumerate() {
            out.push((format!("macro {}", i), ControlSpec::control(ch.fx, n)));
        }
        for (role, n) in [
            ("device on/off", self.device.on_off),
            ("device lock", self.device.lock),
            ("device bank prev", self.device.bank_prev),
            ("device bank next", self.device.bank_next),
            ("device nav prev", self.device.nav_prev),
            ("device nav next", self.device.nav_next),
        ] {
            out.push((role.to_string(), ControlSpec::control(ch.fx, n)));
        }

        out
    }

    /// Validate the profile against the grid dimensions.
    ///
    /// Returns every violation found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let GridSize { width, height } = self.grid;

        if width == 0 || height == 0 {
            errors.push(format!("grid must be at least 1x1, got {}x{}", width, height));
        }

        for (name, channel) in [
            ("mixer", self.channels.mixer),
            ("instrument", self.channels.instrument),
            ("user", self.channels.user),
            ("fx", self.channels.fx),
        ] {
            if channel > 15 {
                errors.push(format!("{} channel must be 0-15, got {}", name, channel));
            }
        }

        if self.session.launch.len() != height {
            errors.push(format!(
                "launch table has {} rows, grid height is {}",
                self.session.launch.len(),
                height
            ));
        }
        for (row, notes) in self.session.launch.iter().enumerate() {
            if notes.len() != width {
                errors.push(format!(
                    "launch row {} has {} entries, grid width is {}",
                    row,
                    notes.len(),
                    width
                ));
            }
        }
        if self.session.scene_launch.len() != height {
            errors.push(format!(
                "scene launch table has {} entries, grid height is {}",
                self.session.scene_launch.len(),
                height
            ));
        }
        if self.session.track_stop.len() != width {
            errors.push(format!(
                "track stop table has {} entries, grid width is {}",
                self.session.track_stop.len(),
                width
            ));
        }

        for (name, len) in [
            ("volume", self.mixer.volume.len()),
            ("pan", self.mixer.pan.len()),
            ("arm", self.mixer.arm.len()),
            ("solo", self.mixer.solo.len()),
            ("mute", self.mixer.mute.len()),
            ("select", self.mixer.select.len()),
            ("sends", self.mixer.sends.len()),
        ] {
            if len != width {
                errors.push(format!(
                    "mixer {} table has {} entries, grid width is {}",
                    name, len, width
                ));
            }
        }

        let mut seen: HashMap<ControlSpec, String> = HashMap::new();
        for (role, spec) in self.bindings() {
            if spec.number > 127 {
                errors.push(format!(
                    "{} number must be 0-127, got {}",
                    role, spec.number
                ));
            }
            if let Some(other) = seen.insert(spec, role.clone()) {
                errors.push(format!(
                    "duplicate binding {} for '{}' and '{}'",
                    spec, other, role
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Persisted profile file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFile {
    pub version: String,
    pub profile: ControllerProfile,
    pub created_at: String,
    pub modified_at: String,
}

/// Profile persistence errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Read(std::io::Error),
    #[error("failed to write profile file: {0}")]
    Write(std::io::Error),
    #[error("failed to parse profile file: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize profile: {0}")]
    Serialize(serde_json::Error),
}

/// Loads and saves controller profiles as JSON.
///
/// Missing files are replaced with the built-in default mapping so a fresh
/// install always starts from a working layout.
pub struct ProfileManager {
    profile_path: PathBuf,
    profile: ControllerProfile,
}

impl ProfileManager {
    /// Create a manager for the given path, or the default location.
    pub fn new(profile_path: Option<PathBuf>) -> Self {
        Self {
            profile_path: profile_path.unwrap_or_else(Self::default_path),
            profile: ControllerProfile::default(),
        }
    }

    /// Default profile location under the user configuration directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("gridlink").join("profile.json"))
            .unwrap_or_else(|| PathBuf::from("profile.json"))
    }

    /// Load the profile from disk.
    ///
    /// Writes and returns the default profile if the file does not exist.
    pub fn load(&mut self) -> Result<ControllerProfile, ProfileError> {
        if !self.profile_path.exists() {
            self.save()?;
            return Ok(self.profile.clone());
        }

        let content = fs::read_to_string(&self.profile_path).map_err(ProfileError::Read)?;
        let file: ProfileFile = serde_json::from_str(&content).map_err(ProfileError::Parse)?;

        if file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "profile file version {} does not match crate version {}",
                file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        self.profile = file.profile;
        Ok(self.profile.clone())
    }

    /// Save the current profile to disk.
    pub fn save(&self) -> Result<(), ProfileError> {
        if let Some(parent) = self.profile_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(ProfileError::Write)?;
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let file = ProfileFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            profile: self.profile.clone(),
            created_at: now.clone(),
            modified_at: now,
        };

        let content = serde_json::to_string_pretty(&file).map_err(ProfileError::Serialize)?;
        fs::write(&self.profile_path, content).map_err(ProfileError::Write)?;

        Ok(())
    }

    /// Replace the managed profile and save it.
    pub fn update_profile(&mut self, profile: ControllerProfile) -> Result<(), ProfileError> {
        self.profile = profile;
        self.save()
    }

    pub fn profile(&self) -> &ControllerProfile {
        &self.profile
    }

    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }
}
