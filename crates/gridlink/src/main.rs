//! Profile tooling for grid MIDI control surfaces.
//!
//! The CLI never opens a MIDI connection and never parses MIDI; it only
//! inspects profile files and enumerates the ports the host would use.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gridlink_core::{ControllerProfile, ProfileManager};
use midir::{MidiInput, MidiOutput};

/// Control-surface profile tooling.
#[derive(Parser, Debug)]
#[command(name = "gridlink")]
#[command(about = "Profile tooling for grid MIDI control surfaces")]
struct Args {
    /// Path to the profile file (defaults to the user config directory)
    #[arg(long)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the built-in default profile to disk
    Init {
        /// Overwrite an existing profile file
        #[arg(long)]
        force: bool,
    },
    /// Check a profile for binding conflicts and table mismatches
    Validate,
    /// Print the resolved wiring table
    Show,
    /// List MIDI ports and flag the profile's suggested ports
    Ports,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut manager = ProfileManager::new(args.profile);

    match args.command {
        Command::Init { force } => init(&manager, force),
        Command::Validate => validate(&mut manager),
        Command::Show => show(&mut manager),
        Command::Ports => ports(&mut manager),
    }
}

fn init(manager: &ProfileManager, force: bool) -> Result<(), anyhow::Error> {
    if manager.profile_path().exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            manager.profile_path().display()
        );
    }
    manager.save().context("failed to write default profile")?;
    println!("Wrote default profile to {}", manager.profile_path().display());
    Ok(())
}

fn validate(manager: &mut ProfileManager) -> Result<(), anyhow::Error> {
    if !manager.profile_path().exists() {
        bail!(
            "no profile file at {} (run `gridlink init` first)",
            manager.profile_path().display()
        );
    }

    let profile = manager.load().context("failed to load profile")?;
    match profile.validate() {
        Ok(()) => {
            println!(
                "{}: {} bindings, no conflicts",
                profile.name,
                profile.bindings().len()
            );
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("  {}", error);
            }
            bail!(
                "{} problem(s) found in {}",
                errors.len(),
                manager.profile_path().display()
            );
        }
    }
}

fn show(manager: &mut ProfileManager) -> Result<(), anyhow::Error> {
    let profile = load_or_default(manager)?;

    println!(
        "{} ({}x{} grid, tempo top {})",
        profile.name, profile.grid.width, profile.grid.height, profile.transport.tempo_top
    );
    for (role, spec) in profile.bindings() {
        println!("  {:<24} {}", role, spec);
    }
    Ok(())
}

fn ports(manager: &mut ProfileManager) -> Result<(), anyhow::Error> {
    let profile = load_or_default(manager)?;

    let midi_in = MidiInput::new("gridlink")?;
    println!("Input ports:");
    list_ports(
        midi_in.ports().iter().map(|port| midi_in.port_name(port)),
        &profile.suggested_input_port,
    );

    let midi_out = MidiOutput::new("gridlink")?;
    println!("Output ports:");
    list_ports(
        midi_out.ports().iter().map(|port| midi_out.port_name(port)),
        &profile.suggested_output_port,
    );
    Ok(())
}

fn list_ports<E>(names: impl Iterator<Item = Result<String, E>>, suggested: &str) {
    let mut any = false;
    for name in names {
        let name = name.unwrap_or_else(|_| "<unknown>".to_string());
        let marker = if !suggested.is_empty() && name.contains(suggested) {
            "  <- suggested"
        } else {
            ""
        };
        println!("  {}{}", name, marker);
        any = true;
    }
    if !any {
        println!("  (none)");
    }
}

fn load_or_default(manager: &mut ProfileManager) -> Result<ControllerProfile, anyhow::Error> {
    if manager.profile_path().exists() {
        manager.load().context("failed to load profile")
    } else {
        Ok(ControllerProfile::default())
    }
}
