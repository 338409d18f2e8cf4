// Separately:
// CPU: 700 times per second by default
// Display: 60 times per second
// Timer: 60 times per second

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chip8vm::{timer::TIMER_DEC_PER_SECOND, Config, Emulator, Quirks};
use clap::Parser;

mod host;

use host::{sound::Sound, window::Screen};

/// Run a CHIP-8 program in a window.
#[derive(Parser, Debug)]
#[command(name = "chip8vm", version)]
struct Args {
    /// Program image, loaded at 0x200
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 700)]
    cpu_hz: u32,

    /// Window scale factor (1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = 16)]
    scale: u8,

    /// Original COSMAC VIP shift and FX55/FX65 behaviour
    #[arg(long)]
    cosmac: bool,

    /// 8XY6/8XYE shift VY into VX
    #[arg(long)]
    legacy_shift: bool,

    /// FX55/FX65 advance I past the registers transferred
    #[arg(long)]
    bulk_increments_i: bool,

    /// Seed for CXNN, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Don't open an audio stream
    #[arg(long)]
    mute: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut quirks = if self.cosmac {
            Quirks::COSMAC
        } else {
            Quirks::MODERN
        };
        quirks.shift_uses_vy |= self.legacy_shift;
        quirks.bulk_transfer_increments_i |= self.bulk_increments_i;
        Config {
            quirks,
            ..Config::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom).with_context(|| format!("reading {}", args.rom.display()))?;
    let mut emu = match args.seed {
        Some(seed) => Emulator::with_seed(args.config(), seed)?,
        None => Emulator::with_config(args.config())?,
    };
    emu.load_program(&rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    log::info!("running {} ({} bytes)", args.rom.display(), rom.len());

    let mut screen = Screen::new(args.scale)?;
    let sound = if args.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(err) => {
                log::warn!("audio disabled: {err:#}");
                None
            }
        }
    };

    let cycles_per_frame = (args.cpu_hz / TIMER_DEC_PER_SECOND as u32).max(1);
    while screen.is_running() {
        screen.sync_keys(&mut emu)?;
        for _ in 0..cycles_per_frame {
            if let Err(err) = emu.run_one_cycle() {
                log::error!("halted at {:#05x}: {err}", emu.pc());
                return Err(err.into());
            }
        }
        emu.tick_timers();
        if let Some(sound) = &sound {
            sound.set_active(emu.is_sound_active());
        }
        screen.sync(&mut emu)?;
    }
    Ok(())
}
