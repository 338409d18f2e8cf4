use std::time::Duration;

use anyhow::{bail, Context, Result};
use chip8vm::{Emulator, HEIGHT, WIDTH};
use minifb::{Key, Scale, Window, WindowOptions};

const LIT: u32 = from_rgb(0, 127, 255);
const DARK: u32 = from_rgb(0, 0, 0);

// 1 2 3 4      1 2 3 C
// Q W E R  ->  4 5 6 D
// A S D F      7 8 9 E
// Z X C V      A 0 B F
const KEYMAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

const fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
}

impl Screen {
    pub fn new(scale: u8) -> Result<Self> {
        let scale = match scale {
            1 => Scale::X1,
            2 => Scale::X2,
            4 => Scale::X4,
            8 => Scale::X8,
            16 => Scale::X16,
            32 => Scale::X32,
            other => bail!("unsupported window scale {other}, use 1, 2, 4, 8, 16 or 32"),
        };
        let mut window = Window::new(
            "chip8vm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .context("opening window")?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(Duration::from_micros(16600)));

        Ok(Self {
            window,
            pixel_buffer: vec![DARK; WIDTH * HEIGHT],
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn sync_keys(&self, emu: &mut Emulator) -> chip8vm::Result<()> {
        for (key, num) in KEYMAP {
            emu.set_key_state(num, self.window.is_key_down(key))?;
        }
        Ok(())
    }

    pub fn sync(&mut self, emu: &mut Emulator) -> Result<()> {
        if emu.consume_dirty_flag() {
            for (px, &on) in self.pixel_buffer.iter_mut().zip(emu.display().pixels()) {
                *px = if on { LIT } else { DARK };
            }
        }
        // also pumps window events, so keys stay fresh even without a redraw
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .context("presenting frame")
    }
}
