use crate::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

// only the host writes keys, instructions just read them
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey { key })?;
        *slot = pressed;
        Ok(())
    }

    // anything past 0xF is a key that doesn't exist, so never down
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}
