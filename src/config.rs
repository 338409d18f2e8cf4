use crate::memory::{FontBytes, TypeAddr, PROGRAM_START};
use crate::{Chip8Error, Result};

// MODERN is what most programs expect, COSMAC is the 1977 VIP behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    // 8XY6/8XYE: VX = VY shifted, instead of shifting VX in place
    pub shift_uses_vy: bool,
    // FX55/FX65: leave I one past the last register transferred
    pub bulk_transfer_increments_i: bool,
}

impl Quirks {
    pub const MODERN: Quirks = Quirks {
        shift_uses_vy: false,
        bulk_transfer_increments_i: false,
    };

    pub const COSMAC: Quirks = Quirks {
        shift_uses_vy: true,
        bulk_transfer_increments_i: true,
    };
}

impl Default for Quirks {
    fn default() -> Self {
        Self::MODERN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub quirks: Quirks,
    pub font_address: TypeAddr,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let end = self.font_address as usize + std::mem::size_of::<FontBytes>();
        if end > PROGRAM_START as usize {
            return Err(Chip8Error::InvalidFontAddress {
                address: self.font_address,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_modern_with_font_at_zero() {
        let config = Config::default();
        assert_eq!(config.quirks, Quirks::MODERN);
        assert_eq!(config.font_address, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn font_must_fit_below_program() {
        let fits = Config {
            font_address: 0x200 - 80,
            ..Config::default()
        };
        assert!(fits.validate().is_ok());

        let overlaps = Config {
            font_address: 0x1C0,
            ..Config::default()
        };
        assert_eq!(
            overlaps.validate(),
            Err(Chip8Error::InvalidFontAddress { address: 0x1C0 })
        );
    }
}
