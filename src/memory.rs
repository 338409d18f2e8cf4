use crate::{Chip8Error, Result};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_DEPTH: usize = 16;

pub const GLYPH_SIZE: usize = 5;
pub type FontBytes = [u8; GLYPH_SIZE * 16];

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub fn mask_addr(addr: u16) -> TypeAddr {
    addr & ADDR_MASK
}

pub struct Memory {
    // 4k bytes
    // font data at the configured base (000 -> 04F by default), program from 200
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: [0; MEMORY_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[mask_addr(addr) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[mask_addr(addr) as usize]
    }

    // big-endian; the second byte wraps past 0xFFF
    pub fn word(&self, addr: TypeAddr) -> u16 {
        let (l, r) = (self.get(addr), self.get(addr.wrapping_add(1)));
        ((l as u16) << 8) | r as u16
    }

    pub fn load_font(&mut self, base: TypeAddr, font: &FontBytes) {
        let start = mask_addr(base) as usize;
        self.bytes[start..start + font.len()].copy_from_slice(font);
    }

    // loads program instructions starting at address 0x200
    pub fn load_program(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: bytes.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

// return addresses pushed by CALL
#[derive(Debug, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.addresses.len() >= STACK_DEPTH {
            return Err(Chip8Error::StackOverflow {
                depth: self.addresses.len(),
            });
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        self.addresses.pop().ok_or(Chip8Error::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_wrap_to_12_bits() {
        let mut mem = Memory::new();
        mem.set(0x1234, 0xAB);
        assert_eq!(mem.get(0x0234), 0xAB);
        assert_eq!(mem.get(0xF234), 0xAB);
    }

    #[test]
    fn word_is_big_endian_and_wraps() {
        let mut mem = Memory::new();
        mem.set(0x200, 0x6A);
        mem.set(0x201, 0x02);
        assert_eq!(mem.word(0x200), 0x6A02);

        mem.set(0xFFF, 0x12);
        mem.set(0x000, 0x34);
        assert_eq!(mem.word(0xFFF), 0x1234);
    }

    #[test]
    fn program_loads_at_0x200() {
        let mut mem = Memory::new();
        mem.load_program(&[0xDE, 0xAD]).unwrap();
        assert_eq!(mem.get(0x1FF), 0);
        assert_eq!(mem.get(0x200), 0xDE);
        assert_eq!(mem.get(0x201), 0xAD);
    }

    #[test]
    fn largest_program_fills_memory() {
        let mut mem = Memory::new();
        let rom = vec![0x11; MAX_PROGRAM_SIZE];
        mem.load_program(&rom).unwrap();
        assert_eq!(mem.get(0xFFF), 0x11);
    }

    #[test]
    fn oversized_program_is_rejected_untouched() {
        let mut mem = Memory::new();
        let rom = vec![0x11; MAX_PROGRAM_SIZE + 1];
        assert_eq!(
            mem.load_program(&rom),
            Err(Chip8Error::ProgramTooLarge {
                size: MAX_PROGRAM_SIZE + 1,
                max_size: MAX_PROGRAM_SIZE,
            })
        );
        assert_eq!(mem.get(0x200), 0);
    }

    #[test]
    fn font_lands_at_base() {
        let mut mem = Memory::new();
        mem.load_font(0x50, &DEFAULT_FONT);
        assert_eq!(mem.get(0x50), 0xF0);
        assert_eq!(mem.get(0x50 + 5), 0x20);
        assert_eq!(mem.get(0x9F), 0x80);
    }

    #[test]
    fn stack_is_bounded() {
        let mut stack = Stack::new();
        for i in 0..STACK_DEPTH {
            stack.push(0x200 + i as u16 * 2).unwrap();
        }
        assert_eq!(
            stack.push(0x300),
            Err(Chip8Error::StackOverflow { depth: STACK_DEPTH })
        );
        assert_eq!(stack.depth(), STACK_DEPTH);
        assert_eq!(stack.pop(), Ok(0x200 + 15 * 2));
    }

    #[test]
    fn empty_stack_underflows() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(Chip8Error::StackUnderflow));
    }
}
