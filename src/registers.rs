use crate::memory::{mask_addr, TypeAddr, PROGRAM_START};

pub const FLAG: u8 = 0xF;

pub struct Registers {
    registers: [u8; 16],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; 16],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
        }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_register(FLAG, on as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn values(&self) -> &[u8; 16] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = mask_addr(self.0.wrapping_add(2));
    }

    pub fn decrement(&mut self) {
        self.0 = mask_addr(self.0.wrapping_sub(2));
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = mask_addr(addr);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = mask_addr(addr);
    }

    // returns whether the unmasked sum went past 0xFFF
    pub fn add(&mut self, value: u16) -> bool {
        let sum = self.0 as u32 + value as u32;
        self.0 = mask_addr(sum as u16);
        sum > 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_add_wraps() {
        let mut regs = Registers::new();
        regs.set_register(3, 0xFF);
        regs.add_to_register(3, 2);
        assert_eq!(regs.get(3), 1);
        assert_eq!(regs.get(FLAG), 0);
    }

    #[test]
    fn pc_wraps_at_end_of_memory() {
        let mut pc = ProgramCounter(0xFFE);
        pc.increment();
        assert_eq!(pc.0, 0x000);
        pc.decrement();
        assert_eq!(pc.0, 0xFFE);
    }

    #[test]
    fn index_is_masked_and_reports_overflow() {
        let mut index = IndexRegister(0);
        index.set_addr(0xF123);
        assert_eq!(index.0, 0x123);

        let mut index = IndexRegister(0xFFE);
        assert!(!index.add(1));
        assert_eq!(index.0, 0xFFF);
        assert!(index.add(2));
        assert_eq!(index.0, 0x001);
    }
}
