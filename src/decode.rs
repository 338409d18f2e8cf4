use std::fmt;

use crate::memory::TypeAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction(pub u16);

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction(code)
    }

    // n is starting digit (1 = most significant), m is length
    fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        ((self.0 as u32 >> shift_places) & mask) as u16
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I at (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    Unknown(u16),
}

impl Instruction {
    // anything outside the instruction set comes back as Unknown
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.family() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unknown(ins),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(ins),
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(ins),
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unknown(ins),
            },
            _ => Self::Unknown(ins),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            PopSubroutine => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {addr:#05x}"),
            PushSubroutine(addr) => write!(f, "CALL {addr:#05x}"),
            SkipEqualConstant(x, kk) => write!(f, "SE V{x:X}, {kk:#04x}"),
            SkipNotEqualConstant(x, kk) => write!(f, "SNE V{x:X}, {kk:#04x}"),
            SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            SetRegister(x, kk) => write!(f, "LD V{x:X}, {kk:#04x}"),
            AddToRegister(x, kk) => write!(f, "ADD V{x:X}, {kk:#04x}"),
            CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            RightShift(x, y) => write!(f, "SHR V{x:X}, V{y:X}"),
            SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            LeftShift(x, y) => write!(f, "SHL V{x:X}, V{y:X}"),
            SetIndexRegister(addr) => write!(f, "LD I, {addr:#05x}"),
            JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05x}"),
            Random(x, kk) => write!(f, "RND V{x:X}, {kk:#04x}"),
            Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            GetKey(x) => write!(f, "LD V{x:X}, K"),
            CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            PointChar(x) => write!(f, "LD F, V{x:X}"),
            ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
            Unknown(word) => write!(f, "??? {word:#06x}"),
        }
    }
}
