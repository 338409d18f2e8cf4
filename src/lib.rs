// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Stack of return addresses, 16 deep
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// driven by the host through `Emulator::tick_timers`
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::{Config, Quirks};
pub use decode::{Instruction, RawInstruction};
pub use display::{FrameBuffer, HEIGHT, WIDTH};
pub use emulator::{Emulator, InstructionObserver};
pub use memory::{TypeAddr, MAX_PROGRAM_SIZE, PROGRAM_START};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("stack overflow: call with {depth} return addresses already pushed")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("invalid key index {key:#04x}, keys are 0x0..=0xF")]
    InvalidKey { key: u8 },

    #[error("font at {address:#05x} does not fit below the program area")]
    InvalidFontAddress { address: TypeAddr },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
