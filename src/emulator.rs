use crate::{
    config::Config,
    decode::Instruction,
    display::FrameBuffer,
    keyboard::Keyboard,
    memory::{Memory, Stack, TypeAddr, DEFAULT_FONT, GLYPH_SIZE},
    registers::{Registers, FLAG},
    timer::Timer,
    Result,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

// sees every fetched instruction before it executes
pub trait InstructionObserver {
    fn observe(&mut self, address: TypeAddr, instruction: &Instruction);
}

impl<F> InstructionObserver for F
where
    F: FnMut(TypeAddr, &Instruction),
{
    fn observe(&mut self, address: TypeAddr, instruction: &Instruction) {
        self(address, instruction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    // FX0A executed, pc still on it; the key goes into this register
    WaitingForKey(u8),
}

pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    stack: Stack,
    keyboard: Keyboard,
    delay_timer: Timer,
    sound_timer: Timer,
    config: Config,
    state: RunState,
    rng: StdRng,
    observer: Option<Box<dyn InstructionObserver + Send>>,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::build(Config::default(), StdRng::from_entropy())
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, StdRng::from_entropy()))
    }

    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, StdRng::seed_from_u64(seed)))
    }

    fn build(config: Config, rng: StdRng) -> Self {
        let mut emu = Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            keyboard: Keyboard::default(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            config,
            state: RunState::Running,
            rng,
            observer: None,
        };
        emu.reset();
        emu
    }

    pub fn reset(&mut self) {
        self.mem.clear();
        self.mem.load_font(self.config.font_address, &DEFAULT_FONT);
        self.regs = Registers::new();
        self.stack.clear();
        self.keyboard.reset();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.fb.clear_buffer();
        self.state = RunState::Running;
        log::debug!("reset, font at {:#05x}", self.config.font_address);
    }

    pub fn load_program(&mut self, bytes: &[u8]) -> Result<()> {
        self.mem.load_program(bytes)?;
        log::debug!("loaded {} byte program", bytes.len());
        Ok(())
    }

    // a stack error leaves pc on the faulting instruction
    pub fn run_one_cycle(&mut self) -> Result<()> {
        if let RunState::WaitingForKey(vx) = self.state {
            self.poll_key(vx);
            return Ok(());
        }

        let addr = self.regs.pc.0;
        let operation = self.fetch_decode();
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(addr, &operation);
        }
        if let Err(err) = self.execute_ins(operation) {
            self.regs.pc.set_addr(addr);
            return Err(err);
        }
        Ok(())
    }

    pub fn fetch_decode(&mut self) -> Instruction {
        let ins = self.mem.word(self.regs.pc.0);
        self.regs.pc.increment();
        Instruction::decode_raw(ins)
    }

    // pc is already past `ins` here
    pub fn execute_ins(&mut self, ins: Instruction) -> Result<()> {
        match ins {
            Instruction::ClearScreen => self.fb.clear_buffer(),
            Instruction::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.regs.pc.set_addr(addr);
            }
            Instruction::Jump(addr) => self.regs.pc.set_addr(addr),
            Instruction::PushSubroutine(addr) => {
                // pc already points at the instruction to come back to
                self.stack.push(self.regs.pc.0)?;
                self.regs.pc.set_addr(addr);
            }
            Instruction::SkipEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) == nn),
            Instruction::SkipNotEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) != nn),
            Instruction::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            Instruction::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            Instruction::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),
            Instruction::CopyRegister(vx, vy) => self.regs.set_register(vx, self.regs.get(vy)),
            Instruction::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            Instruction::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            Instruction::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            Instruction::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_flag(carry);
                self.regs.set_register(vx, sum);
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(x >= y); // no borrow
                self.regs.set_register(vx, x.wrapping_sub(y));
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(y >= x); // no borrow
                self.regs.set_register(vx, y.wrapping_sub(x));
            }
            Instruction::RightShift(vx, vy) => {
                let value = self.shift_source(vx, vy);
                // flag first, so 8FY6 leaves the result in VF
                self.regs.set_register(FLAG, value & 1);
                self.regs.set_register(vx, value >> 1);
            }
            Instruction::LeftShift(vx, vy) => {
                let value = self.shift_source(vx, vy);
                self.regs.set_register(FLAG, (value >> 7) & 1);
                self.regs.set_register(vx, value << 1);
            }
            Instruction::SetIndexRegister(addr) => self.regs.index.set_addr(addr),
            Instruction::JumpWithOffset(addr) => {
                self.regs.pc.set_addr(addr + self.regs.get(0) as u16);
            }
            Instruction::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            Instruction::Display(reg_x, reg_y, height) => self.draw(reg_x, reg_y, height),
            Instruction::SkipIfPressed(vx) => {
                self.skip_if(self.keyboard.is_pressed(self.regs.get(vx)))
            }
            Instruction::SkipIfNotPressed(vx) => {
                self.skip_if(!self.keyboard.is_pressed(self.regs.get(vx)))
            }
            Instruction::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.count)
            }
            Instruction::GetKey(vx) => {
                // park pc back on FX0A until a key shows up
                self.regs.pc.decrement();
                self.state = RunState::WaitingForKey(vx);
                log::debug!("waiting for key into V{vx:X}");
                self.poll_key(vx);
            }
            Instruction::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            Instruction::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            Instruction::AddToIndex(vx) => {
                let overflow = self.regs.index.add(self.regs.get(vx) as u16);
                self.regs.set_flag(overflow);
            }
            Instruction::PointChar(vx) => {
                let glyph = self.regs.get(vx) as u16 * GLYPH_SIZE as u16;
                self.regs
                    .index
                    .set_addr(self.config.font_address.wrapping_add(glyph));
            }
            Instruction::ToDecimal(vx) => self.store_bcd(vx),
            Instruction::StoreRegisterToMemory(vx) => {
                let base = self.regs.index.0;
                for reg in 0..=vx {
                    self.mem.set(base.wrapping_add(reg as u16), self.regs.get(reg));
                }
                self.advance_index_after_transfer(vx);
            }
            Instruction::LoadRegisterFromMemory(vx) => {
                let base = self.regs.index.0;
                for reg in 0..=vx {
                    let reg_val = self.mem.get(base.wrapping_add(reg as u16));
                    self.regs.set_register(reg, reg_val);
                }
                self.advance_index_after_transfer(vx);
            }
            Instruction::Unknown(word) => {
                log::warn!(
                    "unknown opcode {word:#06x} at {:#05x}, skipping",
                    self.regs.pc.0.wrapping_sub(2) & 0x0FFF
                );
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.regs.pc.increment();
        }
    }

    fn shift_source(&self, vx: u8, vy: u8) -> u8 {
        if self.config.quirks.shift_uses_vy {
            self.regs.get(vy)
        } else {
            self.regs.get(vx)
        }
    }

    fn advance_index_after_transfer(&mut self, vx: u8) {
        if self.config.quirks.bulk_transfer_increments_i {
            self.regs.index.add(vx as u16 + 1);
        }
    }

    fn draw(&mut self, reg_x: u8, reg_y: u8, height: u8) {
        let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
        let base = self.regs.index.0;
        let sprite: Vec<u8> = (0..height as u16)
            .map(|row| self.mem.get(base.wrapping_add(row)))
            .collect();
        let collision = self.fb.paint(x, y, &sprite);
        self.regs.set_flag(collision);
    }

    fn store_bcd(&mut self, vx: u8) {
        let value = self.regs.get(vx);
        let base = self.regs.index.0;
        let digits = [value / 100, (value / 10) % 10, value % 10];
        for (i, digit) in digits.into_iter().enumerate() {
            self.mem.set(base.wrapping_add(i as u16), digit);
        }
    }

    fn poll_key(&mut self, vx: u8) {
        if let Some(key) = self.keyboard.first_pressed() {
            self.regs.set_register(vx, key);
            self.regs.pc.increment();
            self.state = RunState::Running;
            log::debug!("key {key:X} resolved wait into V{vx:X}");
        }
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    pub fn set_key_state(&mut self, key: u8, pressed: bool) -> Result<()> {
        self.keyboard.set_key(key, pressed)
    }

    pub fn set_observer(&mut self, observer: impl InstructionObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn consume_dirty_flag(&mut self) -> bool {
        self.fb.consume_dirty()
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.state, RunState::WaitingForKey(_))
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn pc(&self) -> TypeAddr {
        self.regs.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.regs.index.0
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
