// how often the host should call tick_timers
pub const TIMER_DEC_PER_SECOND: u64 = 60;

#[derive(Debug, Default, Clone, Copy)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    // one 60Hz tap, floored at zero
    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}
