//! Year timeline state.

/// Year stepping with a smooth transition between years.
///
/// `target_year` moves in whole steps; `offset` starts at ±1 after a step and
/// decays toward zero, so `current_year()` glides into the new year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTimeline {
    /// Year the timeline is moving toward
    pub target_year: i32,

    /// Distance still to travel, in years
    pub offset: f64,

    pub first_year: i32,
    pub last_year: i32,

    /// Transition speed
    pub years_per_second: f64,
}

impl Default for YearTimeline {
    fn default() -> Self {
        Self::new(1992, 2025, 1.0)
    }
}

impl YearTimeline {
    pub fn new(first_year: i32, last_year: i32, years_per_second: f64) -> Self {
        Self {
            target_year: first_year,
            offset: 0.0,
            first_year,
            last_year,
            years_per_second,
        }
    }

    /// Steps one year back. Returns false at the first year.
    pub fn step_back(&mut self) -> bool {
        if self.target_year > self.first_year {
            self.target_year -= 1;
            self.offset = 1.0;
            true
        } else {
            false
        }
    }

    /// Steps one year forward. Returns false at the last year.
    pub fn step_forward(&mut self) -> bool {
        if self.target_year < self.last_year {
            self.target_year += 1;
            self.offset = -1.0;
            true
        } else {
            false
        }
    }

    /// Advances the transition by `dt` seconds. The offset only ever
    /// shrinks toward zero, whatever the sign of the speed.
    pub fn advance(&mut self, dt: f64) {
        let dy = (self.years_per_second * dt).abs();
        if self.offset > 0.0 {
            self.offset = (self.offset - dy).max(0.0);
        } else if self.offset < 0.0 {
            self.offset = (self.offset + dy).min(0.0);
        }
    }

    /// Whether a transition is still running.
    pub fn is_animating(&self) -> bool {
        self.offset != 0.0
    }

    pub fn current_year(&self) -> f64 {
        self.target_year as f64 + self.offset
    }

    pub fn label(&self) -> String {
        format!("Year: {}", self.target_year)
    }
}
