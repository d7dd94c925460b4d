use chrono::{Local, NaiveDate};

/// `M/D/YYYY`, no zero padding
pub const GAME_DATE_FORMAT: &str = "%-m/%-d/%Y";

pub fn format_game_date(date: NaiveDate) -> String {
    date.format(GAME_DATE_FORMAT).to_string()
}

/// Source of "today" for the one-game-per-day rule
pub trait GameClock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn today_string(&self) -> String {
        format_game_date(self.today())
    }
}

/// Calendar day in the server's local timezone, so every player shares one day
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl GameClock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned day, used by tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl GameClock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
