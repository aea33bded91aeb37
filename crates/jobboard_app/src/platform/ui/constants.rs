pub const TITLE: &str = "Hacker News Job Board";
pub const LOAD_MORE_LABEL: &str = "Load more jobs";

pub const HINT_LOAD_MORE: &str = "[m] Load more jobs";
pub const HINT_SCROLL: &str = "[Up/Down/PgUp/PgDn] Scroll";
pub const HINT_QUIT: &str = "[q] Quit";

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Interval between UI ticks, in milliseconds.
pub const TICK_MS: u64 = 75;
