//! Date string grammar, ISO 32000-1:2008 Section 7.9.4.
//!
//! ```text
//! D:YYYYMMDDHHmmSSOHH'mm'
//! ```
//!
//! Everything after the year is optional, but fields can only be dropped
//! from the right. `O` is `+`, `-` or `Z`; `Z` requires a zero offset.

use chrono::NaiveDate;

use crate::encoding::{decode_utf16be, is_utf16be};

/// Parser state. Each state consumes a fixed-width slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Prefix,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    TzOperator,
    TzHour,
    TzHourMark,
    TzMinute,
    TzMinuteMark,
}

impl State {
    fn next(self) -> Option<State> {
        let next = match self {
            State::Prefix => State::Year,
            State::Year => State::Month,
            State::Month => State::Day,
            State::Day => State::Hour,
            State::Hour => State::Minute,
            State::Minute => State::Second,
            State::Second => State::TzOperator,
            State::TzOperator => State::TzHour,
            State::TzHour => State::TzHourMark,
            State::TzHourMark => State::TzMinute,
            State::TzMinute => State::TzMinuteMark,
            State::TzMinuteMark => return None,
        };
        Some(next)
    }
}

struct DateParser<'a> {
    input: &'a [u8],
    pos: usize,
    year: i32,
    month: u32,
    utc: bool,
}

impl<'a> DateParser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            year: 0,
            month: 0,
            utc: false,
        }
    }

    fn run(mut self) -> bool {
        let mut state = State::Prefix;
        loop {
            if !self.step(state) {
                log::trace!(
                    "date {:?} rejected in {:?} at offset {}",
                    String::from_utf8_lossy(self.input),
                    state,
                    self.pos
                );
                return false;
            }

            if self.pos == self.input.len() {
                return self.may_finish(state);
            }

            state = match state.next() {
                Some(next) => next,
                None => return false,
            };
        }
    }

    /// Whether input may end right after `state` completed.
    fn may_finish(&self, state: State) -> bool {
        match state {
            State::Prefix | State::TzHour => false,
            State::TzOperator => self.utc,
            _ => true,
        }
    }

    fn step(&mut self, state: State) -> bool {
        match state {
            State::Prefix => self.literal(b"D:"),
            State::Year => match self.digits(4) {
                Some(y) => {
                    self.year = y as i32;
                    true
                },
                None => false,
            },
            State::Month => match self.digits(2) {
                Some(m) if (1..=12).contains(&m) => {
                    self.month = m;
                    true
                },
                _ => false,
            },
            State::Day => match self.digits(2) {
                Some(d) => NaiveDate::from_ymd_opt(self.year, self.month, d).is_some(),
                None => false,
            },
            State::Hour => self.bounded(23),
            State::Minute | State::Second => self.bounded(59),
            State::TzOperator => match self.take(1) {
                Some([op @ (b'+' | b'-' | b'Z')]) => {
                    self.utc = *op == b'Z';
                    true
                },
                _ => false,
            },
            State::TzHour => self.offset(23),
            State::TzMinute => self.offset(59),
            State::TzHourMark | State::TzMinuteMark => self.literal(b"'"),
        }
    }

    /// Timezone offset field; must be zero for `Z`.
    fn offset(&mut self, max: u32) -> bool {
        match self.digits(2) {
            Some(v) => v <= max && !(self.utc && v != 0),
            None => false,
        }
    }

    fn bounded(&mut self, max: u32) -> bool {
        matches!(self.digits(2), Some(v) if v <= max)
    }

    fn literal(&mut self, expected: &[u8]) -> bool {
        self.take(expected.len()) == Some(expected)
    }

    fn digits(&mut self, width: usize) -> Option<u32> {
        let run = self.take(width)?;
        if !run.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(run.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.input.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }
}

/// Returns true if `raw` is a well-formed date string.
///
/// UTF-16BE input (with byte order mark) is decoded first; a broken
/// encoding is not a valid date.
///
/// # Example
///
/// ```
/// use pdf_attest::validation::date::is_valid_date;
///
/// assert!(is_valid_date("D:2023"));
/// assert!(is_valid_date("D:19990101120000+05'00'"));
/// assert!(!is_valid_date("D:20230230"));
/// ```
pub fn is_valid_date<S: AsRef<[u8]> + ?Sized>(raw: &S) -> bool {
    let raw = raw.as_ref();
    if is_utf16be(raw) {
        return match decode_utf16be(raw) {
            Some(text) => DateParser::new(text.as_bytes()).run(),
            None => false,
        };
    }
    DateParser::new(raw).run()
}
