use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of positions on each ring of the Camelot wheel
pub const WHEEL_SIZE: u8 = 12;

// Camelot positions indexed by pitch class (0 = C, 1 = C#, ..., 11 = B)
const CAMELOT_MAJOR: [u8; 12] = [8, 3, 10, 5, 12, 7, 2, 9, 4, 11, 6, 1];
const CAMELOT_MINOR: [u8; 12] = [5, 12, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10];

/// Scale mode, written as the Camelot letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    /// `A` ring
    Minor,
    /// `B` ring
    Major,
}

impl Mode {
    pub fn letter(self) -> char {
        match self {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Mode::Minor => Mode::Major,
            Mode::Major => Mode::Minor,
        }
    }
}

/// A musical key as a position on the Camelot wheel, e.g. `8A` (A minor)
///
/// Keys serialize as their Camelot string. Parsing also accepts standard notation
/// (`Am`, `F# minor`, `Bb`) and Open Key notation (`1m`, `6d`), converting to Camelot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CamelotKey {
    number: u8,
    mode: Mode,
}

impl CamelotKey {
    /// Create a key from a wheel position (1-12) and mode
    pub fn new(number: u8, mode: Mode) -> Option<Self> {
        (1..=WHEEL_SIZE).contains(&number).then_some(Self { number, mode })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Parse a key in Camelot, Open Key or standard notation
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        Self::parse_camelot(trimmed)
            .or_else(|| Self::parse_open_key(trimmed))
            .or_else(|| Self::parse_standard(trimmed))
    }

    fn parse_camelot(s: &str) -> Option<Self> {
        let (digits, letter) = split_suffix(s)?;
        let mode = match letter.to_ascii_uppercase() {
            'A' => Mode::Minor,
            'B' => Mode::Major,
            _ => return None,
        };
        Self::new(parse_position(digits)?, mode)
    }

    /// Open Key: `1d` is C major (8B), `1m` is A minor (8A)
    fn parse_open_key(s: &str) -> Option<Self> {
        let (digits, letter) = split_suffix(s)?;
        let mode = match letter.to_ascii_lowercase() {
            'm' => Mode::Minor,
            'd' => Mode::Major,
            _ => return None,
        };
        let open = parse_position(digits).filter(|n| (1..=WHEEL_SIZE).contains(n))?;
        Self::new((open + 6) % WHEEL_SIZE + 1, mode)
    }

    fn parse_standard(s: &str) -> Option<Self> {
        let normalized = s.replace('\u{266F}', "#").replace('\u{266D}', "b");
        let mut chars = normalized.chars().peekable();

        let base: u8 = match chars.next()?.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let pitch_class = match chars.peek() {
            Some('#') => {
                chars.next();
                (base + 1) % 12
            }
            Some('b') => {
                chars.next();
                (base + 11) % 12
            }
            _ => base,
        };

        let suffix: String = chars.filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
        let minor = match suffix.as_str() {
            "" | "maj" | "major" => false,
            "m" | "min" | "minor" => true,
            _ => return None,
        };

        let (number, mode) = if minor {
            (CAMELOT_MINOR[pitch_class as usize], Mode::Minor)
        } else {
            (CAMELOT_MAJOR[pitch_class as usize], Mode::Major)
        };
        Self::new(number, mode)
    }

    /// Shortest number of steps between the two wheel positions, ignoring mode (0-6)
    pub fn step_distance(&self, other: &CamelotKey) -> u8 {
        let diff = self.number.abs_diff(other.number);
        diff.min(WHEEL_SIZE - diff)
    }

    /// Same position, opposite mode (relative major/minor)
    pub fn relative(&self) -> Self {
        Self {
            number: self.number,
            mode: self.mode.opposite(),
        }
    }

    /// Move `steps` positions around the wheel, wrapping 12 -> 1
    pub fn rotate(&self, steps: i32) -> Self {
        let zero_based = (self.number as i32 - 1 + steps).rem_euclid(WHEEL_SIZE as i32);
        Self {
            number: zero_based as u8 + 1,
            mode: self.mode,
        }
    }

    /// Whether `other` sits within one harmonic step: identical, relative, or a same-mode neighbour
    pub fn is_harmonic_match(&self, other: &CamelotKey) -> bool {
        match self.step_distance(other) {
            0 => true,
            1 => self.mode == other.mode,
            _ => false,
        }
    }

    /// The key itself followed by its same-mode neighbours and its relative
    pub fn harmonic_keys(&self) -> Vec<CamelotKey> {
        vec![*self, self.rotate(-1), self.rotate(1), self.relative()]
    }
}

fn split_suffix(s: &str) -> Option<(&str, char)> {
    let letter = s.chars().last()?;
    Some((&s[..s.len() - letter.len_utf8()], letter))
}

fn parse_position(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.mode.letter())
    }
}

impl FromStr for CamelotKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unrecognized key notation: '{}'", s))
    }
}

impl TryFrom<String> for CamelotKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CamelotKey> for String {
    fn from(key: CamelotKey) -> Self {
        key.to_string()
    }
}
