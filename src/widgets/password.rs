//! Password strength meter used on the register and change-password forms.
//! The score mirrors the backend policy (length, digit, lower and upper case);
//! it is advisory only, the API still validates.

use regex::Regex;

pub const MIN_LENGTH: usize = 8;
/// Passwords longer than this are scored as strong regardless of content.
pub const LONG_PASSWORD: usize = 20;
pub const MAX_SCORE: u8 = 4;
const SHORT_CAP: u8 = 2;

fn contains(pattern: &str, password: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(password))
}

/// Scores `password` from 0 (empty) to 4 (strong).
#[must_use]
pub fn score(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }

    let length = password.chars().count();
    let checks = [
        length >= MIN_LENGTH,
        contains(r"[0-9]", password),
        contains(r"[a-z]", password),
        contains(r"[A-Z]", password),
    ];
    let mut score = checks.iter().map(|passed| u8::from(*passed)).sum::<u8>();

    if length < MIN_LENGTH {
        score = score.min(SHORT_CAP);
    }
    if length > LONG_PASSWORD {
        score = MAX_SCORE;
    }

    score
}

/// Label, bar color and bar width for a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strength {
    pub label: &'static str,
    pub color: &'static str,
    pub width: &'static str,
}

const NONE: Strength = Strength {
    label: "",
    color: "#333",
    width: "0%",
};

/// Unknown scores fall back to the empty meter.
#[must_use]
pub fn describe(score: u8) -> Strength {
    match score {
        1 => Strength {
            label: "太短",
            color: "#ff5050",
            width: "25%",
        },
        2 => Strength {
            label: "弱",
            color: "#ff5050",
            width: "50%",
        },
        3 => Strength {
            label: "中",
            color: "#ffd700",
            width: "75%",
        },
        4 => Strength {
            label: "強",
            color: "#00f6ff",
            width: "100%",
        },
        _ => NONE,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Meter {
    pub score: u8,
    pub strength: Strength,
}

#[must_use]
pub fn meter(password: &str) -> Meter {
    let score = score(password);
    Meter {
        score,
        strength: describe(score),
    }
}

/// Show/hide state of a password field and its toggle button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

impl Visibility {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    /// `type` attribute for the input.
    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Hidden => "password",
            Self::Shown => "text",
        }
    }

    #[must_use]
    pub fn button_glyph(self) -> &'static str {
        match self {
            Self::Hidden => "👁",
            Self::Shown => "🙈",
        }
    }
}
