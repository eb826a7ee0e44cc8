use crate::consts::SEMITONES_PER_OCTAVE;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// Absolute pitch as a semitone index (MIDI numbering, C4 = 60).
pub type Pitch = i32;

/// A pitch without its octave. Discriminants are semitones above C.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum PitchClass {
    #[strum(to_string = "C")]
    C = 0,
    #[strum(to_string = "C#")]
    CSharp = 1,
    #[strum(to_string = "D")]
    D = 2,
    #[strum(to_string = "D#")]
    DSharp = 3,
    #[strum(to_string = "E")]
    E = 4,
    #[strum(to_string = "F")]
    F = 5,
    #[strum(to_string = "F#")]
    FSharp = 6,
    #[strum(to_string = "G")]
    G = 7,
    #[strum(to_string = "G#")]
    GSharp = 8,
    #[strum(to_string = "A")]
    A = 9,
    #[strum(to_string = "A#")]
    ASharp = 10,
    #[strum(to_string = "B")]
    B = 11,
}

impl PitchClass {
    pub fn of(pitch: Pitch) -> Self {
        let semitone = pitch.rem_euclid(SEMITONES_PER_OCTAVE) as u8;
        // rem_euclid keeps us in 0..12, every value has a variant
        PitchClass::from_repr(semitone).unwrap_or(PitchClass::C)
    }

    #[inline(always)]
    pub fn semitone(self) -> i32 {
        self as i32
    }

    pub fn transposed(self, semitones: i32) -> Self {
        PitchClass::of(self.semitone() + semitones.rem_euclid(SEMITONES_PER_OCTAVE))
    }

    /// Spelling with flats for the black keys (`Db`, `Eb`, ...).
    pub fn flat_name(self) -> &'static str {
        match self {
            PitchClass::CSharp => "Db",
            PitchClass::DSharp => "Eb",
            PitchClass::FSharp => "Gb",
            PitchClass::GSharp => "Ab",
            PitchClass::ASharp => "Bb",
            natural => natural.into(),
        }
    }

    pub fn spelled(self, prefer_flat: bool) -> String {
        if prefer_flat {
            self.flat_name().to_string()
        } else {
            self.to_string()
        }
    }

    /// The pitch of this class in the given octave (C4 = 60), or `None` when
    /// the octave is too far out to be represented.
    pub fn in_octave(self, octave: i32) -> Option<Pitch> {
        octave
            .checked_add(1)?
            .checked_mul(SEMITONES_PER_OCTAVE)?
            .checked_add(self.semitone())
    }

    /// The pitch of this class closest to `reference`. Ties (a tritone away)
    /// resolve downward.
    pub fn nearest_to(self, reference: Pitch) -> Pitch {
        let up = (self.semitone() - reference).rem_euclid(SEMITONES_PER_OCTAVE);
        if up < SEMITONES_PER_OCTAVE / 2 {
            reference + up
        } else {
            reference + up - SEMITONES_PER_OCTAVE
        }
    }
}

pub fn octave_of(pitch: Pitch) -> i32 {
    pitch.div_euclid(SEMITONES_PER_OCTAVE) - 1
}

/// A note label broken into its pitch class and optional octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLabel {
    pub class: PitchClass,
    pub octave: Option<i32>,
    pub uses_flat: bool,
}

impl ParsedLabel {
    pub fn pitch(&self) -> Option<Pitch> {
        self.class.in_octave(self.octave?)
    }
}

/// Parses labels such as `C`, `f#`, `Bb`, `E♭`, `G#3`, `Cb-1`.
pub fn parse_label(label: &str) -> Option<ParsedLabel> {
    let mut chars = label.trim().chars().peekable();
    let letter = chars.next()?;
    let base = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut offset = 0;
    let mut uses_flat = false;
    while let Some(&c) = chars.peek() {
        match c {
            '#' | '♯' => offset += 1,
            'b' | '♭' => {
                offset -= 1;
                uses_flat = true;
            }
            _ => break,
        }
        chars.next();
    }

    let rest: String = chars.collect();
    let octave = if rest.is_empty() {
        None
    } else {
        let octave = rest.parse::<i32>().ok()?;
        // Labels whose octave has no pitch are unreadable
        PitchClass::C.in_octave(octave)?;
        Some(octave)
    };

    Some(ParsedLabel {
        class: PitchClass::of(base + offset),
        octave,
        uses_flat,
    })
}

pub fn pitch_class_of_label(label: &str) -> Option<PitchClass> {
    parse_label(label).map(|p| p.class)
}
