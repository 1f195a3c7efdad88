// Practice topics: the closed set of (category, subcategory) pairs.
//
// Each `Topic` names exactly one question-generation rule and one
// statistics/weighting bucket. The set is fixed at compile time; the
// generator dispatch in `generate/mod.rs` matches on it exhaustively.
//
// Display names are the ones learners see and the ones stored in history
// and weight rows, so they must stay stable.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DrillError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Enharmonics,
    WarmingUp,
    Intervals,
    ChordForms,
    CycleOfFifths,
    Locations,
    Tritones,
    Modes,
    Minor,
    Mastery,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Enharmonics,
        Category::WarmingUp,
        Category::Intervals,
        Category::ChordForms,
        Category::CycleOfFifths,
        Category::Locations,
        Category::Tritones,
        Category::Modes,
        Category::Minor,
        Category::Mastery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Enharmonics => "Enharmonics",
            Category::WarmingUp => "Warming up",
            Category::Intervals => "Intervals",
            Category::ChordForms => "Chord Forms",
            Category::CycleOfFifths => "Cycle of 5th",
            Category::Locations => "Locations",
            Category::Tritones => "Tritones",
            Category::Modes => "Modes",
            Category::Minor => "Minor",
            Category::Mastery => "Mastery",
        }
    }

    /// Topics in this category, in display order.
    pub fn topics(self) -> impl Iterator<Item = Topic> {
        Topic::ALL.iter().copied().filter(move |t| t.category() == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! topics {
    ($( $variant:ident => ($category:ident, $sub:literal), )*) => {
        /// One practice topic. See the module docs.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Topic {
            $( $variant, )*
        }

        impl Topic {
            pub const ALL: &'static [Topic] = &[ $( Topic::$variant, )* ];

            pub fn category(self) -> Category {
                match self {
                    $( Topic::$variant => Category::$category, )*
                }
            }

            pub fn subcategory(self) -> &'static str {
                match self {
                    $( Topic::$variant => $sub, )*
                }
            }
        }
    };
}

topics! {
    EnharmonicDegrees => (Enharmonics, "Degrees"),
    EnharmonicNumbers => (Enharmonics, "Number"),
    EnharmonicNaturalForm => (Enharmonics, "Natural Form"),
    CountingKeys => (WarmingUp, "Counting keys"),
    FindingDegrees => (WarmingUp, "Finding degrees"),
    ChordTones => (WarmingUp, "Chord tones"),
    KeySignatures => (WarmingUp, "Key signatures"),
    Solfege => (WarmingUp, "Solfege"),
    IntervalAlternatives => (Intervals, "Alternative"),
    IntervalTracking => (Intervals, "Tracking"),
    ChordRelationships => (ChordForms, "Relationships"),
    ChordExtractDegree => (ChordForms, "Extract (Degree)"),
    NinthChord => (ChordForms, "9 chord"),
    RootlessVoicing => (ChordForms, "Rootless"),
    FifthDown => (CycleOfFifths, "P5 down"),
    FifthUp => (CycleOfFifths, "P5 up"),
    FifthsCount => (CycleOfFifths, "r calc"),
    TwoFiveOne => (CycleOfFifths, "2-5-1"),
    DegreeToPitch => (Locations, "Deg->Pitch"),
    PitchToDegree => (Locations, "Pitch->Deg"),
    TritonePitch => (Tritones, "Pitch"),
    TritoneDegree => (Tritones, "Degree"),
    TritoneDominant => (Tritones, "Dom7"),
    TritoneDiminished => (Tritones, "Dim7"),
    ModeAlterations => (Modes, "Alterations"),
    ModeTensions => (Modes, "Tensions"),
    ModeChordsByDegree => (Modes, "Chords(Deg)"),
    ModeChordsInKey => (Modes, "Chords(Key)"),
    MinorChords => (Minor, "Chords"),
    MinorTensions => (Minor, "Tensions"),
    MinorPitch => (Minor, "Pitch"),
    HarmonicFunctions => (Mastery, "Functions"),
    ScaleDegrees => (Mastery, "Degrees"),
    ScalePitches => (Mastery, "Pitches"),
    AvailableScales => (Mastery, "Avail Scales"),
    PivotChords => (Mastery, "Pivot"),
    ScaleSimilarities => (Mastery, "Similarities"),
}

impl Topic {
    /// Resolve display names back to a topic.
    pub fn from_names(category: &str, subcategory: &str) -> Option<Topic> {
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.category().name() == category && t.subcategory() == subcategory)
    }

    /// Parse `"Category/Subcategory"` (the CLI and storage key form).
    /// Splits on the first `/`.
    pub fn parse_key(key: &str) -> Result<Topic> {
        let unknown = || DrillError::UnknownTopic {
            category: key.to_string(),
            subcategory: String::new(),
        };
        let (category, subcategory) = key.split_once('/').ok_or_else(unknown)?;
        Topic::from_names(category.trim(), subcategory.trim()).ok_or_else(|| {
            DrillError::UnknownTopic {
                category: category.trim().to_string(),
                subcategory: subcategory.trim().to_string(),
            }
        })
    }

    /// `"Category/Subcategory"`.
    pub fn key(self) -> String {
        format!("{}/{}", self.category().name(), self.subcategory())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.category().name(), self.subcategory())
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Topic::parse_key(&key).map_err(serde::de::Error::custom)
    }
}
