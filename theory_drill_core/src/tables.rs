// Theory data tables: chord formulas, scales and modes, minor-scale harmony,
// harmonic functions, available scales, and enharmonic groupings.
//
// Loaded from `data/theory_tables.json` via `TheoryTables::from_json()` and
// validated once at load. Every rule a generator relies on (a degree label
// parses, an enharmonic group really is enharmonic, a minor scale has seven
// chord forms) is checked here, so table mistakes fail loudly at startup
// instead of producing a wrong answer key mid-session.
//
// Entry order is preserved from the JSON file. Generators sample by index,
// so the same seed always yields the same questions.
//
// `default_tables()` embeds the JSON with `include_str!`.

use serde::Deserialize;

use crate::degree::{lookup, split_degree_prefix};
use crate::error::{DrillError, Result};
use crate::interval::{Interval, scale_number_to_semitones};

/// A named chord quality and its semitone offsets from the root.
#[derive(Debug, Clone, Deserialize)]
pub struct ChordFormula {
    pub name: String,
    pub offsets: Vec<u8>,
}

/// A seven-degree scale (church modes and the three minor scales).
#[derive(Debug, Clone, Deserialize)]
pub struct Scale {
    pub name: String,
    pub degrees: Vec<String>,
}

/// Per-mode facts: altered degrees relative to major, characteristic
/// tensions, and the diatonic seventh chords in degree form.
#[derive(Debug, Clone, Deserialize)]
pub struct ModeEntry {
    pub name: String,
    #[serde(default)]
    pub alterations: Vec<String>,
    pub tensions: Vec<String>,
    pub seventh_chords: Vec<String>,
}

/// Diatonic harmony of a minor scale, one entry per scale degree.
#[derive(Debug, Clone, Deserialize)]
pub struct MinorScale {
    pub name: String,
    pub chord_forms: Vec<String>,
    pub tensions: Vec<Vec<String>>,
}

/// A harmonic function and the degree chords that carry it. A chord may
/// appear under several functions.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionEntry {
    pub function: String,
    pub chords: Vec<String>,
}

/// A chord-scale and the degree chords it is available over.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableScale {
    pub scale: String,
    pub chords: Vec<String>,
}

/// All static theory knowledge the generators consume. Immutable after load.
#[derive(Debug, Clone, Deserialize)]
pub struct TheoryTables {
    pub chord_formulas: Vec<ChordFormula>,
    /// Chord forms used for extended (9th) and rootless voicings.
    pub extension_forms: Vec<String>,
    pub enharmonic_degree_pairs: Vec<[String; 2]>,
    pub enharmonic_number_groups: Vec<Vec<String>>,
    pub enharmonic_interval_groups: Vec<Vec<String>>,
    /// Intervals offered by the circle-of-fifths counting questions.
    pub r_count_intervals: Vec<String>,
    pub tensions: Vec<String>,
    pub scales: Vec<Scale>,
    pub modes: Vec<ModeEntry>,
    pub minor_scales: Vec<MinorScale>,
    pub functions: Vec<FunctionEntry>,
    pub available_scales: Vec<AvailableScale>,
}

impl TheoryTables {
    /// Parse and validate tables from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: TheoryTables = serde_json::from_str(json).map_err(DrillError::Tables)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn chord_formula(&self, name: &str) -> Option<&ChordFormula> {
        self.chord_formulas.iter().find(|f| f.name == name)
    }

    pub fn scale(&self, name: &str) -> Option<&Scale> {
        self.scales.iter().find(|s| s.name == name)
    }

    /// Every function whose chord list contains `chord`, in table order.
    pub fn functions_of(&self, chord: &str) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|f| f.chords.iter().any(|c| c == chord))
            .map(|f| f.function.as_str())
            .collect()
    }

    /// Every distinct chord listed under any function, in first-seen order.
    pub fn function_chords(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for chord in self.functions.iter().flat_map(|f| f.chords.iter()) {
            if !out.contains(&chord.as_str()) {
                out.push(chord);
            }
        }
        out
    }

    /// Every chord-scale available over `chord`, in table order.
    pub fn scales_available_over(&self, chord: &str) -> Vec<&str> {
        self.available_scales
            .iter()
            .filter(|s| s.chords.iter().any(|c| c == chord))
            .map(|s| s.scale.as_str())
            .collect()
    }

    /// Check every invariant the generators depend on.
    pub fn validate(&self) -> Result<()> {
        self.validate_chords()?;
        self.validate_enharmonics()?;
        self.validate_scales_and_modes()?;
        self.validate_harmony()?;
        Ok(())
    }

    fn validate_chords(&self) -> Result<()> {
        if self.chord_formulas.len() < 2 {
            return Err(DrillError::invalid_table(
                "chord_formulas",
                "need at least two formulas",
            ));
        }
        for formula in &self.chord_formulas {
            if formula.offsets.first() != Some(&0) || formula.offsets.iter().any(|&o| o >= 12) {
                return Err(DrillError::invalid_table(
                    "chord_formulas",
                    format!("{}: offsets must start at 0 and stay below 12", formula.name),
                ));
            }
        }
        require_non_empty("extension_forms", &self.extension_forms)?;
        for form in &self.extension_forms {
            if self.chord_formula(form).is_none() {
                return Err(DrillError::invalid_table(
                    "extension_forms",
                    format!("unknown chord form {form}"),
                ));
            }
        }
        require_non_empty("tensions", &self.tensions)?;
        for tension in &self.tensions {
            require_scale_number("tensions", tension)?;
        }
        Ok(())
    }

    fn validate_enharmonics(&self) -> Result<()> {
        require_non_empty("enharmonic_degree_pairs", &self.enharmonic_degree_pairs)?;
        for [a, b] in &self.enharmonic_degree_pairs {
            match (lookup(a), lookup(b)) {
                (Some(x), Some(y)) if x == y && a != b => {}
                _ => {
                    return Err(DrillError::invalid_table(
                        "enharmonic_degree_pairs",
                        format!("{a} and {b} are not distinct enharmonic degrees"),
                    ));
                }
            }
        }

        require_non_empty("enharmonic_number_groups", &self.enharmonic_number_groups)?;
        for group in &self.enharmonic_number_groups {
            let semis: Option<Vec<i32>> =
                group.iter().map(|n| scale_number_to_semitones(n)).collect();
            check_group("enharmonic_number_groups", group, semis)?;
        }

        require_non_empty("enharmonic_interval_groups", &self.enharmonic_interval_groups)?;
        for group in &self.enharmonic_interval_groups {
            let semis: Option<Vec<i32>> = group
                .iter()
                .map(|i| Interval::parse(i).map(Interval::semitones))
                .collect();
            check_group("enharmonic_interval_groups", group, semis)?;
        }

        require_non_empty("r_count_intervals", &self.r_count_intervals)?;
        for interval in &self.r_count_intervals {
            if Interval::parse(interval).is_none() {
                return Err(DrillError::invalid_table(
                    "r_count_intervals",
                    format!("unparseable interval {interval}"),
                ));
            }
        }
        Ok(())
    }

    fn validate_scales_and_modes(&self) -> Result<()> {
        if self.scales.len() < 2 {
            return Err(DrillError::invalid_table("scales", "need at least two scales"));
        }
        for scale in &self.scales {
            require_seven("scales", &scale.name, scale.degrees.len())?;
            for degree in &scale.degrees {
                require_degree("scales", degree)?;
            }
        }

        require_non_empty("modes", &self.modes)?;
        if self.modes.iter().all(|m| m.alterations.is_empty()) {
            return Err(DrillError::invalid_table(
                "modes",
                "no mode lists any alterations",
            ));
        }
        for mode in &self.modes {
            require_seven("modes", &mode.name, mode.seventh_chords.len())?;
            require_non_empty("modes", &mode.tensions)?;
            for degree in &mode.alterations {
                require_degree("modes", degree)?;
            }
            for tension in &mode.tensions {
                require_scale_number("modes", tension)?;
            }
            for chord in &mode.seventh_chords {
                require_degree_chord("modes", chord)?;
            }
        }

        require_non_empty("minor_scales", &self.minor_scales)?;
        for minor in &self.minor_scales {
            if self.scale(&minor.name).is_none() {
                return Err(DrillError::invalid_table(
                    "minor_scales",
                    format!("{} has no entry in scales", minor.name),
                ));
            }
            require_seven("minor_scales", &minor.name, minor.chord_forms.len())?;
            require_seven("minor_scales", &minor.name, minor.tensions.len())?;
            for form in &minor.chord_forms {
                if self.chord_formula(form).is_none() {
                    return Err(DrillError::invalid_table(
                        "minor_scales",
                        format!("{}: unknown chord form {form}", minor.name),
                    ));
                }
            }
            for tensions in &minor.tensions {
                require_non_empty("minor_scales", tensions)?;
                for tension in tensions {
                    require_scale_number("minor_scales", tension)?;
                }
            }
        }
        Ok(())
    }

    fn validate_harmony(&self) -> Result<()> {
        require_non_empty("functions", &self.functions)?;
        for entry in &self.functions {
            require_non_empty("functions", &entry.chords)?;
            for chord in &entry.chords {
                require_degree_chord("functions", chord)?;
            }
        }
        require_non_empty("available_scales", &self.available_scales)?;
        for entry in &self.available_scales {
            require_non_empty("available_scales", &entry.chords)?;
            for chord in &entry.chords {
                require_degree_chord("available_scales", chord)?;
            }
        }
        Ok(())
    }
}

fn require_non_empty<T>(table: &'static str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        Err(DrillError::invalid_table(table, "empty list"))
    } else {
        Ok(())
    }
}

fn require_seven(table: &'static str, name: &str, len: usize) -> Result<()> {
    if len == 7 {
        Ok(())
    } else {
        Err(DrillError::invalid_table(
            table,
            format!("{name}: expected 7 entries, found {len}"),
        ))
    }
}

fn require_degree(table: &'static str, degree: &str) -> Result<()> {
    lookup(degree)
        .map(|_| ())
        .ok_or_else(|| DrillError::invalid_table(table, format!("unknown degree {degree}")))
}

fn require_degree_chord(table: &'static str, chord: &str) -> Result<()> {
    match split_degree_prefix(chord) {
        Some((degree, _)) if lookup(&degree).is_some() => Ok(()),
        _ => Err(DrillError::invalid_table(
            table,
            format!("chord {chord} does not start with a degree"),
        )),
    }
}

fn require_scale_number(table: &'static str, token: &str) -> Result<()> {
    scale_number_to_semitones(token)
        .map(|_| ())
        .ok_or_else(|| DrillError::invalid_table(table, format!("unparseable number {token}")))
}

fn check_group(table: &'static str, group: &[String], semis: Option<Vec<i32>>) -> Result<()> {
    let semis = semis.ok_or_else(|| {
        DrillError::invalid_table(table, format!("unparseable member in {group:?}"))
    })?;
    if group.len() < 2 {
        return Err(DrillError::invalid_table(
            table,
            format!("group {group:?} has fewer than two members"),
        ));
    }
    let first = semis[0].rem_euclid(12);
    if semis.iter().any(|s| s.rem_euclid(12) != first) {
        return Err(DrillError::invalid_table(
            table,
            format!("group {group:?} is not enharmonic ({semis:?})"),
        ));
    }
    Ok(())
}

/// Load the default tables embedded at compile time.
///
/// Panics if the embedded JSON is malformed or fails validation, which is a
/// build defect rather than a runtime condition.
pub fn default_tables() -> TheoryTables {
    let json = include_str!("../../data/theory_tables.json");
    TheoryTables::from_json(json).expect("embedded theory_tables.json is invalid")
}
