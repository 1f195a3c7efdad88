// Free-text normalization applied before any parsing or comparison.
//
// Learners type on phone keyboards and paste from notation software, so the
// same accidental arrives as `♯`, `#`, full-width `＋`, an en dash, etc.
// `normalize` folds all of those to ASCII and collapses whitespace. It is
// idempotent: `normalize(normalize(s)) == normalize(s)`.

/// Glyph rewrites, applied in order. Multi-character replacements
/// (`𝄪` → `##`) only produce characters that no rule matches again.
const GLYPHS: &[(char, &str)] = &[
    ('＋', "+"),
    ('－', "-"),
    ('–', "-"),
    ('—', "-"),
    ('−', "-"),
    ('♯', "#"),
    ('♭', "b"),
    ('♮', ""),
    ('𝄪', "##"),
    ('𝄫', "bb"),
    ('，', ","),
];

/// Trim, rewrite accidental glyphs to ASCII, and collapse runs of
/// whitespace to a single space.
pub fn normalize(text: &str) -> String {
    let mut rewritten = String::with_capacity(text.len());
    for c in text.chars() {
        match GLYPHS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => rewritten.push_str(ascii),
            None => rewritten.push(c),
        }
    }
    rewritten.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `normalize`, then drop every space. Used for single-token parsing
/// (`"D b"` → `"Db"`).
pub fn compact(text: &str) -> String {
    normalize(text).replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_accidental_glyphs() {
        assert_eq!(normalize("C♯"), "C#");
        assert_eq!(normalize("B♭"), "Bb");
        assert_eq!(normalize("F𝄪"), "F##");
        assert_eq!(normalize("E𝄫"), "Ebb");
        assert_eq!(normalize("＋4"), "+4");
        assert_eq!(normalize("–5"), "-5");
        assert_eq!(normalize("—9"), "-9");
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(normalize("  bIII ,\t  bVII  "), "bIII , bVII");
        assert_eq!(normalize("\n"), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = ["  C♯ ,  E𝄫 ", "＋11", "Do Re\tMi", "", "♭♭", "—13"];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn compact_drops_spaces() {
        assert_eq!(compact(" D b "), "Db");
        assert_eq!(compact("m 7 b 5"), "m7b5");
    }
}
