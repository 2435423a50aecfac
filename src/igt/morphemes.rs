//! Morpheme/gloss token stream reconciliation.
//!
//! Morpheme and gloss lines use a small set of separator characters to mark
//! morpheme boundaries (Leipzig glossing conventions). The two lines were
//! often segmented by different passes, so their separators disagree;
//! [harmonize_separators] gives the morpheme line's separators precedence.

/// Characters recognized as morpheme boundaries.
pub const MORPHEME_SEPARATORS: [char; 5] = ['-', '=', '~', '<', '>'];

fn is_separator(c: char) -> bool {
    MORPHEME_SEPARATORS.contains(&c)
}

/// Split a word into alternating (segment, separator) parts.
///
/// Separators become their own single-character parts; segments between
/// adjacent separators (and at the boundaries) are kept even when empty, so
/// the parts always concatenate back to the input.
pub fn split_morphemes(word: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    for c in word.chars() {
        if is_separator(c) {
            parts.push(c.to_string());
            parts.push(String::new());
        } else {
            // last part is always a segment
            parts.last_mut().unwrap().push(c);
        }
    }
    parts
}

/// Reconcile separator characters between a morpheme line and its gloss line.
///
/// For each token pair that decomposes into the same number of parts, each
/// separator slot of the gloss is overwritten with the morpheme's separator
/// at that slot. Pairs with differing part counts pass through unchanged, as
/// they cannot be reconciled safely.
///
/// ```
/// use glossline::igt::harmonize_separators;
///
/// let (m, g) = harmonize_separators(
///     &["anē=n".to_string()],
///     &["DEM1.A-ART".to_string()],
/// );
/// assert_eq!(m, vec!["anē=n"]);
/// assert_eq!(g, vec!["DEM1.A=ART"]);
/// ```
pub fn harmonize_separators(
    morphemes: &[String],
    glosses: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut new_morphemes = Vec::with_capacity(morphemes.len());
    let mut new_glosses = Vec::with_capacity(glosses.len());
    for (morpheme, gloss) in morphemes.iter().zip(glosses.iter()) {
        let mparts = split_morphemes(morpheme);
        let mut gparts = split_morphemes(gloss);
        if mparts.len() == gparts.len() {
            for (i, sep) in mparts.iter().enumerate() {
                if i % 2 == 1 {
                    // a separator: copy it over to the gloss parts
                    gparts[i] = sep.clone();
                }
            }
            new_morphemes.push(mparts.concat());
            new_glosses.push(gparts.concat());
        } else {
            new_morphemes.push(morpheme.clone());
            new_glosses.push(gloss.clone());
        }
    }
    (new_morphemes, new_glosses)
}

/// Which line of the IGT a token stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Morpheme,
    Gloss,
}

/// Replace hyphens with non-hyphen neighbors on both sides.
///
/// Such hyphens come from an earlier segmentation pass and are not morpheme
/// boundaries; they must not be confused with the boundary hyphens inserted
/// by [combine_morphemes].
fn replace_inner_hyphens(s: &str, repl: char) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '-'
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1] != '-'
            && chars[i + 1] != '-'
        {
            out.push(repl);
        } else {
            out.push(c);
        }
    }
    out
}

/// Concatenate a word's morpheme (or gloss) tokens into one string.
///
/// Empty tokens are skipped. Inner hyphens become `.` on the gloss line and
/// an en-dash on the morpheme line; successive tokens are joined with a `-`
/// boundary unless either side already carries a separator. Leading and
/// trailing separators are trimmed and doubled separators produced by the
/// join are collapsed.
pub fn combine_morphemes(tokens: &[String], kind: StreamKind) -> String {
    let inner = match kind {
        StreamKind::Morpheme => '–',
        StreamKind::Gloss => '.',
    };

    let mut word = String::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let token = replace_inner_hyphens(token, inner);
        let boundary_free = !word.is_empty()
            && !word.ends_with(is_separator)
            && !token.starts_with(is_separator);
        if boundary_free {
            word.push('-');
        }
        word.push_str(&token);
    }

    let word = word
        .trim_end_matches(is_separator)
        .trim_start_matches(is_separator);
    word.replace("--", "-").replace("=-", "=").replace("==", "=")
}
