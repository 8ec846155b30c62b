// crates/centros-core/src/text.rs

/// Convert a string into a folded key suitable for joining and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `San José` -> `San Jose`)
/// 2\) Normalize to lowercase
/// 3\) Trim and collapse internal whitespace runs to a single space
///
/// The same key is used to match canton names across the schools table,
/// the geometry source and the population table, and for name search.
///
/// # Examples
///
/// ```rust
/// use centros_core::text::fold_key;
///
/// assert_eq!(fold_key("  San   José "), "san jose");
/// assert_eq!(fold_key("PÉREZ ZELEDÓN"), "perez zeledon");
/// ```
pub fn fold_key(s: &str) -> String {
    let ascii = deunicode::deunicode(s).to_lowercase();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compares two strings for equality after folding with [`fold_key`].
///
/// ```rust
/// use centros_core::text::equals_folded;
///
/// assert!(equals_folded("Tarrazú", "TARRAZU"));
/// assert!(!equals_folded("Dota", "Tarrazú"));
/// ```
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Parses an optional coordinate field.
///
/// Trims whitespace and accepts a decimal comma (`9,93`) as written by some
/// spreadsheet exports. Returns `None` for empty, unparsable or non-finite
/// values.
pub fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.trim();
    if v.is_empty() {
        return None;
    }
    let parsed = v
        .parse::<f64>()
        .ok()
        .or_else(|| v.replace(',', ".").parse::<f64>().ok())?;
    parsed.is_finite().then_some(parsed)
}

/// Parses an optional integer count such as a census total.
///
/// Accepted forms: plain digits (`352381`), digits grouped in threes by one
/// separator (`352,381`, `352.381`, `352 381`) and an all-zero decimal part
/// (`8000.0`, `1,000.00`). Anything else, such as `8000.5` or `12,34`, is
/// `None` rather than a guess.
pub fn parse_opt_count(s: Option<&str>) -> Option<u64> {
    let v = s?.trim();
    if v.is_empty() {
        return None;
    }
    // A three-digit tail (`352.000`) is read as a thousands group.
    let body = match v.rfind(['.', ',']) {
        Some(i) if is_zero_fraction(&v[i + 1..]) => &v[..i],
        _ => v,
    };
    parse_grouped(body)
}

fn is_zero_fraction(frac: &str) -> bool {
    !frac.is_empty() && frac.len() != 3 && frac.chars().all(|c| c == '0')
}

fn parse_grouped(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }
    let sep = s.chars().find(|c| !c.is_ascii_digit())?;
    if !matches!(sep, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}') {
        return None;
    }
    let mut groups = s.split(sep);
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut digits = head.to_owned();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    digits.parse().ok()
}

/// Returns `Some(trimmed)` for non-blank input.
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|v| !v.is_empty())
}

/// Decodes a byte buffer as UTF-8, falling back to Latin-1 (ISO-8859-1).
///
/// The census tables are published in Latin-1; every byte maps to the code
/// point of the same value, so the fallback never fails.
pub fn decode_utf8_or_latin1(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_strips_accents_case_and_spacing() {
        assert_eq!(fold_key("Cantón Central"), "canton central");
        assert_eq!(fold_key("\tLEÓN  CORTÉS\n"), "leon cortes");
        assert_eq!(fold_key(""), "");
    }

    #[test]
    fn parse_opt_f64_handles_blank_and_garbage() {
        assert_eq!(parse_opt_f64(Some(" 9.93 ")), Some(9.93));
        assert_eq!(parse_opt_f64(Some("-84,08")), Some(-84.08));
        assert_eq!(parse_opt_f64(Some("N/A")), None);
        assert_eq!(parse_opt_f64(Some("NaN")), None);
        assert_eq!(parse_opt_f64(Some("   ")), None);
        assert_eq!(parse_opt_f64(None), None);
    }

    #[test]
    fn parse_opt_count_strips_separators() {
        assert_eq!(parse_opt_count(Some("352,381")), Some(352_381));
        assert_eq!(parse_opt_count(Some("352 381")), Some(352_381));
        assert_eq!(parse_opt_count(Some("352.381")), Some(352_381));
        assert_eq!(parse_opt_count(Some("1.234.567")), Some(1_234_567));
        assert_eq!(parse_opt_count(Some("0")), Some(0));
        assert_eq!(parse_opt_count(Some("-")), None);
        assert_eq!(parse_opt_count(Some("")), None);
    }

    #[test]
    fn parse_opt_count_reads_zero_decimals_and_rejects_fractions() {
        assert_eq!(parse_opt_count(Some("8000.0")), Some(8000));
        assert_eq!(parse_opt_count(Some("8000,00")), Some(8000));
        assert_eq!(parse_opt_count(Some("1,000.00")), Some(1000));
        assert_eq!(parse_opt_count(Some("8000.5")), None);
        assert_eq!(parse_opt_count(Some("1.5")), None);
        assert_eq!(parse_opt_count(Some("12,34")), None);
        assert_eq!(parse_opt_count(Some("1,000.000,5")), None);
        assert_eq!(parse_opt_count(Some("1 000,5")), None);
    }

    #[test]
    fn latin1_fallback_decodes_accents() {
        // "CANTÓN" in ISO-8859-1
        let bytes = vec![b'C', b'A', b'N', b'T', 0xD3, b'N'];
        assert_eq!(decode_utf8_or_latin1(bytes), "CANTÓN");
        assert_eq!(decode_utf8_or_latin1("Ñ".as_bytes().to_vec()), "Ñ");
    }
}
