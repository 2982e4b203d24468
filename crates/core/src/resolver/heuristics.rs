/// Symbol guesses for a name the listing could not place.
///
/// `base_name` should already be passed through `clean_security_name`.
/// Guesses, each combined with every suffix in order:
/// - the first word ("BOSCH LIMITED" → "BOSCH")
/// - the first two words joined ("ZEE ENTERTAINMENT" → "ZEEENTERTAINMENT")
/// - the initials of the name without LIMITED/LTD, when longer than two letters
///   ("GUJARAT NARMADA VALLEY FERTILIZERS LIMITED" → "GNVF")
///
/// Duplicates are removed, keeping the first occurrence.
pub fn candidate_symbols(base_name: &str, suffixes: &[String]) -> Vec<String> {
    let words: Vec<String> = base_name
        .split_whitespace()
        .map(symbol_chars)
        .filter(|w| !w.is_empty())
        .collect();

    let mut bases: Vec<String> = Vec::new();
    if let Some(first) = words.first() {
        bases.push(first.clone());
        if let Some(second) = words.get(1) {
            bases.push(format!("{first}{second}"));
        }
    }

    let upper = base_name.to_uppercase();
    if upper.contains(" LIMITED") || upper.contains(" LTD") {
        let stripped = upper.replace(" LIMITED", "").replace(" LTD", "");
        let initials: String = stripped
            .split_whitespace()
            .filter_map(|w| symbol_chars(w).chars().next())
            .collect();
        if initials.len() > 2 {
            bases.push(initials);
        }
    }

    let mut candidates: Vec<String> = Vec::new();
    for base in &bases {
        for suffix in suffixes {
            let candidate = format!("{base}{suffix}");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Characters that may appear in an exchange symbol.
fn symbol_chars(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '&' || *c == '-')
        .collect::<String>()
        .to_uppercase()
}
