//! Security-name normalization used by every resolution stage.
//!
//! Holdings exports decorate names with equity markers and face values
//! ("INFOSYS LIMITED EQ FV RS 5"), while the exchange listing uses the plain
//! registered name ("Infosys Limited"). Three cleaners of increasing strength
//! bring both sides to a comparable form.

use std::sync::OnceLock;

use regex::Regex;

/// Face-value and equity-marker fragments removed by `clean_security_name`, in order.
const SECURITY_NAME_NOISE: &[&str] = &[
    " EQ NEW RS. 2/-",
    " EQ NEW RS. 2/",
    " EQ NEW FV RS. 2/-",
    " EQ NEW",
    " RS. 10/-",
    " RS. 2/-",
    " EQ",
    " NEW",
    " FV RS. 10/-",
    " FV RS. 2/-",
    " 10/-",
    " 2/-",
];

/// Markers that identify debt, preference or fund units rather than equity.
const NON_EQUITY_PATTERN: &str = r"\b(BD|BONDS?|ETF|PREF[A-Z]*|DEBENTURES?|NCD)\b|MUTUAL FUND";

fn legal_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(LIMITED|LTD|PRIVATE|PVT|COMPANY|CO|CORPORATION|CORP|ENTERPRISES|INDUSTRIES|INTERNATIONAL)\b",
        )
        .expect("static regex")
    })
}

fn equity_marker_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)\bEQ\s*NEW.*",
            r"(?i)\bEQ\s*EQ",
            r"(?i)\bEQ\s*F\.?V\.?.*",
            r"(?i)\bEQ\s*RS\.?.*",
            r"(?i)\bNEW\s*FV.*",
            r"(?i)\bNEW\s*RS\.?.*",
            r"(?i)\bF\.?V\.?\s*RS\.?.*",
            r"(?i)\bRE\.?\s*\d+",
            r"(?i)\bRS\.?\s*\d+",
            r"\d+/-",
            r"\d+/\d+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static regex"))
        .collect()
    })
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s&]").expect("static regex"))
}

fn non_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Z\s&]").expect("static regex"))
}

fn generic_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(LIMITED|LTD|COMPANY|CORPORATION|INDUSTRIES|INDIA|INTERNATIONAL|PRIVATE|PUBLIC|ENTERPRISES)\b",
        )
        .expect("static regex")
    })
}

fn non_equity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NON_EQUITY_PATTERN).expect("static regex"))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Light cleaning: uppercase and strip the face-value / `EQ` decorations of a
/// holdings export. Legal suffixes such as LIMITED are kept.
pub fn clean_security_name(name: &str) -> String {
    let mut clean = name.trim().to_uppercase();
    for noise in SECURITY_NAME_NOISE {
        clean = clean.replace(noise, "");
    }
    collapse_whitespace(&clean)
}

/// Listing-comparison cleaning: drop legal suffixes, equity markers and
/// punctuation (ampersands survive).
pub fn clean_company_name(name: &str) -> String {
    let upper = name.to_uppercase();
    let mut clean = legal_suffix_re().replace_all(&upper, "").into_owned();
    for re in equity_marker_res() {
        clean = re.replace_all(&clean, "").into_owned();
    }
    let clean = punctuation_re().replace_all(&clean, " ");
    collapse_whitespace(&clean)
}

/// Strongest cleaning, used for override-table and symbol lookups: cut at
/// preference/bond/fund markers, keep letters only and drop generic words
/// such as INDIA or INDUSTRIES.
pub fn aggressive_clean(name: &str) -> String {
    let mut upper = name.to_uppercase();
    for stop in ["PREF", "BD ", "BOND", "ETF", "MUTUAL FUND"] {
        if let Some(idx) = upper.find(stop) {
            upper.truncate(idx);
        }
    }
    let letters = non_letter_re().replace_all(&upper, "");
    let clean = generic_word_re().replace_all(&letters, "");
    collapse_whitespace(&clean)
}

/// True for bonds, debentures, preference shares and fund units, which have
/// no equity ticker.
pub fn is_non_equity(name: &str) -> bool {
    non_equity_re().is_match(&name.to_uppercase())
}
