use std::collections::HashMap;

use super::normalize::{aggressive_clean, clean_security_name};

/// Hand-verified name → exchange symbol pairs for names that the listing
/// matcher gets wrong or cannot find (renamed, merged or abbreviated companies).
const CURATED: &[(&str, &str)] = &[
    ("ADANI PORTS AND SPECIAL ECONOMIC ZONE LIMITED", "ADANIPORTS"),
    ("ASIAN PAINTS LIMITED", "ASIANPAINT"),
    ("BHARTI AIRTEL LIMITED", "BHARTIARTL"),
    ("COAL INDIA LTD", "COALINDIA"),
    ("HDFC BANK LIMITED", "HDFCBANK"),
    ("HINDUSTAN UNILEVER LIMITED", "HINDUNILVR"),
    ("INFOSYS LIMITED", "INFY"),
    ("LARSEN AND TOUBRO LIMITED", "LT"),
    ("LARSEN & TOUBRO LIMITED", "LT"),
    ("RELIANCE INDUSTRIES LIMITED", "RELIANCE"),
    ("RELIANCE POWER LIMITED", "RPOWER"),
    ("TATA CONSULTANCY SERVICES LIMITED", "TCS"),
    ("TATA STEEL LIMITED", "TATASTEEL"),
    ("CG POWER AND INDUSTRIAL SOLUTIONS LIMITED", "CGPOWER"),
    ("CHAMBAL FERTILISERS AND CHEMICALS LIMITED", "CHAMBLFERT"),
    ("CROMPTON GREAVES CONSUMER ELECTRICALS LIMITED", "CROMPTON"),
    ("JAIPRAKASH ASSOCIATES LIMITED", "JPASSOCIAT"),
    ("JIO FINANCIAL SERVICES LIMITED", "JIOFIN"),
    ("LTIMINDTREE LIMITED", "LTIM"),
    ("POWER GRID CORPORATION OF INDIA LIMITED", "POWERGRID"),
    ("BAJAJ FINANCE LIMITED", "BAJFINANCE"),
    ("REC LIMITED", "RECLTD"),
    ("SBI CARDS AND PAYMENT SERVICES LIMITED", "SBICARD"),
    ("LIC HOUSING FINANCE LTD", "LICHSGFIN"),
    ("STATE BANK OF INDIA", "SBIN"),
    ("GUJARAT STATE PETRONET LIMITED", "GSPL"),
    ("TORRENT POWER LIMITED", "TORNTPOWER"),
    ("MANGALORE REFINERY AND PETROCHEMICALS LIMITED", "MRPL"),
    ("OIL AND NATURAL GAS CORPORATION LIMITED", "ONGC"),
    ("INDIAN OIL CORPORATION LIMITED", "IOC"),
    ("BHARAT PETROLEUM CORPORATION LIMITED", "BPCL"),
    ("HCL TECHNOLOGIES LIMITED", "HCLTECH"),
    ("AUROBINDO PHARMA", "AUROPHARMA"),
    ("DR REDDY'S LABORATORIES LIMITED", "DRREDDY"),
    ("SUN PHARMACEUTICAL INDUSTRIES LIMITED", "SUNPHARMA"),
    ("CONTAINER CORPORATION OF INDIA", "CONCOR"),
    ("BHARAT ELECTRONICS LIMITED", "BEL"),
    ("BHARAT HEAVY ELECTRICALS LIMITED", "BHEL"),
    ("MAHINDRA & MAHINDRA LIMITED", "M&M"),
    ("MAHINDRA AND MAHINDRA LIMITED", "M&M"),
    ("BAJAJ AUTO LIMITED", "BAJAJ-AUTO"),
    ("HERO MOTOCORP LIMITED", "HEROMOTOCO"),
    ("ADITYA BIRLA FASHION AND RETAIL LIMITED", "ABFRL"),
    ("POLICYBAZAAR", "POLICYBZR"),
    ("WEST COAST PAPER MILLS LIMITED", "WSTCSTPAPR"),
    ("CREDO BRANDS MARKETING LIMITED", "MUFTI"),
    ("ACTION CONSTRUCTION EQUIPMENT LIMITED", "ACE"),
    ("ANIL LIMITED", "ANILLTD"),
    ("PAE LIMITED", "PAEL"),
    ("STERLITE TECHNOLOGIES LIMITED", "STLTECH"),
    ("L&T FINANCE LIMITED", "LTF"),
    ("DILIGENT MEDIA CORPORATION LIMITED", "DNAMEDIA"),
    ("KALPATARU PROJECTS INTERNATIONAL LIMITED", "KPIL"),
    ("SARASWATI SAREE DEPOT LIMITED", "SSDL"),
    ("TML COMMERCIAL VEHICLES LIMITED", "TMLCV"),
    ("W S INDUSTRIES (INDIA) LIMITED", "WSI"),
    ("GUJARAT STATE FERTILIZERS & CHEMICALS LTD", "GSFC"),
    ("IOL CHEMICALS AND PHARMACEUTICALS LIMITED", "IOLCP"),
    ("J.K. CEMENT LIMITED", "JKCEMENT"),
    ("INDUSIND BANK LTD", "INDUSINDBK"),
    ("GREAVES COTTON LIMITED", "GREAVESCOT"),
    ("JUBILANT PHARMOVA LIMITED", "JUBLPHARM"),
    ("NAVIN FLUORINE INTERNATIONAL LTD", "NAVINFLUOR"),
    ("D. B. CORP LIMITED", "DBCORP"),
    ("MOTILAL OSWAL FINANCIAL SERVICES LIMITED", "MOTILALOFS"),
    ("DIVI'S LABORATORIES LIMITED", "DIVISLAB"),
    ("3I INFOTECH LIMITED", "3IINFOTECH"),
    ("CANARA BANK", "CANBK"),
    ("NIIT LIMITED", "NIITLTD"),
    ("THE INDIAN HOTELS COMPANY LIMITED", "INDHOTEL"),
    ("V I P INDUSTRIES LIMITED", "VIPIND"),
    ("BIRLASOFT LIMITED", "BSOFT"),
    ("CENTRAL BANK OF INDIA", "CENTRALBK"),
    ("CITY UNION BANK LIMITED", "CUB"),
    ("ENGINEERS INDIA LIMITED", "ENGINERSIN"),
    ("INDO COUNT INDUSTRIES LIMITED", "ICIL"),
    ("SHREE RENUKA SUGARS LIMITED", "RENUKA"),
];

/// The curated lookup table consulted before any listing or heuristic match.
///
/// Lookups try, in order: the exact uppercased name, the name with face-value
/// decorations removed, then equality of the `aggressive_clean` forms.
/// Later inserts win, so file-based overrides replace built-in entries.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    exact: HashMap<String, String>,
    cleaned: HashMap<String, String>,
}

impl OverrideTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-loaded with the built-in curated entries.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (name, symbol) in CURATED {
            table.insert(name, symbol);
        }
        table
    }

    pub fn insert(&mut self, security_name: &str, symbol: &str) {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return;
        }
        let key = security_name.trim().to_uppercase();
        let cleaned = aggressive_clean(&clean_security_name(&key));
        if !cleaned.is_empty() {
            self.cleaned.insert(cleaned, symbol.clone());
        }
        self.exact.insert(key, symbol);
    }

    /// Merge `(security_name, symbol)` pairs, replacing existing entries.
    pub fn extend<I, N, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        for (name, symbol) in entries {
            self.insert(name.as_ref(), symbol.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Bare exchange symbol for a security name, if curated.
    pub fn lookup(&self, security_name: &str) -> Option<&str> {
        let upper = security_name.trim().to_uppercase();
        if let Some(symbol) = self.exact.get(&upper) {
            return Some(symbol);
        }
        if let Some(symbol) = self.exact.get(&clean_security_name(&upper)) {
            return Some(symbol);
        }
        let cleaned = aggressive_clean(&clean_security_name(&upper));
        if cleaned.is_empty() {
            return None;
        }
        self.cleaned.get(&cleaned).map(String::as_str)
    }
}
