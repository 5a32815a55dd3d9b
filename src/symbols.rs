use crate::config::SymbolMode;

/// Identifiers longer than this are treated as options by the length heuristic.
pub const OPTION_SYMBOL_MIN_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Equity,
    Option,
}

/// Decide which class a single identifier belongs to.
///
/// [`SymbolMode::Length`] is an approximation: OCC option symbols run to 15+
/// characters, tickers rarely pass 5, and 13 sits between the two. It does
/// not inspect the identifier at all. [`SymbolMode::Strict`] requires the
/// full OCC layout instead.
pub fn asset_class(symbol: &str, mode: SymbolMode) -> AssetClass {
    let is_option = match mode {
        SymbolMode::Length => symbol.chars().count() > OPTION_SYMBOL_MIN_LEN,
        SymbolMode::Strict => is_occ_symbol(symbol),
    };
    if is_option {
        AssetClass::Option
    } else {
        AssetClass::Equity
    }
}

/// Split a mixed list into `(equities, options)`, keeping input order and duplicates.
pub fn classify<S: AsRef<str>>(symbols: &[S], mode: SymbolMode) -> (Vec<String>, Vec<String>) {
    let mut equities = Vec::new();
    let mut options = Vec::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        match asset_class(symbol, mode) {
            AssetClass::Equity => equities.push(symbol.to_string()),
            AssetClass::Option => options.push(symbol.to_string()),
        }
    }
    (equities, options)
}

/// `ROOT` (1-6 alphanumerics) + `YYMMDD` + `C`/`P` + 8-digit strike, e.g. `TSLA250117C00360000`.
pub fn is_occ_symbol(symbol: &str) -> bool {
    let bytes = symbol.as_bytes();
    if bytes.len() < 16 || bytes.len() > 21 {
        return false;
    }

    let (rest, strike) = bytes.split_at(bytes.len() - 8);
    let (rest, kind) = rest.split_at(rest.len() - 1);
    let (root, expiry) = rest.split_at(rest.len() - 6);

    let digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);

    !root.is_empty()
        && root.iter().all(u8::is_ascii_alphanumeric)
        && digits(expiry)
        && valid_expiry(expiry)
        && matches!(kind, [b'C'] | [b'P'] | [b'c'] | [b'p'])
        && digits(strike)
}

fn valid_expiry(expiry: &[u8]) -> bool {
    let month = (expiry[2] - b'0') * 10 + (expiry[3] - b'0');
    let day = (expiry[4] - b'0') * 10 + (expiry[5] - b'0');
    (1..=12).contains(&month) && (1..=31).contains(&day)
}
