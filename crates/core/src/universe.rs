/// Blue-chip candidates (IDX, Yahoo-style `.JK` codes).
pub const BLUECHIP_STOCKS: [&str; 20] = [
    "BBCA.JK", "BBRI.JK", "BMRI.JK", "TLKM.JK", "ASII.JK", "UNVR.JK", "ICBP.JK", "INDF.JK",
    "KLBF.JK", "SIDO.JK", "CPIN.JK", "JPFA.JK", "MYOR.JK", "SMGR.JK", "INTP.JK", "AKRA.JK",
    "AMRT.JK", "ACES.JK", "MAPI.JK", "ERAA.JK",
];

/// Growth candidates.
pub const GROWTH_STOCKS: [&str; 25] = [
    "ADRO.JK", "PTBA.JK", "ITMG.JK", "ANTM.JK", "INCO.JK", "MDKA.JK", "PGAS.JK", "BRPT.JK",
    "ESSA.JK", "TPIA.JK", "EXCL.JK", "ISAT.JK", "TBIG.JK", "TOWR.JK", "WIKA.JK", "PTPP.JK",
    "ADHI.JK", "MEDC.JK", "HRUM.JK", "GOTO.JK", "BRIS.JK", "BUKA.JK", "MAPA.JK", "HMSP.JK",
    "GGRM.JK",
];

/// Tickers summarized by the market overview, as (label, code).
pub const MARKET_TICKERS: [(&str, &str); 3] =
    [("IHSG", "^JKSE"), ("BBCA", "BBCA.JK"), ("TLKM", "TLKM.JK")];

const EXCHANGE_SUFFIX: &str = ".JK";

#[derive(Debug, Clone)]
pub struct UniverseOptions {
    pub growth: Vec<String>,
    pub blue_chip: Vec<String>,

    /// Number of instruments kept per equity class.
    pub top_n: usize,
}

impl Default for UniverseOptions {
    fn default() -> Self {
        Self {
            growth: GROWTH_STOCKS.iter().map(|s| s.to_string()).collect(),
            blue_chip: BLUECHIP_STOCKS.iter().map(|s| s.to_string()).collect(),
            top_n: 3,
        }
    }
}

impl UniverseOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Some(list) = std::env::var("GROWTH_UNIVERSE").ok().and_then(|s| parse_codes(&s)) {
            out.growth = list;
        }

        if let Some(list) = std::env::var("BLUECHIP_UNIVERSE").ok().and_then(|s| parse_codes(&s)) {
            out.blue_chip = list;
        }

        if let Ok(s) = std::env::var("TOP_N") {
            if let Ok(n) = s.parse::<usize>() {
                out.top_n = n.max(1);
            }
        }

        out
    }
}

/// Comma-separated codes; `None` when nothing usable is left after trimming.
fn parse_codes(s: &str) -> Option<Vec<String>> {
    let out: Vec<String> = s
        .split(',')
        .map(|part| part.trim().to_ascii_uppercase())
        .filter(|part| !part.is_empty())
        .collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Code as shown to clients, without the exchange suffix.
pub fn display_code(code: &str) -> &str {
    code.strip_suffix(EXCHANGE_SUFFIX).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universes() {
        let opts = UniverseOptions::default();
        assert_eq!(opts.growth.len(), 25);
        assert_eq!(opts.blue_chip.len(), 20);
        assert_eq!(opts.top_n, 3);
        assert_eq!(opts.blue_chip[0], "BBCA.JK");
    }

    #[test]
    fn strips_exchange_suffix() {
        assert_eq!(display_code("BBCA.JK"), "BBCA");
        assert_eq!(display_code("^JKSE"), "^JKSE");
    }

    #[test]
    fn parses_code_lists() {
        assert_eq!(
            parse_codes(" bbca.jk, TLKM.JK ,,"),
            Some(vec!["BBCA.JK".to_string(), "TLKM.JK".to_string()])
        );
        assert_eq!(parse_codes(" , "), None);
    }
}
