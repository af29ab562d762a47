use crate::error::{QuoteError, Result};

/// Canonicalise a user-supplied ticker for use in a request path.
///
/// Accepts the provider's symbol alphabet (`^GSPC`, `BRK-B`, `EURUSD=X`, `7203.T`) and
/// rejects anything that would change the URL structure.
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_ascii_uppercase();

    let valid = !ticker.is_empty()
        && ticker
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '=' | '_'));

    if valid {
        Ok(ticker)
    } else {
        Err(QuoteError::InvalidTicker(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(normalize_ticker(" brk-b ").unwrap(), "BRK-B");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert_eq!(normalize_ticker("eurusd=x").unwrap(), "EURUSD=X");
    }

    #[test]
    fn rejects_path_breaking_input() {
        for raw in ["", "   ", "AAPL/../x", "AAPL?x=1", "A APL", "AAPL#"] {
            assert!(normalize_ticker(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
