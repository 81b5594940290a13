//! Ticker list files.

use std::io::BufRead;

/// Read tickers separated by commas, whitespace or new lines. Blank entries are skipped.
pub fn parse_ticker_list<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut tickers = Vec::new();

    for line in reader.lines() {
        let line = line?;
        tickers.extend(
            line.split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        );
    }
    Ok(tickers)
}
