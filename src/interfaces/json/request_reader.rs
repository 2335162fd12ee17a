use super::quote_request::QuoteRequest;
use crate::error::{PricingError, Result};
use std::io::{BufRead, BufReader, Read};

/// Reads newline-delimited JSON quote requests.
///
/// Each non-blank line is decoded on its own, so one malformed request does
/// not stop the rest of the stream.
pub struct QuoteRequestReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> QuoteRequestReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Lazily yields one result per non-blank line.
    pub fn requests(self) -> impl Iterator<Item = Result<QuoteRequest>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(PricingError::from)),
            Err(e) => Some(Err(PricingError::from(e))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = concat!(
            r#"{"packageSlug":"apartment-basic"}"#,
            "\n\n",
            r#"{"packageSlug":"house-pro","options":{"cameras":7}}"#,
            "\n"
        );
        let reader = QuoteRequestReader::new(data.as_bytes());
        let results: Vec<Result<QuoteRequest>> = reader.requests().collect();

        assert_eq!(results.len(), 2);
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.slug().unwrap(), "house-pro");
        assert_eq!(second.options.cameras, Some(7));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "{not json}\n{\"packageSlug\":\"apartment-basic\"}";
        let reader = QuoteRequestReader::new(data.as_bytes());
        let results: Vec<Result<QuoteRequest>> = reader.requests().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
