//! Single-range `Range` header parsing for file playback.
//!
//! Only `bytes` ranges are understood and only the first range of a header
//! is honored, which is what video element scrubbing produces in practice.

/// A satisfiable byte window within a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RangeError {
    Malformed,
    Unsatisfiable,
}

/// Parse a `Range` header value against the target file size.
///
/// Supports `bytes=a-b`, `bytes=a-` and the suffix form `bytes=-n`. An end
/// past the file is clamped per RFC 9110; a start past the file or an empty
/// window is unsatisfiable.
pub fn parse_range(header: &str, file_size: u64) -> Result<ByteRange, RangeError> {
    let window = header
        .strip_prefix("bytes=")
        .ok_or(RangeError::Malformed)?
        .split(',')
        .next()
        .ok_or(RangeError::Malformed)?
        .trim();

    let (start_part, end_part) = window.split_once('-').ok_or(RangeError::Malformed)?;

    if file_size == 0 {
        return Err(RangeError::Unsatisfiable);
    }

    let range = match (start_part.is_empty(), end_part.is_empty()) {
        // bytes=-n : final n bytes
        (true, false) => {
            let suffix: u64 = end_part.parse().map_err(|_| RangeError::Malformed)?;
            if suffix == 0 {
                return Err(RangeError::Unsatisfiable);
            }
            let start = file_size.saturating_sub(suffix);
            ByteRange {
                start,
                end: file_size - 1,
            }
        }
        // bytes=a- : from a to the end
        (false, true) => {
            let start: u64 = start_part.parse().map_err(|_| RangeError::Malformed)?;
            ByteRange {
                start,
                end: file_size - 1,
            }
        }
        // bytes=a-b
        (false, false) => {
            let start: u64 = start_part.parse().map_err(|_| RangeError::Malformed)?;
            let end: u64 = end_part.parse().map_err(|_| RangeError::Malformed)?;
            if end < start {
                return Err(RangeError::Malformed);
            }
            ByteRange {
                start,
                end: end.min(file_size - 1),
            }
        }
        (true, true) => return Err(RangeError::Malformed),
    };

    if range.start >= file_size {
        return Err(RangeError::Unsatisfiable);
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounded_range() {
        assert_eq!(
            parse_range("bytes=0-99", 1000),
            Ok(ByteRange { start: 0, end: 99 })
        );
        assert_eq!(parse_range("bytes=0-99", 1000).unwrap().length(), 100);
    }

    #[test]
    fn parses_open_ended_range() {
        assert_eq!(
            parse_range("bytes=500-", 1000),
            Ok(ByteRange {
                start: 500,
                end: 999
            })
        );
    }

    #[test]
    fn parses_suffix_range() {
        assert_eq!(
            parse_range("bytes=-100", 1000),
            Ok(ByteRange {
                start: 900,
                end: 999
            })
        );
        // Suffix longer than the file covers the whole file
        assert_eq!(
            parse_range("bytes=-5000", 1000),
            Ok(ByteRange { start: 0, end: 999 })
        );
    }

    #[test]
    fn clamps_end_to_file_size() {
        assert_eq!(
            parse_range("bytes=900-5000", 1000),
            Ok(ByteRange {
                start: 900,
                end: 999
            })
        );
    }

    #[test]
    fn only_honors_first_range() {
        assert_eq!(
            parse_range("bytes=0-1,50-99", 1000),
            Ok(ByteRange { start: 0, end: 1 })
        );
    }

    #[test]
    fn rejects_start_past_end_of_file() {
        assert_eq!(
            parse_range("bytes=1000-", 1000),
            Err(RangeError::Unsatisfiable)
        );
        assert_eq!(
            parse_range("bytes=2000-3000", 1000),
            Err(RangeError::Unsatisfiable)
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(parse_range("bytes=abc-", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range("bytes=-", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range("items=0-99", 1000), Err(RangeError::Malformed));
        assert_eq!(parse_range("bytes=9-5", 1000), Err(RangeError::Malformed));
    }

    #[test]
    fn rejects_empty_file() {
        assert_eq!(
            parse_range("bytes=0-", 0),
            Err(RangeError::Unsatisfiable)
        );
    }
}
