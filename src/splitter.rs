use memchr::memchr_iter;

/// Cuts a chunked byte stream into raw records.
///
/// A record starts at a `>` that is the first byte of the stream or directly
/// follows a `\n`, and runs up to the next such `>`. The byte before each
/// chunk is remembered so a `\n` at the end of one chunk and a `>` at the
/// start of the next still form a delimiter. Bytes before the first
/// delimiter are discarded.
#[derive(Debug)]
pub struct RecordSplitter {
    carry: Vec<u8>,
    in_record: bool,
    at_line_start: bool,
    discarded: usize,
}

impl Default for RecordSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSplitter {
    pub fn new() -> Self {
        Self {
            carry: Vec::new(),
            in_record: false,
            at_line_start: true,
            discarded: 0,
        }
    }

    /// Feeds one chunk and returns every record it completes, in stream order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut records = Vec::new();
        let Some(&last) = chunk.last() else {
            return records;
        };

        let mut start = 0;
        for pos in memchr_iter(b'>', chunk) {
            let line_initial = if pos == 0 {
                self.at_line_start
            } else {
                chunk[pos - 1] == b'\n'
            };
            if !line_initial {
                continue;
            }

            if self.in_record {
                self.carry.extend_from_slice(&chunk[start..pos]);
                records.push(std::mem::take(&mut self.carry));
            } else {
                self.discarded += pos - start;
                self.in_record = true;
            }
            start = pos;
        }

        if self.in_record {
            self.carry.extend_from_slice(&chunk[start..]);
        } else {
            self.discarded += chunk.len() - start;
        }
        self.at_line_start = last == b'\n';

        records
    }

    /// Returns the trailing record once the input is exhausted.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.carry.is_empty() {
            return None;
        }
        self.in_record = false;
        Some(std::mem::take(&mut self.carry))
    }

    pub fn has_carry(&self) -> bool {
        !self.carry.is_empty()
    }

    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Number of bytes dropped before the first delimiter.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

/// Counts record delimiters in a chunked stream without keeping any record.
#[derive(Debug)]
pub struct DelimiterCounter {
    count: usize,
    at_line_start: bool,
}

impl Default for DelimiterCounter {
    fn default() -> Self {
        Self {
            count: 0,
            at_line_start: true,
        }
    }
}

impl DelimiterCounter {
    pub fn push(&mut self, chunk: &[u8]) {
        let Some(&last) = chunk.last() else {
            return;
        };
        self.count += memchr_iter(b'>', chunk)
            .filter(|&pos| {
                if pos == 0 {
                    self.at_line_start
                } else {
                    chunk[pos - 1] == b'\n'
                }
            })
            .count();
        self.at_line_start = last == b'\n';
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_all(data: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
        let mut splitter = RecordSplitter::new();
        let mut records = Vec::new();
        for chunk in data.chunks(chunk_size) {
            records.extend(splitter.push(chunk));
        }
        records.extend(splitter.finish());
        records
    }

    #[test]
    fn test_multiple_records_in_one_chunk() {
        let mut splitter = RecordSplitter::new();
        let records = splitter.push(b">a\nAC\n>b\nGT\n>c\n");
        assert_eq!(records, vec![b">a\nAC\n".to_vec(), b">b\nGT\n".to_vec()]);
        assert!(splitter.has_carry());
        assert_eq!(splitter.finish(), Some(b">c\n".to_vec()));
        assert!(!splitter.has_carry());
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_records_are_byte_exact_for_any_chunk_size() {
        let data = b">a x\nAC\nGT\n>b\n\n>c\nT>T\n>d";
        let expected = split_all(data, data.len());
        assert_eq!(expected.concat(), data.to_vec());
        assert_eq!(expected.len(), 4);
        for size in 1..data.len() {
            assert_eq!(split_all(data, size), expected, "chunk size {size}");
        }
    }

    #[test]
    fn test_delimiter_is_last_byte_of_chunk() {
        let mut splitter = RecordSplitter::new();
        assert!(splitter.push(b">a\nAC\n>").len() == 1);
        assert!(splitter.push(b"b\nGT").is_empty());
        assert_eq!(splitter.finish(), Some(b">b\nGT".to_vec()));
    }

    #[test]
    fn test_terminator_and_delimiter_split_across_chunks() {
        let mut splitter = RecordSplitter::new();
        assert!(splitter.push(b">a\nAC\n").is_empty());
        assert_eq!(splitter.push(b">b\n"), vec![b">a\nAC\n".to_vec()]);
        assert_eq!(splitter.finish(), Some(b">b\n".to_vec()));
    }

    #[test]
    fn test_mid_line_gt_is_not_a_delimiter() {
        let mut splitter = RecordSplitter::new();
        assert!(splitter.push(b">a\nAC").is_empty());
        assert!(splitter.push(b">GT\n").is_empty());
        assert_eq!(splitter.finish(), Some(b">a\nAC>GT\n".to_vec()));
    }

    #[test]
    fn test_leading_garbage_discarded() {
        let records = split_all(b"junk>x\nmore\n>a\nAC\n", 3);
        assert_eq!(records, vec![b">a\nAC\n".to_vec()]);

        let mut splitter = RecordSplitter::new();
        splitter.push(b"junk\n>a\n");
        assert_eq!(splitter.discarded(), 5);
    }

    #[test]
    fn test_no_delimiter_at_all() {
        assert!(split_all(b"ACGT\nACGT\n", 4).is_empty());
        assert!(split_all(b"", 4).is_empty());
    }

    #[test]
    fn test_counter_matches_splitter() {
        let data = b">a\nAC\n>b\n>c\nA>C\n";
        for size in 1..=data.len() {
            let mut counter = DelimiterCounter::default();
            for chunk in data.chunks(size) {
                counter.push(chunk);
            }
            assert_eq!(counter.count(), 3);
        }
    }
}
