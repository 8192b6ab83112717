/// Maps byte offsets to 1-based line and column numbers.
///
/// Columns count characters, not bytes, so a finding after a multi-byte
/// character still lands on the column an editor shows.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Indexes `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Number of lines, counting a trailing empty line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based `(line, column)` of `offset`. Offsets past the end clamp to
    /// the end of the text.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        let column = self
            .text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::LineIndex;

    #[test]
    fn first_line_and_column_are_one() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(2), (1, 3));
    }

    #[test]
    fn offsets_after_newlines() {
        let index = LineIndex::new("@Composable\nfun Something()\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(12), (2, 1));
        assert_eq!(index.line_col(16), (2, 5));
        assert_eq!(index.line_col(11), (1, 12));
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("// é\nfun ü()");
        assert_eq!(index.line_col("// é\nfun ".len()), (2, 5));
        assert_eq!(index.line_col("// é".len()), (1, 5));
    }

    #[test]
    fn clamps_past_end() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.line_col(99), (2, 1));
    }
}
