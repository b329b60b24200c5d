use memchr::memmem;

/// Byte offsets of every place `fragment` starts in `line`, overlapping
/// matches included: after a match at `p` the search resumes at `p + 1`, not
/// at `p + fragment.len()`.
///
/// Comparison is on raw bytes, so lines in any encoding are matched as they
/// are stored. An empty fragment matches nothing.
pub fn overlapping_matches<'a>(
    line: &'a [u8],
    fragment: &'a [u8],
) -> impl Iterator<Item = usize> + 'a {
    let finder = memmem::Finder::new(fragment);
    let mut from = if fragment.is_empty() { None } else { Some(0) };
    std::iter::from_fn(move || {
        let start = from?;
        match finder.find(&line[start..]) {
            Some(offset) => {
                let pos = start + offset;
                from = Some(pos + 1);
                Some(pos)
            }
            None => {
                from = None;
                None
            }
        }
    })
}

/// Number of overlapping occurrences of `fragment` in `line`
pub fn count_overlapping(line: &[u8], fragment: &[u8]) -> usize {
    overlapping_matches(line, fragment).count()
}
