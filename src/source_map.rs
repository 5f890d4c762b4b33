//! Mapping between memory locations and source code lines.

use std::iter::FromIterator;

/// Mapping from memory addresses into the 1-based numbers of the source lines that produced
/// them.
///
/// Words are loaded sequentially, so the address of an entry is its position in the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    lines: Vec<usize>,
}

impl FromIterator<usize> for SourceMap {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = usize>
    {
        SourceMap {
            lines: Vec::from_iter(iter),
        }
    }
}

impl SourceMap {
    /// Records that the next memory address was loaded from `line`.
    pub(crate) fn push(&mut self, line: usize) {
        self.lines.push(line);
    }

    /// Returns the source line which defined the value for the given memory location.
    pub fn get_source_line(&self, addr: usize) -> Option<usize> {
        self.lines.get(addr).copied()
    }

    /// Number of loaded words.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[test]
fn test_source_lines() {
    let map: SourceMap = vec![2, 3, 7].into_iter().collect();

    assert_eq!(map.len(), 3);
    assert_eq!(map.get_source_line(2), Some(7));
    assert_eq!(map.get_source_line(3), None);
}
