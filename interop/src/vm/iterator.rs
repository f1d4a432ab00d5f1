/// Forward only cursor over the result of a storage search
///
/// The cursor starts before the first entry; `advance` must be called before
/// reading a key or a value. It cannot be rewound.
#[derive(Debug, Clone)]
pub struct StorageIterator {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    position: Option<usize>,
}

impl StorageIterator {
    pub fn new(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            entries,
            position: None,
        }
    }

    // Move to the next entry, false once past the end
    pub fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p.saturating_add(1));
        self.position = Some(next.min(self.entries.len()));
        next < self.entries.len()
    }

    fn current(&self) -> Option<&(Vec<u8>, Vec<u8>)> {
        self.position.and_then(|p| self.entries.get(p))
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.current().map(|(k, _)| k.as_slice())
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.current().map(|(_, v)| v.as_slice())
    }

    // Cursor position reported in errors, -1 before the first `advance`
    pub fn position(&self) -> i64 {
        self.position.map_or(-1, |p| p as i64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_entries_once() {
        let mut it = StorageIterator::new(vec![
            (b"a".to_vec(), b"1".to_vec()),
            (b"b".to_vec(), b"2".to_vec()),
        ]);
        assert!(it.key().is_none());
        assert_eq!(it.position(), -1);

        assert!(it.advance());
        assert_eq!(it.key(), Some(&b"a"[..]));
        assert_eq!(it.value(), Some(&b"1"[..]));

        assert!(it.advance());
        assert_eq!(it.key(), Some(&b"b"[..]));

        assert!(!it.advance());
        assert!(it.key().is_none());
        assert!(!it.advance());
    }

    #[test]
    fn test_empty_iterator() {
        let mut it = StorageIterator::new(Vec::new());
        assert!(it.is_empty());
        assert!(!it.advance());
        assert!(it.value().is_none());
    }
}
