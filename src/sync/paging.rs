// SPDX-License-Identifier: MPL-2.0

/// An offset-paged list.
///
/// The offset of the next page is the number of items already held, so a
/// server-side insert between two page loads can shift items and produce a
/// duplicate or a skipped entry. Pages are never de-duplicated here.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    page_size: u32,
    has_more: bool,
}

impl<T> PagedList<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_size,
            has_more: true,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// False once a page came back shorter than `page_size`.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_offset(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Drop everything held and start over from `page`.
    pub fn replace(&mut self, page: Vec<T>) {
        self.has_more = page.len() >= self.page_size as usize;
        self.items = page;
    }

    pub fn append_page(&mut self, page: Vec<T>) {
        self.has_more = page.len() >= self.page_size as usize;
        self.items.extend(page);
    }

    /// Put a locally created item at the top (e.g. a comment just posted).
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.has_more = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_tracks_length() {
        let mut list = PagedList::new(3);
        assert_eq!(list.next_offset(), 0);

        list.replace(vec![1, 2, 3]);
        assert_eq!(list.next_offset(), 3);
        assert!(list.has_more());

        list.append_page(vec![4]);
        assert_eq!(list.items(), &[1, 2, 3, 4]);
        assert_eq!(list.next_offset(), 4);
        assert!(!list.has_more());
    }

    #[test]
    fn test_replace_discards_previous_pages() {
        let mut list = PagedList::new(2);
        list.replace(vec!["a", "b"]);
        list.append_page(vec!["c", "d"]);
        list.replace(vec!["x"]);
        assert_eq!(list.items(), &["x"]);
        assert!(!list.has_more());
    }

    #[test]
    fn test_overlapping_pages_are_kept_verbatim() {
        // A concurrent insert on the server shifted "b" into the next page.
        let mut list = PagedList::new(2);
        list.replace(vec!["a", "b"]);
        list.append_page(vec!["b", "c"]);
        assert_eq!(list.items(), &["a", "b", "b", "c"]);
    }

    #[test]
    fn test_prepend_and_clear() {
        let mut list = PagedList::new(10);
        list.replace(vec![2, 3]);
        list.prepend(1);
        assert_eq!(list.items(), &[1, 2, 3]);

        list.clear();
        assert!(list.is_empty());
        assert!(list.has_more());
    }
}
