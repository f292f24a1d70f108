/// One page of a paginated list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Accumulates pages behind a "load more" control.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    loaded_page: u32,
    total_pages: Option<u32>,
    total: u64,
    limit: u32,
}

impl<T> PagedList<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            loaded_page: 0,
            total_pages: None,
            total: 0,
            limit: limit.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Page number to request next (1-based).
    pub fn next_page(&self) -> u32 {
        self.loaded_page + 1
    }

    /// True until a page reports it is the last one.
    pub fn has_more(&self) -> bool {
        match self.total_pages {
            None => true,
            Some(total_pages) => self.loaded_page < total_pages,
        }
    }

    /// Append a page; returns how many items were added.
    ///
    /// Pages that are not the next one expected are dropped. Items whose
    /// key is already in the list (an entry prepended locally that the
    /// server now pages in) are skipped.
    pub fn extend_unique<K, F>(&mut self, page: Page<T>, key: F) -> usize
    where
        K: PartialEq + ?Sized,
        F: Fn(&T) -> &K,
    {
        if page.page != self.next_page() {
            tracing::debug!(
                expected = self.next_page(),
                got = page.page,
                "Dropping out-of-order page"
            );
            return 0;
        }
        let mut added = 0;
        for item in page.items {
            if self.items.iter().any(|seen| key(seen) == key(&item)) {
                continue;
            }
            self.items.push(item);
            added += 1;
        }
        self.loaded_page = page.page;
        self.total_pages = Some(page.total_pages);
        self.total = page.total;
        added
    }

    /// Put an item at the front (a freshly posted entry).
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
        self.total += 1;
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.loaded_page = 0;
        self.total_pages = None;
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, items: Vec<u32>, total_pages: u32) -> Page<u32> {
        Page {
            items,
            page: n,
            limit: 2,
            total: 3,
            total_pages,
        }
    }

    #[test]
    fn load_more_until_last_page() {
        let mut list = PagedList::new(2);
        assert!(list.has_more());
        assert_eq!(list.next_page(), 1);

        assert_eq!(list.extend_unique(page(1, vec![1, 2], 2), |n| n), 2);
        assert!(list.has_more());
        assert_eq!(list.extend_unique(page(2, vec![3], 2), |n| n), 1);
        assert!(!list.has_more());
        assert_eq!(list.items(), &[1, 2, 3]);
    }

    #[test]
    fn out_of_order_page_is_dropped() {
        let mut list = PagedList::new(2);
        assert_eq!(list.extend_unique(page(2, vec![3], 2), |n| n), 0);
        assert!(list.items().is_empty());
    }

    #[test]
    fn prepended_item_is_not_repeated_by_later_page() {
        let mut list = PagedList::new(2);
        list.extend_unique(page(1, vec![1, 2], 2), |n| n);
        list.prepend(3);

        assert_eq!(list.extend_unique(page(2, vec![3], 2), |n| n), 0);
        assert_eq!(list.items(), &[3, 1, 2]);
        assert!(!list.has_more());
    }

    #[test]
    fn reset_starts_over() {
        let mut list = PagedList::new(2);
        list.extend_unique(page(1, vec![1, 2], 2), |n| n);
        list.reset();
        assert_eq!(list.next_page(), 1);
        assert!(list.items().is_empty());
        assert_eq!(list.total(), 0);
    }
}
