//! Offset pagination shared by the public and admin listings.

use serde::Serialize;

/// Page size of the public listing.
pub const PUBLIC_PAGE_SIZE: usize = 9;
/// Page size of the admin listing.
pub const ADMIN_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// A zero page or page size is lifted to one; out-of-range pages are kept.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page)
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl PaginationInfo {
    pub fn new(request: PageRequest, total_items: usize) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_pages(total_items, request.per_page),
            total_items,
            items_per_page: request.per_page,
        }
    }

    pub fn contains(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PaginationInfo,
}

impl<T> Page<T> {
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

/// `ceil(total_items / per_page)`, zero for an empty collection.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1))
}

/// Slice `[(page-1)*per_page, page*per_page)` out of `items`.
///
/// Pages past the end produce an empty slice; the stage never clamps.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let info = PaginationInfo::new(request, items.len());
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.per_page)
        .collect();
    Page { items, info }
}

/// One entry of a numbered page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Numbered links around the current page: always the first and last page,
/// the neighbours of the current page, and gaps where pages are skipped.
pub fn page_links(info: &PaginationInfo) -> Vec<PageLink> {
    let total = info.total_pages;
    let current = info.current_page;
    let mut links = Vec::new();

    for page in 1..=total {
        let near_current = page + 1 >= current && page <= current + 1;
        if total <= 5 || page == 1 || page == total || near_current {
            links.push(PageLink::Page(page));
        } else if page + 2 == current || page == current + 2 {
            links.push(PageLink::Gap);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_items_fit_on_one_page() {
        let page = paginate((1..=9).collect::<Vec<_>>(), PageRequest::first(9));
        assert_eq!(page.info.total_pages, 1);
        assert_eq!(page.items.len(), 9);
    }

    #[test]
    fn ten_items_spill_onto_a_second_page() {
        let items: Vec<u32> = (1..=10).collect();
        let first = paginate(items.clone(), PageRequest::new(1, 9));
        let second = paginate(items, PageRequest::new(2, 9));

        assert_eq!(first.info.total_pages, 2);
        assert_eq!(first.items.len(), 9);
        assert_eq!(second.items, vec![10]);
    }

    #[test]
    fn pages_reconstruct_the_input() {
        let items: Vec<u32> = (1..=23).collect();
        let per_page = 5;
        let pages = total_pages(items.len(), per_page);
        let rebuilt: Vec<u32> = (1..=pages)
            .flat_map(|page| paginate(items.clone(), PageRequest::new(page, per_page)).items)
            .collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn out_of_range_page_is_empty_not_clamped() {
        let page = paginate(vec![1, 2, 3], PageRequest::new(4, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.info.current_page, 4);
        assert_eq!(page.info.total_pages, 2);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), PageRequest::first(9));
        assert_eq!(page.info.total_pages, 0);
        assert!(!page.info.contains(1));
    }

    #[test]
    fn page_links_insert_gaps_for_long_ranges() {
        let info = PaginationInfo::new(PageRequest::new(5, 9), 90);
        assert_eq!(
            page_links(&info),
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(4),
                PageLink::Page(5),
                PageLink::Page(6),
                PageLink::Gap,
                PageLink::Page(10),
            ]
        );
    }

    #[test]
    fn page_links_list_everything_for_short_ranges() {
        let info = PaginationInfo::new(PageRequest::new(2, 9), 40);
        assert_eq!(
            page_links(&info),
            (1..=5).map(PageLink::Page).collect::<Vec<_>>()
        );
    }
}
