//! Search-context stack.
//!
//! Element searches start from the innermost context: an element the
//! scenario changed context to, or the document of the current frame or page.

use crate::browser::ElementHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchContext {
    Page,
    Element(ElementHandle),
    /// Frame entered through its `<iframe>` element.
    Frame(ElementHandle),
}

static PAGE: SearchContext = SearchContext::Page;

impl SearchContext {
    fn is_root(&self) -> bool {
        !matches!(self, Self::Element(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContextStack {
    entries: Vec<SearchContext>,
}

impl Default for SearchContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContextStack {
    pub fn new() -> Self {
        Self {
            entries: vec![SearchContext::Page],
        }
    }

    pub fn current(&self) -> &SearchContext {
        self.entries.last().unwrap_or(&PAGE)
    }

    /// Element that searches are scoped to, or `None` for the document root.
    pub fn current_root(&self) -> Option<&ElementHandle> {
        match self.current() {
            SearchContext::Element(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn push_element(&mut self, element: ElementHandle) {
        tracing::debug!(%element, "changing search context");
        self.entries.push(SearchContext::Element(element));
    }

    /// Drop element contexts down to the current page or frame root.
    pub fn reset_elements(&mut self) {
        while self.entries.len() > 1 && !self.current().is_root() {
            self.entries.pop();
        }
    }

    pub fn enter_frame(&mut self, frame: ElementHandle) {
        self.reset_elements();
        tracing::debug!(%frame, "entering frame");
        self.entries.push(SearchContext::Frame(frame));
    }

    /// Leave the innermost frame. Returns `false` when already at page level.
    pub fn leave_frame(&mut self) -> bool {
        self.reset_elements();
        if matches!(self.current(), SearchContext::Frame(_)) {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    pub fn frame_depth(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, SearchContext::Frame(_)))
            .count()
    }

    /// Back to the top-level page, e.g. after switching windows.
    pub fn reset(&mut self) {
        self.entries.truncate(1);
    }
}
