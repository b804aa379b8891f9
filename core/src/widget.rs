//! Hosting widgets for the job list.
//!
//! `ListWidget` is the seam a platform list view plugs into: the adapter
//! calls `data_set_changed` and the widget pulls rows back out through the
//! adapter. `RecyclingList` is a headless implementation with a fixed
//! viewport that keeps a pool of row views and reuses them across renders
//! and scroll positions.

use crate::adapter::{JobListAdapter, RowView};

pub trait ListWidget {
    /// The backing list changed wholesale; re-render from `adapter`.
    fn data_set_changed(&mut self, adapter: &JobListAdapter<'_>);
}

#[derive(Debug, Clone)]
pub struct RecyclingList {
    viewport: usize,
    first: usize,
    row_count: usize,
    pool: Vec<RowView>,
    visible: usize,
    created: usize,
    renders: usize,
}

impl RecyclingList {
    /// A list showing at most `viewport` rows at a time.
    pub fn new(viewport: usize) -> Self {
        Self {
            viewport,
            first: 0,
            row_count: 0,
            pool: Vec::new(),
            visible: 0,
            created: 0,
            renders: 0,
        }
    }

    /// Rows currently on screen, top to bottom.
    pub fn rows(&self) -> &[RowView] {
        &self.pool[..self.visible]
    }

    /// Index of the first visible row.
    pub fn first_visible(&self) -> usize {
        self.first
    }

    /// Row count reported by the adapter at the last render.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// How many row views were ever created through the adapter.
    pub fn created_rows(&self) -> usize {
        self.created
    }

    /// How many times the widget re-rendered.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Move the viewport so `first` is the top row and re-render.
    pub fn scroll_to(&mut self, first: usize, adapter: &JobListAdapter<'_>) {
        self.first = first;
        self.layout(adapter);
    }

    /// Visible rows as text, two lines per row.
    pub fn render(&self) -> Vec<String> {
        self.rows()
            .iter()
            .flat_map(|row| [row.title.clone(), format!("  {}", row.detail)])
            .collect()
    }

    fn layout(&mut self, adapter: &JobListAdapter<'_>) {
        self.renders += 1;
        self.row_count = adapter.row_count();
        let max_first = self.row_count.saturating_sub(self.viewport);
        self.first = self.first.min(max_first);

        let end = (self.first + self.viewport).min(self.row_count);
        self.visible = end - self.first;
        while self.pool.len() < self.visible {
            self.pool.push(adapter.create_row());
            self.created += 1;
        }
        for (slot, index) in (self.first..end).enumerate() {
            adapter.bind_row(&mut self.pool[slot], index);
        }
    }
}

impl ListWidget for RecyclingList {
    fn data_set_changed(&mut self, adapter: &JobListAdapter<'_>) {
        self.layout(adapter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Job, JobList};

    fn list_of(n: usize) -> JobList {
        let mut list = JobList::new();
        for i in 0..n {
            list.push(Job::new(format!("J{i}"), format!("Job {i}"), "1", "2"));
        }
        list
    }

    #[test]
    fn renders_visible_window_only() {
        let list = list_of(5);
        let mut widget = RecyclingList::new(3);
        JobListAdapter::new(&list).notify_changed(&mut widget);
        let titles: Vec<&str> = widget.rows().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Job 0", "Job 1", "Job 2"]);
        assert_eq!(widget.row_count(), 5);
        assert_eq!(widget.created_rows(), 3);
    }

    #[test]
    fn rerender_reuses_row_views() {
        let list = list_of(10);
        let mut widget = RecyclingList::new(4);
        let adapter = JobListAdapter::new(&list);
        for _ in 0..5 {
            adapter.notify_changed(&mut widget);
        }
        adapter.notify_changed(&mut widget);
        widget.scroll_to(6, &adapter);
        assert_eq!(widget.created_rows(), 4);
        assert_eq!(widget.render_count(), 7);
        assert_eq!(widget.rows()[0].title, "Job 6");
    }

    #[test]
    fn scroll_is_clamped_to_last_page() {
        let list = list_of(5);
        let mut widget = RecyclingList::new(3);
        widget.scroll_to(10, &JobListAdapter::new(&list));
        assert_eq!(widget.first_visible(), 2);
        assert_eq!(widget.rows().len(), 3);
        assert_eq!(widget.rows()[2].title, "Job 4");
    }

    #[test]
    fn empty_list_renders_nothing() {
        let list = JobList::new();
        let mut widget = RecyclingList::new(3);
        JobListAdapter::new(&list).notify_changed(&mut widget);
        assert!(widget.rows().is_empty());
        assert!(widget.render().is_empty());
        assert_eq!(widget.created_rows(), 0);
    }

    #[test]
    fn render_prints_two_lines_per_row() {
        let list = list_of(1);
        let mut widget = RecyclingList::new(3);
        JobListAdapter::new(&list).notify_changed(&mut widget);
        assert_eq!(
            widget.render(),
            ["Job 0".to_string(), "  ID: J0 | Salary: 1-2".to_string()]
        );
    }
}
