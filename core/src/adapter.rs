//! Projection of the job list into renderable rows.
//!
//! # Design
//! `JobListAdapter` borrows the screen's `JobList` read-only and keeps no
//! copy of it, so `row_count` always reflects the list at call time. Row
//! views are owned and recycled by the hosting widget; the adapter only
//! creates blank ones on request and writes text into them.

use crate::types::{Job, JobList};
use crate::widget::ListWidget;

/// The row template: one row with two text slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowView {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy)]
pub struct JobListAdapter<'a> {
    jobs: &'a JobList,
}

impl<'a> JobListAdapter<'a> {
    pub fn new(jobs: &'a JobList) -> Self {
        Self { jobs }
    }

    pub fn row_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn create_row(&self) -> RowView {
        RowView::default()
    }

    /// Write the job at `index` into `row`.
    ///
    /// # Panics
    /// If `index >= row_count()`. Widgets only bind indices they got from
    /// `row_count`.
    pub fn bind_row(&self, row: &mut RowView, index: usize) {
        let Some(job) = self.jobs.get(index) else {
            panic!(
                "bind_row index {index} out of range for {} rows",
                self.jobs.len()
            );
        };
        row.title.clone_from(&job.title);
        row.detail = detail_text(job);
    }

    /// Tell `widget` the whole data set may have changed.
    pub fn notify_changed(&self, widget: &mut dyn ListWidget) {
        tracing::debug!(rows = self.row_count(), "job list changed");
        widget.data_set_changed(self);
    }
}

fn detail_text(job: &Job) -> String {
    format!(
        "ID: {} | Salary: {}-{}",
        job.id, job.min_salary, job.max_salary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> JobList {
        let mut list = JobList::new();
        list.push(Job::new("J1", "Engineer", "50000", "90000"));
        list.push(Job::new("J2", "Designer", "", "70000"));
        list
    }

    #[test]
    fn row_count_tracks_list() {
        let mut list = JobList::new();
        assert_eq!(JobListAdapter::new(&list).row_count(), 0);
        list.push(Job::new("J1", "Engineer", "1", "2"));
        assert_eq!(JobListAdapter::new(&list).row_count(), 1);
    }

    #[test]
    fn bind_row_writes_title_and_detail() {
        let list = jobs();
        let adapter = JobListAdapter::new(&list);
        let mut row = adapter.create_row();
        adapter.bind_row(&mut row, 0);
        assert_eq!(row.title, "Engineer");
        assert_eq!(row.detail, "ID: J1 | Salary: 50000-90000");
    }

    #[test]
    fn bind_row_overwrites_recycled_row() {
        let list = jobs();
        let adapter = JobListAdapter::new(&list);
        let mut row = adapter.create_row();
        adapter.bind_row(&mut row, 0);
        adapter.bind_row(&mut row, 1);
        assert_eq!(row.title, "Designer");
        assert_eq!(row.detail, "ID: J2 | Salary: -70000");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn bind_row_out_of_range_panics() {
        let list = jobs();
        let adapter = JobListAdapter::new(&list);
        let mut row = adapter.create_row();
        adapter.bind_row(&mut row, 2);
    }

    #[test]
    fn create_row_is_blank() {
        let list = JobList::new();
        let row = JobListAdapter::new(&list).create_row();
        assert!(row.title.is_empty());
        assert!(row.detail.is_empty());
    }
}
