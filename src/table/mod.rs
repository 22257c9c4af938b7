//! Generic tabular view.
//!
//! A `TableView` holds the view state of one table: the named views (tabs)
//! with their filters, the free-text search query, the sort order, the row
//! selection and the cursor. It never owns the rows; pages pass the current
//! records in and get the visible subset back.

mod columns;
mod error;

pub use error::TableError;

use crate::store::Record;
use crate::utils::formatting::parse_number;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A record that can be shown as a table row.
///
pub trait Tabular: Record {
    /// Column headers, in display order.
    const COLUMNS: &'static [&'static str];

    /// Stringified cell values, one per column.
    fn cells(&self) -> Vec<String>;
}

/// A materialised table row.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

/// Filter applied by a view.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewFilter {
    All,
    ColumnEquals { column: usize, value: String },
    Contains(String),
}

impl ViewFilter {
    /// Whether a row with the given cells passes the filter.
    ///
    pub fn matches(&self, cells: &[String]) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::ColumnEquals { column, value } => cells
                .get(*column)
                .map(|cell| cell.eq_ignore_ascii_case(value))
                .unwrap_or(false),
            ViewFilter::Contains(query) => matches_query(cells, query),
        }
    }
}

/// A named view over a table.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTab {
    pub name: String,
    pub filter: ViewFilter,
    pub closable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: usize,
    pub direction: SortDirection,
}

/// Whether any cell contains the query, ignoring case. An empty query
/// matches everything.
///
pub fn matches_query(cells: &[String], query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    cells.iter().any(|cell| cell.to_lowercase().contains(&query))
}

/// Compare two cells: numbers sort before text, numbers compare
/// numerically and text compares ignoring case.
///
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Houses view state of a searchable, sortable, selectable table.
///
#[derive(Debug, Clone)]
pub struct TableView {
    tabs: Vec<ViewTab>,
    active: usize,
    query: String,
    sort: Option<Sort>,
    selected: BTreeSet<String>,
    cursor: usize,
}

impl TableView {
    /// Return a table with a single, non-closable default view.
    ///
    pub fn new(default_view: &str) -> TableView {
        TableView {
            tabs: vec![ViewTab {
                name: default_view.to_string(),
                filter: ViewFilter::All,
                closable: false,
            }],
            active: 0,
            query: String::new(),
            sort: None,
            selected: BTreeSet::new(),
            cursor: 0,
        }
    }

    /// Add a closable view and return self, for building preset tables.
    ///
    pub fn with_view(mut self, name: &str, filter: ViewFilter) -> TableView {
        self.add_view(name, filter);
        self
    }

    pub fn tabs(&self) -> &[ViewTab] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> &ViewTab {
        &self.tabs[self.active]
    }

    /// Append a closable view and return its index.
    ///
    pub fn add_view(&mut self, name: &str, filter: ViewFilter) -> usize {
        self.tabs.push(ViewTab {
            name: name.to_string(),
            filter,
            closable: true,
        });
        self.tabs.len() - 1
    }

    /// Close the view at the given index. The default view cannot be
    /// closed. When the active view closes, its left neighbour becomes
    /// active.
    ///
    pub fn close_view(&mut self, index: usize) -> Result<ViewTab, TableError> {
        let tab = self.tabs.get(index).ok_or(TableError::ViewOutOfRange {
            index,
            len: self.tabs.len(),
        })?;
        if !tab.closable {
            return Err(TableError::ViewNotClosable {
                name: tab.name.clone(),
            });
        }
        let removed = self.tabs.remove(index);
        if self.active > index || (self.active == index && self.active > 0) {
            self.active -= 1;
        }
        self.active = self.active.min(self.tabs.len() - 1);
        self.cursor = 0;
        Ok(removed)
    }

    /// Move the view at `from` to position `to`, shifting the views in
    /// between. The active view keeps being active wherever it lands.
    ///
    pub fn reorder_view(&mut self, from: usize, to: usize) -> Result<(), TableError> {
        let len = self.tabs.len();
        for index in [from, to] {
            if index >= len {
                return Err(TableError::ViewOutOfRange { index, len });
            }
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);

        if self.active == from {
            self.active = to;
        } else if from < self.active && self.active <= to {
            self.active -= 1;
        } else if to <= self.active && self.active < from {
            self.active += 1;
        }
        Ok(())
    }

    /// Activate the view at the given index.
    ///
    pub fn select_view(&mut self, index: usize) -> Result<(), TableError> {
        if index >= self.tabs.len() {
            return Err(TableError::ViewOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        if index != self.active {
            self.active = index;
            self.cursor = 0;
        }
        Ok(())
    }

    /// Activate the next view, wrapping around.
    ///
    pub fn next_view(&mut self) -> &mut Self {
        self.active = (self.active + 1) % self.tabs.len();
        self.cursor = 0;
        self
    }

    /// Activate the previous view, wrapping around.
    ///
    pub fn previous_view(&mut self) -> &mut Self {
        self.active = if self.active == 0 {
            self.tabs.len() - 1
        } else {
            self.active - 1
        };
        self.cursor = 0;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) -> &mut Self {
        self.query = query.to_string();
        self.cursor = 0;
        self
    }

    pub fn push_query_char(&mut self, c: char) -> &mut Self {
        self.query.push(c);
        self.cursor = 0;
        self
    }

    pub fn pop_query_char(&mut self) -> &mut Self {
        self.query.pop();
        self.cursor = 0;
        self
    }

    pub fn clear_query(&mut self) -> &mut Self {
        self.set_query("")
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    pub fn sort_by(&mut self, column: usize, direction: SortDirection) -> &mut Self {
        self.sort = Some(Sort { column, direction });
        self
    }

    pub fn clear_sort(&mut self) -> &mut Self {
        self.sort = None;
        self
    }

    /// Step through the sort orders: each column ascending then descending,
    /// then back to unsorted after the last column.
    ///
    pub fn cycle_sort(&mut self, column_count: usize) -> &mut Self {
        self.sort = match self.sort {
            None if column_count > 0 => Some(Sort {
                column: 0,
                direction: SortDirection::Ascending,
            }),
            None => None,
            Some(Sort {
                column,
                direction: SortDirection::Ascending,
            }) => Some(Sort {
                column,
                direction: SortDirection::Descending,
            }),
            Some(Sort {
                column,
                direction: SortDirection::Descending,
            }) if column + 1 < column_count => Some(Sort {
                column: column + 1,
                direction: SortDirection::Ascending,
            }),
            Some(_) => None,
        };
        self
    }

    /// Return the records visible under the active view, the search query
    /// and the sort order.
    ///
    pub fn visible<'a, T: Tabular>(&self, data: &'a [T]) -> Vec<&'a T> {
        self.apply(data).into_iter().map(|(item, _)| item).collect()
    }

    /// Return the visible records as rows of cells.
    ///
    pub fn rows<T: Tabular>(&self, data: &[T]) -> Vec<Row> {
        self.apply(data)
            .into_iter()
            .map(|(item, cells)| Row {
                id: item.id().to_string(),
                cells,
            })
            .collect()
    }

    fn apply<'a, T: Tabular>(&self, data: &'a [T]) -> Vec<(&'a T, Vec<String>)> {
        let filter = &self.active_tab().filter;
        let mut rows: Vec<(&T, Vec<String>)> = data
            .iter()
            .map(|item| (item, item.cells()))
            .filter(|(_, cells)| filter.matches(cells) && matches_query(cells, &self.query))
            .collect();
        if let Some(sort) = self.sort {
            rows.sort_by(|(_, a), (_, b)| {
                let ordering = compare_cells(
                    a.get(sort.column).map(String::as_str).unwrap_or(""),
                    b.get(sort.column).map(String::as_str).unwrap_or(""),
                );
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Flip the selection of one row.
    ///
    pub fn toggle_row(&mut self, id: &str) -> &mut Self {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        self
    }

    /// Select every visible row, or clear them if all are already selected.
    ///
    pub fn toggle_all(&mut self, visible_ids: &[String]) -> &mut Self {
        let all_selected = !visible_ids.is_empty()
            && visible_ids.iter().all(|id| self.selected.contains(id));
        if all_selected {
            for id in visible_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(visible_ids.iter().cloned());
        }
        self
    }

    pub fn clear_selection(&mut self) -> &mut Self {
        self.selected.clear();
        self
    }

    /// Hand out the selected ids and clear the selection.
    ///
    pub fn take_selected(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    /// Drop selected ids that no longer exist.
    ///
    pub fn retain_selection(&mut self, exists: impl Fn(&str) -> bool) -> &mut Self {
        self.selected.retain(|id| exists(id));
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor down, wrapping to the top.
    ///
    pub fn next_row(&mut self, row_count: usize) -> &mut Self {
        self.cursor = if row_count == 0 || self.cursor + 1 >= row_count {
            0
        } else {
            self.cursor + 1
        };
        self
    }

    /// Move the cursor up, wrapping to the bottom.
    ///
    pub fn previous_row(&mut self, row_count: usize) -> &mut Self {
        self.cursor = if row_count == 0 {
            0
        } else if self.cursor == 0 {
            row_count - 1
        } else {
            self.cursor - 1
        };
        self
    }

    /// Keep the cursor within the visible rows.
    ///
    pub fn clamp_cursor(&mut self, row_count: usize) -> &mut Self {
        if self.cursor >= row_count {
            self.cursor = row_count.saturating_sub(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::{Email, EmailStatus};
    use fake::{Fake, Faker};

    fn email(id: &str, name: &str, status: EmailStatus) -> Email {
        let mut email: Email = Faker.fake();
        email.id = id.to_string();
        email.name = name.to_string();
        email.subject = String::new();
        email.status = status;
        email.updated_at = "2025-01-01T00:00:00.000Z".to_string();
        email
    }

    fn dataset() -> Vec<Email> {
        vec![
            email("1", "Spring launch", EmailStatus::Sent),
            email("2", "Webinar reminder", EmailStatus::Scheduled),
            email("3", "Newsletter", EmailStatus::Draft),
            email("4", "Launch follow-up", EmailStatus::Draft),
        ]
    }

    fn ids(rows: &[&Email]) -> Vec<String> {
        rows.iter().map(|e| e.id.clone()).collect()
    }

    fn names(table: &TableView) -> Vec<String> {
        table.tabs().iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn empty_query_returns_everything() {
        let data = dataset();
        let table = TableView::new("All emails");
        assert_eq!(table.visible(&data).len(), data.len());
    }

    #[test]
    fn absent_term_returns_nothing() {
        let data = dataset();
        let mut table = TableView::new("All emails");
        table.set_query("zzz-not-present-zzz");
        assert!(table.visible(&data).is_empty());
    }

    #[test]
    fn query_is_case_insensitive_substring_over_all_cells() {
        let data = dataset();
        let mut table = TableView::new("All emails");
        table.set_query("LAUNCH");
        assert_eq!(ids(&table.visible(&data)), vec!["1", "4"]);

        table.set_query("scheduled");
        assert_eq!(ids(&table.visible(&data)), vec!["2"]);
    }

    #[test]
    fn view_filter_applies_before_search() {
        let data = dataset();
        let mut table = TableView::new("All emails").with_view(
            "Drafts",
            ViewFilter::ColumnEquals {
                column: 1,
                value: "draft".to_string(),
            },
        );
        table.select_view(1).unwrap();
        assert_eq!(ids(&table.visible(&data)), vec!["3", "4"]);

        table.set_query("launch");
        assert_eq!(ids(&table.visible(&data)), vec!["4"]);
    }

    #[test]
    fn saved_search_view() {
        let data = dataset();
        let mut table = TableView::new("All emails");
        let index = table.add_view("Webinars", ViewFilter::Contains("webinar".to_string()));
        table.select_view(index).unwrap();
        assert_eq!(ids(&table.visible(&data)), vec!["2"]);
    }

    #[test]
    fn add_view_appends_closable_tab() {
        let mut table = TableView::new("All");
        assert_eq!(table.add_view("Mine", ViewFilter::All), 1);
        assert!(table.tabs()[1].closable);
        assert!(!table.tabs()[0].closable);
    }

    #[test]
    fn default_view_cannot_be_closed() {
        let mut table = TableView::new("All");
        assert_eq!(
            table.close_view(0),
            Err(TableError::ViewNotClosable {
                name: "All".to_string()
            })
        );
        assert_eq!(
            table.close_view(3),
            Err(TableError::ViewOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(table.tabs().len(), 1);
    }

    #[test]
    fn closing_active_view_activates_left_neighbour() {
        let mut table = TableView::new("All")
            .with_view("A", ViewFilter::All)
            .with_view("B", ViewFilter::All);
        table.select_view(2).unwrap();
        let closed = table.close_view(2).unwrap();
        assert_eq!(closed.name, "B");
        assert_eq!(table.active_index(), 1);
        assert_eq!(table.active_tab().name, "A");
    }

    #[test]
    fn closing_view_before_active_keeps_active_tab() {
        let mut table = TableView::new("All")
            .with_view("A", ViewFilter::All)
            .with_view("B", ViewFilter::All);
        table.select_view(2).unwrap();
        table.close_view(1).unwrap();
        assert_eq!(table.active_tab().name, "B");
    }

    #[test]
    fn reorder_is_a_pure_permutation() {
        let mut table = TableView::new("All")
            .with_view("A", ViewFilter::All)
            .with_view("B", ViewFilter::All)
            .with_view("C", ViewFilter::All);

        table.reorder_view(1, 3).unwrap();
        assert_eq!(names(&table), vec!["All", "B", "C", "A"]);

        table.reorder_view(3, 0).unwrap();
        assert_eq!(names(&table), vec!["A", "All", "B", "C"]);

        table.reorder_view(2, 2).unwrap();
        assert_eq!(names(&table), vec!["A", "All", "B", "C"]);

        let mut sorted = names(&table);
        sorted.sort();
        assert_eq!(sorted, vec!["A", "All", "B", "C"]);
    }

    #[test]
    fn reorder_tracks_active_view() {
        let mut table = TableView::new("All")
            .with_view("A", ViewFilter::All)
            .with_view("B", ViewFilter::All);
        table.select_view(1).unwrap();
        table.reorder_view(1, 2).unwrap();
        assert_eq!(table.active_tab().name, "A");

        table.reorder_view(0, 2).unwrap();
        assert_eq!(table.active_tab().name, "A");
        assert_eq!(table.active_index(), 1);
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let mut table = TableView::new("All");
        assert!(table.reorder_view(0, 1).is_err());
        assert_eq!(table.tabs().len(), 1);
    }

    #[test]
    fn moved_default_view_stays_non_closable() {
        let mut table = TableView::new("All").with_view("A", ViewFilter::All);
        table.reorder_view(0, 1).unwrap();
        assert!(table.close_view(1).is_err());
        assert!(table.close_view(0).is_ok());
        assert_eq!(names(&table), vec!["All"]);
    }

    #[test]
    fn next_and_previous_view_wrap() {
        let mut table = TableView::new("All").with_view("A", ViewFilter::All);
        table.next_view();
        assert_eq!(table.active_index(), 1);
        table.next_view();
        assert_eq!(table.active_index(), 0);
        table.previous_view();
        assert_eq!(table.active_index(), 1);
    }

    #[test]
    fn sort_by_name() {
        let data = dataset();
        let mut table = TableView::new("All");
        table.sort_by(0, SortDirection::Ascending);
        assert_eq!(ids(&table.visible(&data)), vec!["4", "3", "1", "2"]);
        table.sort_by(0, SortDirection::Descending);
        assert_eq!(ids(&table.visible(&data)), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn numeric_cells_sort_numerically() {
        assert_eq!(compare_cells("$900.00", "$1,200.00"), Ordering::Less);
        assert_eq!(compare_cells("10", "9"), Ordering::Greater);
        assert_eq!(compare_cells("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn mixed_column_sorts_numbers_before_text() {
        let labels = ["10", "9", "2abc", "Nan"];
        let data: Vec<Email> = (0..60)
            .map(|i| email(&i.to_string(), labels[i % labels.len()], EmailStatus::Draft))
            .collect();
        let mut table = TableView::new("All");
        table.sort_by(0, SortDirection::Ascending);
        let sorted: Vec<String> = table.visible(&data).iter().map(|e| e.name.clone()).collect();

        let mut expected = Vec::new();
        for label in ["9", "10", "2abc", "Nan"] {
            expected.extend(std::iter::repeat(label.to_string()).take(15));
        }
        assert_eq!(sorted, expected);

        table.sort_by(0, SortDirection::Descending);
        let reversed: Vec<String> = table.visible(&data).iter().map(|e| e.name.clone()).collect();
        expected.reverse();
        assert_eq!(reversed, expected);
    }

    #[test]
    fn query_whitespace_is_significant() {
        let data = dataset();
        let mut table = TableView::new("All emails");
        table.set_query("launch ");
        assert_eq!(ids(&table.visible(&data)), vec!["4"]);
    }

    #[test]
    fn cycle_sort_walks_columns() {
        let mut table = TableView::new("All");
        table.cycle_sort(2);
        assert_eq!(
            table.sort(),
            Some(Sort {
                column: 0,
                direction: SortDirection::Ascending
            })
        );
        table.cycle_sort(2);
        assert_eq!(table.sort().unwrap().direction, SortDirection::Descending);
        table.cycle_sort(2);
        assert_eq!(table.sort().unwrap().column, 1);
        table.cycle_sort(2).cycle_sort(2);
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn toggle_row_and_all() {
        let mut table = TableView::new("All");
        table.toggle_row("1");
        assert!(table.is_selected("1"));
        table.toggle_row("1");
        assert!(!table.is_selected("1"));

        let visible = vec!["1".to_string(), "2".to_string()];
        table.toggle_row("1");
        table.toggle_all(&visible);
        assert_eq!(table.selected_ids(), visible);
        table.toggle_all(&visible);
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn toggle_all_leaves_hidden_selection() {
        let mut table = TableView::new("All");
        table.toggle_row("hidden");
        let visible = vec!["1".to_string()];
        table.toggle_all(&visible).toggle_all(&visible);
        assert_eq!(table.selected_ids(), vec!["hidden".to_string()]);
    }

    #[test]
    fn take_selected_clears() {
        let mut table = TableView::new("All");
        table.toggle_row("2").toggle_row("1");
        assert_eq!(table.take_selected(), vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn retain_selection_drops_missing_ids() {
        let mut table = TableView::new("All");
        table.toggle_row("1").toggle_row("2");
        table.retain_selection(|id| id == "2");
        assert_eq!(table.selected_ids(), vec!["2".to_string()]);
    }

    #[test]
    fn cursor_wraps_and_clamps() {
        let mut table = TableView::new("All");
        table.previous_row(3);
        assert_eq!(table.cursor(), 2);
        table.next_row(3);
        assert_eq!(table.cursor(), 0);
        table.previous_row(3).clamp_cursor(1);
        assert_eq!(table.cursor(), 0);
        table.next_row(0);
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn rows_carry_ids_and_cells() {
        let data = dataset();
        let table = TableView::new("All");
        let rows = table.rows(&data);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].cells[0], "Spring launch");
        assert_eq!(rows[0].cells.len(), Email::COLUMNS.len());
    }
}
