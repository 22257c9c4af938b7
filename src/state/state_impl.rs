use super::dashboard::DashboardStats;
use super::modal::{Confirmation, Toast};
use super::navigation::{Focus, Route};
use super::StateError;
use crate::app::{ConfigSaveSender, WorkerEventSender};
use crate::crm::*;
use crate::events::worker::Event as WorkerEvent;
use crate::forms::{self, Editable, Form, FormDefaults, FormField, FormKind, FormMode};
use crate::logger::LogBuffer;
use crate::store::{with_slice, Patch, Slice, Store};
use crate::table::{Row, TableView, ViewFilter};
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use log::*;
use ratatui::layout::Rect;
use serde_json::Value;

/// Houses data representative of application state.
///
pub struct State {
    store: Store,
    tables: Vec<TableView>,
    route_stack: Vec<Route>,
    focus: Focus,
    sidebar_index: usize,
    form: Option<Form>,
    confirmation: Option<Confirmation>,
    toast: Option<Toast>,
    search_mode: bool,
    template_picker: Option<usize>,
    theme_selector: Option<usize>,
    worker_sender: Option<WorkerEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    theme: Theme,
    logs: LogBuffer,
    show_log: bool,
    spinner_index: usize,
    pending: usize,
    defaults: FormDefaults,
    terminal_size: Rect,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            store: Store::default(),
            tables: Collection::ALL.iter().map(|c| default_table(*c)).collect(),
            route_stack: vec![Route::Dashboard],
            focus: Focus::Sidebar,
            sidebar_index: 0,
            form: None,
            confirmation: None,
            toast: None,
            search_mode: false,
            template_picker: None,
            theme_selector: None,
            worker_sender: None,
            config_save_sender: None,
            theme: Theme::default(),
            logs: LogBuffer::default(),
            show_log: false,
            spinner_index: 0,
            pending: 0,
            defaults: FormDefaults::default(),
            terminal_size: Rect::default(),
        }
    }
}

/// Index of the column with the given header.
///
fn column(collection: Collection, name: &str) -> usize {
    Store::columns(collection)
        .iter()
        .position(|header| *header == name)
        .unwrap_or(0)
}

/// Table with the default views of a collection.
///
fn default_table(collection: Collection) -> TableView {
    let table = TableView::new(&format!("All {}", collection.key()));
    let equals = |name: &str, value: &str| ViewFilter::ColumnEquals {
        column: column(collection, name),
        value: value.to_string(),
    };
    match collection {
        Collection::Contacts => table.with_view("Customers", equals("Lifecycle stage", "Customer")),
        Collection::Companies => table.with_view("Customers", equals("Lifecycle stage", "Customer")),
        Collection::Deals => table.with_view("Won", equals("Stage", "Closed won")),
        Collection::Campaigns => table.with_view("Active", equals("Status", "Active")),
        Collection::Emails => table
            .with_view("Drafts", equals("Status", "Draft"))
            .with_view("Sent", equals("Status", "Sent")),
        Collection::Tasks => table.with_view("Completed", equals("Status", "Completed")),
        Collection::Lists => table.with_view("Active lists", equals("Type", "Active")),
        Collection::Playbooks | Collection::Templates => table,
    }
}

fn blank_fields<T: Editable>(_: &Slice<T>, defaults: &FormDefaults) -> Vec<FormField> {
    T::form_fields(None, defaults)
}

fn fields_of<T: Editable>(record: &T, defaults: &FormDefaults) -> Vec<FormField> {
    T::form_fields(Some(record), defaults)
}

/// Fields an email takes on when it is sent to the given number of
/// recipients.
///
fn sent_patch(recipients: u32) -> Result<Patch, serde_json::Error> {
    let mut patch = Patch::new();
    patch.insert("status".to_string(), serde_json::to_value(EmailStatus::Sent)?);
    patch.insert("sent_at".to_string(), Value::String(timestamp()));
    patch.insert(
        "metrics".to_string(),
        serde_json::to_value(EmailMetrics {
            sent: recipients,
            delivered: recipients,
            opened: 0,
            clicked: 0,
        })?,
    );
    Ok(patch)
}

impl State {
    pub fn new(store: Store, defaults: FormDefaults, theme: Theme, logs: LogBuffer) -> Self {
        State {
            store,
            defaults,
            theme,
            logs,
            ..State::default()
        }
    }

    /// Set the channel background actions are sent on.
    ///
    pub fn set_worker_sender(&mut self, sender: WorkerEventSender) -> &mut Self {
        self.worker_sender = Some(sender);
        self
    }

    /// Set the channel used to request a configuration save.
    ///
    pub fn set_config_save_sender(&mut self, sender: ConfigSaveSender) -> &mut Self {
        self.config_save_sender = Some(sender);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn defaults(&self) -> &FormDefaults {
        &self.defaults
    }

    /// Get the current theme.
    ///
    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    /// Sets the terminal size.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    pub fn terminal_size(&self) -> Rect {
        self.terminal_size
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index += 1;
        if self.spinner_index >= SPINNER_FRAME_COUNT {
            self.spinner_index = 0;
        }
        self
    }

    /// Return the current spinner index.
    ///
    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Number of background actions still running.
    ///
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    // Navigation

    /// Return the page on top of the route stack.
    ///
    pub fn current_route(&self) -> &Route {
        self.route_stack.last().unwrap_or(&Route::Dashboard)
    }

    /// Open a page, keeping the previous one to go back to.
    ///
    pub fn navigate(&mut self, route: Route) -> &mut Self {
        if self.current_route() != &route {
            debug!("Navigating to '{}'.", route);
            if let Some(index) = Route::sidebar()
                .iter()
                .position(|r| Some(r) == route.collection().map(Route::Collection).as_ref())
            {
                self.sidebar_index = index;
            }
            self.route_stack.push(route);
        }
        self.search_mode = false;
        self.focus = Focus::Main;
        self
    }

    /// Open the page at the given path.
    ///
    pub fn navigate_path(&mut self, path: &str) -> Result<(), StateError> {
        let route = Route::parse(path)?;
        self.navigate(route);
        Ok(())
    }

    /// Return to the previous page. The first page is never popped.
    ///
    pub fn back(&mut self) -> Option<Route> {
        if self.route_stack.len() > 1 {
            self.search_mode = false;
            self.route_stack.pop()
        } else {
            None
        }
    }

    pub fn route_depth(&self) -> usize {
        self.route_stack.len()
    }

    /// Return the current focus.
    ///
    pub fn current_focus(&self) -> Focus {
        self.focus
    }

    pub fn focus_sidebar(&mut self) -> &mut Self {
        self.focus = Focus::Sidebar;
        self
    }

    pub fn focus_main(&mut self) -> &mut Self {
        self.focus = Focus::Main;
        self
    }

    pub fn toggle_focus(&mut self) -> &mut Self {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Main,
            Focus::Main => Focus::Sidebar,
        };
        self
    }

    pub fn sidebar_index(&self) -> usize {
        self.sidebar_index
    }

    /// Highlight the next sidebar entry.
    ///
    pub fn next_sidebar(&mut self) -> &mut Self {
        self.sidebar_index = (self.sidebar_index + 1) % Route::sidebar().len();
        self
    }

    /// Highlight the previous sidebar entry.
    ///
    pub fn previous_sidebar(&mut self) -> &mut Self {
        let len = Route::sidebar().len();
        self.sidebar_index = (self.sidebar_index + len - 1) % len;
        self
    }

    /// Open the highlighted sidebar page as a fresh route stack.
    ///
    pub fn select_sidebar(&mut self) -> &mut Self {
        if let Some(route) = Route::sidebar().get(self.sidebar_index).cloned() {
            self.route_stack.clear();
            self.route_stack.push(route);
        }
        self.search_mode = false;
        self.focus = Focus::Main;
        self
    }

    // Tables

    /// Collection whose table is on screen. Detail pages have none.
    ///
    pub fn current_collection(&self) -> Option<Collection> {
        match self.current_route() {
            Route::Collection(collection) => Some(*collection),
            _ => None,
        }
    }

    pub fn table(&self, collection: Collection) -> &TableView {
        &self.tables[collection as usize]
    }

    pub fn table_mut(&mut self, collection: Collection) -> &mut TableView {
        &mut self.tables[collection as usize]
    }

    /// Rows of the current collection page after views, search and sort.
    ///
    pub fn visible_rows(&self) -> Vec<Row> {
        match self.current_collection() {
            Some(collection) => self.store.rows(collection, self.table(collection)),
            None => vec![],
        }
    }

    /// Row under the cursor on the current collection page.
    ///
    pub fn cursor_row(&self) -> Option<Row> {
        let collection = self.current_collection()?;
        let cursor = self.table(collection).cursor();
        self.visible_rows().into_iter().nth(cursor)
    }

    fn with_current_table(&mut self, f: impl FnOnce(&mut TableView, &[Row])) -> &mut Self {
        if let Some(collection) = self.current_collection() {
            let rows = self.visible_rows();
            f(self.table_mut(collection), &rows);
        }
        self
    }

    /// Keep the cursor inside the rows left after a filter change.
    ///
    fn clamp_cursor(&mut self) -> &mut Self {
        self.with_current_table(|table, rows| {
            table.clamp_cursor(rows.len());
        })
    }

    pub fn next_row(&mut self) -> &mut Self {
        self.with_current_table(|table, rows| {
            table.next_row(rows.len());
        })
    }

    pub fn previous_row(&mut self) -> &mut Self {
        self.with_current_table(|table, rows| {
            table.previous_row(rows.len());
        })
    }

    /// Toggle selection of the row under the cursor.
    ///
    pub fn toggle_cursor_row(&mut self) -> &mut Self {
        self.with_current_table(|table, rows| {
            if let Some(row) = rows.get(table.cursor()) {
                table.toggle_row(&row.id);
            }
        })
    }

    /// Select every visible row, or clear them when all are selected.
    ///
    pub fn toggle_all_rows(&mut self) -> &mut Self {
        self.with_current_table(|table, rows| {
            let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
            table.toggle_all(&ids);
        })
    }

    pub fn clear_selection(&mut self) -> &mut Self {
        self.with_current_table(|table, _| {
            table.clear_selection();
        })
    }

    /// Step the sort order of the current table.
    ///
    pub fn cycle_sort(&mut self) -> &mut Self {
        if let Some(collection) = self.current_collection() {
            let columns = Store::columns(collection).len();
            self.table_mut(collection).cycle_sort(columns);
        }
        self
    }

    pub fn next_view(&mut self) -> &mut Self {
        self.with_current_table(|table, _| {
            table.next_view();
        })
        .clamp_cursor()
    }

    pub fn previous_view(&mut self) -> &mut Self {
        self.with_current_table(|table, _| {
            table.previous_view();
        })
        .clamp_cursor()
    }

    /// Save the current search query as a new view and switch to it.
    ///
    pub fn save_search_as_view(&mut self) -> &mut Self {
        let collection = match self.current_collection() {
            Some(collection) => collection,
            None => return self,
        };
        let query = self.table(collection).query().to_string();
        if query.trim().is_empty() {
            self.toast = Some(Toast::error("Type a search before saving it as a view"));
            return self;
        }
        let table = self.table_mut(collection);
        let index = table.add_view(&format!("\"{}\"", query), ViewFilter::Contains(query.clone()));
        table.clear_query();
        if let Err(e) = table.select_view(index) {
            warn!("{}", e);
        }
        self.toast = Some(Toast::success(format!("Saved view \"{}\"", query)));
        self.clamp_cursor()
    }

    /// Close the active view of the current table.
    ///
    pub fn close_active_view(&mut self) -> &mut Self {
        if let Some(collection) = self.current_collection() {
            let table = self.table_mut(collection);
            let index = table.active_index();
            match table.close_view(index) {
                Ok(tab) => self.toast = Some(Toast::info(format!("Closed view {}", tab.name))),
                Err(e) => self.toast = Some(Toast::error(e.to_string())),
            }
        }
        self.clamp_cursor()
    }

    /// Move the active view one place left or right.
    ///
    pub fn move_active_view(&mut self, right: bool) -> &mut Self {
        if let Some(collection) = self.current_collection() {
            let table = self.table_mut(collection);
            let from = table.active_index();
            let to = if right {
                Some(from + 1)
            } else {
                from.checked_sub(1)
            };
            if let Some(to) = to.filter(|to| *to < table.tabs().len()) {
                if let Err(e) = table.reorder_view(from, to) {
                    warn!("{}", e);
                }
            }
        }
        self
    }

    // Search

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn enter_search_mode(&mut self) -> &mut Self {
        if self.current_collection().is_some() {
            self.search_mode = true;
        }
        self
    }

    /// Stop typing into the search box, keeping the query.
    ///
    pub fn exit_search_mode(&mut self) -> &mut Self {
        self.search_mode = false;
        self
    }

    pub fn clear_search(&mut self) -> &mut Self {
        self.search_mode = false;
        self.with_current_table(|table, _| {
            table.clear_query();
        })
        .clamp_cursor()
    }

    pub fn push_search_char(&mut self, c: char) -> &mut Self {
        self.with_current_table(|table, _| {
            table.push_query_char(c);
        })
        .clamp_cursor()
    }

    pub fn pop_search_char(&mut self) -> &mut Self {
        self.with_current_table(|table, _| {
            table.pop_query_char();
        })
        .clamp_cursor()
    }

    // Detail pages

    /// Campaign shown on the current detail page.
    ///
    pub fn detail_campaign(&self) -> Option<&Campaign> {
        match self.current_route() {
            Route::Campaign(id) => self.store.campaigns.get(id),
            _ => None,
        }
    }

    /// Email shown on the current detail page.
    ///
    pub fn detail_email(&self) -> Option<&Email> {
        match self.current_route() {
            Route::Email(id) => self.store.emails.get(id),
            _ => None,
        }
    }

    /// Open the row under the cursor: campaigns and emails have detail pages,
    /// other records open in the edit form.
    ///
    pub fn open_cursor_row(&mut self) -> Result<(), StateError> {
        let collection = self.current_collection().ok_or(StateError::NoCollection)?;
        let row = self.cursor_row().ok_or(StateError::NoRowSelected)?;
        match collection {
            Collection::Campaigns => {
                self.navigate(Route::Campaign(row.id));
            }
            Collection::Emails => {
                self.navigate(Route::Email(row.id));
            }
            _ => self.open_edit_form_for(collection, &row.id)?,
        }
        Ok(())
    }

    /// Record being acted on: the detail page record or the cursor row.
    ///
    fn target(&self) -> Option<(Collection, String)> {
        match self.current_route() {
            Route::Campaign(id) => Some((Collection::Campaigns, id.clone())),
            Route::Email(id) => Some((Collection::Emails, id.clone())),
            Route::Collection(collection) => self.cursor_row().map(|row| (*collection, row.id)),
            Route::Dashboard => None,
        }
    }

    // Forms

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut Form> {
        self.form.as_mut()
    }

    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn close_form(&mut self) -> &mut Self {
        self.form = None;
        self
    }

    /// Open an empty create form for the current collection page, or the
    /// collection of the current detail page.
    ///
    pub fn open_create_form(&mut self) -> Result<(), StateError> {
        let collection = self
            .current_route()
            .collection()
            .ok_or_else(|| StateError::Unavailable("create".to_string()))?;
        let defaults = &self.defaults;
        let fields = with_slice!(self.store, collection, |slice| blank_fields(slice, defaults));
        self.form = Some(Form::new(FormKind::Entity(collection), FormMode::Create, fields));
        Ok(())
    }

    /// Open the edit form of the detail page record or the cursor row.
    ///
    pub fn open_edit_form(&mut self) -> Result<(), StateError> {
        let (collection, id) = self.target().ok_or(StateError::NoRowSelected)?;
        self.open_edit_form_for(collection, &id)
    }

    fn open_edit_form_for(&mut self, collection: Collection, id: &str) -> Result<(), StateError> {
        let defaults = &self.defaults;
        let fields = with_slice!(self.store, collection, |slice| slice
            .get(id)
            .map(|record| fields_of(record, defaults)))
        .ok_or(StateError::NoRowSelected)?;
        self.form = Some(Form::new(
            FormKind::Entity(collection),
            FormMode::Edit { id: id.to_string() },
            fields,
        ));
        Ok(())
    }

    /// Open the add-asset form on a campaign page.
    ///
    pub fn open_asset_form(&mut self) -> Result<(), StateError> {
        let campaign_id = self
            .detail_campaign()
            .map(|c| c.id.clone())
            .ok_or_else(|| StateError::Unavailable("add asset".to_string()))?;
        self.form = Some(Form::new(
            FormKind::Asset { campaign_id },
            FormMode::Create,
            forms::asset_fields(),
        ));
        Ok(())
    }

    /// Open the add-budget-item form on a campaign page.
    ///
    pub fn open_budget_item_form(&mut self) -> Result<(), StateError> {
        let campaign_id = self
            .detail_campaign()
            .map(|c| c.id.clone())
            .ok_or_else(|| StateError::Unavailable("add budget item".to_string()))?;
        self.form = Some(Form::new(
            FormKind::BudgetItem { campaign_id },
            FormMode::Create,
            forms::budget_item_fields(),
        ));
        Ok(())
    }

    /// Validate and dispatch the open form. On success the form closes; on
    /// failure it stays open with the message and the store is untouched.
    /// Returns whether the form was applied.
    ///
    pub fn submit_form(&mut self) -> bool {
        let form = match &self.form {
            Some(form) => form,
            None => return false,
        };
        let creating = matches!(form.mode(), FormMode::Create);
        let result = match form.kind().clone() {
            FormKind::Entity(collection) => {
                with_slice!(self.store, collection, |mut slice| forms::apply_form(slice, form))
                    .map(|id| self.after_entity_saved(collection, &id, creating))
            }
            kind => forms::apply_nested_form(&mut self.store.campaigns, form).map(
                |(campaign_id, name)| {
                    let action = match kind {
                        FormKind::Asset { .. } => ActivityAction::AssetAdded,
                        _ => ActivityAction::BudgetItemAdded,
                    };
                    self.record_activity(&campaign_id, action, &name);
                    format!("Added {}", name)
                },
            ),
        };
        match result {
            Ok(message) => {
                info!("{}", message);
                self.form = None;
                self.toast = Some(Toast::success(message));
                self.clamp_cursor();
                true
            }
            Err(e) => {
                warn!("Form rejected: {}", e);
                let message = e.to_string();
                if let Some(form) = self.form.as_mut() {
                    form.set_error(Some(message.clone()));
                }
                self.toast = Some(Toast::error(message));
                false
            }
        }
    }

    /// Log activity for a saved record and return the confirmation message.
    ///
    fn after_entity_saved(&mut self, collection: Collection, id: &str, creating: bool) -> String {
        match collection {
            Collection::Campaigns => {
                let name = self
                    .store
                    .campaigns
                    .get(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let action = if creating {
                    ActivityAction::Created
                } else {
                    ActivityAction::Updated
                };
                self.record_activity(id, action, &name);
            }
            Collection::Tasks if creating => {
                let linked = self
                    .store
                    .tasks
                    .get(id)
                    .and_then(|t| t.campaign_id.clone().map(|c| (c, t.title.clone())));
                if let Some((campaign_id, title)) = linked {
                    self.record_activity(&campaign_id, ActivityAction::TaskCreated, &title);
                }
            }
            _ => {}
        }
        let verb = if creating { "Created" } else { "Saved" };
        format!("{} {}", verb, collection.singular())
    }

    fn record_activity(&mut self, campaign_id: &str, action: ActivityAction, entity: &str) {
        let actor = self.defaults.owner.clone();
        self.store
            .activities
            .record(campaign_id, &actor, action, entity);
    }

    // Template picker

    /// Open the template picker on the emails page.
    ///
    pub fn open_template_picker(&mut self) -> Result<(), StateError> {
        if self.current_collection() != Some(Collection::Emails) {
            return Err(StateError::Unavailable("templates".to_string()));
        }
        if self.store.templates.is_empty() {
            self.toast = Some(Toast::error("No templates yet"));
            return Ok(());
        }
        self.template_picker = Some(0);
        Ok(())
    }

    pub fn template_picker_index(&self) -> Option<usize> {
        self.template_picker
    }

    pub fn has_template_picker(&self) -> bool {
        self.template_picker.is_some()
    }

    pub fn next_template(&mut self) -> &mut Self {
        let len = self.store.templates.len();
        if let Some(index) = self.template_picker.as_mut() {
            if len > 0 {
                *index = (*index + 1) % len;
            }
        }
        self
    }

    pub fn previous_template(&mut self) -> &mut Self {
        let len = self.store.templates.len();
        if let Some(index) = self.template_picker.as_mut() {
            if len > 0 {
                *index = (*index + len - 1) % len;
            }
        }
        self
    }

    pub fn close_template_picker(&mut self) -> &mut Self {
        self.template_picker = None;
        self
    }

    /// Open a create-email form pre-filled from the highlighted template.
    ///
    pub fn confirm_template(&mut self) -> &mut Self {
        let index = match self.template_picker.take() {
            Some(index) => index,
            None => return self,
        };
        if let Some(template) = self.store.templates.items().get(index) {
            debug!("Starting email from template '{}'.", template.name);
            let fields = forms::email_fields_from_template(template, &self.defaults);
            self.form = Some(Form::new(
                FormKind::Entity(Collection::Emails),
                FormMode::Create,
                fields,
            ));
        }
        self
    }

    // Delete

    /// Ask to delete the selected rows, the cursor row, or the detail page
    /// record.
    ///
    pub fn request_delete(&mut self) -> Result<(), StateError> {
        if let Some(collection) = self.current_collection() {
            let table = self.table(collection);
            if table.selected_count() > 0 {
                let ids = table.selected_ids();
                self.confirmation = Some(Confirmation {
                    collection,
                    label: format!("{} selected {}", ids.len(), collection.key()),
                    ids,
                    from_selection: true,
                });
                return Ok(());
            }
        }
        let (collection, id) = self.target().ok_or(StateError::NoRowSelected)?;
        let name = self
            .store
            .rows(collection, &TableView::new(""))
            .into_iter()
            .find(|row| row.id == id)
            .and_then(|row| row.cells.into_iter().next())
            .unwrap_or_else(|| id.clone());
        self.confirmation = Some(Confirmation {
            collection,
            ids: vec![id],
            from_selection: false,
            label: format!("{} \"{}\"", collection.singular(), name),
        });
        Ok(())
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn has_confirmation(&self) -> bool {
        self.confirmation.is_some()
    }

    pub fn cancel_delete(&mut self) -> &mut Self {
        self.confirmation = None;
        self
    }

    /// Delete the records awaiting confirmation and return how many were
    /// removed.
    ///
    pub fn confirm_delete(&mut self) -> usize {
        let confirmation = match self.confirmation.take() {
            Some(confirmation) => confirmation,
            None => return 0,
        };
        let collection = confirmation.collection;
        if confirmation.from_selection {
            self.table_mut(collection).take_selected();
        }
        if collection == Collection::Campaigns {
            for id in &confirmation.ids {
                let name = self
                    .store
                    .campaigns
                    .get(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                self.record_activity(id, ActivityAction::Deleted, &name);
            }
        }
        let removed = self.store.remove_many(collection, &confirmation.ids);
        info!("Deleted {} {} records.", removed, collection.singular());

        let store = &self.store;
        self.tables[collection as usize].retain_selection(|id| store.contains(collection, id));
        let on_deleted_page = match self.current_route() {
            Route::Campaign(id) | Route::Email(id) => confirmation.ids.contains(id),
            _ => false,
        };
        if on_deleted_page {
            self.back();
            if self.current_collection() != Some(collection) {
                self.navigate(Route::Collection(collection));
            }
        }
        self.toast = Some(Toast::success(format!("Deleted {}", confirmation.label)));
        self.clamp_cursor();
        removed
    }

    // Background actions

    fn dispatch(&mut self, event: WorkerEvent) -> Result<(), StateError> {
        let sender = self
            .worker_sender
            .as_ref()
            .ok_or_else(|| StateError::DispatchFailed("worker not running".to_string()))?;
        sender
            .send(event)
            .map_err(|e| StateError::DispatchFailed(e.to_string()))?;
        self.pending += 1;
        Ok(())
    }

    /// Send a test of the email on the current page to its owner.
    ///
    pub fn send_test_email(&mut self) -> Result<(), StateError> {
        let email = self
            .detail_email()
            .ok_or_else(|| StateError::Unavailable("send test email".to_string()))?;
        let (email_id, name) = (email.id.clone(), email.name.clone());
        self.dispatch(WorkerEvent::SendTestEmail { email_id })?;
        self.toast = Some(Toast::info(format!("Sending test of \"{}\"...", name)));
        Ok(())
    }

    /// Send the email on the current page to every contact.
    ///
    pub fn send_email(&mut self) -> Result<(), StateError> {
        let email = self
            .detail_email()
            .ok_or_else(|| StateError::Unavailable("send email".to_string()))?;
        if email.status == EmailStatus::Sent {
            return Err(StateError::Unavailable("email already sent".to_string()));
        }
        let (email_id, name) = (email.id.clone(), email.name.clone());
        self.dispatch(WorkerEvent::SendEmail { email_id })?;
        self.toast = Some(Toast::info(format!("Sending \"{}\"...", name)));
        Ok(())
    }

    /// Apply the result of a finished test send.
    ///
    pub fn complete_test_email(&mut self, email_id: &str) -> &mut Self {
        self.pending = self.pending.saturating_sub(1);
        self.toast = match self.store.emails.get(email_id) {
            Some(email) => Some(Toast::success(format!(
                "Test of \"{}\" sent to {}",
                email.name, self.defaults.owner
            ))),
            None => Some(Toast::error("Email no longer exists")),
        };
        self
    }

    /// Apply the result of a finished send: the email becomes sent with one
    /// delivery per contact.
    ///
    pub fn complete_send_email(&mut self, email_id: &str) -> &mut Self {
        self.pending = self.pending.saturating_sub(1);
        let recipients = self.store.contacts.len() as u32;
        let result = sent_patch(recipients)
            .map_err(|e| e.to_string())
            .and_then(|patch| {
                self.store
                    .update(Collection::Emails, email_id, patch)
                    .map_err(|e| e.to_string())
            });
        self.toast = match result {
            Ok(()) => {
                info!("Email '{}' sent to {} contacts.", email_id, recipients);
                Some(Toast::success(format!("Sent to {} contacts", recipients)))
            }
            Err(e) => {
                error!("Failed to mark email '{}' as sent: {}", email_id, e);
                Some(Toast::error(e))
            }
        };
        self
    }

    // Toasts and panels

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn set_toast(&mut self, toast: Toast) -> &mut Self {
        self.toast = Some(toast);
        self
    }

    pub fn clear_toast(&mut self) -> &mut Self {
        self.toast = None;
        self
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.show_log = !self.show_log;
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.show_log
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.logs.entries()
    }

    /// Figures for the dashboard page.
    ///
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats::collect(&self.store, &today())
    }

    // Theme selector

    /// Open theme selector modal.
    ///
    pub fn open_theme_selector(&mut self) -> &mut Self {
        let index = Theme::available_themes()
            .iter()
            .position(|name| name == &self.theme.name)
            .unwrap_or(0);
        self.theme_selector = Some(index);
        self
    }

    pub fn close_theme_selector(&mut self) -> &mut Self {
        self.theme_selector = None;
        self
    }

    pub fn has_theme_selector(&self) -> bool {
        self.theme_selector.is_some()
    }

    pub fn theme_selector_index(&self) -> Option<usize> {
        self.theme_selector
    }

    /// Navigate to next theme in selector.
    ///
    pub fn next_theme(&mut self) -> &mut Self {
        let len = Theme::available_themes().len();
        if let Some(index) = self.theme_selector.as_mut() {
            *index = (*index + 1) % len;
        }
        self
    }

    /// Navigate to previous theme in selector.
    ///
    pub fn previous_theme(&mut self) -> &mut Self {
        let len = Theme::available_themes().len();
        if let Some(index) = self.theme_selector.as_mut() {
            *index = (*index + len - 1) % len;
        }
        self
    }

    /// Apply the highlighted theme and ask for the configuration to be saved.
    ///
    pub fn select_theme(&mut self) -> &mut Self {
        let name = self
            .theme_selector
            .and_then(|index| Theme::available_themes().get(index).cloned());
        if let Some(theme) = name.as_deref().and_then(Theme::from_name) {
            info!("Switching theme to '{}'.", theme.name);
            self.theme = theme;
            if let Some(sender) = &self.config_save_sender {
                if let Err(e) = sender.send(()) {
                    warn!("Failed to request config save: {}", e);
                }
            }
        }
        self.close_theme_selector()
    }
}
