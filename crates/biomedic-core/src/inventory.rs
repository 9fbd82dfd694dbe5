// ABOUTME: Inventory is the explicit view-model context: records, selection, favorites, theme, and view state.
// ABOUTME: Every user action is a named operation (or a dispatched Command) that mutates, persists, and re-projects.

use serde::Serialize;
use thiserror::Error;

use crate::codec::{self, CodecError, ImportError, SELECTED_EXPORT_FILE_NAME};
use crate::command::Command;
use crate::id_set::{FAVORITES_KEY, IdSet, SELECTED_KEY};
use crate::kv::{KeyValueStore, KvError};
use crate::record::{DeleteKey, EditKey, EquipmentRecord};
use crate::records::{RecordError, RecordStore};
use crate::render::{CardView, ViewSnapshot};
use crate::theme::Theme;
use crate::view::{ViewPage, ViewQuery, compute_view};

/// Page size used until the user picks another.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Errors surfaced to the user as a rejected action. None of them leave a
/// partial mutation behind.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] KvError),

    #[error("page size must be at least 1")]
    InvalidPageSize,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("no equipment selected for export")]
    NothingSelected,
}

/// Search, filter, and pagination inputs. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub favorites_only: bool,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            favorites_only: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A generated export, ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

/// What a dispatched command produced, besides the new view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Done,
    Added { name: String },
    Updated { name: String },
    Removed { name: Option<String> },
    Imported { added: usize },
    Exported { file: ExportFile },
    Toggled { name: String, member: bool },
    ThemeChanged { theme: Theme },
}

/// Result of `Inventory::dispatch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub reply: Reply,
    pub view: ViewSnapshot,
}

/// The inventory list view-model. Owns the persistent store adapter and all
/// state derived from it; nothing is ambient.
pub struct Inventory<S: KeyValueStore> {
    kv: S,
    records: RecordStore,
    selected: IdSet,
    favorites: IdSet,
    theme: Theme,
    view_state: ViewState,
}

impl<S: KeyValueStore> Inventory<S> {
    /// Load records, selection, favorites, and theme from `kv`. An empty
    /// store is seeded with one record.
    pub fn open(mut kv: S) -> Result<Self, KvError> {
        let records = RecordStore::load(&mut kv)?;
        let selected = IdSet::load(SELECTED_KEY, &mut kv)?;
        let favorites = IdSet::load(FAVORITES_KEY, &mut kv)?;
        let theme = Theme::load(&kv)?;

        tracing::info!(
            "inventory opened: {} records, {} selected, {} favorites",
            records.len(),
            selected.len(),
            favorites.len()
        );

        Ok(Self {
            kv,
            records,
            selected,
            favorites,
            theme,
            view_state: ViewState::default(),
        })
    }

    pub fn records(&self) -> &[EquipmentRecord] {
        self.records.records()
    }

    pub fn selected(&self) -> &IdSet {
        &self.selected
    }

    pub fn favorites(&self) -> &IdSet {
        &self.favorites
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn store(&self) -> &S {
        &self.kv
    }

    pub fn into_store(self) -> S {
        self.kv
    }

    // --- record mutations ---

    /// Add a record at the front of the list. All fields are required.
    pub fn add_record(&mut self, record: EquipmentRecord) -> Result<(), InventoryError> {
        let record = validated(record)?;
        let name = record.name.clone();
        self.records.add(record, &mut self.kv)?;
        tracing::info!("added equipment {:?}", name);
        Ok(())
    }

    /// Replace the record identified by `original`. A rename can orphan
    /// selection and favorite entries, so both sets are reconciled.
    pub fn update_record(
        &mut self,
        original: &EditKey,
        record: EquipmentRecord,
    ) -> Result<(), InventoryError> {
        let record = validated(record)?;
        let name = record.name.clone();
        self.records.update(original, record, &mut self.kv)?;
        self.reconcile_sets()?;
        tracing::info!("updated equipment {:?}", name);
        Ok(())
    }

    /// Delete the first record matching `key`, dropping its name from the
    /// selection and favorite sets. Returns the removed record, if any, and
    /// resets the view to page 1 when something was removed.
    pub fn remove_record(
        &mut self,
        key: &DeleteKey,
    ) -> Result<Option<EquipmentRecord>, InventoryError> {
        let Some(removed) = self.records.remove(key, &mut self.kv)? else {
            tracing::debug!("no equipment matched {:?} for removal", key.name);
            return Ok(None);
        };

        self.selected.remove(&removed.name, &mut self.kv)?;
        self.favorites.remove(&removed.name, &mut self.kv)?;
        self.reconcile_sets()?;
        self.view_state.page = 1;

        tracing::info!("removed equipment {:?}", removed.name);
        Ok(Some(removed))
    }

    /// Decode an import file and add every new record. Returns the count
    /// actually added.
    pub fn import_file(&mut self, file_name: &str, contents: &str) -> Result<usize, InventoryError> {
        let candidates = codec::decode_import(file_name, contents)?;
        let offered = candidates.len();
        let added = self.records.import_batch(candidates, &mut self.kv)?;
        self.reconcile_sets()?;
        tracing::info!("imported {} of {} records from {}", added, offered, file_name);
        Ok(added)
    }

    // --- identity sets ---

    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool, InventoryError> {
        let member = self.favorites.toggle(name, &mut self.kv)?;
        if self.view_state.favorites_only {
            self.view_state.page = 1;
        }
        Ok(member)
    }

    pub fn toggle_selected(&mut self, name: &str) -> Result<bool, InventoryError> {
        Ok(self.selected.toggle(name, &mut self.kv)?)
    }

    fn reconcile_sets(&mut self) -> Result<(), KvError> {
        let names: Vec<&str> = self.records.records().iter().map(|r| r.name.as_str()).collect();
        self.selected.reconcile(names.iter().copied(), &mut self.kv)?;
        self.favorites.reconcile(names.iter().copied(), &mut self.kv)?;
        Ok(())
    }

    // --- exports ---

    /// CSV of the selected records, in list order.
    pub fn export_selected_csv(&self) -> Result<ExportFile, InventoryError> {
        let chosen: Vec<EquipmentRecord> = self
            .records()
            .iter()
            .filter(|r| self.selected.has(&r.name))
            .cloned()
            .collect();
        if chosen.is_empty() {
            return Err(InventoryError::NothingSelected);
        }

        Ok(ExportFile {
            file_name: SELECTED_EXPORT_FILE_NAME.to_string(),
            contents: codec::export_csv(&chosen)?,
        })
    }

    pub fn export_all_csv(&self) -> Result<String, InventoryError> {
        Ok(codec::export_csv(self.records())?)
    }

    pub fn export_all_json(&self) -> Result<String, InventoryError> {
        Ok(codec::export_json(self.records())?)
    }

    // --- view state ---

    pub fn set_query(&mut self, text: &str) {
        self.view_state.query = text.to_string();
        self.view_state.page = 1;
    }

    pub fn set_favorites_only(&mut self, enabled: bool) {
        self.view_state.favorites_only = enabled;
        self.view_state.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), InventoryError> {
        if page_size == 0 {
            return Err(InventoryError::InvalidPageSize);
        }
        self.view_state.page_size = page_size;
        self.view_state.page = 1;
        Ok(())
    }

    /// Jump to `page`. Pages past the end are allowed and show nothing.
    pub fn go_to_page(&mut self, page: usize) {
        self.view_state.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        if self.view_state.page < self.view().total_pages {
            self.view_state.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.view_state.page > 1 {
            self.view_state.page -= 1;
        }
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, InventoryError> {
        let theme = self.theme.toggled();
        theme.persist(&mut self.kv)?;
        self.theme = theme;
        Ok(theme)
    }

    // --- projection ---

    fn query(&self) -> ViewQuery {
        ViewQuery {
            text: self.view_state.query.clone(),
            favorites_only: self.view_state.favorites_only,
            page: self.view_state.page,
            page_size: self.view_state.page_size,
        }
    }

    /// Recompute the visible page from scratch.
    pub fn view(&self) -> ViewPage<'_> {
        compute_view(self.records(), &self.query(), |name| self.favorites.has(name))
    }

    /// Owned view-state for the renderer.
    pub fn snapshot(&self) -> ViewSnapshot {
        let page = self.view();
        let cards = page
            .items
            .into_iter()
            .map(|item| CardView {
                selected: self.selected.has(&item.record.name),
                favorite: self.favorites.has(&item.record.name),
                record: item.record.clone(),
                highlights: item.highlights,
            })
            .collect::<Vec<_>>();

        ViewSnapshot {
            no_results: cards.is_empty(),
            cards,
            total_records: self.records.len(),
            selected_count: self.selected.len(),
            filtered_count: page.filtered_count,
            total_pages: page.total_pages,
            current_page: page.current_page,
            page_numbers: (1..=page.total_pages).collect(),
            has_previous: page.current_page > 1,
            has_next: page.current_page < page.total_pages,
            query: self.view_state.query.clone(),
            favorites_only: self.view_state.favorites_only,
            page_size: self.view_state.page_size,
            theme: self.theme,
        }
    }

    // --- dispatch ---

    /// Run one user action and return its reply with the recomputed view.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, InventoryError> {
        let reply = match command {
            Command::AddRecord { record } => {
                let name = record.name.trim().to_string();
                self.add_record(record)?;
                Reply::Added { name }
            }
            Command::UpdateRecord { original, record } => {
                let name = record.name.trim().to_string();
                self.update_record(&original, record)?;
                Reply::Updated { name }
            }
            Command::RemoveRecord { key } => {
                let removed = self.remove_record(&key)?;
                Reply::Removed {
                    name: removed.map(|r| r.name),
                }
            }
            Command::Import {
                file_name,
                contents,
            } => Reply::Imported {
                added: self.import_file(&file_name, &contents)?,
            },
            Command::ExportSelected => Reply::Exported {
                file: self.export_selected_csv()?,
            },
            Command::Search { text } => {
                self.set_query(&text);
                Reply::Done
            }
            Command::ClearSearch => {
                self.set_query("");
                Reply::Done
            }
            Command::ShowFavoritesOnly { enabled } => {
                self.set_favorites_only(enabled);
                Reply::Done
            }
            Command::SetPageSize { page_size } => {
                self.set_page_size(page_size)?;
                Reply::Done
            }
            Command::GoToPage { page } => {
                self.go_to_page(page);
                Reply::Done
            }
            Command::NextPage => {
                self.next_page();
                Reply::Done
            }
            Command::PreviousPage => {
                self.previous_page();
                Reply::Done
            }
            Command::ToggleFavorite { name } => {
                let member = self.toggle_favorite(&name)?;
                Reply::Toggled { name, member }
            }
            Command::ToggleSelected { name } => {
                let member = self.toggle_selected(&name)?;
                Reply::Toggled { name, member }
            }
            Command::ToggleTheme => Reply::ThemeChanged {
                theme: self.toggle_theme()?,
            },
        };

        Ok(Outcome {
            reply,
            view: self.snapshot(),
        })
    }
}

fn validated(record: EquipmentRecord) -> Result<EquipmentRecord, InventoryError> {
    let record = record.trimmed();
    let missing = record.missing_fields();
    if !missing.is_empty() {
        return Err(InventoryError::MissingFields(missing));
    }
    Ok(record)
}
