//! The catalog filter view.
//!
//! [`CatalogView`] is the single stateful owner of everything the page needs:
//! the fetched catalog, the live search text, the checkbox panel, the pending
//! debounce, and the last rendered result.  It moves through
//! `Loading -> Ready | LoadFailed`; every recompute while `Ready` filters the
//! catalog again and stores a fresh snapshot for [`view`](Model::view).
//!
//! Typing is debounced: each [`Msg::SearchInput`] bumps a generation counter
//! and the view declares a one-shot timer keyed by that generation.  The
//! runtime cancels the previous timer whenever the key changes, so only the
//! last keystroke's timer fires.  Checkbox toggles, chip removal, and
//! clear-all recompute immediately and leave the pending timer alone.

use crate::catalog::Catalog;
use crate::filter::{self, Filtered, Query, Selection};
use crate::item::{CategoryId, Item};
use crate::markup;
use crate::panel::{Chip, FilterPanel};
use crate::source::{CatalogSource, FetchError};
use shelf_core::{subscribe, After, Command, Model, Page, Subscription};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Element ids of the page regions the view writes.
pub mod regions {
    pub const GRID: &str = "softwareGrid";
    pub const COUNT: &str = "catalogCount";
    pub const CHIPS: &str = "activeFilters";
    pub const SIDEBAR: &str = "filterSidebar";
    /// Holds the search box value as plain text.
    pub const SEARCH: &str = "searchInput";
}

/// Tunables for the view.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Quiet period after the last keystroke before the search applies
    /// (default: 250ms).
    pub debounce: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
        }
    }
}

/// Start-up data for [`CatalogView`].
pub struct CatalogFlags {
    pub source: Arc<dyn CatalogSource>,
    pub options: CatalogOptions,
    /// Pre-rendered checkbox controls.  When empty, the panel is built from
    /// the loaded catalog's categories.
    pub panel: FilterPanel,
    /// Initial search text.
    pub search: String,
    /// Categories checked at start-up.
    pub selection: Selection,
    /// Quit once the load outcome has been rendered.
    pub once: bool,
}

impl CatalogFlags {
    /// Flags that fetch from `source` with default options and no seeded state.
    pub fn new(source: impl CatalogSource) -> Self {
        Self {
            source: Arc::new(source),
            options: CatalogOptions::default(),
            panel: FilterPanel::default(),
            search: String::new(),
            selection: Selection::new(),
            once: false,
        }
    }

    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_panel(mut self, panel: FilterPanel) -> Self {
        self.panel = panel;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Categories to check once the panel exists.  Ids with no control get
    /// one appended.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

#[derive(Debug)]
pub enum Msg {
    /// The initial fetch finished.
    Loaded(Result<Catalog, FetchError>),
    /// The search box changed.
    SearchInput(String),
    /// The debounce timer for the given generation fired.
    SearchSettled(u64),
    /// A category checkbox changed.
    Toggle { id: CategoryId, checked: bool },
    /// An active-filter chip was clicked.  Carries the chip's raw value.
    RemoveChip(String),
    /// The "clear filters" action.
    ClearFilters,
    OpenFilters,
    CloseFilters,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    LoadFailed,
}

/// What the grid region currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Grid {
    Unwritten,
    Results,
    Failed,
}

/// Output of the last recompute.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    filtered: Filtered,
    chips: Vec<Chip>,
}

pub struct CatalogView {
    phase: Phase,
    catalog: Catalog,
    panel: FilterPanel,
    initial_selection: Selection,
    search: String,
    debounce: Duration,
    generation: u64,
    pending: Option<u64>,
    grid: Grid,
    snapshot: Option<Snapshot>,
    recomputes: u64,
    sidebar_open: bool,
    once: bool,
}

impl CatalogView {
    /// Where the view is in its load lifecycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    /// Current contents of the search box (not necessarily applied yet).
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Generation of the debounce timer waiting to fire, if any.
    pub fn pending_search(&self) -> Option<u64> {
        self.pending
    }

    /// How many filter-and-render cycles have run.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Items shown by the last recompute, in catalog order.
    pub fn visible_items(&self) -> Vec<&Item> {
        match &self.snapshot {
            Some(snapshot) => snapshot.filtered.items(&self.catalog).collect(),
            None => Vec::new(),
        }
    }

    /// Status line from the last recompute.
    pub fn count_text(&self) -> Option<String> {
        self.snapshot.as_ref().map(|s| s.filtered.count_text())
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    fn recompute(&mut self) {
        let query = Query::parse(&self.search);
        let selection = self.panel.selection();
        let filtered = filter::apply(&self.catalog, &query, &selection);

        self.recomputes += 1;
        debug!(
            query = query.as_str(),
            selected = selection.len(),
            visible = filtered.count(),
            total = filtered.total,
            "recomputed catalog view"
        );

        self.grid = Grid::Results;
        self.snapshot = Some(Snapshot {
            filtered,
            chips: self.panel.chips(),
        });
    }

    fn loaded(&mut self, result: Result<Catalog, FetchError>) {
        match result {
            Ok(catalog) => {
                info!(items = catalog.len(), "catalog loaded");
                if self.panel.is_empty() {
                    self.panel = FilterPanel::from_categories(&catalog.categories());
                    self.panel.check_all(&self.initial_selection);
                }
                self.catalog = catalog;
                self.phase = Phase::Ready;
                self.recompute();
            }
            Err(err) => {
                warn!(error = %err, "failed to load catalog");
                self.phase = Phase::LoadFailed;
                self.grid = Grid::Failed;
            }
        }
    }
}

impl Model for CatalogView {
    type Message = Msg;
    type Flags = CatalogFlags;

    fn init(flags: CatalogFlags) -> (Self, Command<Msg>) {
        let mut panel = flags.panel;
        // An empty panel is built from the catalog on load and seeded there.
        if !panel.is_empty() {
            panel.check_all(&flags.selection);
        }

        let view = CatalogView {
            phase: Phase::Loading,
            catalog: Catalog::default(),
            panel,
            initial_selection: flags.selection,
            search: flags.search,
            debounce: flags.options.debounce,
            generation: 0,
            pending: None,
            grid: Grid::Unwritten,
            snapshot: None,
            recomputes: 0,
            sidebar_open: false,
            once: flags.once,
        };

        debug!("fetching catalog");
        (view, Command::perform(flags.source.fetch(), Msg::Loaded))
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Loaded(result) => {
                self.loaded(result);
                if self.once {
                    return Command::quit();
                }
            }
            Msg::SearchInput(text) => {
                self.search = text;
                self.generation += 1;
                self.pending = Some(self.generation);
            }
            Msg::SearchSettled(generation) => {
                if self.pending == Some(generation) {
                    self.pending = None;
                    self.recompute();
                }
            }
            Msg::Toggle { id, checked } => {
                self.panel.set_checked(id, checked);
                self.recompute();
            }
            Msg::RemoveChip(value) => {
                self.panel.uncheck_value(&value);
                self.recompute();
            }
            Msg::ClearFilters => {
                self.search.clear();
                self.panel.clear();
                self.recompute();
            }
            Msg::OpenFilters => self.sidebar_open = true,
            Msg::CloseFilters => self.sidebar_open = false,
            Msg::Quit => return Command::quit(),
        }
        Command::none()
    }

    fn view(&self, page: &mut Page) {
        page.set_text(regions::SEARCH, self.search.as_str());
        if !self.panel.is_empty() {
            page.set_html(regions::SIDEBAR, markup::filter_panel(&self.panel));
        }
        page.toggle_class(regions::SIDEBAR, "open", self.sidebar_open);

        match (&self.grid, &self.snapshot) {
            (Grid::Failed, _) => page.set_html(regions::GRID, markup::load_failed()),
            (Grid::Results, Some(snapshot)) => {
                page.set_html(regions::GRID, markup::grid(&self.catalog, &snapshot.filtered))
            }
            _ => {}
        }

        if let Some(snapshot) = &self.snapshot {
            page.set_html(regions::CHIPS, markup::chips(&snapshot.chips));
            page.set_text(regions::COUNT, markup::count(&snapshot.filtered));
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        match self.pending {
            Some(generation) => vec![subscribe(After::new(self.debounce).keyed(generation))
                .map(move |_| Msg::SearchSettled(generation))],
            None => vec![],
        }
    }
}
