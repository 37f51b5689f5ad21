//! Main application logic and TUI event loop.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::cli::AppConfig;
use crate::data::{FormError, SettingsStore, Storage};
use crate::dialog::{ConfirmAction, Dialogs};
use crate::export::{export_inspection, ExportError};
use crate::photos::{find_item, PhotoStore};
use crate::screens::{
    FormAction, FormState, GridAction, GridScreen, ListAction, ListScreen, PhotosAction,
    PhotosScreen, SettingsAction, SettingsScreen,
};
use crate::ui::{
    widgets::{DialogPopup, FormPopup, InspectionList, SearchBar, SettingsPanel, StatusBar},
    GridView, HelpOverlay, PhotosView, Theme,
};

/// Which screen fills the body
#[derive(Debug)]
pub enum Screen {
    List,
    Grid(GridScreen),
    Photos(PhotosScreen),
    Settings(SettingsScreen),
}

/// Application state
pub struct App {
    // Configuration
    config: AppConfig,
    theme: Theme,

    // Data
    storage: Storage,
    photo_store: PhotoStore,

    // UI State
    list: ListScreen,
    screen: Screen,
    form: Option<FormState>,
    dialogs: Dialogs,
    show_help: bool,

    // Exit flag
    should_quit: bool,

    // Feedback shown in the status bar
    status_message: Option<String>,
    error_message: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = Storage::open(&config.db_path)?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: AppConfig, storage: Storage) -> Result<Self> {
        let photo_store = PhotoStore::new(&config.photo_dir);
        let mut app = App {
            config,
            theme: Theme::default(),
            storage,
            photo_store,
            list: ListScreen::new(),
            screen: Screen::List,
            form: None,
            dialogs: Dialogs::new(),
            show_help: false,
            should_quit: false,
            status_message: None,
            error_message: None,
        };
        app.reload()?;
        Ok(app)
    }

    /// Reload the inspection list from storage
    fn reload(&mut self) -> Result<()> {
        self.list.set_summaries(self.storage.list_inspections()?);
        Ok(())
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_message = Some(message);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Persist pending grid edits. Failed writes were logged by the queue.
    fn flush_grid(&mut self) {
        if let Screen::Grid(grid) = &mut self.screen {
            let report = grid.flush(&self.storage);
            if report.applied > 0 {
                tracing::debug!(applied = report.applied, "grid edits saved");
            }
            if report.failed > 0 {
                self.error_message = Some(format!("{} edit(s) could not be saved", report.failed));
            }
        }
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        self.status_message = None;

        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.flush_grid();
            self.should_quit = true;
            return Ok(());
        }

        // Dialogs and the form are modal
        if self.dialogs.is_open() {
            if let Some(action) = self.dialogs.handle_key(key) {
                self.perform(action)?;
            }
            return Ok(());
        }
        if self.form.is_some() {
            return self.handle_form_input(key);
        }

        let typing = match &self.screen {
            Screen::List => self.list.is_searching(),
            Screen::Photos(photos) => photos.is_typing(),
            _ => false,
        };
        if !typing {
            match key {
                KeyCode::Char('?') | KeyCode::F(1) => {
                    self.show_help = !self.show_help;
                    return Ok(());
                }
                KeyCode::Esc if self.show_help => {
                    self.show_help = false;
                    return Ok(());
                }
                _ => {}
            }
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return Ok(());
        }

        self.error_message = None;
        match &mut self.screen {
            Screen::List => {
                let action = self.list.handle_key(key, &mut self.dialogs);
                self.handle_list_action(action)?;
            }
            Screen::Grid(grid) => {
                let action = grid.handle_key(key);
                self.flush_grid();
                if action == GridAction::Back {
                    self.screen = Screen::List;
                    self.reload()?;
                }
            }
            Screen::Photos(photos) => match photos.handle_key(key, &mut self.dialogs) {
                PhotosAction::None => {}
                PhotosAction::Back => {
                    self.screen = Screen::List;
                    self.reload()?;
                }
                PhotosAction::Attach { item, path } => self.attach_photo(item, &path)?,
            },
            Screen::Settings(settings) => match settings.handle_key(key) {
                SettingsAction::None => {}
                SettingsAction::Cancel => self.screen = Screen::List,
                SettingsAction::Save(order) => {
                    self.storage.set_axis_order(order)?;
                    self.screen = Screen::List;
                    self.set_status(format!("Grid structure saved: {}", order.to_setting()));
                }
            },
        }
        Ok(())
    }

    fn handle_list_action(&mut self, action: ListAction) -> Result<()> {
        match action {
            ListAction::None => {}
            ListAction::Quit => self.should_quit = true,
            ListAction::Refresh => self.reload()?,
            ListAction::New => self.form = Some(FormState::create(self.storage.next_number()?)),
            ListAction::Edit(id) => match self.storage.get_inspection(id)? {
                Some(inspection) => self.form = Some(FormState::edit(&inspection)),
                None => self.dialogs.alert("Not found", format!("Inspection {id} no longer exists")),
            },
            ListAction::Open(id) => self.open_grid(id)?,
            ListAction::Photos(id) => self.open_photos(id)?,
            ListAction::Settings => {
                self.screen = Screen::Settings(SettingsScreen::new(self.storage.axis_order()));
            }
            ListAction::Export(id) => self.export(id)?,
        }
        Ok(())
    }

    fn open_grid(&mut self, id: i64) -> Result<()> {
        let Some(inspection) = self.storage.get_inspection(id)? else {
            self.dialogs
                .alert("Not found", format!("Inspection {id} no longer exists"));
            return Ok(());
        };
        let points = self.storage.points_map(id)?;
        let order = self.storage.axis_order();
        tracing::debug!(id, order = %order.to_setting(), "opening grid");
        self.screen = Screen::Grid(GridScreen::new(inspection, points, order));
        Ok(())
    }

    fn open_photos(&mut self, id: i64) -> Result<()> {
        let Some(inspection) = self.storage.get_inspection(id)? else {
            self.dialogs
                .alert("Not found", format!("Inspection {id} no longer exists"));
            return Ok(());
        };
        let mut photos = PhotosScreen::new(inspection);
        photos.refresh(&self.photo_store)?;
        self.screen = Screen::Photos(photos);
        Ok(())
    }

    /// Copy an image in as the next photo of a checklist item
    fn attach_photo(&mut self, item_id: u32, source: &Path) -> Result<()> {
        let Screen::Photos(photos) = &mut self.screen else {
            return Ok(());
        };
        let Some(item) = find_item(item_id) else {
            return Ok(());
        };
        match self.photo_store.attach(photos.inspection(), item, source) {
            Ok(dest) => {
                photos.refresh(&self.photo_store)?;
                let name = dest.file_name().map(|n| n.to_string_lossy().into_owned());
                self.set_status(format!("Photo saved: {}", name.unwrap_or_default()));
            }
            Err(e) => {
                tracing::warn!("attach failed: {e:#}");
                self.dialogs.alert("Photo not saved", format!("{e:#}"));
            }
        }
        Ok(())
    }

    fn export(&mut self, id: i64) -> Result<()> {
        match export_inspection(
            &self.storage,
            &self.config.excel_dir,
            &self.config.image_dir,
            id,
        ) {
            Ok(outcome) => {
                self.set_status(format!(
                    "Export #{}: {} and {}",
                    outcome.export_count,
                    outcome.workbook.display(),
                    outcome.image.display()
                ));
                self.reload()?;
            }
            Err(e) => match e.downcast_ref::<ExportError>() {
                Some(refusal) => self.dialogs.alert("Export refused", refusal.to_string()),
                None => {
                    tracing::warn!("export failed: {e:#}");
                    self.dialogs.alert("Export failed", format!("{e:#}"));
                }
            },
        }
        Ok(())
    }

    fn handle_form_input(&mut self, key: KeyCode) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        let draft = match form.handle_key(key) {
            FormAction::None => return Ok(()),
            FormAction::Cancel => {
                self.form = None;
                return Ok(());
            }
            FormAction::Submit(draft) => draft,
        };

        let result = match form.editing {
            Some(id) => self.storage.update_inspection(id, &draft).map(|()| None),
            None => self.storage.create_inspection(&draft).map(Some),
        };
        match result {
            Ok(created) => {
                self.form = None;
                self.reload()?;
                if let Some(id) = created {
                    self.open_grid(id)?;
                }
            }
            Err(e) => {
                let message = match e.downcast_ref::<FormError>() {
                    Some(invalid) => invalid.to_string(),
                    None => format!("{e:#}"),
                };
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(message);
                }
            }
        }
        Ok(())
    }

    /// Carry out a confirmed dialog action
    fn perform(&mut self, action: ConfirmAction) -> Result<()> {
        match action {
            ConfirmAction::DeleteInspection(id) => {
                self.storage.delete_inspection(id)?;
                self.reload()?;
                self.set_status("Inspection deleted");
            }
            ConfirmAction::DeleteSectionPhotos {
                inspection_id,
                section,
            } => {
                let Screen::Photos(photos) = &mut self.screen else {
                    return Ok(());
                };
                if photos.inspection().id != inspection_id {
                    return Ok(());
                }
                let removed = self.photo_store.delete_section(photos.inspection(), section)?;
                photos.refresh(&self.photo_store)?;
                self.set_status(format!("{removed} photo(s) deleted from {}", section.title()));
            }
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        let context = match &self.screen {
            Screen::List => None,
            Screen::Grid(grid) => Some(grid.inspection().title()),
            Screen::Photos(photos) => Some(format!("{} photos", photos.inspection().title())),
            Screen::Settings(_) => Some("Grid structure".to_string()),
        };

        match &self.screen {
            Screen::List => {
                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3), // Search
                        Constraint::Min(3),    // Inspections
                    ])
                    .split(main_chunks[0]);
                SearchBar::new(self.list.query(), self.list.is_searching(), &self.theme)
                    .render(frame, body[0]);
                InspectionList::new(&self.list, &self.theme).render(frame, body[1]);
            }
            Screen::Grid(grid) => GridView::new(grid, &self.theme).render(frame, main_chunks[0]),
            Screen::Photos(photos) => {
                PhotosView::new(photos, &self.theme).render(frame, main_chunks[0])
            }
            Screen::Settings(settings) => {
                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(5), Constraint::Min(0)])
                    .split(main_chunks[0]);
                SettingsPanel::new(settings, &self.theme).render(frame, body[0]);
            }
        }

        StatusBar::new(
            context.as_deref(),
            self.status_message.as_deref(),
            self.error_message.as_deref(),
            &self.theme,
        )
        .render(frame, main_chunks[1]);

        if let Some(form) = &self.form {
            FormPopup::new(form, &self.theme).render(frame, size);
        }
        if let Some(dialog) = self.dialogs.current() {
            DialogPopup::new(dialog, &self.theme).render(frame, size);
        }

        // Render help overlay if active
        if self.show_help {
            HelpOverlay::new(&self.theme).render(frame, size);
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Open storage before touching the terminal so errors print normally
    let mut app = App::new(config).context("Failed to initialize application")?;
    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    tracing::info!(db = %app.config.db_path.display(), "tui started");
    let result = run_main_loop(&mut terminal, &mut app, tick_rate);

    // Pending edits are written even when the loop failed
    app.flush_grid();

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();
    tracing::info!("tui stopped");

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        // Render - if this fails, we should exit
        terminal.draw(|f| app.render(f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_input(key.code, key.modifiers) {
                        // Log error but don't crash
                        app.set_error(format!("{e:#}"));
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
