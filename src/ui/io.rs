use crate::app::NotesApp;
use crate::filter::{empty_list_message, preview_text};
use crate::html::{strip_html, wrap_as_html};
use crate::setup::{arguments, logging};
use crate::ui::cli;
use crate::{MenuError, Note, NoteError, NoteId, Result};

use log::{error, info, warn};
use std::fmt;
use tabled::Tabled;

/// Abstraction for input/output
pub trait IO {
    /// Read a trimmed line of input ending at newline
    fn get_input(&self) -> Result<String>;
    /// Read multiple lines until a trimmed line equals `stop_at`
    fn get_input_until(&self, stop_at: &str) -> Result<String>;
    /// Display a list of selectable options
    fn show_menu(&self, options: &[impl std::fmt::Display]);
    /// Display a bolded title
    fn show_title(&self, title: &str);
    /// Render a table of notes
    fn show_notes_list(&self, rows: Vec<NoteRow>);
    /// Print a plain text message
    fn show_text(&self, msg: &str);
}

/// One line of the notes table
#[derive(Tabled, Debug, PartialEq, Eq)]
pub struct NoteRow {
    pub id: String,
    pub title: String,
    pub created: String,
    pub preview: String,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title.clone(),
            created: note.created_at.format("%b %-d").to_string(),
            preview: preview_text(&note.content),
        }
    }
}

/// Actions available in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Create = 1,
    Edit = 2,
    Delete = 3,
    List = 4,
    Search = 5,
    ClearSearch = 6,
    Refresh = 7,
    Quit = 8,
}

/// All menu options in display order
pub const ALL_MENU_OPTIONS: [MenuOption; 8] = [
    MenuOption::Create,
    MenuOption::Edit,
    MenuOption::Delete,
    MenuOption::List,
    MenuOption::Search,
    MenuOption::ClearSearch,
    MenuOption::Refresh,
    MenuOption::Quit,
];

/// Convert a numeric choice into a `MenuOption`
///
/// # Errors
///
/// Returns `Err(())` if the value does not map to a valid variant
impl TryFrom<u8> for MenuOption {
    type Error = ();

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Create),
            2 => Ok(Self::Edit),
            3 => Ok(Self::Delete),
            4 => Ok(Self::List),
            5 => Ok(Self::Search),
            6 => Ok(Self::ClearSearch),
            7 => Ok(Self::Refresh),
            8 => Ok(Self::Quit),
            _ => Err(()),
        }
    }
}

/// Show the option number and label, e.g. `(1) New note`
impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "New note",
            Self::Edit => "Edit note",
            Self::Delete => "Delete note",
            Self::List => "List notes",
            Self::Search => "Search notes",
            Self::ClearSearch => "Clear search",
            Self::Refresh => "Refresh",
            Self::Quit => "Quit",
        };
        write!(f, "({}) {}", *self as u8, label)
    }
}

/// Dispatch chosen `MenuOption` to its handler
async fn handle_menu_option(io: &impl IO, app: &mut NotesApp, option: MenuOption) -> Result<()> {
    match option {
        MenuOption::Create => handle_create(io, app).await,
        MenuOption::Edit => handle_edit(io, app).await,
        MenuOption::Delete => handle_delete(io, app).await,
        MenuOption::List => {
            handle_list(io, app);
            Ok(())
        }
        MenuOption::Search => handle_search(io, app),
        MenuOption::ClearSearch => {
            app.clear_search();
            handle_list(io, app);
            Ok(())
        }
        MenuOption::Refresh => {
            app.reload().await;
            report_fetch_error(app);
            handle_list(io, app);
            Ok(())
        }
        MenuOption::Quit => Ok(()),
    }
}

/// Initialize logging, parse args, and run the menu loop until the user
/// quits or stdin is closed
pub async fn run() {
    logging::setup_log();
    let mut app = match arguments::handle_args() {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    let io = cli::Cli;

    loop {
        if app.sync().await {
            report_fetch_error(&app);
        }

        io.show_menu(&ALL_MENU_OPTIONS);
        let result = match get_menu_input(&io) {
            Ok(MenuOption::Quit) => break,
            Ok(opt) => handle_menu_option(&io, &mut app, opt).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(NoteError::Menu(MenuError::EndOfInput)) => break,
            Err(e) => error!("{}", user_message(&app, &e, false)),
        }
    }
    info!("Bye!");
}

/// Try parsing input as `MenuOption` or return an error
///
/// # Errors
///
/// Returns `NoteError::Menu(MenuError::ParseError)` if input is not an integer
/// Returns `NoteError::Menu(MenuError::InvalidOption)` if integer is out of range
fn get_menu_input(io: &impl IO) -> Result<MenuOption> {
    let input = io.get_input()?;

    match input.parse::<u8>() {
        Ok(n) => MenuOption::try_from(n).map_err(|()| MenuError::InvalidOption(n).into()),
        Err(_) => Err(MenuError::ParseError(input).into()),
    }
}

/// User-facing text for an error. Transport details were already logged by
/// the client, so only the generic message is shown. The form's inline
/// message only describes `e` when `e` came from submitting the form.
fn user_message(app: &NotesApp, e: &NoteError, from_form: bool) -> String {
    match (e, app.session().error()) {
        (NoteError::Transport(_) | NoteError::Validation(_), Some(msg)) if from_form => {
            msg.to_string()
        }
        (NoteError::Transport(t), _) => t.user_message().to_string(),
        _ => e.to_string(),
    }
}

fn report_fetch_error(app: &NotesApp) {
    if let Some(msg) = app.store().error_message() {
        error!("{msg}");
    }
}

/// Prompt for a note ID that exists in the current list
fn get_note_id(io: &impl IO, app: &NotesApp) -> Result<NoteId> {
    loop {
        io.show_text("ID:");
        let id = NoteId::from(io.get_input()?);
        if app.store().find(&id).is_some() {
            return Ok(id);
        }
        warn!("No note with ID: {id}");
    }
}

/// Read multi-line content and turn it into an HTML fragment
fn get_content(io: &impl IO) -> Result<String> {
    io.show_text("Content (end with '.' on last line):");
    let text = io.get_input_until(".")?;
    Ok(wrap_as_html(&text))
}

async fn handle_create(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    io.show_title("New note");
    app.cancel_edit();

    io.show_text("Title:");
    let title = io.get_input()?;
    app.set_title(title);
    app.set_content(get_content(io)?);

    submit_form(io, app).await
}

async fn handle_edit(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    io.show_title("Edit note");
    handle_list(io, app);
    if app.store().notes().is_empty() {
        return Ok(());
    }

    let id = get_note_id(io, app)?;
    app.start_edit(&id)?;
    revise_fields(io, app)?;

    submit_form(io, app).await
}

/// Lets the user change the form's title and content, keeping what they skip
fn revise_fields(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    io.show_text(&format!(
        "Current title: {}\nNew title (empty keeps current):",
        app.session().title()
    ));
    let title = io.get_input()?;
    if !title.is_empty() {
        app.set_title(title);
    }

    io.show_text(&"-".repeat(20));
    io.show_text(&strip_html(app.session().content()));
    io.show_text(&"-".repeat(20));
    io.show_text("Replace content? (y/n):");
    if is_yes(&io.get_input()?) {
        app.set_content(get_content(io)?);
    }
    Ok(())
}

/// Submits the form until it succeeds or the user gives up. A rejected form
/// is reopened for changes, a failed request can be resent as is. The form
/// is only discarded when the user declines.
///
/// # Errors
///
/// Only input errors; submission failures are reported and handled here
async fn submit_form(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    loop {
        let e = match app.submit().await {
            Ok(_) => {
                if let Some(msg) = app.session().success() {
                    info!("{msg}");
                }
                // the note is saved even if the list could not be reloaded
                report_fetch_error(app);
                return Ok(());
            }
            Err(e @ NoteError::Menu(_)) => return Err(e),
            Err(e) => e,
        };
        error!("{}", user_message(app, &e, true));

        io.show_text(if e.is_validation() {
            "Fix the note? (y/n):"
        } else {
            "Try again? (y/n):"
        });
        if !is_yes(&io.get_input()?) {
            app.cancel_edit();
            info!("Discarded changes");
            return Ok(());
        }
        if e.is_validation() {
            revise_fields(io, app)?;
        }
    }
}

async fn handle_delete(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    io.show_title("Delete note");
    handle_list(io, app);
    if app.store().notes().is_empty() {
        return Ok(());
    }

    let id = get_note_id(io, app)?;
    loop {
        io.show_text("Delete this note? (y/n):");
        let input = io.get_input()?;
        if is_yes(&input) {
            break;
        }
        if is_no(&input) {
            info!("Not deleting note #{id}");
            return Ok(());
        }
        warn!("Invalid input. Please enter 'y' or 'n'");
    }

    app.delete(&id).await
}

/// Renders the notes matching the current search
fn handle_list(io: &impl IO, app: &NotesApp) {
    let visible = app.visible_notes();
    if visible.is_empty() {
        io.show_text(&empty_list_message(app.search_term()));
        return;
    }

    if !app.search_term().is_empty() {
        io.show_text(&format!(
            "Showing {} of {} notes matching \"{}\"",
            visible.len(),
            app.store().notes().len(),
            app.search_term()
        ));
    }
    io.show_notes_list(visible.into_iter().map(NoteRow::from).collect());
}

fn handle_search(io: &impl IO, app: &mut NotesApp) -> Result<()> {
    io.show_title("Search notes");
    io.show_text("Search term (empty shows everything):");
    let term = io.get_input()?;
    app.set_search(term);
    handle_list(io, app);
    Ok(())
}

fn is_yes(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "y" | "yes")
}

fn is_no(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "n" | "no")
}
