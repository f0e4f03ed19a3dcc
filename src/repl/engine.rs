use std::sync::{Arc, Mutex, PoisonError};

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, info};

use crate::catalog::SchemaCatalog;
use crate::config::{CompletionConfig, HistoryConfig};
use crate::error::Result;

use super::completer::SqlCompleter;
use super::completion::CompletionEngine;
use super::highlighter::SqlHighlighter;
use super::prompt::SqlPrompt;

/// Name of the completion menu bound to Tab
const COMPLETION_MENU: &str = "completion_menu";

/// Background of the selected completion entry
const SELECTED_BACKGROUND: Color = Color::Rgb(0xe4, 0x5a, 0x3a);

/// REPL engine for interactive statement entry
pub struct ReplEngine {
    /// Line editor for statement input
    editor: Reedline,

    /// Prompt shown before each line
    prompt: SqlPrompt,

    /// Completion session, shared with the editor's completer
    completion: Arc<Mutex<CompletionEngine>>,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `catalog` - Schema catalog for name completion
    /// * `history_config` - History configuration
    /// * `completion_config` - Completion menu configuration
    /// * `color_enabled` - Allow ANSI colors in the editor
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(
        catalog: Arc<dyn SchemaCatalog>,
        history_config: &HistoryConfig,
        completion_config: &CompletionConfig,
        color_enabled: bool,
    ) -> Result<Self> {
        let completion = Arc::new(Mutex::new(CompletionEngine::new(catalog)));
        let completer = Box::new(SqlCompleter::new(Arc::clone(&completion)));

        let menu = ColumnarMenu::default()
            .with_name(COMPLETION_MENU)
            .with_columns(completion_config.columns)
            .with_selected_text_style(Style::new().fg(Color::Black).on(SELECTED_BACKGROUND));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let history = if history_config.persist {
            FileBackedHistory::with_file(history_config.max_size, history_config.file_path.clone())?
        } else {
            FileBackedHistory::new(history_config.max_size)?
        };

        let editor = Reedline::create()
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_quick_completions(completion_config.quick_completions)
            .with_partial_completions(completion_config.partial_completions)
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_history(Box::new(history))
            .with_highlighter(Box::new(SqlHighlighter::new(color_enabled)))
            .with_ansi_colors(color_enabled);

        debug!(
            persist = history_config.persist,
            columns = completion_config.columns,
            "line editor ready"
        );

        Ok(Self {
            editor,
            prompt: SqlPrompt::new(),
            completion,
        })
    }

    /// Read a single line of input
    ///
    /// Ctrl-C abandons the current statement and yields an empty line.
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, or None on end of input
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC => {
                self.reset_completion();
                Ok(Some(String::new()))
            }
            Signal::CtrlD => Ok(None),
        }
    }

    /// Finish a statement and hand it on
    ///
    /// Brings the completion session up to date with the full statement,
    /// records whether it is a queryable prefix, then starts a new statement.
    ///
    /// # Arguments
    /// * `statement` - Statement as entered
    ///
    /// # Returns
    /// * `String` - Trimmed statement
    pub fn submit(&mut self, statement: &str) -> String {
        let statement = statement.trim();

        let mut engine = self
            .completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        engine.sync(statement);
        info!(
            statement,
            state = %engine.state(),
            queryable = engine.is_valid(),
            "statement submitted"
        );
        engine.reset();

        statement.to_string()
    }

    /// Start a new statement in the completion session
    pub fn reset_completion(&self) {
        self.completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
    }

    /// Completion session shared with the editor
    pub fn completion_engine(&self) -> Arc<Mutex<CompletionEngine>> {
        Arc::clone(&self.completion)
    }
}
