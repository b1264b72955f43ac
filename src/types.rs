//! Shared result alias and the CLI command surface for the svgnotes
//! application.
use clap::Subcommand;

use crate::NoteError;

/// A specialized Result type for svgnotes operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Available subcommands for the svgnotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    Create {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: String,

        /// Content of the note, plain text
        #[clap(short, long)]
        content: String,
    },

    /// View a note by ID
    View {
        /// ID of the note to view
        id: u64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List all notes
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show note IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// Search notes by title or content
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: u64,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: u64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Delete every note in the store
    Clear {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },
}
