//! CLI module for the svgnotes application
//!
//! This module handles the command-line interface for interacting with the
//! note storage system.
use std::io::{stdin, stdout, Write};

use log::info;

use crate::{Commands, Note, NoteStorage, Result};

/// CLI Application handler - processes CLI commands and interfaces with NoteStorage
pub struct App {
    /// The note storage backend
    note_storage: NoteStorage,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given storage backend
    pub fn new(note_storage: NoteStorage, verbose: bool) -> Self {
        Self {
            note_storage,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Create { title, content } => self.handle_create(title, content),

            Commands::View { id, json } => self.handle_view(id, json),

            Commands::List { json, brief } => self.handle_list(json, brief),

            Commands::Search { query, limit, json } => self.handle_search(query, limit, json),

            Commands::Edit { id, title, content } => self.handle_edit(id, title, content),

            Commands::Delete { id, force } => self.handle_delete(id, force),

            Commands::Clear { force } => self.handle_clear(force),
        }
    }

    fn handle_create(&self, title: String, content: String) -> Result<()> {
        let note = self.note_storage.create_note(&title, &content)?;
        println!("Note created with ID: {}", note.id);
        if self.verbose {
            self.display_note(&note);
        }
        Ok(())
    }

    fn handle_view(&self, id: u64, json: bool) -> Result<()> {
        let note = self.note_storage.get_note(id)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&note)?);
        } else {
            self.display_note(&note);
        }
        Ok(())
    }

    fn handle_list(&self, json: bool, brief: bool) -> Result<()> {
        let notes = self.note_storage.list_notes()?;

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes found.");
            return Ok(());
        }

        for note in &notes {
            if brief {
                println!("{:>4}  {}", note.id, note.title);
            } else {
                self.display_summary(note);
            }
        }
        Ok(())
    }

    fn handle_search(&self, query: String, limit: usize, json: bool) -> Result<()> {
        let mut notes = self.note_storage.search_notes(&query)?;
        notes.truncate(limit);

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes matched '{}'.", query);
            return Ok(());
        }

        for note in &notes {
            self.display_summary(note);
        }
        Ok(())
    }

    fn handle_edit(&self, id: u64, title: Option<String>, content: Option<String>) -> Result<()> {
        // Fields not supplied on the command line keep their stored values
        let existing = self.note_storage.get_note(id)?;
        let new_title = title.unwrap_or_else(|| existing.title.clone());
        let new_content = content.unwrap_or_else(|| existing.content.clone());

        let note = self.note_storage.update_note(id, &new_title, &new_content)?;
        println!("Note {} updated", note.id);
        if self.verbose {
            self.display_note(&note);
        }
        Ok(())
    }

    fn handle_delete(&self, id: u64, force: bool) -> Result<()> {
        if !force && !self.confirm(&format!("Delete note {}?", id))? {
            println!("Aborted.");
            return Ok(());
        }
        self.note_storage.delete_note(id)?;
        println!("Note {} deleted", id);
        Ok(())
    }

    fn handle_clear(&self, force: bool) -> Result<()> {
        if !force && !self.confirm("Delete ALL notes?")? {
            println!("Aborted.");
            return Ok(());
        }
        let deleted = self.note_storage.delete_all_notes()?;
        println!("Deleted {} notes", deleted);
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("{} [y/N] ", prompt);
        stdout().flush()?;

        let mut answer = String::new();
        stdin().read_line(&mut answer)?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn display_note(&self, note: &Note) {
        info!("Displaying note {}", note.id);

        println!("Title: {}", console::style(&note.title).bold());
        println!("ID: {}", note.id);
        println!(
            "Created: {}",
            note.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("{}", "-".repeat(self.display_width().min(60)));
        println!("{}", note.content);
    }

    fn display_summary(&self, note: &Note) {
        let width = self.display_width();
        let title = console::style(&note.title).bold().to_string();
        let preview_width = width.saturating_sub(note.title.chars().count() + 8).max(10);

        println!(
            "{:>4}  {}  {}",
            note.id,
            title,
            console::style(preview(&note.content, preview_width)).dim()
        );
    }

    fn display_width(&self) -> usize {
        terminal_size::terminal_size()
            .map(|(width, _)| width.0 as usize)
            .unwrap_or(80)
    }
}

/// Clips content to a display preview of at most `max` characters.
fn preview(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        content.to_string()
    } else {
        let clipped: String = content.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_clips_long_content() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a long piece of content", 8), "a long …");
    }
}
