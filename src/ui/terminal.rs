use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use super::input::translate_event;
use super::overlays::{DialogKind, Modal, PathPrompt, confirm_close_key};
use super::view::ViewState;
use crate::app::{DialogHandle, FileFilter, Shell, UiEvent, dialog_channel};
use crate::document::{CloseChoice, PromptError};

/// Startup options for [`TerminalShell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOptions {
    pub mouse: bool,
    pub preview_percent: u16,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            mouse: true,
            preview_percent: 50,
        }
    }
}

/// [`Shell`] drawn with ratatui and fed by crossterm events.
///
/// The terminal is restored when the shell is dropped.
pub struct TerminalShell {
    terminal: DefaultTerminal,
    view: ViewState,
    mouse: bool,
}

impl TerminalShell {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up.
    pub fn init(options: TerminalOptions) -> Result<Self> {
        let terminal = ratatui::try_init().context("Failed to initialize terminal")?;
        let shell = Self {
            terminal,
            view: ViewState::new(options.preview_percent),
            mouse: options.mouse,
        };
        if options.mouse {
            execute!(stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
        }
        execute!(stdout(), EnableBracketedPaste).context("Failed to enable bracketed paste")?;
        Ok(shell)
    }

    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    fn area(&self) -> io::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    fn redraw(&mut self) {
        if let Err(err) = self.draw() {
            tracing::warn!(%err, "failed to draw overlay");
        }
    }
}

impl Drop for TerminalShell {
    fn drop(&mut self) {
        if self.mouse {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
    }
}

impl Shell for TerminalShell {
    fn editor_value(&self) -> String {
        self.view.editor.text()
    }

    fn set_editor_value(&mut self, text: &str) {
        self.view.editor.set_text(text);
        self.view.editor_scroll = 0;
        self.view.editor_hscroll = 0;
    }

    fn set_preview_content(&mut self, html: &str) {
        self.view.preview.set(html);
        self.view.scroll_preview(0);
    }

    fn set_open_file_label(&mut self, label: &str) {
        label.clone_into(&mut self.view.open_file_label);
    }

    fn set_unsaved_marker(&mut self, unsaved: bool) {
        self.view.unsaved = unsaved;
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.view.modal = Some(Modal::Message {
            title: title.to_string(),
            message: message.to_string(),
        });
        loop {
            self.redraw();
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "input failed while showing error");
                    break;
                }
            }
        }
        self.view.modal = None;
    }

    fn confirm_close(&mut self) -> Result<CloseChoice, PromptError> {
        let mut selected = 0;
        let choice = loop {
            self.view.modal = Some(Modal::ConfirmClose { selected });
            if let Err(err) = self.draw() {
                break Err(PromptError(err.to_string()));
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(choice) = confirm_close_key(&mut selected, key) {
                        break Ok(choice);
                    }
                }
                Ok(_) => {}
                Err(err) => break Err(PromptError(err.to_string())),
            }
        };
        self.view.modal = None;
        choice
    }

    fn show_open_dialog(&mut self, filters: &[FileFilter]) -> DialogHandle {
        let (reply, handle) = dialog_channel();
        self.view.prompt = Some(PathPrompt::new(DialogKind::Open, filters, reply));
        handle
    }

    fn show_save_dialog(&mut self, filters: &[FileFilter]) -> DialogHandle {
        let (reply, handle) = dialog_channel();
        self.view.prompt = Some(PathPrompt::new(DialogKind::Save, filters, reply));
        handle
    }

    fn pump_dialog(&mut self) -> bool {
        self.redraw();
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(%err, "input failed while a dialog was open");
                self.view.prompt = None;
                return false;
            }
        };
        let area = self.area().unwrap_or_default();
        // Only the prompt sees input; anything it does not consume is dropped.
        let _ = translate_event(&mut self.view, event, area);
        true
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<UiEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let event = event::read()?;
        let area = self.area()?;
        Ok(translate_event(&mut self.view, event, area))
    }

    fn draw(&mut self) -> Result<()> {
        let view = &mut self.view;
        self.terminal.draw(|frame| view.draw(frame))?;
        Ok(())
    }

    fn open_url(&mut self, url: &str) -> io::Result<()> {
        open_external_link(url)
    }
}

fn open_external_link(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?.wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
}
