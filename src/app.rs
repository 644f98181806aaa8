//! Terminal front end: owns the widget, the inputs and the theme, and runs
//! the draw/poll loop.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crate::api::FormEndpoint;
use crate::config::Config;
use crate::form::{contact_steps, FieldValue};
use crate::notifications::NotificationQueue;
use crate::theme::{FileThemeStore, Theme, ThemePreferenceStore, ThemeToggle};
use crate::ui::form_field::FormField;
use crate::ui::keybindings::{action_for, Action};
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::ui::wizard_view::WizardScreen;
use crate::wizard::{SubmissionPhase, Submitter, Widget, WizardError};

pub struct App {
    config: Config,
    widget: Widget,
    screen: WizardScreen,
    submitter: Box<dyn Submitter>,
    theme: ThemeToggle,
    notifications: NotificationQueue,
    should_quit: bool,
    /// Set by a submit key; picked up by the run loop
    pending_submit: bool,
}

impl App {
    /// App posting to the configured endpoint, with the theme saved under
    /// the state directory
    pub fn new(config: Config) -> Result<Self> {
        let endpoint = FormEndpoint::from_config(&config.endpoint)?;
        let store = FileThemeStore::new(config.preferences_path());
        Ok(Self::with_parts(config, Box::new(endpoint), Box::new(store)))
    }

    pub fn with_parts(
        config: Config,
        submitter: Box<dyn Submitter>,
        theme_store: Box<dyn ThemePreferenceStore>,
    ) -> Self {
        let notifications = NotificationQueue::new();
        let steps = contact_steps();
        let screen = WizardScreen::new(&steps);
        let widget = Widget::new(steps, Arc::new(notifications.clone()))
            .with_messages(config.messages.clone());

        Self {
            config,
            widget,
            screen,
            submitter,
            theme: ThemeToggle::new(theme_store),
            notifications,
            should_quit: false,
            pending_submit: false,
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn screen(&self) -> &WizardScreen {
        &self.screen
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let _guard = TerminalGuard::new()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);
        let banner_ttl = Duration::from_millis(self.config.ui.notification_ttl_ms);
        tracing::info!(endpoint = %self.config.endpoint.url, "Wizard started");

        while !self.should_quit {
            self.draw(&mut terminal)?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }

            if let Some(payload) = self.begin_pending_submission() {
                // Show the locked "Sending…" state before waiting on the endpoint
                self.draw(&mut terminal)?;
                self.finish_submission(payload).await;

                // Input queued while the request was pending is discarded
                while event::poll(Duration::ZERO)? {
                    event::read()?;
                }
            }

            self.screen.expire_banner(banner_ttl);
        }

        terminal.show_cursor()?;
        tracing::info!("Wizard closed");
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let view = self.widget.render();
        let theme = self.theme.current();
        let screen = &mut self.screen;
        terminal.draw(|frame| screen.render(frame, &view, theme))?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let view = self.widget.render();
        let multiline = self
            .screen
            .focused_name(&view)
            .and_then(|name| self.screen.inputs().get(name))
            .is_some_and(FormField::is_multiline);

        let action = action_for(&key, multiline, self.widget.state().is_last());
        if view.is_submitting() && !matches!(action, Action::Quit | Action::ToggleTheme) {
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleTheme => self.toggle_theme(),
            Action::FocusNext => self.screen.focus_next(view.fields.len()),
            Action::FocusPrev => self.screen.focus_prev(view.fields.len()),
            Action::Previous => match self.widget.previous() {
                Ok(_) => self.focus_first(),
                Err(err) => self.on_refused(err),
            },
            Action::Next => match self.widget.next() {
                Ok(_) => self.focus_first(),
                Err(err) => self.on_refused(err),
            },
            Action::Submit => self.pending_submit = true,
            Action::Edit => {
                let Some(name) = self.screen.focused_name(&view) else {
                    return;
                };
                let Some(input) = self.screen.inputs_mut().get_mut(name) else {
                    return;
                };
                if input.handle_key(key) {
                    let value = input.value();
                    self.widget.set_value(name, value);
                }
            }
        }
    }

    /// Append pasted text to the focused input. Line breaks become spaces
    /// outside the message box.
    pub fn handle_paste(&mut self, text: &str) {
        let view = self.widget.render();
        if view.is_submitting() {
            return;
        }
        let Some(name) = self.screen.focused_name(&view) else {
            return;
        };
        let Some(input) = self.screen.inputs_mut().get_mut(name) else {
            return;
        };

        let pasted = if input.is_multiline() {
            text.replace("\r\n", "\n")
        } else {
            text.replace(['\r', '\n'], " ")
        };
        let value = format!("{}{}", input.value(), pasted);
        input.set_value(&value);
        self.widget.set_value(name, value);
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => tracing::debug!(theme = %theme, "Theme toggled"),
            Err(err) => tracing::warn!(error = %err, "Failed to save theme preference"),
        }
    }

    fn focus_first(&mut self) {
        self.screen.set_focus(0, 1);
    }

    fn on_refused(&mut self, err: WizardError) {
        // Out-of-range moves were already logged by the widget
        if !err.is_user_facing() {
            return;
        }
        if let WizardError::Validation(ref invalid) = err {
            tracing::debug!(field = %invalid.field, reason = %invalid.reason, "Step blocked");
            let view = self.widget.render();
            if let Some(index) = view.invalid_field_index() {
                self.screen.set_focus(index, view.fields.len());
            }
        }
    }

    /// Gate and lock the final step if a submit key was pressed. Returns the
    /// payload to send.
    pub fn begin_pending_submission(&mut self) -> Option<Vec<FieldValue>> {
        if !std::mem::take(&mut self.pending_submit) {
            return None;
        }
        match self.widget.begin_submission() {
            Ok(payload) => Some(payload),
            Err(err) => {
                self.on_refused(err);
                None
            }
        }
    }

    /// Send the payload and apply the outcome to the widget and screen
    pub async fn finish_submission(&mut self, payload: Vec<FieldValue>) -> SubmissionPhase {
        let result = self.submitter.submit(&payload).await;
        let phase = self.widget.complete_submission(&result);

        for notification in self.notifications.drain() {
            self.screen.show(notification);
        }

        let widget = &self.widget;
        self.screen.inputs_mut().sync(|name| widget.value(name));
        if phase == SubmissionPhase::Succeeded {
            self.focus_first();
        }
        phase
    }
}
