//! Draws the wizard: progress, the active step's fields, buttons, the
//! notification banner and the theme toggle.

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::form_field::FormInputs;
use super::keybindings::footer_hint;
use super::palette::Palette;
use crate::form::Steps;
use crate::notifications::Notification;
use crate::theme::Theme;
use crate::wizard::{Control, WidgetView};

/// A notification on screen and when it appeared
struct Banner {
    notification: Notification,
    shown_at: Instant,
}

/// Screen state the widget doesn't own: inputs, focus and the banner
pub struct WizardScreen {
    inputs: FormInputs,
    focus: usize,
    banner: Option<Banner>,
}

impl WizardScreen {
    pub fn new(steps: &Steps) -> Self {
        Self {
            inputs: FormInputs::new(steps),
            focus: 0,
            banner: None,
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut FormInputs {
        &mut self.inputs
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Focus a field of the active step, clamped to `field_count`
    pub fn set_focus(&mut self, index: usize, field_count: usize) {
        self.focus = index.min(field_count.saturating_sub(1));
    }

    pub fn focus_next(&mut self, field_count: usize) {
        if field_count > 0 {
            self.focus = (self.focus + 1) % field_count;
        }
    }

    pub fn focus_prev(&mut self, field_count: usize) {
        if field_count > 0 {
            self.focus = (self.focus + field_count - 1) % field_count;
        }
    }

    /// Name of the focused field on the given view
    pub fn focused_name<'v>(&self, view: &'v WidgetView) -> Option<&'v str> {
        view.fields.get(self.focus).map(|f| f.name.as_str())
    }

    pub fn show(&mut self, notification: Notification) {
        self.banner = Some(Banner {
            notification,
            shown_at: Instant::now(),
        });
    }

    pub fn banner(&self) -> Option<&Notification> {
        self.banner.as_ref().map(|b| &b.notification)
    }

    /// Drop the banner once it has been up for `ttl`
    pub fn expire_banner(&mut self, ttl: Duration) {
        if self
            .banner
            .as_ref()
            .is_some_and(|b| b.shown_at.elapsed() >= ttl)
        {
            self.banner = None;
        }
    }

    pub fn render(&mut self, frame: &mut Frame, view: &WidgetView, theme: Theme) {
        let palette = Palette::for_theme(theme);
        let area = frame.area();
        frame.render_widget(Block::default().style(palette.base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let card = centered_rect(70, 95, outer[0]);
        let block = Block::default()
            .title(Line::from(Span::styled(
                " Inquiry ",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )))
            .title(Line::from(toggle_label(theme)).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .style(palette.base());
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // progress
                Constraint::Length(1), // step title
                Constraint::Length(1),
                Constraint::Min(0), // fields
                Constraint::Length(1), // buttons
                Constraint::Length(1), // banner
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(progress_line(view, &palette)), chunks[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(
                view.title.as_str(),
                Style::default()
                    .fg(palette.foreground)
                    .add_modifier(Modifier::BOLD),
            )),
            chunks[1],
        );

        self.render_fields(frame, chunks[3], view, &palette);
        render_buttons(frame, chunks[4], view, &palette);

        if let Some(notification) = self.banner() {
            let (icon, color) = if notification.is_success() {
                ("✓", palette.success)
            } else {
                ("✗", palette.error)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} {}", icon, notification.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
                chunks[5],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                footer_hint(view.submit.visible),
                Style::default().fg(palette.muted),
            ))
            .alignment(Alignment::Center),
            outer[1],
        );
    }

    fn render_fields(&mut self, frame: &mut Frame, area: Rect, view: &WidgetView, palette: &Palette) {
        let mut constraints = Vec::with_capacity(view.fields.len() * 3 + 1);
        for field in &view.fields {
            let height = self
                .inputs
                .get(&field.name)
                .map_or(3, |input| input.render_height());
            constraints.push(Constraint::Length(1));
            constraints.push(Constraint::Length(height));
            constraints.push(Constraint::Length(u16::from(field.error.is_some())));
        }
        constraints.push(Constraint::Min(0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (i, field) in view.fields.iter().enumerate() {
            let focused = i == self.focus && !view.is_submitting();
            let invalid = field.error.is_some();

            let mut label = vec![Span::styled(
                field.label.as_str(),
                Style::default().fg(palette.foreground),
            )];
            if field.required {
                label.push(Span::styled(" *", Style::default().fg(palette.error)));
            }
            frame.render_widget(Paragraph::new(Line::from(label)), rows[i * 3]);

            if let Some(input) = self.inputs.get_mut(&field.name) {
                input.render(frame, rows[i * 3 + 1], focused, invalid, palette);
            }

            if let Some(error) = &field.error {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("⚠ {}", error),
                        Style::default().fg(palette.error),
                    )),
                    rows[i * 3 + 2],
                );
            }
        }
    }
}

/// Toggle label for the card's title bar
fn toggle_label(theme: Theme) -> String {
    format!(" {} Ctrl+T ", theme.glyph())
}

fn progress_line<'a>(view: &'a WidgetView, palette: &Palette) -> Line<'a> {
    let mut spans = vec![Span::styled(
        view.progress.as_str(),
        Style::default().fg(palette.muted),
    )];
    spans.push(Span::raw("  "));
    for i in 0..view.total_steps {
        let (dot, color) = if i <= view.step_index {
            ("●", palette.accent)
        } else {
            ("○", palette.border)
        };
        spans.push(Span::styled(format!("{} ", dot), Style::default().fg(color)));
    }
    Line::from(spans)
}

fn button_span(label: &str, control: Control, primary: bool, palette: &Palette) -> Span<'static> {
    Span::styled(
        format!(" {} ", label),
        palette.button(control.enabled, primary),
    )
}

fn render_buttons(frame: &mut Frame, area: Rect, view: &WidgetView, palette: &Palette) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    if view.previous.visible {
        frame.render_widget(
            Paragraph::new(button_span("◀ Previous", view.previous, false, palette)),
            halves[0],
        );
    }

    let forward = if view.submit.visible {
        let label = if view.is_submitting() {
            "Sending…"
        } else {
            "Submit"
        };
        Some(button_span(label, view.submit, true, palette))
    } else if view.next.visible {
        Some(button_span("Next ▶", view.next, true, palette))
    } else {
        None
    };
    if let Some(span) = forward {
        frame.render_widget(
            Paragraph::new(span).alignment(Alignment::Right),
            halves[1],
        );
    }
}

/// Centered rectangle taking the given percentages of `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::contact_steps;
    use crate::notifications::NotificationQueue;
    use crate::wizard::Widget;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn draw(screen: &mut WizardScreen, view: &WidgetView, theme: Theme) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, view, theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn widget() -> Widget {
        Widget::new(contact_steps(), Arc::new(NotificationQueue::new()))
    }

    #[test]
    fn test_first_step_render() {
        let widget = widget();
        let mut screen = WizardScreen::new(widget.steps());
        let screen_text = draw(&mut screen, &widget.render(), Theme::Light);

        assert!(screen_text.contains("Step 1 of 3"));
        assert!(screen_text.contains("About you"));
        assert!(screen_text.contains("Name *"));
        assert!(screen_text.contains("Next ▶"));
        assert!(!screen_text.contains("◀ Previous"));
        assert!(screen_text.contains("☾ Ctrl+T"));
    }

    #[test]
    fn test_invalid_field_shows_message() {
        let mut widget = widget();
        assert!(widget.next().is_err());

        let mut screen = WizardScreen::new(widget.steps());
        let screen_text = draw(&mut screen, &widget.render(), Theme::Dark);
        assert!(screen_text.contains("Please fill out this field."));
        assert!(screen_text.contains("☀ Ctrl+T"));
    }

    #[test]
    fn test_sending_label_while_submitting() {
        let mut widget = widget();
        widget.set_value("name", "Ada");
        widget.set_value("email", "ada@x.com");
        widget.set_value("message", "Hi");
        widget.next().unwrap();
        widget.next().unwrap();
        widget.begin_submission().unwrap();

        let mut screen = WizardScreen::new(widget.steps());
        let screen_text = draw(&mut screen, &widget.render(), Theme::Light);
        assert!(screen_text.contains("Sending…"));
        assert!(screen_text.contains("Previous"));
    }

    #[test]
    fn test_banner_shows_and_expires() {
        let widget = widget();
        let mut screen = WizardScreen::new(widget.steps());
        screen.show(Notification::success("Message sent successfully!"));

        let screen_text = draw(&mut screen, &widget.render(), Theme::Light);
        assert!(screen_text.contains("Message sent successfully!"));

        screen.expire_banner(Duration::from_secs(60));
        assert!(screen.banner().is_some());
        screen.expire_banner(Duration::ZERO);
        assert!(screen.banner().is_none());
    }

    #[test]
    fn test_focus_wraps() {
        let widget = widget();
        let mut screen = WizardScreen::new(widget.steps());
        screen.focus_next(2);
        assert_eq!(screen.focus(), 1);
        screen.focus_next(2);
        assert_eq!(screen.focus(), 0);
        screen.focus_prev(2);
        assert_eq!(screen.focus(), 1);

        screen.set_focus(5, 2);
        assert_eq!(screen.focus(), 1);
        screen.focus_next(0);
        assert_eq!(screen.focus(), 1);
    }
}
