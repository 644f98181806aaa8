//! Terminal rendering for the wizard

pub mod form_field;
pub mod keybindings;
pub mod palette;
pub mod terminal_guard;
pub mod wizard_view;

pub use palette::Palette;
pub use wizard_view::WizardScreen;
