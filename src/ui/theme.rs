//! Visual theme and styling.

use console::Style;

/// Terminal styles used for status output.
#[derive(Debug, Clone)]
pub struct SetupTheme {
    /// Passed steps and the completion message.
    pub success: Style,
    /// Privilege warnings.
    pub warning: Style,
    /// Failed steps and fatal errors.
    pub error: Style,
    /// Command output echoed in verbose mode and summary separators.
    pub dim: Style,
    /// Header titles and the summary label.
    pub highlight: Style,
    /// The header icon.
    pub header: Style,
    /// The failed command line in an error block.
    pub command: Style,
    /// Error block frame.
    pub border: Style,
}

impl Default for SetupTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().green(),
            command: Style::new().dim().italic(),
            border: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            command: Style::new(),
            border: Style::new(),
        }
    }

    /// Pick the colored or plain theme for the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("🧬"),
            self.highlight.apply_to(title)
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    colors_allowed(
        std::env::var_os("NO_COLOR").is_some(),
        console::Term::stdout().is_term(),
    )
}

fn colors_allowed(no_color: bool, is_term: bool) -> bool {
    !no_color && is_term
}
