use crate::cli::VerbosityLevel;
use crate::error::SitemapError;

/// Shown after fetch and parse failures; servers often block scripted clients
pub const BOT_DETECTION_HINT: &str =
    "The website might have some bot detection that prevents the script from working.";

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    /// Create a new error reporter with additional options
    pub fn with_options(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    /// Print an analysis error to stderr
    pub fn report_error(&self, error: &SitemapError) {
        eprintln!("{}", self.format_error(error));
    }

    /// Print a non-fatal warning to stderr
    pub fn report_warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("{}{}", self.timestamp(), message);
        }
    }

    /// Format an error according to the verbosity level
    pub fn format_error(&self, error: &SitemapError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("ERROR: {}", error),
            VerbosityLevel::Normal => self.format_error_normal(error),
            VerbosityLevel::Verbose => self.format_error_verbose(error),
        }
    }

    fn timestamp(&self) -> String {
        if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }

    /// Format error for normal output
    fn format_error_normal(&self, error: &SitemapError) -> String {
        let mut output = format!("{}An error occurred: {}", self.timestamp(), error);
        if let Some(hint) = self.hint(error) {
            output.push('\n');
            output.push_str(hint);
        }
        output
    }

    /// Format error for verbose output, including the source chain
    fn format_error_verbose(&self, error: &SitemapError) -> String {
        let mut output = self.format_error_normal(error);

        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            if level == 0 {
                output.push_str("\nError Chain:");
            }
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    fn hint(&self, error: &SitemapError) -> Option<&'static str> {
        match error {
            e if e.is_transport() || e.is_parse() => Some(BOT_DETECTION_HINT),
            SitemapError::InvalidInput(_) => {
                Some("Please enter a valid http(s) URL of a sitemap or sitemap index.")
            }
            SitemapError::Io(_) => Some("Check that the export path is writable."),
            _ => None,
        }
    }
}
