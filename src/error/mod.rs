//! Error handling for the inference benchmarker

use thiserror::Error;

/// Custom error types for the inference benchmarker
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (image enumeration, archive handling, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// The server replied with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpResponse {
        status: u16,
        body: String,
        headers: String,
    },

    /// The request was sent but no response arrived (connect, reset, timeout)
    #[error("No response from server: {0}")]
    HttpTransport(String),

    /// The request could not be constructed or dispatched
    #[error("Request setup error: {0}")]
    HttpSetup(String),

    /// Warmup request failures (always fatal)
    #[error("Warmup failed: {0}")]
    Warmup(String),

    /// Dataset download/extraction failures (always fatal)
    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new error for a non-success HTTP response
    pub fn http_response<B: Into<String>, H: Into<String>>(status: u16, body: B, headers: H) -> Self {
        Self::HttpResponse {
            status,
            body: body.into(),
            headers: headers.into(),
        }
    }

    /// Create a new transport-level (no response) error
    pub fn http_transport<S: Into<String>>(message: S) -> Self {
        Self::HttpTransport(message.into())
    }

    /// Create a new request setup error
    pub fn http_setup<S: Into<String>>(message: S) -> Self {
        Self::HttpSetup(message.into())
    }

    /// Create a new warmup error
    pub fn warmup<S: Into<String>>(message: S) -> Self {
        Self::Warmup(message.into())
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::HttpResponse { .. } => "HTTP-RESPONSE",
            Self::HttpTransport(_) => "HTTP-TRANSPORT",
            Self::HttpSetup(_) => "HTTP-SETUP",
            Self::Warmup(_) => "WARMUP",
            Self::Dataset(_) => "DATASET",
        }
    }

    /// Full diagnostic detail for console logging.
    ///
    /// Response errors carry body, status and headers; transport errors carry
    /// the request-level detail; setup errors carry only the message. This
    /// mirrors the three-way taxonomy used for per-item failure logging.
    pub fn diagnostic_detail(&self) -> String {
        match self {
            Self::HttpResponse {
                status,
                body,
                headers,
            } => {
                format!("status: {}\nbody: {}\nheaders: {}", status, body, headers)
            }
            Self::HttpTransport(msg) => format!("request sent, no response received: {}", msg),
            Self::HttpSetup(msg) => format!("request setup failed: {}", msg),
            other => other.to_string(),
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::HttpResponse { .. } | Self::HttpTransport(_) | Self::HttpSetup(_) => 2,
            Self::Warmup(_) => 3,
            Self::Dataset(_) => 4,
            Self::Io(_) => 5,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::HttpResponse { .. } | Self::HttpTransport(_) | Self::HttpSetup(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Warmup(_) | Self::Dataset(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::dataset(format!("Archive error: {}", error))
    }
}

/// Classify a reqwest error into the response/transport/setup taxonomy.
///
/// Status-bearing responses are handled before this point by reading the body
/// and headers, so an error that still carries a status here only keeps it as
/// context.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::http_setup(error.to_string())
        } else if let Some(status) = error.status() {
            Self::http_response(status.as_u16(), error.to_string(), "")
        } else {
            Self::http_transport(error.to_string())
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
