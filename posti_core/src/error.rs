/// Return for Posti operations that can succeed (OK) or fail (Err)
pub type Result<T> = std::result::Result<T, PostiError>;

/// All the possible errors from Posti operations
#[derive(Debug)]
pub enum PostiError {
    Connection(String),    // unreachable endpoint, refused credentials, failed negotiation
    Declaration(String),   // broker rejected the queue declaration
    Consume(String),       // mid-stream failure, terminates the receive loop
    Handler(String),       // user callback failed, contained per delivery
    InvalidConfig(String), // message with details what is invalid
    MissingEnvVar(&'static str),
}

impl std::fmt::Display for PostiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PostiError::*;
        match self {
            Connection(msg) => write!(f, "Connection error: {}", msg),
            Declaration(msg) => write!(f, "Declaration error: {}", msg),
            Consume(msg) => write!(f, "Consume error: {}", msg),
            Handler(msg) => write!(f, "Handler error: {}", msg),
            InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            MissingEnvVar(var) => write!(f, "Missing environment variable: {}", var),
        }
    }
}

impl std::error::Error for PostiError {}
