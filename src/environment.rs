use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the backend deployments the console can talk to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Hosted production backend.
    #[default]
    Production,
    /// Backend running on the operator's machine.
    Local,
    /// Any other backend, addressed by URL.
    Custom { backend_url: String },
}

impl Environment {
    /// Returns the backend base URL associated with the environment.
    pub fn backend_url(&self) -> String {
        match self {
            Environment::Production => "https://securewipe-backend.onrender.com".to_string(),
            Environment::Local => "http://localhost:5000".to_string(),
            Environment::Custom { backend_url } => backend_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "local" => Ok(Environment::Local),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "Production"),
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.backend_url())
    }
}
