use error_stack::{Report, ResultExt};
use kernel::KernelError;

const JWT_PRIVATE_KEY: &str = "JWT_PRIVATE_KEY";
const PORT: &str = "PORT";
const DEFAULT_PORT: u16 = 8080;

/// Secret used to verify `x-auth-token` values.
pub struct AuthConfig {
    secret: String,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let secret = dotenvy::var(JWT_PRIVATE_KEY)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("{JWT_PRIVATE_KEY} is not defined"))?;
        if secret.is_empty() {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("{JWT_PRIVATE_KEY} is empty")));
        }
        Ok(Self::new(secret))
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

pub fn port() -> error_stack::Result<u16, KernelError> {
    match dotenvy::var(PORT) {
        Ok(port) => port
            .parse::<u16>()
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("{PORT} is not a valid port: {port}")),
        Err(_) => Ok(DEFAULT_PORT),
    }
}
