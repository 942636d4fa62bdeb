use std::ops::Deref;
use std::sync::Arc;

use driver::database::PostgresDatabase;
use kernel::KernelError;
use vodca::References;

use crate::config::AuthConfig;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self::with(Handler::init().await?))
    }

    pub fn with(handler: Handler) -> Self {
        Self(Arc::new(handler))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    auth: AuthConfig,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let auth = AuthConfig::from_env()?;
        let pgpool = PostgresDatabase::new().await?;
        pgpool.migrate().await?;

        Ok(Self::new(pgpool, auth))
    }

    pub fn new(pgpool: PostgresDatabase, auth: AuthConfig) -> Self {
        Self { pgpool, auth }
    }
}
