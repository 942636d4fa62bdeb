mod rental;
mod returns;

pub use self::{rental::*, returns::*};

#[cfg(test)]
pub(crate) mod test {
    use driver::database::PostgresDatabase;

    use crate::auth::test::SECRET;
    use crate::config::AuthConfig;
    use crate::handler::{AppModule, Handler};

    /// Module whose pool never connects unless a handler reaches the database.
    pub fn module() -> AppModule {
        let pgpool = PostgresDatabase::connect_lazy("postgres://localhost/rentals")
            .expect("lazy pool");
        AppModule::with(Handler::new(pgpool, AuthConfig::new(SECRET)))
    }
}
