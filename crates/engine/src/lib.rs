//! Unit-aware pricing for a household ingredient catalog.
//!
//! - [`units`]: the static unit table and category lookups.
//! - [`conversion`]: exact decimal conversion between units and pricing.
//! - [`Engine`]: the catalog store on top of a sea-orm database.

use sea_orm::DatabaseConnection;

pub use catalog::{CatalogEntry, NewEntry};
pub use error::EngineError;
pub use money::Money;
pub use units::{Category, Unit};

mod catalog;
pub mod conversion;
mod error;
mod ingredients;
mod money;
pub mod units;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    ///
    /// Fails if the unit table is inconsistent.
    pub fn build(self) -> ResultEngine<Engine> {
        units::check_catalog()?;
        Ok(Engine {
            database: self.database,
        })
    }
}
