//! Data access for the clinical records store.
//!
//! [`GenericDao`] provides uniform CRUD over any mapped entity, and
//! [`DatabaseSession`] owns the connection that DAOs are built from.

pub mod config;
pub mod dao;
pub mod error;
pub mod mapping;
pub mod session;
pub mod testing;

pub use config::DatabaseConfig;
pub use dao::GenericDao;
pub use error::{DaoError, Result};
pub use mapping::MappedEntity;
pub use session::DatabaseSession;
