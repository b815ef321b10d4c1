pub mod initdb;
pub mod load_fixture;
pub mod serve;

pub use initdb::init_database;
pub use load_fixture::load_fixture;
pub use serve::serve;
