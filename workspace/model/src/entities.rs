//! Root of the SeaORM entity modules for the clinical records store.
//! Relationships are plain foreign-key columns; the helpers on each model
//! load the related rows on demand.

pub mod patient;
pub mod patient_procedure;
pub mod role;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::patient::Entity as Patient;
    pub use super::patient_procedure::Entity as PatientProcedure;
    pub use super::role::Entity as Role;
    pub use super::user::Entity as User;
}
