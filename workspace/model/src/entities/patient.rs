use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use std::fmt;

use super::patient_procedure;

/// A patient and their demographic details.
/// Procedures reference the patient through `patient_procedure.patient_id`;
/// they are loaded on demand rather than embedded in the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "patient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub gender: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::patient_procedure::Entity")]
    PatientProcedure,
}

impl Related<patient_procedure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PatientProcedure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Loads every procedure recorded for this patient, ordered by id.
    pub async fn procedures<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<patient_procedure::Model>, DbErr> {
        self.find_related(patient_procedure::Entity)
            .order_by_asc(patient_procedure::Column::Id)
            .all(db)
            .await
    }

    /// Builds a new, unsaved procedure owned by this patient.
    pub fn add_procedure(
        &self,
        procedure_code: i32,
        procedure_date: DateTime,
    ) -> patient_procedure::ActiveModel {
        patient_procedure::ActiveModel {
            procedure_code: Set(procedure_code),
            procedure_date: Set(procedure_date),
            patient_id: Set(self.id),
            ..Default::default()
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patient{{id={}, firstName='{}', lastName='{}', dateOfBirth={}, gender='{}'}}",
            self.id, self.first_name, self.last_name, self.date_of_birth, self.gender
        )
    }
}
