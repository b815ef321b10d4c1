use sea_orm::entity::prelude::*;
use std::fmt;

use super::patient;

/// A procedure performed on a patient, identified by its billing code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "patient_procedure")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub procedure_code: i32,
    /// When the procedure was performed (local clinic time).
    pub procedure_date: DateTime,
    /// The owning patient. Must reference an existing row.
    pub patient_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::Id"
    )]
    Patient,
}

impl Related<patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Loads the patient this procedure belongs to.
    pub async fn patient<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Option<patient::Model>, DbErr> {
        self.find_related(patient::Entity).one(db).await
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatientProcedure{{id={}, procedureCode={}, procedureDate={}, patientId={}}}",
            self.id, self.procedure_code, self.procedure_date, self.patient_id
        )
    }
}
