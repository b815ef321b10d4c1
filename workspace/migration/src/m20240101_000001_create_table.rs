use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{patient, patient_procedure, role, user};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create user table
        manager
            .create_table(
                Table::create()
                    .table(User::table())
                    .if_not_exists()
                    .col(pk_auto(User::column(user::Column::Id)))
                    .col(string(User::column(user::Column::FirstName)))
                    .col(string(User::column(user::Column::LastName)))
                    .col(string(User::column(user::Column::UserName)).unique_key())
                    .col(string(User::column(user::Column::Password)))
                    .to_owned(),
            )
            .await?;

        // Create role table
        manager
            .create_table(
                Table::create()
                    .table(Role::table())
                    .if_not_exists()
                    .col(pk_auto(Role::column(role::Column::Id)))
                    .col(integer(Role::column(role::Column::UserId)))
                    .col(string(Role::column(role::Column::UserName)))
                    .col(string(Role::column(role::Column::RoleType)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("role_user_user_id_fk")
                            .from(Role::table(), Role::column(role::Column::UserId))
                            .to(User::table(), User::column(user::Column::Id)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create patient table
        manager
            .create_table(
                Table::create()
                    .table(Patient::table())
                    .if_not_exists()
                    .col(pk_auto(Patient::column(patient::Column::Id)))
                    .col(string(Patient::column(patient::Column::FirstName)))
                    .col(string(Patient::column(patient::Column::LastName)))
                    .col(date(Patient::column(patient::Column::DateOfBirth)))
                    .col(string(Patient::column(patient::Column::Gender)))
                    .to_owned(),
            )
            .await?;

        // Create patient_procedure table
        manager
            .create_table(
                Table::create()
                    .table(PatientProcedure::table())
                    .if_not_exists()
                    .col(pk_auto(PatientProcedure::column(
                        patient_procedure::Column::Id,
                    )))
                    .col(integer(PatientProcedure::column(
                        patient_procedure::Column::ProcedureCode,
                    )))
                    .col(date_time(PatientProcedure::column(
                        patient_procedure::Column::ProcedureDate,
                    )))
                    .col(integer(PatientProcedure::column(
                        patient_procedure::Column::PatientId,
                    )))
                    .foreign_key(
                        ForeignKey::create()
                            .name("patient_procedure_patient_id_fk")
                            .from(
                                PatientProcedure::table(),
                                PatientProcedure::column(patient_procedure::Column::PatientId),
                            )
                            .to(Patient::table(), Patient::column(patient::Column::Id)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patient_procedure_patient_id")
                    .table(PatientProcedure::table())
                    .col(PatientProcedure::column(patient_procedure::Column::PatientId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle
        manager
            .drop_table(Table::drop().table(PatientProcedure::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Patient::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Role::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::table()).to_owned())
            .await?;

        Ok(())
    }
}
