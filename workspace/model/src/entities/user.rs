use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use std::fmt;

use super::role;

/// A staff member who can sign in to the records system.
/// Authorization is expressed through the roles attached to the user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub user_name: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can hold several roles.
    #[sea_orm(has_many = "super::role::Entity")]
    Role,
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Loads the roles granted to this user, ordered by id.
    pub async fn roles<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<role::Model>, DbErr> {
        self.find_related(role::Entity)
            .order_by_asc(role::Column::Id)
            .all(db)
            .await
    }

    /// Builds a new, unsaved role for this user.
    /// The user's name is copied onto the role.
    pub fn add_role(&self, role_type: &str) -> role::ActiveModel {
        role::ActiveModel {
            user_id: Set(self.id),
            user_name: Set(self.user_name.clone()),
            role_type: Set(role_type.to_string()),
            ..Default::default()
        }
    }
}

impl fmt::Display for Model {
    // The password is never rendered.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{id={}, firstName='{}', lastName='{}', userName='{}'}}",
            self.id, self.first_name, self.last_name, self.user_name
        )
    }
}
