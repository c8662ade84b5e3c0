use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{admin, errors::ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub admin_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Admin,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Admin => Entity::belongs_to(admin::Entity)
                .from(Column::AdminId)
                .to(admin::Column::Id)
                .into(),
        }
    }
}

impl Related<admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_for_admin(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(admin_id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Insert or replace the hash for an admin.
pub async fn upsert_password(
    db: &DatabaseConnection,
    admin_id: Uuid,
    password_hash: String,
    password_algorithm: &str,
) -> Result<Model, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    match find_for_admin(db, admin_id).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.password_hash = Set(password_hash);
            am.password_algorithm = Set(password_algorithm.to_string());
            am.updated_at = Set(now);
            am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
        }
        None => {
            let am = ActiveModel {
                admin_id: Set(admin_id),
                password_hash: Set(password_hash),
                password_algorithm: Set(password_algorithm.to_string()),
                updated_at: Set(now),
            };
            am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
        }
    }
}
