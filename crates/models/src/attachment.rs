use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{contact_request, errors::ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_request_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size_bytes: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ContactRequest,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ContactRequest => Entity::belongs_to(contact_request::Entity)
                .from(Column::ContactRequestId)
                .to(contact_request::Column::Id)
                .into(),
        }
    }
}

impl Related<contact_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attachment metadata as submitted with the form.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub file_name: String,
    pub url: String,
    pub size_bytes: i64,
}

pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    contact_request_id: Uuid,
    items: Vec<NewAttachment>,
) -> Result<Vec<Model>, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut created = Vec::with_capacity(items.len());
    for item in items {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            contact_request_id: Set(contact_request_id),
            file_name: Set(item.file_name),
            url: Set(item.url),
            size_bytes: Set(item.size_bytes),
            created_at: Set(now),
        };
        created.push(am.insert(conn).await.map_err(|e| ModelError::Db(e.to_string()))?);
    }
    Ok(created)
}

pub async fn find_for_request<C: ConnectionTrait>(
    conn: &C,
    contact_request_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::ContactRequestId.eq(contact_request_id))
        .all(conn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
