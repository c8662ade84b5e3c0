use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct AttachmentInputDoc {
    pub file_name: String,
    pub url: String,
    pub size_bytes: i64,
}

#[derive(ToSchema)]
pub struct ContactFormDoc {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub attachments: Vec<AttachmentInputDoc>,
}

#[derive(ToSchema)]
pub struct StatusInputDoc {
    /// pending | in_progress | completed | archived
    pub status: String,
}

#[derive(ToSchema)]
pub struct IdsInputDoc {
    pub ids: Vec<Uuid>,
}

#[derive(ToSchema)]
pub struct BulkStatusInputDoc {
    pub ids: Vec<Uuid>,
    /// pending | in_progress | completed | archived
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::site::health,
        crate::routes::contact::submit,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::admin::list,
        crate::routes::admin::get,
        crate::routes::admin::update_status,
        crate::routes::admin::archive,
        crate::routes::admin::unarchive,
        crate::routes::admin::delete,
        crate::routes::admin::bulk_update_status,
        crate::routes::admin::bulk_archive,
        crate::routes::admin::bulk_unarchive,
        crate::routes::admin::bulk_delete,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            AttachmentInputDoc,
            ContactFormDoc,
            StatusInputDoc,
            IdsInputDoc,
            BulkStatusInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "contact"),
        (name = "auth"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
