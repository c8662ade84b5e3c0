//! Contact-request workflows: public submission and back-office actions.
//!
//! Reads go through [`TagCache`]s; every mutation invalidates the `contacts`,
//! `contacts:<id>` and `contacts:count` tags so list, detail and count
//! queries refresh together. Bulk mutations run their find-then-update inside
//! one transaction.

use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use models::attachment::{self, NewAttachment};
use models::contact_request::{self, ContactStatus, NewContactRequest};

use crate::cache::TagCache;
use crate::callbacks::ActionOutcome;
use crate::errors::{ActionStatus, FieldErrors, ServiceError};
use crate::mailer::Notifier;
use crate::pagination::{PageItem, PageMeta, Pagination};

pub const TAG_CONTACTS: &str = "contacts";
pub const TAG_CONTACTS_COUNT: &str = "contacts:count";

pub fn tag_contact(id: Uuid) -> String {
    format!("contacts:{id}")
}

const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Read caches for contact queries, grouped so one mutation can drop every
/// affected entry by tag.
pub struct ContactCaches {
    pages: TagCache<ContactPage>,
    details: TagCache<ContactDetail>,
    counts: TagCache<u64>,
}

impl Default for ContactCaches {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactCaches {
    pub fn new() -> Self {
        Self {
            pages: TagCache::new(CACHE_CAPACITY, CACHE_TTL),
            details: TagCache::new(CACHE_CAPACITY, CACHE_TTL),
            counts: TagCache::new(CACHE_CAPACITY, CACHE_TTL),
        }
    }

    /// Invalidate the fixed tag set for the touched rows.
    pub async fn invalidate_for(&self, ids: &[Uuid]) {
        for cache_tag in [TAG_CONTACTS, TAG_CONTACTS_COUNT] {
            self.pages.invalidate(cache_tag).await;
            self.details.invalidate(cache_tag).await;
            self.counts.invalidate(cache_tag).await;
        }
        for id in ids {
            let tag = tag_contact(*id);
            self.pages.invalidate(&tag).await;
            self.details.invalidate(&tag).await;
            self.counts.invalidate(&tag).await;
        }
    }
}

/// Public contact form, decoded and validated in one step at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentInput {
    pub file_name: String,
    pub url: String,
    pub size_bytes: i64,
}

const MAX_ATTACHMENTS: usize = 5;
const MIN_MESSAGE_CHARS: usize = 10;

fn validate_form(form: &ContactForm) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::default();
    if form.first_name.trim().is_empty() {
        errors.push("first_name", "Veuillez saisir votre prénom");
    }
    if form.last_name.trim().is_empty() {
        errors.push("last_name", "Veuillez saisir votre nom");
    }
    if contact_request::validate_email(&form.email).is_err() {
        errors.push("email", "Veuillez saisir une adresse e-mail valide");
    }
    if form.message.trim().chars().count() < MIN_MESSAGE_CHARS {
        errors.push(
            "message",
            "Votre message doit contenir au moins 10 caractères",
        );
    }
    if form.attachments.len() > MAX_ATTACHMENTS {
        errors.push("attachments", "5 pièces jointes maximum");
    }
    for attachment in &form.attachments {
        if attachment.file_name.trim().is_empty() || attachment.url.trim().is_empty() {
            errors.push("attachments", "Pièce jointe invalide");
            break;
        }
    }
    errors.into_result("Le formulaire contient des erreurs")
}

/// Filter/sort/paging parameters for the back-office list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactListQuery {
    pub status: Option<ContactStatus>,
    pub q: Option<String>,
    pub sort: Option<ContactSort>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSort {
    CreatedAt,
    Name,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One back-office list page plus everything the pager control needs.
#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub data: Vec<contact_request::Model>,
    pub meta: PageMeta,
    pub pager: Vec<PageItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactDetail {
    pub request: contact_request::Model,
    pub attachments: Vec<attachment::Model>,
}

/// Tagged outcome returned by every action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub status: ActionStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub updated: usize,
    pub skipped: usize,
}

impl ActionReport {
    fn success(message: String) -> Self {
        Self { status: ActionStatus::Success, message, id: None, updated: 0, skipped: 0 }
    }

    fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    fn with_counts(mut self, updated: usize, skipped: usize) -> Self {
        self.updated = updated;
        self.skipped = skipped;
        self
    }
}

impl ActionOutcome for ActionReport {
    fn is_success(&self) -> bool {
        matches!(self.status, ActionStatus::Success)
    }
}

/// Partition rows into those needing the transition and those already at the
/// target status; only the former are written and counted.
pub fn split_by_status(
    rows: &[contact_request::Model],
    target: ContactStatus,
) -> (Vec<Uuid>, usize) {
    let mut to_update = Vec::new();
    let mut skipped = 0;
    for row in rows {
        if row.status == target {
            skipped += 1;
        } else {
            to_update.push(row.id);
        }
    }
    (to_update, skipped)
}

fn report_message(updated: usize, skipped: usize, singular: &str, plural: &str) -> String {
    let mut message = match updated {
        0 => "Aucune demande à modifier".to_string(),
        1 => format!("1 demande {singular}"),
        n => format!("{n} demandes {plural}"),
    };
    if skipped > 0 {
        message.push_str(&format!(" ({skipped} déjà à jour)"));
    }
    message
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// Handle a public form submission end to end.
///
/// The notification email is best-effort: a mail failure is logged and the
/// submission still succeeds.
pub async fn submit(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    notifier: &Notifier,
    form: ContactForm,
) -> Result<ActionReport, ServiceError> {
    validate_form(&form)?;
    let created = contact_request::create(
        db,
        NewContactRequest {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            subject: form.subject.clone(),
            message: form.message.clone(),
        },
    )
    .await?;
    if !form.attachments.is_empty() {
        let items = form
            .attachments
            .iter()
            .map(|a| NewAttachment {
                file_name: a.file_name.clone(),
                url: a.url.clone(),
                size_bytes: a.size_bytes,
            })
            .collect();
        attachment::create_many(db, created.id, items).await?;
    }
    caches.invalidate_for(&[created.id]).await;
    if let Err(e) = notifier.contact_submitted(&form).await {
        warn!(id = %created.id, error = %e, "contact notification failed");
    }
    info!(id = %created.id, email = %created.email, "contact request submitted");
    Ok(ActionReport::success(
        "Votre demande a bien été envoyée. Nous vous répondrons au plus vite.".to_string(),
    )
    .with_id(created.id))
}

fn build_condition(query: &ContactListQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(contact_request::Column::Status.eq(status));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(contact_request::Column::FirstName.contains(q))
                .add(contact_request::Column::LastName.contains(q))
                .add(contact_request::Column::Email.contains(q))
                .add(contact_request::Column::Message.contains(q)),
        );
    }
    condition
}

fn apply_order(
    select: sea_orm::Select<contact_request::Entity>,
    sort: ContactSort,
    order: SortOrder,
) -> sea_orm::Select<contact_request::Entity> {
    let order = match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    match sort {
        ContactSort::CreatedAt => select.order_by(contact_request::Column::CreatedAt, order),
        ContactSort::Name => select
            .order_by(contact_request::Column::LastName, order.clone())
            .order_by(contact_request::Column::FirstName, order),
        ContactSort::Status => select
            .order_by(contact_request::Column::Status, order)
            .order_by(contact_request::Column::CreatedAt, Order::Desc),
    }
}

fn list_cache_key(query: &ContactListQuery, page: u64, per_page: u64) -> String {
    format!(
        "contacts:list:p{page}:n{per_page}:s{:?}:q{:?}:o{:?}:{:?}",
        query.status, query.q, query.sort, query.order
    )
}

/// Filtered, sorted, paginated listing for the back-office.
pub async fn list(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    query: ContactListQuery,
) -> Result<ContactPage, ServiceError> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or_else(|| Pagination::default().per_page),
    };
    let (page_idx, per_page) = pagination.normalize();
    let key = list_cache_key(&query, page_idx, per_page);
    caches
        .pages
        .get_with(&key, &[TAG_CONTACTS], async {
            let condition = build_condition(&query);
            let count_key = format!(
                "contacts:count:s{:?}:q{:?}",
                query.status, query.q
            );
            let total = caches
                .counts
                .get_with(&count_key, &[TAG_CONTACTS, TAG_CONTACTS_COUNT], async {
                    contact_request::Entity::find()
                        .filter(condition.clone())
                        .count(db)
                        .await
                        .map_err(db_err)
                })
                .await?;
            let meta = PageMeta::new(page_idx + 1, per_page, total);
            let select = apply_order(
                contact_request::Entity::find().filter(condition),
                query.sort.unwrap_or(ContactSort::CreatedAt),
                query.order.unwrap_or(SortOrder::Desc),
            );
            let data = select
                .paginate(db, per_page)
                .fetch_page(meta.page - 1)
                .await
                .map_err(db_err)?;
            Ok(ContactPage { pager: meta.items(), data, meta })
        })
        .await
}

/// Detail view: the request plus its attachments.
pub async fn get(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    id: Uuid,
) -> Result<ContactDetail, ServiceError> {
    let key = format!("contacts:detail:{id}");
    let tag = tag_contact(id);
    caches
        .details
        .get_with(&key, &[TAG_CONTACTS, &tag], async {
            let request = contact_request::find_by_id(db, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Demande introuvable"))?;
            let attachments = attachment::find_for_request(db, id).await?;
            Ok(ContactDetail { request, attachments })
        })
        .await
}

/// Shared bulk transition: find-then-update in one transaction, skipping rows
/// already at the target status.
async fn transition(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    ids: &[Uuid],
    target: ContactStatus,
    singular: &str,
    plural: &str,
) -> Result<ActionReport, ServiceError> {
    if ids.is_empty() {
        return Err(ServiceError::validation("Aucune demande sélectionnée"));
    }
    let txn = db.begin().await.map_err(db_err)?;
    let rows = contact_request::find_by_ids(&txn, ids).await?;
    if rows.is_empty() {
        txn.rollback().await.map_err(db_err)?;
        return Err(ServiceError::not_found("Aucune demande trouvée"));
    }
    let (to_update, skipped) = split_by_status(&rows, target);
    if !to_update.is_empty() {
        let patch = contact_request::ActiveModel {
            status: Set(target),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        contact_request::Entity::update_many()
            .set(patch)
            .filter(contact_request::Column::Id.is_in(to_update.clone()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
    }
    txn.commit().await.map_err(db_err)?;
    caches.invalidate_for(ids).await;
    info!(
        target = ?target,
        updated = to_update.len(),
        skipped,
        "contact requests transitioned"
    );
    Ok(ActionReport::success(report_message(to_update.len(), skipped, singular, plural))
        .with_counts(to_update.len(), skipped))
}

pub async fn update_status(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    ids: &[Uuid],
    status: ContactStatus,
) -> Result<ActionReport, ServiceError> {
    transition(db, caches, ids, status, "mise à jour", "mises à jour").await
}

pub async fn update_status_one(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    id: Uuid,
    status: ContactStatus,
) -> Result<ActionReport, ServiceError> {
    Ok(update_status(db, caches, &[id], status).await?.with_id(id))
}

pub async fn archive(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    ids: &[Uuid],
) -> Result<ActionReport, ServiceError> {
    transition(db, caches, ids, ContactStatus::Archived, "archivée", "archivées").await
}

pub async fn archive_one(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    id: Uuid,
) -> Result<ActionReport, ServiceError> {
    Ok(archive(db, caches, &[id]).await?.with_id(id))
}

/// Unarchive restores `pending`; already-unarchived rows are skipped.
pub async fn unarchive(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    ids: &[Uuid],
) -> Result<ActionReport, ServiceError> {
    if ids.is_empty() {
        return Err(ServiceError::validation("Aucune demande sélectionnée"));
    }
    let txn = db.begin().await.map_err(db_err)?;
    let rows = contact_request::find_by_ids(&txn, ids).await?;
    if rows.is_empty() {
        txn.rollback().await.map_err(db_err)?;
        return Err(ServiceError::not_found("Aucune demande trouvée"));
    }
    // only archived rows transition back to pending
    let to_update: Vec<Uuid> = rows
        .iter()
        .filter(|r| r.status == ContactStatus::Archived)
        .map(|r| r.id)
        .collect();
    let skipped = rows.len() - to_update.len();
    if !to_update.is_empty() {
        let patch = contact_request::ActiveModel {
            status: Set(ContactStatus::Pending),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        contact_request::Entity::update_many()
            .set(patch)
            .filter(contact_request::Column::Id.is_in(to_update.clone()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
    }
    txn.commit().await.map_err(db_err)?;
    caches.invalidate_for(ids).await;
    info!(updated = to_update.len(), skipped, "contact requests unarchived");
    Ok(ActionReport::success(report_message(
        to_update.len(),
        skipped,
        "désarchivée",
        "désarchivées",
    ))
    .with_counts(to_update.len(), skipped))
}

pub async fn unarchive_one(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    id: Uuid,
) -> Result<ActionReport, ServiceError> {
    Ok(unarchive(db, caches, &[id]).await?.with_id(id))
}

/// Hard delete; attachments go with their request via FK cascade.
pub async fn delete(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    ids: &[Uuid],
) -> Result<ActionReport, ServiceError> {
    if ids.is_empty() {
        return Err(ServiceError::validation("Aucune demande sélectionnée"));
    }
    let txn = db.begin().await.map_err(db_err)?;
    let rows = contact_request::find_by_ids(&txn, ids).await?;
    if rows.is_empty() {
        txn.rollback().await.map_err(db_err)?;
        return Err(ServiceError::not_found("Aucune demande trouvée"));
    }
    let found: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let skipped = ids.len().saturating_sub(found.len());
    let result = contact_request::Entity::delete_many()
        .filter(contact_request::Column::Id.is_in(found))
        .exec(&txn)
        .await
        .map_err(db_err)?;
    txn.commit().await.map_err(db_err)?;
    caches.invalidate_for(ids).await;
    let deleted = result.rows_affected as usize;
    info!(deleted, skipped, "contact requests deleted");
    Ok(ActionReport::success(report_message(deleted, skipped, "supprimée", "supprimées"))
        .with_counts(deleted, skipped))
}

pub async fn delete_one(
    db: &DatabaseConnection,
    caches: &ContactCaches,
    id: Uuid,
) -> Result<ActionReport, ServiceError> {
    Ok(delete(db, caches, &[id]).await?.with_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: ContactStatus) -> contact_request::Model {
        let now = Utc::now().into();
        contact_request::Model {
            id: Uuid::new_v4(),
            first_name: "Marie".into(),
            last_name: "Dupont".into(),
            email: "marie@example.fr".into(),
            phone: None,
            subject: None,
            message: "Bonjour, je souhaite prendre rendez-vous.".into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Marie".into(),
            last_name: "Dupont".into(),
            email: "marie@example.fr".into(),
            phone: None,
            subject: Some("Bilan".into()),
            message: "Bonjour, je souhaite prendre rendez-vous.".into(),
            attachments: vec![],
        }
    }

    #[test]
    fn split_excludes_rows_already_at_target() {
        let rows = vec![
            row(ContactStatus::Pending),
            row(ContactStatus::Completed),
            row(ContactStatus::Completed),
            row(ContactStatus::Archived),
        ];
        let (to_update, skipped) = split_by_status(&rows, ContactStatus::Completed);
        assert_eq!(to_update.len(), 2);
        assert_eq!(skipped, 2);
        assert!(to_update.contains(&rows[0].id));
        assert!(to_update.contains(&rows[3].id));
    }

    #[test]
    fn split_with_all_rows_at_target_updates_nothing() {
        let rows = vec![row(ContactStatus::Archived), row(ContactStatus::Archived)];
        let (to_update, skipped) = split_by_status(&rows, ContactStatus::Archived);
        assert!(to_update.is_empty());
        assert_eq!(skipped, 2);
    }

    #[test]
    fn form_validation_collects_field_messages() {
        let form = ContactForm {
            first_name: " ".into(),
            last_name: String::new(),
            email: "pas-un-email".into(),
            phone: None,
            subject: None,
            message: "court".into(),
            attachments: vec![],
        };
        let err = validate_form(&form).unwrap_err();
        match err {
            ServiceError::Validation { fields, .. } => {
                for field in ["first_name", "last_name", "email", "message"] {
                    assert!(fields.contains_key(field), "missing {field}");
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn form_validation_accepts_valid_input() {
        assert!(validate_form(&valid_form()).is_ok());
    }

    #[test]
    fn form_validation_limits_attachments() {
        let mut form = valid_form();
        form.attachments = (0..6)
            .map(|i| AttachmentInput {
                file_name: format!("doc{i}.pdf"),
                url: format!("https://files.example.fr/doc{i}.pdf"),
                size_bytes: 1_000,
            })
            .collect();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn report_messages_use_french_pluralization() {
        assert_eq!(report_message(1, 0, "archivée", "archivées"), "1 demande archivée");
        assert_eq!(report_message(3, 0, "archivée", "archivées"), "3 demandes archivées");
        assert_eq!(
            report_message(2, 1, "mise à jour", "mises à jour"),
            "2 demandes mises à jour (1 déjà à jour)"
        );
        assert_eq!(report_message(0, 2, "archivée", "archivées"), "Aucune demande à modifier (2 déjà à jour)");
    }

    #[test]
    fn list_cache_keys_distinguish_queries() {
        let base = ContactListQuery::default();
        let filtered = ContactListQuery {
            status: Some(ContactStatus::Pending),
            ..ContactListQuery::default()
        };
        assert_ne!(list_cache_key(&base, 0, 10), list_cache_key(&filtered, 0, 10));
        assert_ne!(list_cache_key(&base, 0, 10), list_cache_key(&base, 1, 10));
    }

    mod db {
        use super::*;
        use crate::mailer::{NoopMailer, Notifier};
        use crate::test_support;
        use std::sync::Arc;

        fn notifier() -> Notifier {
            Notifier::new(
                Arc::new(NoopMailer),
                "site@example.fr".into(),
                "diet@example.fr".into(),
                "Cabinet Test".into(),
            )
        }

        #[tokio::test]
        async fn submission_then_backoffice_workflow() -> anyhow::Result<()> {
            let Some(db) = test_support::get_db().await? else { return Ok(()) };
            let caches = ContactCaches::new();
            let notifier = notifier();

            let marker = Uuid::new_v4().to_string();
            let mut ids = Vec::new();
            for i in 0..3 {
                let mut form = valid_form();
                form.email = format!("flow_{i}_{marker}@example.fr");
                form.message = format!("Demande de suivi {marker} numéro {i}");
                let report = submit(&db, &caches, &notifier, form).await?;
                assert!(report.is_success());
                ids.push(report.id.expect("created id"));
            }

            // filtered list sees the three submissions
            let page = list(
                &db,
                &caches,
                ContactListQuery { q: Some(marker.clone()), ..ContactListQuery::default() },
            )
            .await?;
            assert_eq!(page.meta.total, 3);
            assert_eq!(page.data.len(), 3);
            assert!(!page.pager.is_empty());

            // pre-complete one row, then bulk-update: only the delta counts
            update_status_one(&db, &caches, ids[0], ContactStatus::Completed).await?;
            let report = update_status(&db, &caches, &ids, ContactStatus::Completed).await?;
            assert_eq!(report.updated, 2);
            assert_eq!(report.skipped, 1);

            // archive all, unarchive restores pending
            let report = archive(&db, &caches, &ids).await?;
            assert_eq!(report.updated, 3);
            let report = unarchive(&db, &caches, &[ids[0]]).await?;
            assert_eq!(report.updated, 1);
            let detail = get(&db, &caches, ids[0]).await?;
            assert_eq!(detail.request.status, ContactStatus::Pending);

            // delete reports missing ids as skipped
            let mut with_ghost = ids.clone();
            with_ghost.push(Uuid::new_v4());
            let report = delete(&db, &caches, &with_ghost).await?;
            assert_eq!(report.updated, 3);
            assert_eq!(report.skipped, 1);
            assert!(matches!(
                get(&db, &caches, ids[0]).await,
                Err(ServiceError::NotFound(_))
            ));
            Ok(())
        }

        #[tokio::test]
        async fn empty_selection_is_a_validation_error() -> anyhow::Result<()> {
            let Some(db) = test_support::get_db().await? else { return Ok(()) };
            let caches = ContactCaches::new();
            let err = update_status(&db, &caches, &[], ContactStatus::Completed)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation { .. }));
            let err = delete(&db, &caches, &[Uuid::new_v4()]).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)));
            Ok(())
        }
    }
}
