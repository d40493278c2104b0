//! Boundary to whatever stores finished and in-progress records.
//!
//! The wizard treats every call as a possibly-failing remote call with no
//! latency guarantee. It surfaces the reported error and never retries.

use crate::error::{NotFoundError, PersistenceError};
use crate::payload::{DraftPayload, RecordId, RecordSnapshot};

pub trait PersistenceGateway: Send + Sync {
    /// Create (`target = None`) or update a record in draft mode.
    fn save_draft(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> Result<RecordId, PersistenceError>;

    /// Create or update a record as published.
    fn publish(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> Result<RecordId, PersistenceError>;

    /// Fetch a stored record for edit/resume.
    fn load_by_id(&self, id: &RecordId) -> Result<RecordSnapshot, NotFoundError>;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for std::sync::Arc<G> {
    fn save_draft(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> Result<RecordId, PersistenceError> {
        (**self).save_draft(target, payload)
    }

    fn publish(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> Result<RecordId, PersistenceError> {
        (**self).publish(target, payload)
    }

    fn load_by_id(&self, id: &RecordId) -> Result<RecordSnapshot, NotFoundError> {
        (**self).load_by_id(id)
    }
}
