use conddb_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// A map from object id to stored payload.
///
/// Writing the same payload twice yields the same id and stores nothing new.
/// Implementations are shared across threads and never look inside a
/// payload.
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `id`.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Like [`read`](Self::read), with absence reported as
    /// [`StoreError::NotFound`].
    fn read_required(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        match self.read(id)? {
            Some(object) => Ok(object),
            None => Err(StoreError::NotFound(*id)),
        }
    }
}
