//! Scoped reference guard
//!
//! `RefGuard` holds one reference to a host value and releases it when the
//! guard goes out of scope, whatever path the scope exits by. Two ways in:
//!
//! - [`RefGuard::adopt`]: the caller hands over a reference it already owns;
//!   no increment.
//! - [`RefGuard::borrow`]: the caller only borrows the value; the guard takes
//!   its own reference on entry, so it can outlive the borrow.
//!
//! A guard over the null sentinel ([`RefGuard::null`]) releases nothing.

use crate::value::Value;

#[must_use = "dropping the guard releases its reference immediately"]
pub struct RefGuard {
    value: Option<Value>,
}

impl RefGuard {
    /// Take ownership of an existing reference
    pub fn adopt(value: Value) -> Self {
        Self { value: Some(value) }
    }

    /// Take a new reference to a borrowed value
    pub fn borrow(value: &Value) -> Self {
        Self {
            value: Some(value.clone()),
        }
    }

    /// Guard over the null sentinel
    pub fn null() -> Self {
        Self { value: None }
    }

    /// Adopt a reference that may be the null sentinel
    pub fn adopt_option(handle: Option<Value>) -> Self {
        Self { value: handle }
    }

    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Hand the reference back to the caller; the guard releases nothing
    pub fn into_inner(mut self) -> Option<Value> {
        self.value.take()
    }
}

impl Drop for RefGuard {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            tracing::trace!(
                target: "tocc.host",
                type_name = value.type_name(),
                "releasing guarded reference"
            );
            drop(value);
        }
    }
}

impl std::fmt::Debug for RefGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefGuard").field("value", &self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueList;

    #[test]
    fn test_borrow_increments_for_guard_lifetime() {
        let list = Value::List(ValueList::new());
        assert_eq!(list.ref_count(), Some(1));
        {
            let _guard = RefGuard::borrow(&list);
            assert_eq!(list.ref_count(), Some(2));
        }
        assert_eq!(list.ref_count(), Some(1));
    }

    #[test]
    fn test_adopt_releases_on_drop() {
        let list = Value::List(ValueList::new());
        let owned = list.clone();
        assert_eq!(list.ref_count(), Some(2));
        let guard = RefGuard::adopt(owned);
        assert_eq!(list.ref_count(), Some(2));
        drop(guard);
        assert_eq!(list.ref_count(), Some(1));
    }

    #[test]
    fn test_release_on_early_return() {
        fn fails_midway(value: &Value) -> Result<(), ()> {
            let _guard = RefGuard::borrow(value);
            Err(())
        }

        let text = Value::from("tag");
        assert!(fails_midway(&text).is_err());
        assert_eq!(text.ref_count(), Some(1));
    }

    #[test]
    fn test_null_guard_is_noop() {
        let guard = RefGuard::adopt_option(None);
        assert!(guard.is_null());
        drop(guard);
    }

    #[test]
    fn test_into_inner_transfers_reference() {
        let text = Value::from("id");
        let guard = RefGuard::borrow(&text);
        let moved = guard.into_inner().unwrap();
        assert_eq!(text.ref_count(), Some(2));
        drop(moved);
        assert_eq!(text.ref_count(), Some(1));
    }
}
