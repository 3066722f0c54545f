use std::{ops::Deref, sync::Arc};

/// A read only value shipped once to every partition.
#[derive(Debug)]
pub struct Broadcast<T>(Arc<T>);

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Broadcast<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Broadcast<T> {
    /// Creates a new `Broadcast`
    ///
    /// # Arguments
    /// * `value` - The value to share.
    ///
    /// # Returns
    /// A new `Broadcast` instance.
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}
