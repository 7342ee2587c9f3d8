use std::{
    fmt,
    fmt::{Debug, Display},
};

/// A wrapper for configuration values that must never end up in logs or error messages.
///
/// Both `Debug` and `Display` print a mask. Call [`Secret::reveal`] at the point where the value is actually used.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl Secret<String> {
    /// True if the wrapped string is empty or only whitespace. Used to refuse start-up with missing keys.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl<T: Clone + Default> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
