pub mod booking;
pub mod catalog;

// Rejects values that are empty once surrounding whitespace is removed.
pub(crate) fn non_blank(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}
