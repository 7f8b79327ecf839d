use crate::model::ResultRow;

/// A trait for reporting aggregated rows.
pub trait Report {
    type Error;

    /// Report a single [`ResultRow`].
    fn report(&mut self, row: &ResultRow) -> Result<(), Self::Error>;
}
