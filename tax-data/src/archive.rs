//! Archive of filed tax-return documents.
//!
//! Only the records are kept here; the documents themselves live elsewhere.

use tax_core::TaxReturn;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("no tax return with id '{0}'")]
    NotFound(String),
}

/// Tax-return records in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxReturnArchive {
    returns: Vec<TaxReturn>,
}

impl TaxReturnArchive {
    pub fn new(returns: Vec<TaxReturn>) -> Self {
        Self { returns }
    }

    pub fn returns(&self) -> &[TaxReturn] {
        &self.returns
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Records for tax year `year`, in upload order.
    pub fn for_year(
        &self,
        year: i32,
    ) -> Vec<&TaxReturn> {
        self.returns.iter().filter(|r| r.year == year).collect()
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Option<&TaxReturn> {
        self.returns.iter().find(|r| r.id == id)
    }

    /// Removes the record with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotFound`] if no record has that id.
    pub fn delete(
        &mut self,
        id: &str,
    ) -> Result<TaxReturn, ArchiveError> {
        let position = self
            .returns
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))?;
        let removed = self.returns.remove(position);
        info!(id, file_name = %removed.file_name, "tax return deleted");
        Ok(removed)
    }

    /// Combined size of all records, in bytes.
    pub fn total_size(&self) -> u64 {
        self.returns
            .iter()
            .fold(0_u64, |total, r| total.saturating_add(r.size_bytes))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SampleData;

    fn archive() -> TaxReturnArchive {
        TaxReturnArchive::new(SampleData::load().unwrap().tax_returns)
    }

    #[test]
    fn for_year_filters_records() {
        let archive = archive();

        let ids: Vec<&str> = archive.for_year(2023).iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2"]);
        assert!(archive.for_year(2019).is_empty());
    }

    #[test]
    fn delete_removes_only_that_record() {
        let mut archive = archive();

        let removed = archive.delete("2").unwrap();

        assert_eq!(removed.file_name, "令和5年分青色申告決算書.pdf");
        assert_eq!(archive.returns().len(), 3);
        assert_eq!(archive.find("2"), None);
        assert!(archive.find("1").is_some());
    }

    #[test]
    fn delete_unknown_id_fails_and_keeps_records() {
        let mut archive = archive();

        assert_eq!(archive.delete("99"), Err(ArchiveError::NotFound("99".to_string())));
        assert_eq!(archive.returns().len(), 4);
    }

    #[test]
    fn empty_archive() {
        let mut archive = TaxReturnArchive::default();

        assert!(archive.is_empty());
        assert_eq!(archive.total_size(), 0);
        assert!(archive.delete("1").is_err());
    }
}
