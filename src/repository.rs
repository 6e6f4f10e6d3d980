//! Settlement persistence.
//!
//! The engine only needs to number, store and fetch settlement records, so
//! storage sits behind [`SettlementRepository`]. The bundled
//! [`InMemorySettlementRepository`] backs the HTTP service and tests.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::SettlementRecord;

/// Storage for persisted settlements.
pub trait SettlementRepository {
    /// Number of settlements already stored for a financial year.
    fn count_for_financial_year(&self, financial_year: &str) -> EngineResult<usize>;

    /// Stores a new record.
    fn insert(&mut self, record: SettlementRecord) -> EngineResult<()>;

    /// Fetches a record by id.
    ///
    /// Returns `SettlementNotFound` if no record has that id.
    fn get(&self, id: Uuid) -> EngineResult<SettlementRecord>;
}

/// A process-local settlement store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettlementRepository {
    records: HashMap<Uuid, SettlementRecord>,
}

impl InMemorySettlementRepository {
    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SettlementRepository for InMemorySettlementRepository {
    fn count_for_financial_year(&self, financial_year: &str) -> EngineResult<usize> {
        Ok(self
            .records
            .values()
            .filter(|record| record.result.financial_year == financial_year)
            .count())
    }

    fn insert(&mut self, record: SettlementRecord) -> EngineResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(EngineError::CalculationError {
                message: format!("settlement {} already exists", record.id),
            });
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: Uuid) -> EngineResult<SettlementRecord> {
        self.records
            .get(&id)
            .cloned()
            .ok_or(EngineError::SettlementNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::preview_settlement;
    use crate::config::TaxConfig;
    use crate::models::{SettlementInput, SettlementStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_leaving_on(last_working_day: NaiveDate) -> SettlementRecord {
        let input = SettlementInput::new(
            "emp_001",
            Decimal::new(60000, 0),
            Decimal::new(30000, 0),
            date(2020, 1, 1),
            last_working_day,
            last_working_day,
        );
        let result = preview_settlement(&input, &TaxConfig::fy2024_25()).unwrap();
        SettlementRecord {
            id: Uuid::new_v4(),
            settlement_number: format!("FNF/{}/0001", result.financial_year),
            employee_id: input.employee_id,
            created_on: last_working_day,
            status: SettlementStatus::Draft,
            result,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut repository = InMemorySettlementRepository::default();
        let record = record_leaving_on(date(2024, 6, 15));

        repository.insert(record.clone()).unwrap();

        assert_eq!(repository.get(record.id).unwrap(), record);
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn test_get_unknown_id() {
        let repository = InMemorySettlementRepository::default();
        let id = Uuid::new_v4();

        match repository.get(id) {
            Err(EngineError::SettlementNotFound { id: missing }) => assert_eq!(missing, id),
            other => panic!("Expected SettlementNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut repository = InMemorySettlementRepository::default();
        let record = record_leaving_on(date(2024, 6, 15));

        repository.insert(record.clone()).unwrap();
        assert!(repository.insert(record).is_err());
    }

    #[test]
    fn test_count_is_per_financial_year() {
        let mut repository = InMemorySettlementRepository::default();
        repository.insert(record_leaving_on(date(2024, 3, 31))).unwrap();
        repository.insert(record_leaving_on(date(2024, 4, 1))).unwrap();
        repository.insert(record_leaving_on(date(2024, 9, 30))).unwrap();

        assert_eq!(repository.count_for_financial_year("2023-24").unwrap(), 1);
        assert_eq!(repository.count_for_financial_year("2024-25").unwrap(), 2);
        assert_eq!(repository.count_for_financial_year("2025-26").unwrap(), 0);
    }
}
