use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::applications::domain::{ApplicationId, ApplicationRecord, StatusStats};
use crate::applications::query::{sort_for_listing, ApplicationFilter, PageWindow, RecordPage};
use crate::applications::repository::{ApplicationRepository, RepositoryError};

#[derive(Default)]
struct MemoryState {
    records: HashMap<ApplicationId, ApplicationRecord>,
    by_email: HashMap<String, ApplicationId>,
}

/// Process-local store. The email index is checked and written under the same
/// lock as the record, so concurrent duplicates cannot both land.
#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryApplicationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|state| state.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut state = self.lock()?;
        if state.records.contains_key(&record.id) || state.by_email.contains_key(&record.email) {
            return Err(RepositoryError::Conflict);
        }
        state
            .by_email
            .insert(record.email.clone(), record.id.clone());
        state.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: &ApplicationRecord) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let stored = state
            .records
            .get_mut(&record.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.status = record.status;
        stored.notes = record.notes.clone();
        stored.reviewed_at = record.reviewed_at;
        stored.updated_at = record.updated_at;
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.get(id).cloned())
    }

    fn find(
        &self,
        filter: &ApplicationFilter,
        window: Option<PageWindow>,
    ) -> Result<RecordPage, RepositoryError> {
        let mut matched: Vec<ApplicationRecord> = {
            let state = self.lock()?;
            state
                .records
                .values()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect()
        };
        sort_for_listing(&mut matched);

        let total = matched.len() as u64;
        let records = match window {
            Some(window) => matched
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        };

        Ok(RecordPage { records, total })
    }

    fn status_stats(&self) -> Result<StatusStats, RepositoryError> {
        let state = self.lock()?;
        let mut stats = StatusStats::default();
        for record in state.records.values() {
            stats.record(record.status, 1);
        }
        Ok(stats)
    }
}
