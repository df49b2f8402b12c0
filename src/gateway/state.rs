use crate::db::Database;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Queue and ledger storage
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
