//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::domain::{AccountService, ItineraryService, TripService};

/// Services shared across workers via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub accounts: Arc<AccountService>,
    /// Trip CRUD use-cases.
    pub trips: Arc<TripService>,
    /// Itinerary day and block use-cases.
    pub itinerary: Arc<ItineraryService>,
}

impl HttpState {
    /// Bundle the services for injection into the app.
    pub fn new(
        accounts: AccountService,
        trips: TripService,
        itinerary: ItineraryService,
    ) -> Self {
        Self {
            accounts: Arc::new(accounts),
            trips: Arc::new(trips),
            itinerary: Arc::new(itinerary),
        }
    }
}
