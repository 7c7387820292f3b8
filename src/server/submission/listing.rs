//! Completing a paid restaurant listing once the checkout provider reports success.
//!
//! The provider may call back more than once for the same checkout session, so completion
//! is keyed by that session id.

use std::time::Duration;
use log::{info, warn};
use crate::server::model::listing::PaidListingRequest;
use crate::server::model::restaurant::Restaurant;
use crate::server::remote::{BookingBackend, RemoteError};
use crate::server::submission::{Begin, SubmissionRegistry};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ListingOutcome {
    Created(Restaurant),
    AlreadyCreated(Restaurant),
    InFlight,
}

/// how long a completed checkout session keeps answering with its restaurant
const COMPLETED_LISTING_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) struct ListingCompletion {
    submissions: SubmissionRegistry<String, Restaurant>,
}

impl ListingCompletion {
    pub fn new() -> Self {
        Self {
            submissions: SubmissionRegistry::new(COMPLETED_LISTING_TTL),
        }
    }

    pub async fn complete<B: BookingBackend>(
        &self,
        backend: &B,
        listing: &PaidListingRequest,
    ) -> Result<ListingOutcome, RemoteError> {
        let key = listing.session_id.clone();
        match self.submissions.begin(key.clone()) {
            Begin::Proceed => {}
            Begin::InFlight => {
                warn!("listing for checkout session {} is already being created", key);
                return Ok(ListingOutcome::InFlight);
            }
            Begin::Completed(restaurant) => {
                warn!("listing for checkout session {} already created restaurant {}", key, restaurant.id);
                return Ok(ListingOutcome::AlreadyCreated(restaurant));
            }
        }

        match backend.complete_listing(&key, listing).await {
            Ok(restaurant) => {
                info!("restaurant {} created after checkout session {}", restaurant.id, key);
                self.submissions.finish(key, restaurant.clone());
                Ok(ListingOutcome::Created(restaurant))
            }
            Err(e) => {
                self.submissions.abort(&key);
                Err(e)
            }
        }
    }
}
