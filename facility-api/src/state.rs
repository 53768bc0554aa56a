use std::{sync::Arc, time::Duration};

use defect_recognizer::Recognizer;
use sanitation_core::PenaltyTable;

use crate::database::FacilityStore;

/// Everything a request handler needs, shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub store: FacilityStore,
    pub recognizer: Recognizer,
    pub penalties: Arc<PenaltyTable>,
    pub detection_timeout: Duration,
}
