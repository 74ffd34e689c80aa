use std::sync::Arc;

use appointment_cell::services::appointments::AppointmentService;
use appointment_cell::services::booking::BookingService;
use auth_cell::context::AuthContext;
use auth_cell::guard::RouteGuard;
use auth_cell::services::users::UserService;
use doctor_cell::services::doctor::DoctorService;
use history_cell::services::history::HistoryService;
use patient_cell::services::patient::PatientService;
use shared_api::ApiClient;
use shared_config::AppConfig;

/// Everything the screens need, wired over one HTTP client and one auth
/// context.
pub struct Services {
    pub auth: Arc<AuthContext>,
    pub guard: RouteGuard,
    pub users: UserService,
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub booking: BookingService,
    pub history: HistoryService,
}

impl Services {
    pub fn new(config: &AppConfig) -> Self {
        let api = Arc::new(ApiClient::new(config));
        let auth = Arc::new(AuthContext::new(config, Arc::clone(&api)));

        Self {
            guard: RouteGuard::new(Arc::clone(&auth)),
            users: UserService::new(Arc::clone(&api)),
            doctors: DoctorService::new(Arc::clone(&api)),
            patients: PatientService::new(Arc::clone(&api)),
            appointments: AppointmentService::new(Arc::clone(&api)),
            booking: BookingService::new(Arc::clone(&api)),
            history: HistoryService::new(api),
            auth,
        }
    }
}
