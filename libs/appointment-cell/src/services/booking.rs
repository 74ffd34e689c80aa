use std::sync::Arc;

use futures::try_join;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::services::doctor::DoctorService;
use patient_cell::models::Patient;
use patient_cell::services::patient::PatientService;
use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{Appointment, BookAppointmentRequest};
use crate::services::appointments::AppointmentService;

/// Everything the booking form needs before it can render.
#[derive(Debug)]
pub struct BookingFormData {
    pub doctors: Vec<Doctor>,
    pub patient: Patient,
}

/// Result of a submitted booking: the created appointment plus the
/// patient's refreshed agenda.
#[derive(Debug)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    pub agenda: Vec<Appointment>,
}

/// The appointment-booking flow. Prerequisite fetches fan out concurrently
/// and join any-fail; submission chains its calls sequentially with no
/// transactional guarantees, since the backend owns consistency.
pub struct BookingService {
    appointments: AppointmentService,
    doctors: DoctorService,
    patients: PatientService,
}

impl BookingService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            appointments: AppointmentService::new(Arc::clone(&api)),
            doctors: DoctorService::new(Arc::clone(&api)),
            patients: PatientService::new(api),
        }
    }

    /// Load the doctors list and the patient profile together; if either
    /// fetch fails the whole form load fails.
    pub async fn prepare_form(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<BookingFormData, ApiError> {
        debug!("Preparing booking form for patient {}", patient_id);

        let (doctors, patient) = try_join!(
            self.doctors.list(auth_token),
            self.patients.get(patient_id, auth_token),
        )?;

        Ok(BookingFormData { doctors, patient })
    }

    /// Submit the booking, then refresh the patient's agenda so the screen
    /// can re-render from backend truth.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<BookingOutcome, ApiError> {
        let patient_id = request.patient_id;
        let appointment = self.appointments.book(request, auth_token).await?;
        let agenda = self.appointments.for_patient(patient_id, auth_token).await?;

        info!(
            "Booking flow finished: appointment {} for patient {}",
            appointment.id, patient_id
        );

        Ok(BookingOutcome { appointment, agenda })
    }
}
