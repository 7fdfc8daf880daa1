//! Multi-step customer application intake
//!
//! Steps run in a fixed order: package selection, contact details,
//! physical address, then documents and review. Advancing is gated on the
//! active step's validation; going back is always allowed and only clears
//! the error messages. Submitting consumes the wizard, so a second submit
//! cannot be issued while one is outstanding and a successful submission
//! leaves nothing behind to reuse.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{error, info, warn};

use crate::auth::Session;
use crate::backend::DataAccess;
use crate::config::IntakeConfig;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{
    Application, ApplicationPayload, ApplicationStatus, DocumentStatus, KycDocuments, Package,
};
use crate::notification::{Toast, ToastKind};
use crate::utils::format_timestamp;

pub mod fields;
pub mod gates;

pub use fields::{Field, IntakeFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    PackageSelect = 1,
    ContactInfo = 2,
    Address = 3,
    DocumentsAndReview = 4,
}

impl Step {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::PackageSelect => "Package",
            Step::ContactInfo => "Customer information",
            Step::Address => "Physical address",
            Step::DocumentsAndReview => "Documents & review",
        }
    }

    fn following(&self) -> Option<Step> {
        match self {
            Step::PackageSelect => Some(Step::ContactInfo),
            Step::ContactInfo => Some(Step::Address),
            Step::Address => Some(Step::DocumentsAndReview),
            Step::DocumentsAndReview => None,
        }
    }

    fn preceding(&self) -> Option<Step> {
        match self {
            Step::PackageSelect => None,
            Step::ContactInfo => Some(Step::PackageSelect),
            Step::Address => Some(Step::ContactInfo),
            Step::DocumentsAndReview => Some(Step::Address),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} ({})", self.number(), self.title())
    }
}

/// Result of a `next` attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(Step),
    /// The gate failed; `errors` holds one message per offending field
    Blocked,
    /// Already on the last step; submission is a separate action
    AtLastStep,
}

/// Returned by a successful `submit`
#[derive(Debug)]
pub struct SubmitReceipt {
    pub application: Application,
    pub toast: Toast,
}

/// Returned by a failed `submit`, handing the untouched wizard back
#[derive(Debug)]
pub struct SubmitFailure {
    pub wizard: IntakeWizard,
    pub error: AppError,
}

#[derive(Debug)]
pub struct IntakeWizard {
    session: Session,
    step: Step,
    fields: IntakeFields,
    errors: FieldErrors,
    packages: Vec<Package>,
    toast: Option<Toast>,
    toast_duration_ms: u64,
}

impl IntakeWizard {
    /// Create a wizard on step 1 for the given signed-in dealer or agent
    pub fn new(session: Session, config: &IntakeConfig) -> Self {
        Self {
            session,
            step: Step::PackageSelect,
            fields: IntakeFields::with_default_city(&config.default_city),
            errors: FieldErrors::new(),
            packages: Vec::new(),
            toast: None,
            toast_duration_ms: config.toast_duration_ms,
        }
    }

    /// Create a wizard and load the package choices for step 1
    ///
    /// A failed package fetch still yields a usable wizard with an error toast.
    pub async fn start(session: Session, config: &IntakeConfig, api: &dyn DataAccess) -> Self {
        let mut wizard = Self::new(session, config);
        match api.get_packages().await {
            Ok(packages) => wizard.packages = packages,
            Err(e) => {
                error!("Error fetching packages: {}", e);
                wizard.notify(ToastKind::Error, "Failed to load packages");
            }
        }
        wizard
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn fields(&self) -> &IntakeFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn set_packages(&mut self, packages: Vec<Package>) {
        self.packages = packages;
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Drop the current toast once its fixed display time has passed
    pub fn expire_toast(&mut self, now: DateTime<Utc>) {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired_at(now)) {
            self.toast = None;
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// The chosen package, if it is among the fetched choices
    pub fn selected_package(&self) -> Option<&Package> {
        self.packages
            .iter()
            .find(|package| package.id == self.fields.package_id)
    }

    /// Record an input event
    ///
    /// Clears the error previously shown for that field (and for the id
    /// value when the id type switches). Nothing is re-validated until the
    /// next `next` attempt.
    pub fn field_changed(&mut self, field: Field, value: &str) -> AppResult<()> {
        let changed = self.fields.set(field, value)?;
        self.errors.remove(&field);
        if field == Field::IdType && changed {
            self.errors.remove(&Field::IdValue);
        }
        Ok(())
    }

    /// Try to advance one step
    pub fn next(&mut self) -> StepOutcome {
        let Some(following) = self.step.following() else {
            return StepOutcome::AtLastStep;
        };

        let errors = self.run_gate();
        if !errors.is_empty() {
            warn!("{} blocked: {} field(s) invalid", self.step, errors.len());
            self.errors = errors;
            self.notify(ToastKind::Warning, "Please correct the highlighted fields");
            return StepOutcome::Blocked;
        }

        self.errors.clear();
        self.step = following;
        info!("Intake advanced to {}", self.step);
        StepOutcome::Advanced(self.step)
    }

    /// Go back one step; returns false on step 1
    pub fn previous(&mut self) -> bool {
        match self.step.preceding() {
            Some(preceding) => {
                self.step = preceding;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// Evaluate the active step's gate, applying the phone rewrite when
    /// step 2 passes
    fn run_gate(&mut self) -> FieldErrors {
        match self.step {
            Step::PackageSelect => gates::package_gate(&self.fields),
            Step::ContactInfo => match gates::contact_gate(&self.fields) {
                Ok(canonical_phone) => {
                    self.fields.phone = canonical_phone;
                    FieldErrors::new()
                }
                Err(errors) => errors,
            },
            Step::Address => gates::address_gate(&self.fields),
            // Attachments are optional
            Step::DocumentsAndReview => FieldErrors::new(),
        }
    }

    /// Snapshot of everything collected, shaped for the create-application call
    pub fn payload(&self, submitted_at: DateTime<Utc>) -> ApplicationPayload {
        let fields = &self.fields;
        ApplicationPayload {
            dealer_id: self.session.dealer_id,
            agent_id: self.session.agent_id,
            customer_name: fields.full_name.clone(),
            customer_email: fields.email.clone(),
            customer_phone: fields.phone.clone(),
            customer_id_type: fields.id_type,
            customer_id_number: fields.id_value.clone(),
            physical_address: fields.address.clone(),
            package_id: fields.package_id,
            package_name: self
                .selected_package()
                .map(|package| package.name.clone())
                .unwrap_or_default(),
            status: ApplicationStatus::Pending,
            submitted_at: format_timestamp(submitted_at),
            kyc_documents: KycDocuments {
                national_id: DocumentStatus::from_presence(fields.national_id_document.is_some()),
                proof_of_address: DocumentStatus::from_presence(
                    fields.proof_of_address_document.is_some(),
                ),
            },
        }
    }

    /// Submit the application from step 4
    ///
    /// Calls the create operation exactly once. On failure the wizard comes
    /// back on step 4 with every field intact and an error toast.
    pub async fn submit(mut self, api: &dyn DataAccess) -> Result<SubmitReceipt, SubmitFailure> {
        if self.step != Step::DocumentsAndReview {
            let error = AppError::InvalidTransition(format!(
                "Submit is only available from {}, currently on {}",
                Step::DocumentsAndReview,
                self.step
            ));
            return Err(SubmitFailure { wizard: self, error });
        }

        let errors = self.run_gate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitFailure {
                wizard: self,
                error: AppError::Validation(errors),
            });
        }

        let payload = self.payload(Utc::now());
        info!(
            "Submitting application for package {} (dealer {}, agent {:?})",
            payload.package_id, payload.dealer_id, payload.agent_id
        );

        match api.create_application(&payload).await {
            Ok(application) => {
                info!("Application {} submitted", application.application_number);
                Ok(SubmitReceipt {
                    application,
                    toast: Toast::new(
                        ToastKind::Success,
                        "Application submitted successfully!",
                        self.toast_duration_ms,
                    ),
                })
            }
            Err(e) => {
                error!("Error submitting application: {}", e);
                self.notify(ToastKind::Error, "Failed to submit application");
                Err(SubmitFailure {
                    wizard: self,
                    error: AppError::Submission(e.to_string()),
                })
            }
        }
    }

    fn notify(&mut self, kind: ToastKind, message: &str) {
        self.toast = Some(Toast::new(kind, message, self.toast_duration_ms));
    }
}
