use crate::config::WizardConfig;
use crate::data::models::attachment::{AttachmentId, ImageAttachment, ImageFile};
use crate::data::models::categories::Category;
use crate::data::models::draft::{ArrayField, DraftProduct, FieldUpdate};
use crate::data::models::product::{ProductId, ProductRecord};
use crate::data::models::submission::ProductSubmission;
use crate::data::repos::traits::repository::{CategoryProvider, ProductRepository, Repository};
use crate::services::errors::{RepositoryError, UploadError, WizardError};
use crate::services::preview_service::{BlobPreviewRegistry, PreviewRegistry};
use crate::services::upload_service::{ImageUploader, SimulatedUploader};
use crate::services::validation::{FieldErrors, ValidationContext, validate_all, validate_step};
use crate::services::wizard_steps::{StepStatus, StepTracker, TOTAL_STEPS, WizardStep};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    /// Edit mode only: waiting for the product to be fetched
    Loading,
    Ready,
    LoadFailed(String),
    /// Submitted successfully, the draft has been discarded
    Completed(ProductRecord),
}

impl FormPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FormPhase::Loading => "loading",
            FormPhase::Ready => "ready",
            FormPhase::LoadFailed(_) => "load failed",
            FormPhase::Completed(_) => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved(WizardStep),
    /// Validation of this step failed; field errors say why
    Blocked(WizardStep),
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(ProductRecord),
    /// Nothing was sent; the form moved to `step`, the first one with errors
    Invalid { step: WizardStep, errors: FieldErrors },
    /// Another submission is still in flight
    AlreadySubmitting,
}

/// Collaborators and settings the wizard runs with
pub struct WizardDeps<R, C> {
    pub repository: Arc<R>,
    pub categories: Arc<C>,
    pub uploader: Arc<dyn ImageUploader>,
    pub previews: Arc<dyn PreviewRegistry>,
    pub config: WizardConfig,
}

impl<R, C> WizardDeps<R, C> {
    pub fn new(repository: Arc<R>, categories: Arc<C>, config: WizardConfig) -> Self {
        WizardDeps {
            repository,
            categories,
            uploader: Arc::new(SimulatedUploader::from_config(&config)),
            previews: Arc::new(BlobPreviewRegistry::new()),
            config,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn with_previews(mut self, previews: Arc<dyn PreviewRegistry>) -> Self {
        self.previews = previews;
        self
    }
}

struct FormState {
    mode: FormMode,
    phase: FormPhase,
    draft: DraftProduct,
    steps: StepTracker,
    errors: FieldErrors,
    categories: Option<Vec<Category>>,
    submitting: bool,
}

impl FormState {
    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.phase {
            FormPhase::Ready => Ok(()),
            ref other => Err(WizardError::NotReady(other.name())),
        }
    }

    fn context<'a>(&'a self, config: &WizardConfig) -> ValidationContext<'a> {
        ValidationContext {
            categories: self.categories.as_deref(),
            require_known_category: config.require_known_category,
        }
    }

    fn find_attachment(&mut self, id: AttachmentId) -> Option<&mut ImageAttachment> {
        self.draft
            .attachments_mut()
            .find(|attachment| attachment.id() == id)
    }
}

struct Shared<R, C> {
    state: Mutex<FormState>,
    phase_tx: watch::Sender<FormPhase>,
    deps: WizardDeps<R, C>,
}

impl<R, C> Shared<R, C> {
    fn set_phase(&self, state: &mut FormState, phase: FormPhase) {
        state.phase = phase.clone();
        self.phase_tx.send_replace(phase);
    }

    fn finish_load(&self, result: Result<ProductRecord, RepositoryError>) {
        let mut state = self.state.lock();
        if state.phase != FormPhase::Loading {
            return;
        }

        match result {
            Ok(record) => {
                tracing::info!("Loaded product {} into the form", record.id);
                state.draft = DraftProduct::from(record);
                self.set_phase(&mut state, FormPhase::Ready);
            }
            Err(e) => {
                tracing::error!("Error loading product: {}", e);
                self.set_phase(&mut state, FormPhase::LoadFailed(e.to_string()));
            }
        }
    }

    fn settle_upload(&self, id: AttachmentId, result: Result<(), UploadError>) {
        let mut state = self.state.lock();
        match state.find_attachment(id) {
            Some(attachment) => {
                if let Err(e) = &result {
                    tracing::warn!("Upload of {} failed: {}", id, e);
                } else {
                    tracing::debug!("Upload of {} finished", id);
                }
                attachment.settle(result);
            }
            None => tracing::debug!("Ignoring upload result for discarded {}", id),
        }
    }
}

/// Multi-step product form.
///
/// Owns the draft and the step state; every mutation goes through its methods.
/// Fetches and uploads run on spawned tasks that only hold a weak reference, so
/// dropping the wizard abandons whatever they return. Selecting images and opening
/// in edit mode must happen inside a tokio runtime.
pub struct ProductWizard<R, C> {
    shared: Arc<Shared<R, C>>,
}

impl<R, C> ProductWizard<R, C>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    pub fn create(deps: WizardDeps<R, C>) -> Self {
        tracing::info!("Opening product form in create mode");
        Self::open(deps, FormMode::Create, FormPhase::Ready)
    }

    /// Opens the form on an existing product. The form stays `Loading` until the fetch settles.
    pub fn edit(deps: WizardDeps<R, C>, id: ProductId) -> Self {
        tracing::info!("Opening product form for {}", id);
        let wizard = Self::open(deps, FormMode::Edit(id.clone()), FormPhase::Loading);

        let weak: Weak<Shared<R, C>> = Arc::downgrade(&wizard.shared);
        let repository = Arc::clone(&wizard.shared.deps.repository);
        tokio::spawn(async move {
            let result = repository.get_by_id(&id).await;
            match weak.upgrade() {
                Some(shared) => shared.finish_load(result),
                None => tracing::debug!("Product form closed before {} was loaded", id),
            }
        });

        wizard
    }

    fn open(deps: WizardDeps<R, C>, mode: FormMode, phase: FormPhase) -> Self {
        let (phase_tx, _) = watch::channel(phase.clone());
        let state = FormState {
            mode,
            phase,
            draft: DraftProduct::default(),
            steps: StepTracker::new(),
            errors: FieldErrors::new(),
            categories: None,
            submitting: false,
        };

        ProductWizard {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                phase_tx,
                deps,
            }),
        }
    }

    /// Waits until the form has left `Loading`
    pub async fn ready(&self) -> Result<(), WizardError> {
        let mut phases = self.shared.phase_tx.subscribe();
        let phase = phases
            .wait_for(|phase| *phase != FormPhase::Loading)
            .await
            .map(|phase| phase.clone())
            .map_err(|_| WizardError::NotReady(FormPhase::Loading.name()))?;

        match phase {
            FormPhase::LoadFailed(message) => Err(WizardError::LoadFailed(message)),
            _ => Ok(()),
        }
    }

    /// Fetches the category list for the selector. Failure leaves the previous list in place.
    pub async fn load_categories(&self) -> Result<Vec<Category>, WizardError> {
        let categories = self.shared.deps.categories.get_all().await.map_err(|e| {
            tracing::warn!("Error loading categories: {}", e);
            WizardError::Repository(e)
        })?;

        tracing::debug!("Loaded {} categories", categories.len());
        self.shared.state.lock().categories = Some(categories.clone());
        Ok(categories)
    }

    pub fn mode(&self) -> FormMode {
        self.shared.state.lock().mode.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.shared.state.lock().phase.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.shared
            .state
            .lock()
            .categories
            .clone()
            .unwrap_or_default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.shared.state.lock().steps.current()
    }

    pub fn step_status(&self, step: WizardStep) -> StepStatus {
        self.shared.state.lock().steps.status(step)
    }

    pub fn step_statuses(&self) -> [(WizardStep, StepStatus); TOTAL_STEPS] {
        self.shared.state.lock().steps.statuses()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.shared.state.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.shared.state.lock().submitting
    }

    /// Read access to the draft. Do not call wizard methods from inside `f`.
    pub fn with_draft<T>(&self, f: impl FnOnce(&DraftProduct) -> T) -> T {
        f(&self.shared.state.lock().draft)
    }

    pub fn pending_uploads(&self) -> usize {
        self.with_draft(|draft| {
            draft
                .attachments()
                .filter(|attachment| attachment.is_uploading())
                .count()
        })
    }

    pub fn failed_uploads(&self) -> Vec<AttachmentId> {
        self.with_draft(|draft| {
            draft
                .attachments()
                .filter(|attachment| attachment.upload_failed())
                .map(ImageAttachment::id)
                .collect()
        })
    }

    /// Validates the current step only and moves forward if it passes
    pub fn go_to_next_step(&self) -> Result<Navigation, WizardError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        state.ensure_editable()?;

        let current = state.steps.current();
        if current.next().is_none() {
            return Ok(Navigation::Unchanged);
        }

        let errors = validate_step(current, &state.draft, &state.context(&self.shared.deps.config));
        if !errors.is_empty() {
            tracing::debug!("Step {} blocked by {} field errors", current, errors.len());
            state.errors = errors;
            return Ok(Navigation::Blocked(current));
        }

        state.errors = FieldErrors::new();
        Ok(match state.steps.advance() {
            Some(next) => {
                tracing::debug!("Moved from {} to {}", current, next);
                Navigation::Moved(next)
            }
            None => Navigation::Unchanged,
        })
    }

    /// Always allowed; values entered so far are kept
    pub fn go_to_previous_step(&self) -> Result<Navigation, WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        Ok(match state.steps.retreat() {
            Some(previous) => {
                tracing::debug!("Moved back to {}", previous);
                Navigation::Moved(previous)
            }
            None => Navigation::Unchanged,
        })
    }

    /// Jumping back is unconditional. Jumping forward first validates every step
    /// up to and including the current one, stopping at the first failure.
    pub fn go_to_step(&self, target: WizardStep) -> Result<Navigation, WizardError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        state.ensure_editable()?;

        let current = state.steps.current();
        if target == current {
            return Ok(Navigation::Unchanged);
        }

        if target > current {
            for step in WizardStep::ALL.into_iter().filter(|step| *step <= current) {
                let errors =
                    validate_step(step, &state.draft, &state.context(&self.shared.deps.config));
                if !errors.is_empty() {
                    tracing::debug!("Jump to {} blocked at {}", target, step);
                    state.errors = errors;
                    return Ok(Navigation::Blocked(step));
                }
            }
            state.errors = FieldErrors::new();
        }

        state.steps.jump_to(target);
        tracing::debug!("Jumped from {} to {}", current, target);
        Ok(Navigation::Moved(target))
    }

    pub fn update_field(&self, update: FieldUpdate) -> Result<(), WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        tracing::trace!("Updating {}", update.field_name());
        state.draft.apply(update);
        Ok(())
    }

    pub fn update_array_field(&self, field: ArrayField, raw: &str) -> Result<(), WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        state.draft.set_array_field(field, raw);
        Ok(())
    }

    pub fn update_additional_info(&self, key: &str, value: &str) -> Result<(), WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        state.draft.set_additional_info(key, value);
        Ok(())
    }

    /// Sets the cover image, releasing the preview of the one it replaces
    pub fn select_cover_image(&self, file: ImageFile) -> Result<AttachmentId, WizardError> {
        let (id, upload) = {
            let mut state = self.shared.state.lock();
            state.ensure_editable()?;

            let attachment = ImageAttachment::local(file.clone(), &self.shared.deps.previews);
            let id = attachment.id();
            if let Some(replaced) = state.draft.cover_image.replace(attachment) {
                tracing::debug!("Cover image {} replaced by {}", replaced.id(), id);
            }
            (id, file)
        };

        tracing::info!("Selected cover image {} ({})", upload.file_name, id);
        self.spawn_upload(id, upload);
        Ok(id)
    }

    /// Appends files to the gallery, each with its own upload
    pub fn select_images(&self, files: Vec<ImageFile>) -> Result<Vec<AttachmentId>, WizardError> {
        let selected: Vec<(AttachmentId, ImageFile)> = {
            let mut state = self.shared.state.lock();
            state.ensure_editable()?;

            files
                .into_iter()
                .map(|file| {
                    let attachment =
                        ImageAttachment::local(file.clone(), &self.shared.deps.previews);
                    let id = attachment.id();
                    state.draft.images.push(attachment);
                    (id, file)
                })
                .collect()
        };

        tracing::info!("Selected {} gallery images", selected.len());
        Ok(selected
            .into_iter()
            .map(|(id, file)| {
                self.spawn_upload(id, file);
                id
            })
            .collect())
    }

    fn spawn_upload(&self, id: AttachmentId, file: ImageFile) {
        let weak: Weak<Shared<R, C>> = Arc::downgrade(&self.shared);
        let uploader = Arc::clone(&self.shared.deps.uploader);
        tokio::spawn(async move {
            let result = uploader.upload(&file).await;
            match weak.upgrade() {
                Some(shared) => shared.settle_upload(id, result),
                None => tracing::debug!("Product form closed before {} finished uploading", id),
            }
        });
    }

    pub fn remove_image(&self, index: usize) -> Result<(), WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        let len = state.draft.images.len();
        if index >= len {
            return Err(WizardError::ImageIndexOutOfRange { index, len });
        }

        let removed = state.draft.images.remove(index);
        tracing::debug!("Removed gallery image {}", removed.id());
        Ok(())
    }

    /// Returns whether there was a cover image to remove
    pub fn remove_cover_image(&self) -> Result<bool, WizardError> {
        let mut state = self.shared.state.lock();
        state.ensure_editable()?;

        Ok(match state.draft.cover_image.take() {
            Some(removed) => {
                tracing::debug!("Removed cover image {}", removed.id());
                true
            }
            None => false,
        })
    }

    /// Runs every step's rules and replaces the field errors with the result
    pub fn validate_all(&self) -> bool {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let errors = validate_all(&state.draft, &state.context(&self.shared.deps.config));
        let valid = errors.is_empty();
        state.errors = errors;
        valid
    }

    /// Validates the whole draft and sends it as one payload.
    ///
    /// Only legal from the last step. On invalid data nothing is sent and the form
    /// moves to the first step with errors. Repository errors are returned as-is and
    /// the draft is kept for another attempt.
    pub async fn submit(&self) -> Result<SubmitOutcome, WizardError> {
        let (mode, submission) = match self.prepare_submission()? {
            Ok(prepared) => prepared,
            Err(outcome) => return Ok(outcome),
        };

        tracing::info!("Submitting product {}", submission.name);
        let in_flight = SubmittingGuard {
            state: &self.shared.state,
        };
        let repository = &self.shared.deps.repository;
        let result = match &mode {
            FormMode::Create => repository.add(submission).await,
            FormMode::Edit(id) => repository.update(id, submission).await,
        };
        drop(in_flight);

        let mut state = self.shared.state.lock();

        match result {
            Ok(record) => {
                tracing::info!("Product {} saved", record.id);
                state.draft = DraftProduct::default();
                self.shared.set_phase(&mut state, FormPhase::Completed(record.clone()));
                Ok(SubmitOutcome::Saved(record))
            }
            Err(e) => {
                tracing::error!("Error saving product: {}", e);
                Err(WizardError::Repository(e))
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn prepare_submission(
        &self,
    ) -> Result<Result<(FormMode, ProductSubmission), SubmitOutcome>, WizardError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        state.ensure_editable()?;

        if state.submitting {
            tracing::debug!("Submission already in flight");
            return Ok(Err(SubmitOutcome::AlreadySubmitting));
        }

        if !state.steps.current().is_last() {
            return Err(WizardError::NotOnFinalStep);
        }

        let errors = validate_all(&state.draft, &state.context(&self.shared.deps.config));
        let submission = match errors.first_step() {
            Some(_) => Err(errors),
            None => ProductSubmission::try_from(&state.draft),
        };

        match submission {
            Ok(submission) => {
                state.errors = FieldErrors::new();
                state.submitting = true;
                Ok(Ok((state.mode.clone(), submission)))
            }
            Err(errors) => {
                let step = errors.first_step().unwrap_or_else(WizardStep::first);
                tracing::warn!(
                    "Submission rejected, {} field errors, first at {}",
                    errors.len(),
                    step
                );
                state.steps.jump_to(step);
                state.errors = errors.clone();
                Ok(Err(SubmitOutcome::Invalid { step, errors }))
            }
        }
    }
}

/// Clears the in-flight flag when dropped, including when the `submit` future
/// is abandoned while the repository call is pending
struct SubmittingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().submitting = false;
    }
}

impl<R, C> Drop for ProductWizard<R, C> {
    fn drop(&mut self) {
        tracing::debug!("Product form closed");
    }
}
