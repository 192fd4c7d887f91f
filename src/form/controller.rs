//! Form State Controller
//!
//! Owns the active schema, the current values, the current field errors
//! and the submission phase. It is the only mutation surface the view
//! layer gets:
//! - `on_value_change`: store a value and revalidate that one field
//! - `on_submit` / `on_submit_complete`: the two halves of a submission
//! - `reset` / `load_schema`: replace the schema and clear derived state
//!
//! Events arrive one at a time from a single caller. The submit effect is
//! the only suspension point; its completion comes back through
//! `on_submit_complete` like any other event.

use serde::Serialize;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::schema::{SchemaLoader, SchemaModel, SchemaResult, StructuralError};
use crate::validation::{validate_field, validate_form, FieldErrors, FormValues};

use super::errors::{FormError, FormResult};
use super::state::SubmissionPhase;
use super::submit::{Completion, SubmitDecision, SubmitEffect, SubmitFailure, SubmitOutcome, SubmitTicket};

/// Read-only view of the controller for the view layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub schema: SchemaModel,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub phase: SubmissionPhase,
    /// Last rejected schema document, while the previous schema stays active
    pub load_error: Option<String>,
}

/// Form State Controller
pub struct FormStateController {
    schema: SchemaModel,
    values: FormValues,
    errors: FieldErrors,
    phase: SubmissionPhase,
    /// Bumped on every schema replacement; completions from older epochs are ignored
    epoch: u64,
    in_flight: Option<Uuid>,
    load_error: Option<StructuralError>,
    metrics: MetricsRegistry,
}

impl Default for FormStateController {
    fn default() -> Self {
        Self::new(SchemaModel::default())
    }
}

impl FormStateController {
    /// Create a controller in Idle with no values.
    pub fn new(schema: SchemaModel) -> Self {
        Self {
            schema,
            values: FormValues::new(),
            errors: FieldErrors::new(),
            phase: SubmissionPhase::Idle,
            epoch: 0,
            in_flight: None,
            load_error: None,
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn schema(&self) -> &SchemaModel {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of a field; untouched fields read as empty.
    pub fn value(&self, field_id: &str) -> &str {
        self.values.get(field_id).map(String::as_str).unwrap_or("")
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The error from the last rejected schema load, if no load has succeeded since.
    pub fn load_error(&self) -> Option<&StructuralError> {
        self.load_error.as_ref()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            schema: self.schema.clone(),
            values: self.values.clone(),
            errors: self.errors.clone(),
            phase: self.phase,
            load_error: self.load_error.as_ref().map(ToString::to_string),
        }
    }

    // =========================================================================
    // SCHEMA REPLACEMENT
    // =========================================================================

    /// Replace the schema and clear values, errors and phase.
    ///
    /// Valid in any phase. An in-flight submission is abandoned: its effect
    /// keeps running, but its completion will be ignored.
    pub fn reset(&mut self, new_schema: SchemaModel) {
        let abandoned = self.in_flight.take();

        self.schema = new_schema;
        self.values.clear();
        self.errors = FieldErrors::new();
        self.phase = SubmissionPhase::Idle;
        self.epoch += 1;
        self.load_error = None;

        let epoch = self.epoch.to_string();
        let abandoned = abandoned.map(|id| id.to_string()).unwrap_or_default();
        log_event_with_fields(
            Event::FormReset,
            &[("epoch", epoch.as_str()), ("abandoned_submission", abandoned.as_str())],
        );
    }

    /// Load a raw schema document.
    ///
    /// On success the new schema replaces the current one via `reset`. On
    /// failure the current schema, values, errors and phase are untouched
    /// and the error is kept for display.
    pub fn load_schema(&mut self, raw_text: &str) -> SchemaResult<()> {
        match SchemaLoader::load(raw_text) {
            Ok(schema) => {
                let field_count = schema.fields.len().to_string();
                log_event_with_fields(
                    Event::SchemaLoaded,
                    &[("title", schema.title.as_str()), ("fields", field_count.as_str())],
                );
                self.metrics.increment_schemas_loaded();
                self.reset(schema);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                log_event_with_fields(
                    Event::SchemaRejected,
                    &[("code", err.code()), ("message", message.as_str())],
                );
                self.metrics.increment_schemas_rejected();
                self.load_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // =========================================================================
    // EDITING
    // =========================================================================

    /// Store a new value and revalidate only that field.
    ///
    /// Valid in any phase. Returns the field's new error, if any.
    pub fn on_value_change(
        &mut self,
        field_id: &str,
        new_value: impl Into<String>,
    ) -> FormResult<Option<String>> {
        let descriptor = self
            .schema
            .field(field_id)
            .ok_or_else(|| FormError::unknown_field(field_id))?;

        let new_value = new_value.into();
        let outcome = validate_field(descriptor, &new_value);

        log_event_with_fields(
            Event::FieldValidated,
            &[("field", field_id), ("error", outcome.as_deref().unwrap_or(""))],
        );
        self.metrics.increment_value_changes();

        self.values.insert(field_id.to_string(), new_value);
        self.errors.set(field_id, outcome.clone());

        Ok(outcome)
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Request a submit.
    ///
    /// While a submission is in flight this is a no-op. Otherwise the whole
    /// form is validated and the result becomes the displayed errors; if
    /// every field passes the phase moves to Submitting and a ticket is
    /// issued for the submit effect.
    pub fn on_submit(&mut self) -> FormResult<SubmitDecision> {
        self.metrics.increment_submits_attempted();

        if self.phase.is_submitting() {
            log_event_with_fields(Event::SubmitIgnored, &[("phase", self.phase.name())]);
            self.metrics.increment_submits_ignored();
            return Ok(SubmitDecision::AlreadySubmitting);
        }

        let errors = validate_form(&self.schema, &self.values);
        self.errors = errors.clone();

        if !errors.is_valid() {
            let failing = errors.failures().count().to_string();
            log_event_with_fields(Event::SubmitRejected, &[("failing_fields", failing.as_str())]);
            self.metrics.increment_submits_rejected();
            return Ok(SubmitDecision::Rejected(errors));
        }

        self.phase = self.phase.begin_submit()?;

        let ticket = SubmitTicket::new(self.epoch, self.values.clone());
        self.in_flight = Some(ticket.id());

        let id = ticket.id().to_string();
        let field_count = ticket.values().len().to_string();
        log_event_with_fields(
            Event::SubmitStarted,
            &[("submission_id", id.as_str()), ("values", field_count.as_str())],
        );

        Ok(SubmitDecision::Ready(ticket))
    }

    /// Apply the submit effect's result.
    ///
    /// A ticket from an earlier schema, or one that is not the current
    /// in-flight submission, is ignored. Success clears values and errors;
    /// failure returns to Idle with values kept and reports `SubmitFailed`.
    pub fn on_submit_complete(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), SubmitFailure>,
    ) -> FormResult<Completion> {
        let id = ticket.id().to_string();

        if ticket.epoch() != self.epoch || self.in_flight != Some(ticket.id()) {
            let ticket_epoch = ticket.epoch().to_string();
            let epoch = self.epoch.to_string();
            log_event_with_fields(
                Event::StaleCompletionIgnored,
                &[
                    ("submission_id", id.as_str()),
                    ("ticket_epoch", ticket_epoch.as_str()),
                    ("epoch", epoch.as_str()),
                ],
            );
            self.metrics.increment_stale_completions();
            return Ok(Completion::Stale);
        }

        self.in_flight = None;
        let elapsed_ms = (chrono::Utc::now() - ticket.requested_at())
            .num_milliseconds()
            .to_string();

        match result {
            Ok(()) => {
                self.phase = self.phase.succeed()?;
                log_event_with_fields(
                    Event::SubmitSucceeded,
                    &[("submission_id", id.as_str()), ("elapsed_ms", elapsed_ms.as_str())],
                );
                self.metrics.increment_submits_succeeded();

                self.values.clear();
                self.errors = FieldErrors::new();
                self.phase = self.phase.acknowledge()?;

                Ok(Completion::Succeeded(ticket.id()))
            }
            Err(failure) => {
                self.phase = self.phase.fail()?;
                log_event_with_fields(
                    Event::SubmitFailed,
                    &[
                        ("submission_id", id.as_str()),
                        ("elapsed_ms", elapsed_ms.as_str()),
                        ("reason", failure.reason.as_str()),
                    ],
                );
                self.metrics.increment_submits_failed();

                Err(FormError::submit_failed(failure.reason))
            }
        }
    }

    /// Run a full submit cycle against an effect.
    ///
    /// Holds the controller for the duration of the effect, so no edits can
    /// interleave. Callers that must keep accepting edits while the effect
    /// runs drive `on_submit` and `on_submit_complete` themselves.
    pub async fn submit_with<E: SubmitEffect>(&mut self, effect: &E) -> FormResult<SubmitOutcome> {
        let ticket = match self.on_submit()? {
            SubmitDecision::Rejected(errors) => return Ok(SubmitOutcome::Rejected(errors)),
            SubmitDecision::AlreadySubmitting => return Ok(SubmitOutcome::AlreadySubmitting),
            SubmitDecision::Ready(ticket) => ticket,
        };

        let values = ticket.values().clone();
        let result = effect.submit(values.clone()).await;

        let completion = self.on_submit_complete(ticket, result)?;
        finished_outcome(completion, values)
    }
}

/// Maps the completion of a cycle that held the controller throughout.
/// Nothing can replace the schema mid-cycle, so a stale ticket is an
/// internal fault.
fn finished_outcome(completion: Completion, values: FormValues) -> FormResult<SubmitOutcome> {
    match completion {
        Completion::Succeeded(submission_id) => Ok(SubmitOutcome::Succeeded {
            submission_id,
            values,
        }),
        Completion::Stale => Err(FormError::forbidden_transition(
            SubmissionPhase::Submitting.name(),
            "stale completion",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::errors::ErrorKind;
    use crate::schema::{FieldDescriptor, FieldKind};
    use crate::validation::{INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contact_schema() -> SchemaModel {
        SchemaModel {
            title: "Contact".into(),
            description: "Get in touch".into(),
            fields: vec![
                FieldDescriptor::new("name", FieldKind::Text, "Name").required(),
                FieldDescriptor::new("email", FieldKind::Email, "Email"),
            ],
        }
    }

    struct CountingEffect {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingEffect {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl SubmitEffect for CountingEffect {
        async fn submit(&self, _values: FormValues) -> Result<(), SubmitFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SubmitFailure::new("upstream unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_value_change_revalidates_one_field() {
        let mut form = FormStateController::new(contact_schema());

        let outcome = form.on_value_change("email", "nope").unwrap();
        assert_eq!(outcome.as_deref(), Some(INVALID_EMAIL_MESSAGE));
        assert_eq!(form.errors().get("email"), Some(INVALID_EMAIL_MESSAGE));
        // untouched field is not revalidated
        assert!(!form.errors().contains("name"));

        form.on_value_change("email", "a@b.co").unwrap();
        assert_eq!(form.errors().get("email"), None);
        assert_eq!(form.value("email"), "a@b.co");
    }

    #[test]
    fn test_value_change_is_idempotent() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "").unwrap();
        let once = form.errors().clone();
        form.on_value_change("name", "").unwrap();
        assert_eq!(form.errors(), &once);
        assert_eq!(form.errors().get("name"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_unknown_field_changes_nothing() {
        let mut form = FormStateController::new(contact_schema());
        let err = form.on_value_change("nickname", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
        assert!(form.values().is_empty());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_empty_value_is_kept_in_map() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("email", "").unwrap();
        assert_eq!(form.values().get("email").map(String::as_str), Some(""));
    }

    #[test]
    fn test_submit_rejected_on_invalid_form() {
        let mut form = FormStateController::new(contact_schema());

        match form.on_submit().unwrap() {
            SubmitDecision::Rejected(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert_eq!(form.errors().get("name"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();

        let ticket = match form.on_submit().unwrap() {
            SubmitDecision::Ready(ticket) => ticket,
            other => panic!("unexpected decision: {:?}", other),
        };
        assert_eq!(form.phase(), SubmissionPhase::Submitting);
        assert_eq!(form.on_submit().unwrap(), SubmitDecision::AlreadySubmitting);

        // Edits keep flowing while submitting
        form.on_value_change("email", "ada@example.org").unwrap();
        assert_eq!(form.value("email"), "ada@example.org");
        assert_eq!(ticket.values().get("email"), None);

        let completion = form.on_submit_complete(ticket, Ok(())).unwrap();
        assert!(matches!(completion, Completion::Succeeded(_)));
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(form.values().is_empty());
        assert!(form.errors().is_empty());
        assert_eq!(form.metrics().snapshot().submits_ignored, 1);
    }

    #[test]
    fn test_failed_submit_keeps_values() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();

        let ticket = match form.on_submit().unwrap() {
            SubmitDecision::Ready(ticket) => ticket,
            other => panic!("unexpected decision: {:?}", other),
        };

        let err = form
            .on_submit_complete(ticket, Err(SubmitFailure::new("timeout")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SubmitFailed);
        assert_eq!(err.message(), "timeout");
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert_eq!(form.value("name"), "Ada");
        assert!(form.errors().get("name").is_none());
    }

    #[test]
    fn test_reset_abandons_in_flight_submission() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();

        let ticket = match form.on_submit().unwrap() {
            SubmitDecision::Ready(ticket) => ticket,
            other => panic!("unexpected decision: {:?}", other),
        };

        form.reset(contact_schema());
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        form.on_value_change("name", "Grace").unwrap();

        assert_eq!(form.on_submit_complete(ticket, Ok(())).unwrap(), Completion::Stale);
        assert_eq!(form.value("name"), "Grace");
        assert_eq!(form.metrics().snapshot().stale_completions, 1);
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();

        let ticket = match form.on_submit().unwrap() {
            SubmitDecision::Ready(ticket) => ticket,
            other => panic!("unexpected decision: {:?}", other),
        };

        form.on_submit_complete(ticket.clone(), Ok(())).unwrap();
        assert_eq!(form.on_submit_complete(ticket, Ok(())).unwrap(), Completion::Stale);
    }

    #[test]
    fn test_failed_load_keeps_previous_schema() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();

        let err = form.load_schema("{ broken").unwrap_err();
        assert!(matches!(err, StructuralError::MalformedDocument(_)));
        assert_eq!(form.schema().title, "Contact");
        assert_eq!(form.value("name"), "Ada");
        assert_eq!(form.load_error(), Some(&err));
        assert!(form.snapshot().load_error.is_some());

        form.load_schema(r#"{"formTitle": "New", "formDescription": "", "fields": []}"#)
            .unwrap();
        assert_eq!(form.schema().title, "New");
        assert!(form.load_error().is_none());
        assert!(form.values().is_empty());
        assert_eq!(form.epoch(), 1);
    }

    #[tokio::test]
    async fn test_submit_with_success() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();
        let effect = CountingEffect::new(false);

        match form.submit_with(&effect).await.unwrap() {
            SubmitOutcome::Succeeded { values, .. } => {
                assert_eq!(values.get("name").map(String::as_str), Some("Ada"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(effect.calls.load(Ordering::SeqCst), 1);
        assert!(form.values().is_empty());
    }

    #[tokio::test]
    async fn test_submit_with_invalid_form_skips_effect() {
        let mut form = FormStateController::new(contact_schema());
        let effect = CountingEffect::new(false);

        let outcome = form.submit_with(&effect).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(effect.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_with_failure() {
        let mut form = FormStateController::new(contact_schema());
        form.on_value_change("name", "Ada").unwrap();
        let effect = CountingEffect::new(true);

        let err = form.submit_with(&effect).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SubmitFailed);
        assert_eq!(form.value("name"), "Ada");
        assert_eq!(form.metrics().snapshot().submits_failed, 1);
    }

    #[test]
    fn test_stale_completion_ends_cycle_with_internal_error() {
        let err = finished_outcome(Completion::Stale, FormValues::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForbiddenTransition);

        let id = Uuid::new_v4();
        let outcome = finished_outcome(Completion::Succeeded(id), FormValues::new()).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Succeeded {
                submission_id: id,
                values: FormValues::new(),
            }
        );
    }
}
