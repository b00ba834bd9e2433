//! Cross-product matching of patients against trials.

use std::any::Any;
use std::borrow::Borrow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use ctm_model::{
    EligibilityVerdict, EligibleTrial, IssueKind, MatchOptions, MatchRun, PatientProfile,
    PatientResult, RunIssue, TrialCriteria,
};

use crate::evaluate::evaluate;

type PatientOutcome = Result<PatientResult, RunIssue>;

/// Evaluates every patient against every trial.
///
/// Patients are independent units of work. Trials are shared read-only, so
/// the only thing that varies between sequential and parallel runs is
/// throughput; results always follow patient input order, and each
/// patient's eligible trials follow trial input order.
#[derive(Debug, Clone, Default)]
pub struct MatchingOrchestrator {
    options: MatchOptions,
}

impl MatchingOrchestrator {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Eligible trials for one patient, in trial order.
    pub fn match_patient<T: Borrow<TrialCriteria>>(
        &self,
        patient: &PatientProfile,
        trials: &[T],
    ) -> PatientResult {
        collect_eligible(patient, trials, &evaluate)
    }

    pub fn run_all<T>(&self, patients: &[PatientProfile], trials: &[T]) -> MatchRun
    where
        T: Borrow<TrialCriteria> + Sync,
    {
        self.run_all_with(patients, trials, evaluate)
    }

    /// Runs the cross product with a custom per-pair decision.
    ///
    /// A panic inside `eval` fails only the patient being evaluated; it is
    /// reported as a [`IssueKind::PartialBatchFailure`] issue and that
    /// patient is left out of the results.
    pub fn run_all_with<T, F>(
        &self,
        patients: &[PatientProfile],
        trials: &[T],
        eval: F,
    ) -> MatchRun
    where
        T: Borrow<TrialCriteria> + Sync,
        F: Fn(&PatientProfile, &TrialCriteria) -> EligibilityVerdict + Sync,
    {
        let start = Instant::now();
        let outcomes = if self.options.parallel {
            self.run_parallel(patients, trials, &eval)
        } else {
            patients
                .iter()
                .map(|patient| evaluate_isolated(patient, trials, &eval))
                .collect()
        };

        let mut run = MatchRun::default();
        for outcome in outcomes {
            match outcome {
                Ok(result) => run.results.push(result),
                Err(issue) => run.issues.push(issue),
            }
        }

        info!(
            patient_count = patients.len(),
            trial_count = trials.len(),
            eligible_pairs = run.eligible_pair_count(),
            failed_patients = run.issues.len(),
            parallel = self.options.parallel,
            duration_ms = start.elapsed().as_millis(),
            "matching complete"
        );
        run
    }

    fn run_parallel<T, F>(
        &self,
        patients: &[PatientProfile],
        trials: &[T],
        eval: &F,
    ) -> Vec<PatientOutcome>
    where
        T: Borrow<TrialCriteria> + Sync,
        F: Fn(&PatientProfile, &TrialCriteria) -> EligibilityVerdict + Sync,
    {
        let work = || -> Vec<PatientOutcome> {
            patients
                .par_iter()
                .map(|patient| evaluate_isolated(patient, trials, eval))
                .collect()
        };

        let Some(threads) = self.options.threads else {
            return work();
        };
        match ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(work),
            Err(error) => {
                warn!(threads, %error, "failed to build worker pool; using global pool");
                work()
            }
        }
    }
}

fn collect_eligible<T, F>(patient: &PatientProfile, trials: &[T], eval: &F) -> PatientResult
where
    T: Borrow<TrialCriteria>,
    F: Fn(&PatientProfile, &TrialCriteria) -> EligibilityVerdict,
{
    let mut result = PatientResult::new(patient.patient_id.clone());
    for trial in trials {
        let verdict = eval(patient, trial.borrow());
        debug!(
            patient_id = %patient.patient_id,
            trial_id = %verdict.trial_id,
            eligible = verdict.eligible,
            reason = verdict.reason.as_ref().map(ToString::to_string),
            "verdict"
        );
        if let Some(eligible) = EligibleTrial::from_verdict(verdict) {
            result.eligible_trials.push(eligible);
        }
    }
    result
}

fn evaluate_isolated<T, F>(patient: &PatientProfile, trials: &[T], eval: &F) -> PatientOutcome
where
    T: Borrow<TrialCriteria>,
    F: Fn(&PatientProfile, &TrialCriteria) -> EligibilityVerdict,
{
    catch_unwind(AssertUnwindSafe(|| collect_eligible(patient, trials, eval))).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(patient_id = %patient.patient_id, %message, "patient evaluation failed");
        RunIssue::new(
            IssueKind::PartialBatchFailure,
            patient.patient_id.clone(),
            format!("evaluation aborted: {message}"),
        )
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
