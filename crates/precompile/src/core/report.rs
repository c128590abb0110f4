use crate::{core::sample::Trial, error::Error};

/// The verdict on one trial.
#[derive(Debug)]
pub struct TrialRecord {
    /// The trial that ran.
    pub trial: Trial,
    /// `Ok` if the VM agreed with the reference.
    pub outcome: Result<(), Error>,
}

impl TrialRecord {
    /// Returns true if the VM agreed with the reference.
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns true if this trial reached a verdict, agreeing or not.
    pub fn executed(&self) -> bool {
        !matches!(self.outcome, Err(Error::TrialPanicked { .. }))
    }
}

/// Everything one differential run did.
#[derive(Debug)]
pub struct EcMulReport {
    /// The base seed the random trials were drawn from.
    pub seed: u64,
    /// The number of trials planned, edge cases included.
    pub planned: usize,
    /// One record per planned trial, in plan order.
    pub records: Vec<TrialRecord>,
}

impl EcMulReport {
    /// Trials that reached a verdict.
    pub fn executed(&self) -> usize {
        self.records.iter().filter(|record| record.executed()).count()
    }

    /// Trials on which the VM agreed with the reference.
    pub fn passed(&self) -> usize {
        self.records.iter().filter(|record| record.passed()).count()
    }

    /// Records of the trials that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &TrialRecord> {
        self.records.iter().filter(|record| !record.passed())
    }

    /// Returns true if every planned trial was executed and passed.
    pub fn is_success(&self) -> bool {
        self.executed() == self.planned && self.passed() == self.planned
    }

    /// Turns the report into the run's verdict: the first failing trial's error, or
    /// [`Error::Incomplete`] if trials are missing.
    pub fn into_result(mut self) -> Result<EcMulReport, Error> {
        let (executed, planned) = (self.executed(), self.planned);
        if executed != planned {
            return Err(Error::Incomplete { executed, planned });
        }

        if let Some(position) = self.records.iter().position(|record| !record.passed()) {
            if let Err(err) = self.records.swap_remove(position).outcome {
                return Err(err);
            }
        }
        Ok(self)
    }
}
