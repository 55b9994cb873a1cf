use crate::translated::TranslatedError;

/// Result of running one computation under a bridge.
///
/// The variant is the discriminator: an error value exists only inside
/// [`Outcome::Failed`], so there is no slot to read on the success path.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an Outcome reports whether the computation raised"]
pub enum Outcome {
    Succeeded,
    Failed(TranslatedError),
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    #[must_use]
    pub fn error(&self) -> Option<&TranslatedError> {
        match self {
            Outcome::Succeeded => None,
            Outcome::Failed(err) => Some(err),
        }
    }

    #[must_use]
    pub fn into_error(self) -> Option<TranslatedError> {
        match self {
            Outcome::Succeeded => None,
            Outcome::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(), TranslatedError> {
        match self {
            Outcome::Succeeded => Ok(()),
            Outcome::Failed(err) => Err(err),
        }
    }

    /// Flag-plus-out-error form of this outcome.
    ///
    /// Writes `slot` only when failed; on success the slot keeps whatever the
    /// caller left in it.
    pub fn report_into(self, slot: &mut Option<TranslatedError>) -> bool {
        match self {
            Outcome::Succeeded => true,
            Outcome::Failed(err) => {
                *slot = Some(err);
                false
            }
        }
    }
}

impl From<Outcome> for Result<(), TranslatedError> {
    fn from(outcome: Outcome) -> Self {
        outcome.into_result()
    }
}
