use crate::error::{Result, SlamError};
use crate::scoring::{self, ValidationError};
use crate::types::score::{CalculationResult, Score};

pub const MIN_JUDGES: usize = 3;
pub const MAX_JUDGES: usize = 15;

/// One judge slot holding the text exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreField {
    raw: String,
}

impl ScoreField {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    /// Validation for the keystroke path. Leaves the text untouched.
    pub fn preview(&self) -> std::result::Result<Score, ValidationError> {
        scoring::validate(&self.raw)
    }

    /// Rewrites the text into canonical form, as happens when the user
    /// leaves the field. Returns true if the text changed.
    pub fn leave(&mut self) -> bool {
        if self.raw.trim().is_empty() {
            return false;
        }
        let canonical = scoring::canonicalize(&self.raw);
        if canonical == self.raw {
            return false;
        }
        self.raw = canonical;
        true
    }
}

/// Ordered judge slots, between [`MIN_JUDGES`] and [`MAX_JUDGES`] of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgePanel {
    fields: Vec<ScoreField>,
}

impl JudgePanel {
    pub fn new(judges: usize) -> Result<Self> {
        check_size(judges)?;
        Ok(Self {
            fields: vec![ScoreField::default(); judges],
        })
    }

    /// Builds a panel from raw texts, one per judge.
    pub fn from_raw<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = raw.into_iter().map(ScoreField::new).collect::<Vec<_>>();
        check_size(fields.len())?;
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[ScoreField] {
        &self.fields
    }

    pub fn field(&self, slot: usize) -> Option<&ScoreField> {
        self.fields.get(slot)
    }

    /// Appends an empty slot. Returns false at the upper bound.
    pub fn add_judge(&mut self) -> bool {
        if self.fields.len() >= MAX_JUDGES {
            return false;
        }
        self.fields.push(ScoreField::default());
        true
    }

    /// Drops the last slot. Returns false at the lower bound.
    pub fn remove_judge(&mut self) -> bool {
        if self.fields.len() <= MIN_JUDGES {
            return false;
        }
        self.fields.pop();
        true
    }

    /// Grows the panel until it has at least `judges` slots, within bounds.
    pub fn ensure_len(&mut self, judges: usize) {
        while self.fields.len() < judges.min(MAX_JUDGES) {
            self.fields.push(ScoreField::default());
        }
    }

    pub fn set_raw(&mut self, slot: usize, raw: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .get_mut(slot)
            .ok_or(SlamError::UnknownSlot(slot + 1))?;
        field.set_raw(raw);
        Ok(())
    }

    pub fn preview(&self, slot: usize) -> Option<std::result::Result<Score, ValidationError>> {
        self.fields.get(slot).map(ScoreField::preview)
    }

    pub fn leave_field(&mut self, slot: usize) -> Option<bool> {
        self.fields.get_mut(slot).map(ScoreField::leave)
    }

    /// Every slot's score, or the slots that are empty or invalid.
    pub fn scores(&self) -> Result<Vec<Score>> {
        let mut scores = Vec::with_capacity(self.fields.len());
        let mut failed = Vec::new();
        for (slot, field) in self.fields.iter().enumerate() {
            match field.preview() {
                Ok(score) => scores.push(score),
                Err(_) => failed.push(slot),
            }
        }
        if failed.is_empty() {
            Ok(scores)
        } else {
            Err(SlamError::IncompleteOrInvalidPanel { slots: failed })
        }
    }

    pub fn calculate(&self, participant_name: &str) -> Result<CalculationResult> {
        let scores = self.scores()?;
        scoring::aggregate(&scores, participant_name)
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|field| field.preview().is_ok())
    }

    /// Clears every slot's text, keeping the panel size.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.set_raw(String::new());
        }
    }
}

fn check_size(judges: usize) -> Result<()> {
    if (MIN_JUDGES..=MAX_JUDGES).contains(&judges) {
        Ok(())
    } else {
        Err(SlamError::PanelSize {
            actual: judges,
            min: MIN_JUDGES,
            max: MAX_JUDGES,
        })
    }
}
