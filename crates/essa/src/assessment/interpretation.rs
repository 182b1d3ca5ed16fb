use super::cell::Score;
use super::domain::ScaleOrientation;
use serde::Serialize;
use std::borrow::Cow;

const BAND_TOLERANCE: f64 = 1e-9;

/// Qualitative label for averages up to and including `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretationBand {
    pub label: Cow<'static, str>,
    pub upper: f64,
    pub explanation: Cow<'static, str>,
}

impl InterpretationBand {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        upper: f64,
        explanation: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            upper,
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandTableError {
    #[error("band table must not be empty")]
    Empty,
    #[error("band '{label}' upper bound {upper} does not follow the previous bound")]
    NotAscending { label: String, upper: f64 },
    #[error("band table ends at {0}, expected it to reach {max}", max = Score::MAX)]
    DoesNotCoverScale(f64),
    #[error("band table starts at {0}, expected the first band to end within the scale")]
    StartsOutsideScale(f64),
}

/// Ordered bands mapping an average on the 1-5 scale to a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable {
    bands: Vec<InterpretationBand>,
}

impl BandTable {
    /// Validates that bounds ascend and the last band reaches the top of the scale.
    pub fn new(bands: Vec<InterpretationBand>) -> Result<Self, BandTableError> {
        let first = bands.first().ok_or(BandTableError::Empty)?;
        let min = f64::from(Score::MIN);
        let max = f64::from(Score::MAX);
        if first.upper < min - BAND_TOLERANCE || first.upper > max + BAND_TOLERANCE {
            return Err(BandTableError::StartsOutsideScale(first.upper));
        }

        for pair in bands.windows(2) {
            if pair[1].upper <= pair[0].upper {
                return Err(BandTableError::NotAscending {
                    label: pair[1].label.to_string(),
                    upper: pair[1].upper,
                });
            }
        }

        let last = bands.last().map(|band| band.upper).unwrap_or(min);
        if last + BAND_TOLERANCE < max {
            return Err(BandTableError::DoesNotCoverScale(last));
        }

        Ok(Self { bands })
    }

    /// 1 = Much Worse ... 5 = Much Better.
    pub fn higher_is_better() -> Self {
        Self {
            bands: vec![
                InterpretationBand::new("Much Worse", 1.0, "Leads to a measurable worsening"),
                InterpretationBand::new("Worse", 2.0, "Might lead to a measurable worsening"),
                InterpretationBand::new("Equal", 3.0, "No measurable change"),
                InterpretationBand::new("Better", 4.0, "Might lead to a measurable improvement"),
                InterpretationBand::new("Much Better", 5.0, "Leads to a measurable improvement"),
            ],
        }
    }

    /// 1 = Much Better ... 5 = Much Worse.
    pub fn lower_is_better() -> Self {
        Self {
            bands: vec![
                InterpretationBand::new("Much Better", 1.0, "Leads to a measurable improvement"),
                InterpretationBand::new("Better", 2.0, "Might lead to a measurable improvement"),
                InterpretationBand::new("Equal", 3.0, "No measurable change"),
                InterpretationBand::new("Worse", 4.0, "Might lead to a measurable worsening"),
                InterpretationBand::new("Much Worse", 5.0, "Leads to a measurable worsening"),
            ],
        }
    }

    /// Built-in table for an orientation; unconfirmed scales have none.
    pub fn for_orientation(orientation: ScaleOrientation) -> Option<Self> {
        match orientation {
            ScaleOrientation::HigherIsBetter => Some(Self::higher_is_better()),
            ScaleOrientation::LowerIsBetter => Some(Self::lower_is_better()),
            ScaleOrientation::Unconfirmed => None,
        }
    }

    pub fn bands(&self) -> &[InterpretationBand] {
        &self.bands
    }

    /// First band whose upper bound is at least `value`.
    pub fn interpret(&self, value: f64) -> Option<&InterpretationBand> {
        if value.is_nan() {
            return None;
        }
        self.bands
            .iter()
            .find(|band| value <= band.upper + BAND_TOLERANCE)
    }

    pub fn label(&self, value: f64) -> &str {
        self.interpret(value)
            .map(|band| band.label.as_ref())
            .unwrap_or("n/a")
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::higher_is_better()
    }
}
