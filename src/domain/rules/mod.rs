// Domain rules - Form validation policy

use std::num::IntErrorKind;
use std::path::PathBuf;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Turns raw form state into validated job parameters.
///
/// Validation is pure and runs once per batch. Every field is checked so the
/// caller can show all problems at once; any single violation rejects the
/// whole form.
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validate the form, returning parameters or every violation found
    pub fn validate(form: &JobForm) -> Result<JobParameters, ValidationErrors> {
        let mut errors = Vec::new();

        let frame_rate = Self::collect(&mut errors, positive_int(FormField::FrameRate, &form.frame_rate));
        let start_time = Self::collect(&mut errors, start_time(&form.start_time));
        let duration = Self::collect(&mut errors, duration(&form.duration));

        let size = match form.size_mode {
            SizeChoice::Original => Some(SizeMode::Original),
            SizeChoice::Custom => {
                let width = Self::collect(&mut errors, positive_int(FormField::Width, &form.width));
                let height = Self::collect(&mut errors, height(&form.height));
                match (width, height) {
                    (Some(width), Some(height)) => Some(SizeMode::Custom { width, height }),
                    _ => None,
                }
            }
        };

        let output = match form.output_mode {
            OutputChoice::Same => Some(OutputTarget::SameDirectoryAsInput),
            OutputChoice::Custom => {
                let dir = form.output_directory.trim();
                if dir.is_empty() {
                    errors.push(ValidationError::Missing {
                        field: FormField::OutputDirectory,
                    });
                    None
                } else {
                    Some(OutputTarget::Directory(PathBuf::from(dir)))
                }
            }
        };

        match (frame_rate, start_time, duration, size, output) {
            (Some(frame_rate), Some(start_time_seconds), Some(duration_seconds), Some(size), Some(output))
                if errors.is_empty() =>
            {
                Ok(JobParameters {
                    size,
                    frame_rate,
                    frame_rate_is_default: form.frame_rate == DEFAULT_GIF_FRAME_RATE.to_string(),
                    start_time_seconds,
                    duration_seconds,
                    quality: form.quality,
                    output,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }

    fn collect<T>(errors: &mut Vec<ValidationError>, checked: Result<T, ValidationError>) -> Option<T> {
        match checked {
            Ok(value) => Some(value),
            Err(e) => {
                errors.push(e);
                None
            }
        }
    }
}

/// Integer strictly greater than zero
fn positive_int(field: FormField, raw: &str) -> Result<u32, ValidationError> {
    let too_large = ValidationError::TooLarge { field, max: u32::MAX };
    let value: i64 = match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow => too_large,
                IntErrorKind::NegOverflow => ValidationError::NotPositive { field },
                _ => ValidationError::NotANumber {
                    field,
                    value: raw.to_string(),
                },
            })
        }
    };
    if value <= 0 {
        return Err(ValidationError::NotPositive { field });
    }
    u32::try_from(value).map_err(|_| too_large)
}

/// Real number, non-negative; an empty field means 0
fn start_time(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value = finite_real(FormField::StartTime, raw)?;
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: FormField::StartTime,
        });
    }
    Ok(value)
}

/// Optional real number, strictly positive when present
fn duration(raw: &str) -> Result<Option<f64>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = finite_real(FormField::Duration, raw)?;
    if value <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: FormField::Duration,
        });
    }
    Ok(Some(value))
}

/// Exactly `auto`, or a positive integer
fn height(raw: &str) -> Result<Height, ValidationError> {
    if raw == "auto" {
        return Ok(Height::Auto);
    }
    positive_int(FormField::Height, raw).map(Height::Pixels)
}

fn finite_real(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}
