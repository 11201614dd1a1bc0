use crate::domain::model::DracoSettings;
use crate::utils::error::{CompressError, Result};

pub const MAX_COMPRESSION_LEVEL: u8 = 10;
pub const MIN_QUANTIZATION_BITS: u8 = 1;
pub const MAX_QUANTIZATION_BITS: u8 = 30;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CompressError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CompressError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CompressError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CompressError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| CompressError::MissingConfigError {
            field: field_name.to_string(),
        })
}

impl Validate for DracoSettings {
    fn validate(&self) -> Result<()> {
        validate_range(
            "compression_level",
            self.compression_level,
            0,
            MAX_COMPRESSION_LEVEL,
        )?;

        let bits = [
            ("quantize_position_bits", Some(self.quantize_position_bits)),
            ("quantize_texcoord_bits", Some(self.quantize_texcoord_bits)),
            ("quantize_normal_bits", self.quantize_normal_bits),
        ];
        for (field, value) in bits {
            if let Some(value) = value {
                validate_range(field, value, MIN_QUANTIZATION_BITS, MAX_QUANTIZATION_BITS)?;
            }
        }

        Ok(())
    }
}
