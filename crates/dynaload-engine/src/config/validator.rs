//! Semantic validation for parsed job configuration values.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::config::types::JobConfig;
use crate::encoding;
use crate::store::MAX_BATCH_WRITE_ITEMS;

/// Validate a parsed job configuration.
/// Returns `Ok(())` if valid, Err with all validation errors if not.
///
/// Unknown attribute type tags are not errors: their values pass through as
/// text. They are logged as warnings.
///
/// # Errors
///
/// Returns an error listing all validation failures found in the job config.
pub fn validate_job(config: &JobConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(format!(
            "Unsupported job version '{}', expected '1.0'",
            config.version
        ));
    }

    if config.job.trim().is_empty() {
        errors.push("Job name must not be empty".to_string());
    }

    if config.source.path.as_os_str().is_empty() {
        errors.push("Source path must not be empty".to_string());
    }

    if config.source.delimiter_byte().is_none() {
        errors.push(format!(
            "Delimiter '{}' must be exactly one ASCII character",
            config.source.delimiter.escape_debug()
        ));
    }

    if encoding::resolve_label(&config.source.encoding).is_none() {
        errors.push(format!("Unknown encoding '{}'", config.source.encoding));
    }

    for (name, ty) in &config.source.attribute_types {
        if name.is_empty() {
            errors.push("attribute_types contains an empty column name".to_string());
        }
        if !ty.is_known() {
            tracing::warn!(
                attribute = %name,
                type_tag = ty.tag(),
                "Unknown attribute type, values pass through as text"
            );
        }
    }

    if config.destination.table.trim().is_empty() {
        errors.push("Destination table must not be empty".to_string());
    }

    let batch_size = config.destination.batch_size;
    if batch_size == 0 || batch_size > MAX_BATCH_WRITE_ITEMS {
        errors.push(format!(
            "batch_size must be between 1 and {MAX_BATCH_WRITE_ITEMS}, got {batch_size}"
        ));
    }

    let mut seen = HashSet::new();
    for name in &config.destination.primary_key {
        if name.trim().is_empty() {
            errors.push("primary_key contains an empty attribute name".to_string());
        } else if !seen.insert(name.as_str()) {
            errors.push(format!("primary_key lists '{name}' more than once"));
        }
    }
    if config.destination.primary_key.len() > 2 {
        errors.push(format!(
            "primary_key has {} attributes, a table key has at most 2",
            config.destination.primary_key.len()
        ));
    }

    if !config.destination.config.is_null() && !config.destination.config.is_object() {
        errors.push("destination.config must be a mapping".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Job validation failed:\n  - {}", errors.join("\n  - "))
    }
}
