//! Configuration loading
//!
//! Turns the parameter store into a ready [`ActuationPipeline`]. Validation
//! lives in the core crate; this layer registers defaults and logs what it
//! accepted or rejected.

use crate::core::logging::display;
use aero_mix_core::mixer::MixerKind;
use aero_mix_core::output::ConfigError;
use aero_mix_core::parameters::{self, ArmingParams, ParameterError, ParameterStore};
use aero_mix_core::ActuationPipeline;

/// Register every actuation parameter with its default
///
/// Existing values are kept, so this is safe to call on a store that was
/// already loaded from persistent storage.
pub fn register_parameters(store: &mut ParameterStore) -> Result<(), ParameterError> {
    parameters::register_all(store).map_err(|e| {
        crate::log_error!("Parameter registration failed: {}", display(&e).as_str());
        e
    })?;
    crate::log_debug!("Registered {} actuation parameters", store.len());
    Ok(())
}

/// Build the actuation pipeline from stored parameters
///
/// # Errors
///
/// Returns the first [`ConfigError`] found. The vehicle must not arm without
/// a pipeline.
pub fn load_pipeline(store: &ParameterStore) -> Result<ActuationPipeline, ConfigError> {
    let pipeline = parameters::build_pipeline(store).map_err(|e| {
        crate::log_error!("Mixer configuration rejected: {}", display(&e).as_str());
        e
    })?;

    let config = pipeline.engine().config();
    crate::log_info!(
        "Mixer configured: {} ({} motors)",
        config.airframe().name(),
        config.motor_count()
    );
    if config.kind() == MixerKind::Unmixed {
        crate::log_warn!(
            "{} has no mixer; motors stay at minimum command",
            config.airframe().name()
        );
    }

    Ok(pipeline)
}

/// Arming parameters for the control task
pub fn load_arming(store: &ParameterStore) -> ArmingParams {
    let params = ArmingParams::from_store(store);
    crate::log_debug!("Arming idle threshold: {}", params.idle_threshold);
    params
}
