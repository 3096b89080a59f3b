//! Pipeline construction from stored parameters
//!
//! Reads every parameter group, checks the values that the engine relies on
//! and assembles an [`ActuationPipeline`]. Nothing is checked again once the
//! pipeline runs.

use super::arming::ArmingParams;
use super::channel::ChannelParams;
use super::custom::CustomMixerParams;
use super::error::ParameterError;
use super::fixed_wing::FixedWingParams;
use super::gimbal::GimbalParams;
use super::mixer::MixerParams;
use super::storage::ParameterStore;
use crate::mixer::{MixerConfiguration, MixerSettings, ServoRange};
use crate::output::{ChannelMap, ConfigError, PULSE_MAX_US, PULSE_MIN_US};
use crate::pipeline::ActuationPipeline;

/// Register every parameter group with its defaults
pub fn register_all(store: &mut ParameterStore) -> Result<(), ParameterError> {
    MixerParams::register_defaults(store)?;
    ChannelParams::register_defaults(store)?;
    FixedWingParams::register_defaults(store)?;
    GimbalParams::register_defaults(store)?;
    CustomMixerParams::register_defaults(store)?;
    ArmingParams::register_defaults(store)?;
    Ok(())
}

/// Validated mixer settings from stored parameters
///
/// # Errors
///
/// `InvalidParameter` naming the first parameter whose value the engine
/// cannot use.
pub fn mixer_settings(store: &ParameterStore) -> Result<MixerSettings, ConfigError> {
    check_flags(store, "MIX_FEATURES")?;
    check_flags(store, "GMB_FLAGS")?;
    let mixer = MixerParams::from_store(store);

    if mixer.yaw_direction != 1 && mixer.yaw_direction != -1 {
        return Err(ConfigError::InvalidParameter {
            name: "MIX_YAW_DIR",
        });
    }
    if !pulse_in_range(mixer.mid_rc) {
        return Err(ConfigError::InvalidParameter { name: "RC_MID" });
    }

    let throttle = mixer.throttle;
    if !pulse_in_range(throttle.min_command as i32) {
        return Err(ConfigError::InvalidParameter { name: "THR_MINCMD" });
    }
    if !pulse_in_range(throttle.min_throttle as i32) {
        return Err(ConfigError::InvalidParameter { name: "THR_MIN" });
    }
    if !pulse_in_range(throttle.max_throttle as i32) || throttle.max_throttle < throttle.min_throttle
    {
        return Err(ConfigError::InvalidParameter { name: "THR_MAX" });
    }
    if !pulse_in_range(throttle.min_check as i32) {
        return Err(ConfigError::InvalidParameter { name: "THR_MINCHK" });
    }

    check_range(&mixer.tricopter, "TRI_YAW_MID")?;
    check_range(&mixer.bicopter, "BI_SRV_MID")?;

    let gimbal = GimbalParams::from_store(store).settings;
    check_range(&gimbal.pitch, "GMB_P_MID")?;
    check_range(&gimbal.roll, "GMB_R_MID")?;

    Ok(MixerSettings {
        yaw_direction: mixer.yaw_direction as i8,
        mid_rc: mixer.mid_rc as u16,
        features: mixer.features,
        throttle,
        tricopter: mixer.tricopter,
        bicopter: mixer.bicopter,
        gimbal,
        elevon: mixer.elevon,
        fixed_wing: FixedWingParams::from_store(store).to_settings()?,
    })
}

/// Build the actuation pipeline from stored parameters
///
/// # Errors
///
/// - `Mixer` for an unknown airframe selection
/// - `Parameter` if an indexed parameter name cannot be formed
/// - `InvalidParameter` for an unusable mixer or fixed-wing value
/// - any channel error from `ChannelMap::new`
pub fn build_pipeline(store: &ParameterStore) -> Result<ActuationPipeline, ConfigError> {
    let settings = mixer_settings(store)?;
    let frame = MixerParams::from_store(store).frame;
    let custom = CustomMixerParams::from_store(store)?;
    let config = MixerConfiguration::resolve(frame, &custom.mixer, settings.features)?;

    let channel_params = ChannelParams::from_store(store)?;
    let channels = ChannelMap::new(
        channel_params.to_configs()?,
        channel_params.motor_min_pulse(),
    )?;

    Ok(ActuationPipeline::new(config, settings, channels))
}

fn pulse_in_range(value: i32) -> bool {
    (PULSE_MIN_US as i32..=PULSE_MAX_US as i32).contains(&value)
}

/// Flag words are stored as `u8`; wider values are rejected rather than truncated
fn check_flags(store: &ParameterStore, name: &'static str) -> Result<(), ConfigError> {
    match u8::try_from(store.int_or(name, 0)) {
        Ok(_) => Ok(()),
        Err(_) => Err(ConfigError::InvalidParameter { name }),
    }
}

/// Endpoints within the pulse range and `min <= middle <= max`, reported
/// against the range's mid parameter
fn check_range(range: &ServoRange, name: &'static str) -> Result<(), ConfigError> {
    if pulse_in_range(range.min as i32)
        && pulse_in_range(range.max as i32)
        && range.min <= range.middle
        && range.middle <= range.max
    {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::{Airframe, MixerError};
    use crate::output::ChannelRole;
    use crate::parameters::ParamValue;

    fn default_store() -> ParameterStore {
        let mut store = ParameterStore::new();
        register_all(&mut store).unwrap();
        store
    }

    #[test]
    fn test_register_all_fits_store() {
        let store = default_store();
        // mixer 18, channels 49, fixed wing 6, gimbal 9, custom 48, arming 1
        assert_eq!(store.len(), 131);
    }

    #[test]
    fn test_default_pipeline() {
        let store = default_store();
        let pipeline = build_pipeline(&store).unwrap();

        assert_eq!(pipeline.engine().config().airframe(), Airframe::QuadX);
        assert_eq!(pipeline.engine().settings(), &MixerSettings::default());
        assert_eq!(pipeline.channels().motor_min_pulse(), 1000);
        assert_eq!(
            pipeline.channels().roles()[0],
            Some(ChannelRole::Motor)
        );
    }

    #[test]
    fn test_unknown_frame_rejected() {
        let mut store = default_store();
        store.set("MIX_FRAME", ParamValue::Int(19)).unwrap();

        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::Mixer(MixerError::UnknownAirframe { index: 19 }))
        );
    }

    #[test]
    fn test_custom_frame_reads_table() {
        let mut store = default_store();
        store.set("MIX_FRAME", ParamValue::Int(18)).unwrap();
        store.set("MIX_C1_THR", ParamValue::Float(1.0)).unwrap();
        store.set("MIX_C2_THR", ParamValue::Float(1.0)).unwrap();

        let pipeline = build_pipeline(&store).unwrap();
        assert_eq!(pipeline.engine().config().airframe(), Airframe::Custom);
        assert_eq!(pipeline.engine().config().motor_count(), 2);
    }

    #[test]
    fn test_invalid_yaw_direction_rejected() {
        let mut store = default_store();
        store.set("MIX_YAW_DIR", ParamValue::Int(0)).unwrap();

        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::InvalidParameter {
                name: "MIX_YAW_DIR"
            })
        );
    }

    #[test]
    fn test_inverted_throttle_rejected() {
        let mut store = default_store();
        store.set("THR_MAX", ParamValue::Int(1100)).unwrap();

        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::InvalidParameter { name: "THR_MAX" })
        );
    }

    #[test]
    fn test_channel_errors_propagate() {
        let mut store = default_store();
        store.set("SERVO6_MIN", ParamValue::Int(1600)).unwrap();

        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::CenterOutOfRange { channel: 5 })
        );
    }

    #[test]
    fn test_motor_minimum_outside_endpoints_rejected() {
        let mut store = default_store();
        store.set("MOT_PWM_MIN", ParamValue::Int(900)).unwrap();

        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::MinimumOutsideEndpoints { channel: 0 })
        );
    }

    #[test]
    fn test_oversized_throttle_not_wrapped() {
        let mut store = default_store();
        // Both wrap to plausible pulses (1500 / 1000) when narrowed with `as`
        store.set("THR_MAX", ParamValue::Int(67_036)).unwrap();
        store.set("THR_MINCMD", ParamValue::Int(66_536)).unwrap();

        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "THR_MINCMD" })
        );

        store.set("THR_MINCMD", ParamValue::Int(1000)).unwrap();
        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "THR_MAX" })
        );
    }

    #[test]
    fn test_min_check_range_checked() {
        let mut store = default_store();
        store.set("THR_MINCHK", ParamValue::Int(-1)).unwrap();

        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "THR_MINCHK" })
        );
    }

    #[test]
    fn test_oversized_flag_words_rejected() {
        let mut store = default_store();
        store.set("GMB_FLAGS", ParamValue::Int(256)).unwrap();
        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "GMB_FLAGS" })
        );

        let mut store = default_store();
        store.set("MIX_FEATURES", ParamValue::Int(-1)).unwrap();
        assert_eq!(
            build_pipeline(&store).err(),
            Some(ConfigError::InvalidParameter { name: "MIX_FEATURES" })
        );
    }

    #[test]
    fn test_servo_range_endpoints_checked() {
        let mut store = default_store();
        // 65536 + 1500 would wrap back onto the default middle
        store.set("TRI_YAW_MID", ParamValue::Int(67_036)).unwrap();
        store.set("TRI_YAW_MAX", ParamValue::Int(70_000)).unwrap();

        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "TRI_YAW_MID" })
        );
    }

    #[test]
    fn test_gimbal_range_checked() {
        let mut store = default_store();
        store.set("GMB_P_MIN", ParamValue::Int(1600)).unwrap();

        assert_eq!(
            mixer_settings(&store).err(),
            Some(ConfigError::InvalidParameter { name: "GMB_P_MID" })
        );
    }
}
