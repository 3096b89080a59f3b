//! Custom Mixer Parameter Definitions
//!
//! One row of four coefficients per motor slot (n = 1..12):
//! `MIX_Cn_THR`, `MIX_Cn_RLL`, `MIX_Cn_PIT`, `MIX_Cn_YAW`.
//!
//! A row with a zero throttle coefficient ends the table.

use super::error::ParameterError;
use super::storage::{indexed_name, ParamFlags, ParamValue, ParameterStore};
use crate::mixer::{CustomMixer, MixerRule, MAX_MOTORS};

const PREFIX: &str = "MIX_C";
const SUFFIXES: [&str; 4] = ["THR", "RLL", "PIT", "YAW"];

/// Custom mixer table loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomMixerParams {
    pub mixer: CustomMixer,
}

impl CustomMixerParams {
    /// Register an empty custom table
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        for slot in 0..MAX_MOTORS {
            for suffix in SUFFIXES {
                let name = indexed_name(PREFIX, slot, suffix)?;
                store.register(name.as_str(), ParamValue::Float(0.0), ParamFlags::empty())?;
            }
        }
        Ok(())
    }

    /// Load the custom table from parameter store
    pub fn from_store(store: &ParameterStore) -> Result<Self, ParameterError> {
        let mut mixer = CustomMixer::new();
        for slot in 0..MAX_MOTORS {
            let mut row = [0.0f32; 4];
            for (value, suffix) in row.iter_mut().zip(SUFFIXES) {
                let name = indexed_name(PREFIX, slot, suffix)?;
                *value = store.float_or(name.as_str(), 0.0);
            }
            let [throttle, roll, pitch, yaw] = row;
            mixer
                .set(slot, MixerRule::new(throttle, roll, pitch, yaw))
                .map_err(|_| ParameterError::Rejected)?;
        }
        Ok(Self { mixer })
    }

    /// Write a table back to parameter store
    ///
    /// Used after seeding the table from a catalog airframe.
    pub fn save(mixer: &CustomMixer, store: &mut ParameterStore) -> Result<(), ParameterError> {
        for (slot, rule) in mixer.rules().iter().enumerate() {
            let values = [rule.throttle, rule.roll, rule.pitch, rule.yaw];
            for (value, suffix) in values.into_iter().zip(SUFFIXES) {
                let name = indexed_name(PREFIX, slot, suffix)?;
                store.set(name.as_str(), ParamValue::Float(value))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::Airframe;

    #[test]
    fn test_register_defaults_empty_table() {
        let mut store = ParameterStore::new();
        CustomMixerParams::register_defaults(&mut store).unwrap();
        assert_eq!(store.len(), MAX_MOTORS * 4);

        let params = CustomMixerParams::from_store(&store).unwrap();
        assert_eq!(params.mixer, CustomMixer::new());
    }

    #[test]
    fn test_from_store_reads_rows() {
        let mut store = ParameterStore::new();
        CustomMixerParams::register_defaults(&mut store).unwrap();
        store.set("MIX_C1_THR", ParamValue::Float(1.0)).unwrap();
        store.set("MIX_C1_RLL", ParamValue::Float(-0.5)).unwrap();
        store.set("MIX_C12_YAW", ParamValue::Float(0.25)).unwrap();

        let params = CustomMixerParams::from_store(&store).unwrap();
        assert_eq!(params.mixer.rules()[0], MixerRule::new(1.0, -0.5, 0.0, 0.0));
        assert_eq!(params.mixer.rules()[11].yaw, 0.25);
        assert!(!params.mixer.rules()[11].is_used());
    }

    #[test]
    fn test_save_catalog_seed() {
        let mut store = ParameterStore::new();
        CustomMixerParams::register_defaults(&mut store).unwrap();

        let mut mixer = CustomMixer::new();
        let airframe = mixer.load_from_catalog(2).unwrap();
        assert_eq!(airframe, Airframe::QuadX);
        CustomMixerParams::save(&mixer, &mut store).unwrap();

        let params = CustomMixerParams::from_store(&store).unwrap();
        assert_eq!(params.mixer, mixer);
        assert_eq!(store.get("MIX_C4_THR"), Some(&ParamValue::Float(1.0)));
        assert_eq!(store.get("MIX_C5_THR"), Some(&ParamValue::Float(0.0)));
    }
}
