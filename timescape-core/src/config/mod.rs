//! Slider configuration
//!
//! The operator-editable settings, their allowed ranges, the cell that
//! shares them between the menu and navigation tasks, and the record
//! format used to persist them.

mod shared;
mod store;
mod types;

pub use shared::{ConfigSource, SharedConfig};
pub use store::{
    decode_config, encode_config, load_config, load_or_init, save_config, ConfigStore,
    RECORD_BLANK, RECORD_MARKER, RECORD_SIZE, RECORD_VERSION,
};
pub use types::{ConfigError, Param, ParamLimits, SliderConfig};
