//! Persisted configuration record
//!
//! Layout: one marker byte, one layout version byte, then the postcard
//! encoding of [`SliderConfig`]. Erased storage reads back as `0xFF`, so a
//! `0xFF` marker means "never written" and triggers first-boot defaults.

use super::{ConfigError, SliderConfig};

/// Marker of a written record
pub const RECORD_MARKER: u8 = 0xA5;

/// Marker value of erased storage
pub const RECORD_BLANK: u8 = 0xFF;

/// Current record layout
pub const RECORD_VERSION: u8 = 1;

/// Upper bound of an encoded record
pub const RECORD_SIZE: usize = 32;

/// Storage for one configuration record
pub trait ConfigStore {
    /// Read the stored record into `buf`, returning its length
    fn read_record(&mut self, buf: &mut [u8]) -> Result<usize, ConfigError>;

    /// Replace the stored record
    fn write_record(&mut self, record: &[u8]) -> Result<(), ConfigError>;
}

/// Encode `config` into `buf`, returning the used prefix
pub fn encode_config<'a>(
    config: &SliderConfig,
    buf: &'a mut [u8; RECORD_SIZE],
) -> Result<&'a [u8], ConfigError> {
    buf[0] = RECORD_MARKER;
    buf[1] = RECORD_VERSION;
    let len = postcard::to_slice(config, &mut buf[2..])
        .map_err(|_| ConfigError::Serialize)?
        .len();
    Ok(&buf[..2 + len])
}

/// Decode a record, `Ok(None)` for blank storage
pub fn decode_config(record: &[u8]) -> Result<Option<SliderConfig>, ConfigError> {
    match record.first() {
        None | Some(&RECORD_BLANK) => return Ok(None),
        Some(&RECORD_MARKER) => {}
        Some(_) => return Err(ConfigError::BadMarker),
    }
    if record.get(1) != Some(&RECORD_VERSION) {
        return Err(ConfigError::VersionMismatch);
    }

    let config: SliderConfig =
        postcard::from_bytes(&record[2..]).map_err(|_| ConfigError::Deserialize)?;
    config.validate()?;
    Ok(Some(config))
}

/// Load the stored configuration, `Ok(None)` if nothing was ever saved
pub fn load_config<S: ConfigStore>(store: &mut S) -> Result<Option<SliderConfig>, ConfigError> {
    let mut buf = [0u8; RECORD_SIZE];
    let len = store.read_record(&mut buf)?;
    decode_config(&buf[..len.min(RECORD_SIZE)])
}

/// Persist `config`
pub fn save_config<S: ConfigStore>(store: &mut S, config: &SliderConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let mut buf = [0u8; RECORD_SIZE];
    let record = encode_config(config, &mut buf)?;
    store.write_record(record)?;
    log_info!("configuration saved ({} bytes)", record.len());
    Ok(())
}

/// Load the stored configuration, writing defaults on first boot
///
/// A corrupt or outdated record is replaced by the defaults too.
pub fn load_or_init<S: ConfigStore>(store: &mut S) -> SliderConfig {
    match load_config(store) {
        Ok(Some(config)) => {
            log_info!("configuration loaded");
            return config;
        }
        Ok(None) => log_info!("blank configuration, writing defaults"),
        Err(e) => log_warn!("configuration unreadable ({:?}), writing defaults", e),
    }

    let config = SliderConfig::DEFAULT;
    if let Err(e) = save_config(store, &config) {
        log_error!("failed to write default configuration: {:?}", e);
    }
    config
}
