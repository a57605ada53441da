//! Typed view of the node schema.
//!
//! Device code reads settings through `NodeConfig` rather than by field
//! name. The snapshot is taken from a `ConfigStore` built on `NODE_SCHEMA`.

use serde::Serialize;

use crate::error::FieldError;
use crate::store::ConfigStore;
use crate::value::FieldValue;

/// Snapshot of all node settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub hostname: String,
    pub use_termo_sensor1: bool,
    pub use_termo_sensor2: bool,
    pub use_alarm_sensor1: bool,
    pub use_alarm_sensor2: bool,
    pub t1_shift_delta: f32,
    pub t2_shift_delta: f32,
    /// Resting state of alarm sensor 1; `None` means auto-detect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_init1: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_init2: Option<i8>,
    pub alarm_active: bool,
    pub alarm_auto_mode: bool,
    pub alarm_test_mode: bool,
    pub alarm_ready_delay: i32,
    pub alarm_skip_delay: i32,
    pub data_store_delay: i32,
    pub data_store_attempts: i32,
    pub data_store_attempts_delay: i32,
    pub store_login: String,
    #[serde(skip_serializing)]
    pub store_password: String,
    #[serde(rename = "storeURL")]
    pub store_url: String,
    #[serde(rename = "iswifiConnectionCheck")]
    pub wifi_connection_check: bool,
    #[serde(rename = "wifiRouterIP")]
    pub wifi_router_ip: String,
    pub t_control_active: bool,
    pub t_control_min: f32,
    pub t_control_max: f32,
    pub t_alarm_active: bool,
    /// Minimum temperature on sensor 1; `None` means disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_alarm_min1: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_alarm_min2: Option<f32>,
}

impl TryFrom<&ConfigStore> for NodeConfig {
    type Error = FieldError;

    fn try_from(store: &ConfigStore) -> Result<Self, Self::Error> {
        Ok(Self {
            hostname: field(store, "hostname")?,
            use_termo_sensor1: field(store, "useTermoSensor1")?,
            use_termo_sensor2: field(store, "useTermoSensor2")?,
            use_alarm_sensor1: field(store, "useAlarmSensor1")?,
            use_alarm_sensor2: field(store, "useAlarmSensor2")?,
            t1_shift_delta: field(store, "t1ShiftDelta")?,
            t2_shift_delta: field(store, "t2ShiftDelta")?,
            alarm_init1: unless_sentinel(store, "alarmInit1")?,
            alarm_init2: unless_sentinel(store, "alarmInit2")?,
            alarm_active: field(store, "alarmActive")?,
            alarm_auto_mode: field(store, "alarmAutoMode")?,
            alarm_test_mode: field(store, "alarmTestMode")?,
            alarm_ready_delay: field(store, "alarmReadyDelay")?,
            alarm_skip_delay: field(store, "alarmSkipDelay")?,
            data_store_delay: field(store, "dataStoreDelay")?,
            data_store_attempts: field(store, "dataStoreAttempts")?,
            data_store_attempts_delay: field(store, "dataStoreAttemptsDelay")?,
            store_login: field(store, "storeLogin")?,
            store_password: field(store, "storePassword")?,
            store_url: field(store, "storeURL")?,
            wifi_connection_check: field(store, "iswifiConnectionCheck")?,
            wifi_router_ip: field(store, "wifiRouterIP")?,
            t_control_active: field(store, "tControlActive")?,
            t_control_min: field(store, "tControlMin")?,
            t_control_max: field(store, "tControlMax")?,
            t_alarm_active: field(store, "tAlarmActive")?,
            t_alarm_min1: unless_sentinel(store, "tAlarmMin1")?,
            t_alarm_min2: unless_sentinel(store, "tAlarmMin2")?,
        })
    }
}

fn field<T: FieldValue>(store: &ConfigStore, name: &str) -> Result<T, FieldError> {
    let spec = store
        .schema()
        .field(name)
        .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
    let value = store
        .value(name)
        .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
    T::from_value(value).ok_or(FieldError::KindMismatch {
        field: spec.name,
        expected: T::KIND,
        actual: value.kind(),
    })
}

fn unless_sentinel<T: FieldValue>(store: &ConfigStore, name: &str) -> Result<Option<T>, FieldError> {
    let value: T = field(store, name)?;
    let is_sentinel = match (store.schema().field(name), store.value(name)) {
        (Some(spec), Some(current)) => spec.is_sentinel(current),
        _ => false,
    };
    Ok(if is_sentinel { None } else { Some(value) })
}
