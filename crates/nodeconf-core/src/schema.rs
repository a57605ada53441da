//! Declarative field schema.
//!
//! A `Schema` is a fixed, ordered table of `FieldSpec`s. Load, save, form
//! rendering and form binding are all driven by this table, so a node
//! variant with a different field set is just another `Schema` constant.

use crate::value::{FieldKind, Value};

/// Seconds to wait after boot before sampling the alarm sensors' resting state.
pub const ALARM_INIT_WAIT: i32 = 60;

/// Seconds between two reports to the remote store.
pub const DATA_STORE_DEFAULT_DELAY: i32 = 300;

/// Report attempts before giving up on one reading.
pub const ATTEMPTS_TO_STORE_DATA: i32 = 3;

/// Seconds between two report attempts.
pub const ATTEMPTS_DEFAULT_DELAY: i32 = 30;

/// Resting state value meaning "probe the sensor at startup".
pub const ALARM_INIT_AUTO: i8 = -1;

/// Temperature threshold meaning "threshold disabled".
pub const TEMPERATURE_OFF: f32 = -127.0;

/// A compile-time default or sentinel value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    SmallInt(i8),
    Float(f32),
    Text(&'static str),
}

impl Literal {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Literal::Bool(_) => FieldKind::Bool,
            Literal::Int(_) => FieldKind::Int,
            Literal::SmallInt(_) => FieldKind::SmallInt,
            Literal::Float(_) => FieldKind::Float,
            Literal::Text(_) => FieldKind::Text,
        }
    }

    pub fn to_value(&self) -> Value {
        match *self {
            Literal::Bool(b) => Value::Bool(b),
            Literal::Int(i) => Value::Int(i),
            Literal::SmallInt(i) => Value::SmallInt(i),
            Literal::Float(f) => Value::Float(f),
            Literal::Text(s) => Value::Text(s.to_string()),
        }
    }

    /// Whether `value` equals this literal.
    pub fn matches(&self, value: &Value) -> bool {
        match (*self, value) {
            (Literal::Bool(a), Value::Bool(b)) => a == *b,
            (Literal::Int(a), Value::Int(b)) => a == *b,
            (Literal::SmallInt(a), Value::SmallInt(b)) => a == *b,
            (Literal::Float(a), Value::Float(b)) => a == *b,
            (Literal::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// A reserved in-range value standing for "unset".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel {
    pub value: Literal,
    /// Shown as the input placeholder while the field holds the sentinel.
    pub placeholder: &'static str,
}

/// What a blank numeric form argument does to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankPolicy {
    /// Leave blank to reset to the default.
    ResetToDefault,
    /// Leave blank to keep the current value.
    KeepCurrent,
}

/// Descriptor of one setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// JSON key and form argument name.
    pub name: &'static str,
    pub default: Literal,
    pub sentinel: Option<Sentinel>,
    /// Only consulted for numeric fields.
    pub blank: BlankPolicy,
    /// Human readable label in the form.
    pub label: &'static str,
    /// Fieldset legend the field is rendered under.
    pub group: &'static str,
    /// Masked in logs and JSON views, rendered as a password input.
    pub secret: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, default: Literal) -> Self {
        Self {
            name,
            default,
            sentinel: None,
            blank: BlankPolicy::ResetToDefault,
            label: name,
            group: "",
            secret: false,
        }
    }

    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self::new(name, Literal::Bool(default))
    }

    pub const fn int(name: &'static str, default: i32) -> Self {
        Self::new(name, Literal::Int(default))
    }

    pub const fn small_int(name: &'static str, default: i8) -> Self {
        Self::new(name, Literal::SmallInt(default))
    }

    pub const fn float(name: &'static str, default: f32) -> Self {
        Self::new(name, Literal::Float(default))
    }

    pub const fn text(name: &'static str, default: &'static str) -> Self {
        Self::new(name, Literal::Text(default))
    }

    pub const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub const fn group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Mark the default as a sentinel with the given placeholder text.
    pub const fn sentinel_default(mut self, placeholder: &'static str) -> Self {
        self.sentinel = Some(Sentinel {
            value: self.default,
            placeholder,
        });
        self
    }

    pub const fn keep_on_blank(mut self) -> Self {
        self.blank = BlankPolicy::KeepCurrent;
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub const fn kind(&self) -> FieldKind {
        self.default.kind()
    }

    pub fn default_value(&self) -> Value {
        self.default.to_value()
    }

    /// Whether `value` is this field's sentinel.
    pub fn is_sentinel(&self, value: &Value) -> bool {
        self.sentinel
            .map(|s| s.value.matches(value))
            .unwrap_or(false)
    }

    /// Value as it may appear in logs.
    pub fn display(&self, value: &Value) -> String {
        if self.secret {
            "********".to_string()
        } else {
            value.to_string()
        }
    }
}

/// A fixed, ordered set of fields.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Position of a field by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

const NODE: &str = "Node";
const ACTIVATION: &str = "Activation";
const CONTROL: &str = "Control";
const REPORTING: &str = "Data reporting";
const WIFI: &str = "WiFi";

static NODE_FIELDS: [FieldSpec; 28] = [
    FieldSpec::text("hostname", "").label("Hostname").group(NODE),
    // Activation
    FieldSpec::flag("useTermoSensor1", true)
        .label("Enable temperature sensor 1")
        .group(ACTIVATION),
    FieldSpec::float("t1ShiftDelta", 0.0)
        .label("Sensor 1 correction (degrees)")
        .group(ACTIVATION),
    FieldSpec::flag("useTermoSensor2", true)
        .label("Enable temperature sensor 2")
        .group(ACTIVATION),
    FieldSpec::float("t2ShiftDelta", 0.0)
        .label("Sensor 2 correction (degrees)")
        .group(ACTIVATION),
    FieldSpec::flag("useAlarmSensor1", true)
        .label("Enable alarm sensor 1")
        .group(ACTIVATION),
    FieldSpec::small_int("alarmInit1", ALARM_INIT_AUTO)
        .label("Alarm sensor 1 resting value")
        .group(ACTIVATION)
        .sentinel_default("auto"),
    FieldSpec::flag("useAlarmSensor2", true)
        .label("Enable alarm sensor 2")
        .group(ACTIVATION),
    FieldSpec::small_int("alarmInit2", ALARM_INIT_AUTO)
        .label("Alarm sensor 2 resting value")
        .group(ACTIVATION)
        .sentinel_default("auto"),
    FieldSpec::int("alarmReadyDelay", ALARM_INIT_WAIT)
        .label("Alarm sensors warm-up time (sec)")
        .group(ACTIVATION)
        .keep_on_blank(),
    // Control
    FieldSpec::flag("alarmActive", false)
        .label("Alarm mode active")
        .group(CONTROL),
    FieldSpec::flag("alarmAutoMode", false)
        .label("Switch alarm off automatically")
        .group(CONTROL),
    FieldSpec::flag("alarmTestMode", false)
        .label("Alarm test mode")
        .group(CONTROL),
    FieldSpec::flag("tAlarmActive", false)
        .label("Temperature alarm active")
        .group(CONTROL),
    FieldSpec::float("tAlarmMin1", TEMPERATURE_OFF)
        .label("Minimum t1")
        .group(CONTROL)
        .sentinel_default("off"),
    FieldSpec::float("tAlarmMin2", TEMPERATURE_OFF)
        .label("Minimum t2")
        .group(CONTROL)
        .sentinel_default("off"),
    FieldSpec::flag("tControlActive", false)
        .label("Temperature control relay active")
        .group(CONTROL),
    FieldSpec::float("tControlMin", 0.0)
        .label("Relay on below")
        .group(CONTROL),
    FieldSpec::float("tControlMax", 0.0)
        .label("Relay off above")
        .group(CONTROL),
    // Data reporting
    FieldSpec::text("storeURL", "").label("URL").group(REPORTING),
    FieldSpec::text("storeLogin", "esp")
        .label("Login")
        .group(REPORTING)
        .secret(),
    FieldSpec::text("storePassword", "123")
        .label("Password")
        .group(REPORTING)
        .secret(),
    FieldSpec::int("dataStoreDelay", DATA_STORE_DEFAULT_DELAY)
        .label("Period between sensor reports (sec)")
        .group(REPORTING)
        .keep_on_blank(),
    FieldSpec::int("alarmSkipDelay", 0)
        .label("Period between repeated alarm reports (sec)")
        .group(REPORTING)
        .keep_on_blank(),
    FieldSpec::int("dataStoreAttempts", ATTEMPTS_TO_STORE_DATA)
        .label("Attempts on failed report")
        .group(REPORTING)
        .keep_on_blank(),
    FieldSpec::int("dataStoreAttemptsDelay", ATTEMPTS_DEFAULT_DELAY)
        .label("Period between attempts (sec)")
        .group(REPORTING)
        .keep_on_blank(),
    // WiFi
    FieldSpec::flag("iswifiConnectionCheck", false)
        .label("Check WiFi router reachability")
        .group(WIFI),
    FieldSpec::text("wifiRouterIP", "")
        .label("WiFi router IP address")
        .group(WIFI),
];

/// Field set of the sensor/alarm node.
pub static NODE_SCHEMA: Schema = Schema::new("node", &NODE_FIELDS);
