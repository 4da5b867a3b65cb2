use canspec_core::model::{CanSpecMessage, CanSpecSignal, MessageId};

/// CSV header row as exported by specification tooling
#[allow(dead_code)]
pub const CSV_HEADER: &str =
    "MessageId,SignalName,StartBit,BitLength,IsSigned,IsBigEndian,Min,Max,Factor,Offset,Unit";

/// Build a classic 8-byte message with the given signals
#[allow(dead_code)]
pub fn message(id: u64, name: &str, signals: Vec<CanSpecSignal>) -> CanSpecMessage {
    let mut msg = CanSpecMessage::new(MessageId::new(id), name, 8);
    msg.signals = signals;
    msg
}

/// Build a plain signal with a unit
#[allow(dead_code)]
pub fn signal(name: &str, start_bit: u32, bit_length: u32, unit: &str) -> CanSpecSignal {
    let mut sig = CanSpecSignal::new(name, start_bit, bit_length);
    sig.unit = unit.to_string();
    sig
}

/// Two-message powertrain baseline used across diff and analysis tests
///
/// - 0x100 EngineStatus: RPM (0..16), CoolantTemp (16..24)
/// - 0x200 VehicleSpeed: Speed (0..16)
#[allow(dead_code)]
pub fn powertrain_v1() -> Vec<CanSpecMessage> {
    let mut rpm = signal("RPM", 0, 16, "rpm");
    rpm.factor = 0.25;
    rpm.max = 8000.0;

    let mut coolant = signal("CoolantTemp", 16, 8, "degC");
    coolant.offset = -40.0;
    coolant.min = -40.0;
    coolant.max = 215.0;

    let mut speed = signal("Speed", 0, 16, "km/h");
    speed.factor = 0.01;
    speed.max = 655.35;

    vec![
        message(0x100, "EngineStatus", vec![rpm, coolant]),
        message(0x200, "VehicleSpeed", vec![speed]),
    ]
}

/// Render one CSV row in column order
#[allow(dead_code)]
pub fn csv_row(id: &str, sig: &CanSpecSignal) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        id,
        sig.name,
        sig.start_bit,
        sig.bit_length,
        sig.is_signed,
        sig.is_big_endian,
        sig.min,
        sig.max,
        sig.factor,
        sig.offset,
        sig.unit
    )
}

/// Serialize messages into the JSON upload format
#[allow(dead_code)]
pub fn to_json_spec(messages: &[CanSpecMessage]) -> String {
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| {
            let signals: Vec<serde_json::Value> = m
                .signals
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name,
                        "startBit": s.start_bit,
                        "bitLength": s.bit_length,
                        "isSigned": s.is_signed,
                        "isBigEndian": s.is_big_endian,
                        "min": s.min,
                        "max": s.max,
                        "factor": s.factor,
                        "offset": s.offset,
                        "unit": s.unit,
                    })
                })
                .collect();
            serde_json::json!({
                "messageId": m.id.value(),
                "messageName": m.name,
                "dlc": m.dlc,
                "isExtended": m.is_extended,
                "signals": signals,
            })
        })
        .collect();
    serde_json::json!({ "messages": messages }).to_string()
}
