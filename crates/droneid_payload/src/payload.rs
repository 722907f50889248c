use crate::crc::crc16;
use crate::device_type::device_type_name;
use crate::error::PayloadError;

pub const PAYLOAD_LEN: usize = 91;

/// The 91-byte little-endian DroneID payload, parsed from raw systematic
/// bytes handed up by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneIdPayload {
    pub pkt_len: u8,
    pub reserved: u8,
    pub version: u8,
    pub sequence: u16,
    pub state_info: u16,
    pub serial: String,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude_m: f64,
    pub height_m: f64,
    pub v_north: i16,
    pub v_east: i16,
    pub v_up: i16,
    pub yaw_pitch_angle: i16,
    pub gps_time: u64,
    pub app_lat: f64,
    pub app_lon: f64,
    pub home_lon: f64,
    pub home_lat: f64,
    pub device_type: u8,
    pub uuid_len: u8,
    pub uuid: String,
    pub crc: u16,
}

/// DJI encodes lat/lon/angle fields as a fixed-point integer; this divisor
/// is undocumented outside the "Anatomy of DJI's Drone ID" reverse-engineering
/// writeup.
const COORD_SCALE: f64 = 174533.0;
const FEET_PER_METER: f64 = 3.281;

impl DroneIdPayload {
    pub fn parse(raw: &[u8]) -> Result<Self, PayloadError> {
        if raw.len() < PAYLOAD_LEN {
            return Err(PayloadError::TooShort(raw.len()));
        }

        let serial = parse_null_stripped_utf8(&raw[7..23]).ok_or(PayloadError::InvalidSerial)?;
        let uuid = parse_null_stripped_utf8(&raw[69..89]).ok_or(PayloadError::InvalidUuid)?;

        Ok(DroneIdPayload {
            pkt_len: raw[0],
            reserved: raw[1],
            version: raw[2],
            sequence: u16::from_le_bytes([raw[3], raw[4]]),
            state_info: u16::from_le_bytes([raw[5], raw[6]]),
            serial,
            longitude: i32::from_le_bytes(raw[23..27].try_into().unwrap()) as f64 / COORD_SCALE,
            latitude: i32::from_le_bytes(raw[27..31].try_into().unwrap()) as f64 / COORD_SCALE,
            altitude_m: i16::from_le_bytes(raw[31..33].try_into().unwrap()) as f64 / FEET_PER_METER,
            height_m: i16::from_le_bytes(raw[33..35].try_into().unwrap()) as f64 / FEET_PER_METER,
            v_north: i16::from_le_bytes(raw[35..37].try_into().unwrap()),
            v_east: i16::from_le_bytes(raw[37..39].try_into().unwrap()),
            v_up: i16::from_le_bytes(raw[39..41].try_into().unwrap()),
            yaw_pitch_angle: i16::from_le_bytes(raw[41..43].try_into().unwrap()),
            gps_time: u64::from_le_bytes(raw[43..51].try_into().unwrap()),
            app_lat: i32::from_le_bytes(raw[51..55].try_into().unwrap()) as f64 / COORD_SCALE,
            app_lon: i32::from_le_bytes(raw[55..59].try_into().unwrap()) as f64 / COORD_SCALE,
            home_lon: i32::from_le_bytes(raw[59..63].try_into().unwrap()) as f64 / COORD_SCALE,
            home_lat: i32::from_le_bytes(raw[63..67].try_into().unwrap()) as f64 / COORD_SCALE,
            device_type: raw[67],
            uuid_len: raw[68],
            uuid,
            crc: u16::from_le_bytes([raw[89], raw[90]]),
        })
    }

    pub fn device_type_name(&self) -> Option<&'static str> {
        device_type_name(self.device_type)
    }

    /// Recomputes the CRC over bytes `[0, 89)` of `raw` and compares it to
    /// the trailing CRC field already parsed into `self.crc`.
    pub fn check_crc(raw: &[u8]) -> Result<bool, PayloadError> {
        if raw.len() < PAYLOAD_LEN {
            return Err(PayloadError::TooShort(raw.len()));
        }
        let computed = crc16(&raw[..89]);
        let stored = u16::from_le_bytes([raw[89], raw[90]]);
        Ok(computed == stored)
    }
}

fn parse_null_stripped_utf8(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> Vec<u8> {
        let mut raw = vec![0u8; PAYLOAD_LEN];
        raw[0] = 91;
        raw[2] = 1;
        raw[3..5].copy_from_slice(&7u16.to_le_bytes());
        raw[7..13].copy_from_slice(b"ABC123");
        raw[23..27].copy_from_slice(&(174533i32 * 2).to_le_bytes());
        raw[67] = 16;
        raw[68] = 4;
        raw[69..73].copy_from_slice(b"dead");
        let crc = crc16(&raw[..89]);
        raw[89..91].copy_from_slice(&crc.to_le_bytes());
        raw
    }

    #[test]
    fn parses_fields_at_their_documented_offsets() {
        let raw = sample_bytes();
        let payload = DroneIdPayload::parse(&raw).unwrap();
        assert_eq!(payload.pkt_len, 91);
        assert_eq!(payload.version, 1);
        assert_eq!(payload.sequence, 7);
        assert_eq!(payload.serial, "ABC123");
        assert_eq!(payload.longitude, 2.0);
        assert_eq!(payload.device_type_name(), Some("Mavic Pro"));
        assert_eq!(payload.uuid, "dead");
    }

    #[test]
    fn crc_matches_for_a_well_formed_packet() {
        let raw = sample_bytes();
        assert!(DroneIdPayload::check_crc(&raw).unwrap());
    }

    #[test]
    fn crc_fails_after_corrupting_a_payload_byte() {
        let mut raw = sample_bytes();
        raw[10] ^= 0xFF;
        assert!(!DroneIdPayload::check_crc(&raw).unwrap());
    }

    #[test]
    fn too_short_input_is_rejected() {
        let raw = vec![0u8; 10];
        assert!(matches!(DroneIdPayload::parse(&raw), Err(PayloadError::TooShort(10))));
    }
}
