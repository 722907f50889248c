/// Maps the payload's `device_type` byte to DJI's published model name.
/// Unknown codes (new models, or a bit error) return `None` rather than a
/// placeholder string.
pub fn device_type_name(code: u8) -> Option<&'static str> {
    match code {
        1 => Some("Inspire 1"),
        2 | 3 => Some("Phantom 3 Series"),
        4 => Some("Phantom 3 Std"),
        5 => Some("M100"),
        6 => Some("ACEONE"),
        7 => Some("WKM"),
        8 => Some("NAZA"),
        9 => Some("A2"),
        10 => Some("A3"),
        11 => Some("Phantom 4"),
        12 => Some("MG1"),
        14 => Some("M600"),
        15 => Some("Phantom 3 4k"),
        16 => Some("Mavic Pro"),
        17 => Some("Inspire 2"),
        18 => Some("Phantom 4 Pro"),
        20 => Some("N2"),
        21 => Some("Spark"),
        23 => Some("M600 Pro"),
        24 => Some("Mavic Air"),
        25 => Some("M200"),
        26 => Some("Phantom 4 Series"),
        27 => Some("Phantom 4 Adv"),
        28 => Some("M210"),
        30 => Some("M210RTK"),
        31 => Some("A3_AG"),
        32 => Some("MG2"),
        34 => Some("MG1A"),
        35 => Some("Phantom 4 RTK"),
        36 => Some("Phantom 4 Pro V2.0"),
        38 => Some("MG1P"),
        40 => Some("MG1P-RTK"),
        41 => Some("Mavic 2"),
        44 => Some("M200 V2 Series"),
        51 => Some("Mavic 2 Enterprise"),
        53 => Some("Mavic Mini"),
        58 => Some("Mavic Air 2"),
        59 => Some("P4M"),
        60 => Some("M300 RTK"),
        61 => Some("DJI FPV"),
        63 => Some("Mini 2"),
        64 => Some("AGRAS T10"),
        65 => Some("AGRAS T30"),
        66 => Some("Air 2S"),
        67 => Some("M30"),
        68 => Some("DJI Mavic 3"),
        69 => Some("Mavic 2 Enterprise Advanced"),
        70 => Some("Mini SE"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(device_type_name(16), Some("Mavic Pro"));
        assert_eq!(device_type_name(2), Some("Phantom 3 Series"));
        assert_eq!(device_type_name(3), Some("Phantom 3 Series"));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(device_type_name(200), None);
    }
}
