/// The OFDM numerology and the two Zadoff-Chu-bearing symbol indices for one
/// signal variant.
///
/// Only the three numerologies the demodulator actually decodes carry a
/// [`ProfileParams`]. `beacon`, `pairing`, and `video` are detection-only
/// packet types recognised by the packetizer and band estimator (see
/// [`PacketType`]) but are not demodulated past that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    DroneId,
    DroneIdLegacy,
    C2,
}

impl Profile {
    pub fn params(self) -> ProfileParams {
        match self {
            Profile::DroneId => ProfileParams {
                n_carriers: 601,
                cp_pattern: &[80, 72, 72, 72, 72, 72, 72, 72, 80],
                zc_symbol_indices: (3, 5),
                expected_zc2: Some(147),
                demod_rate_hz: 15.36e6,
            },
            Profile::DroneIdLegacy => ProfileParams {
                n_carriers: 601,
                cp_pattern: &[80, 72, 72, 72, 72, 72, 72, 80],
                zc_symbol_indices: (2, 4),
                expected_zc2: None,
                demod_rate_hz: 15.36e6,
            },
            Profile::C2 => ProfileParams {
                n_carriers: 73,
                cp_pattern: &[80, 72, 72, 72, 72, 72, 80],
                zc_symbol_indices: (0, 6),
                expected_zc2: None,
                demod_rate_hz: 1.92e6,
            },
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Profile> {
        match s {
            "droneid" => Some(Profile::DroneId),
            "droneid-legacy" => Some(Profile::DroneIdLegacy),
            "c2" => Some(Profile::C2),
            _ => None,
        }
    }
}

/// Derived numerology for one [`Profile`]. Constructed once at pipeline
/// entry and threaded through every stage rather than branching on the
/// profile repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct ProfileParams {
    /// Number of centered subcarrier bins, including the null DC bin.
    pub n_carriers: usize,
    /// Cyclic-prefix length in samples for each symbol in the frame, in
    /// order. `cp_pattern.len()` is the number of OFDM symbols per frame.
    pub cp_pattern: &'static [usize],
    /// The two symbol indices (0-based) carrying Zadoff-Chu reference
    /// sequences.
    pub zc_symbol_indices: (usize, usize),
    /// Expected root of the second Zadoff-Chu symbol, when the profile
    /// enforces one. A mismatch here is fatal for the frame.
    pub expected_zc2: Option<usize>,
    /// Target sample rate for demodulation.
    pub demod_rate_hz: f64,
}

impl ProfileParams {
    pub fn n_symbols(&self) -> usize {
        self.cp_pattern.len()
    }

    /// Total samples in one frame at the demod rate: every symbol's CP plus
    /// its FFT length.
    pub fn frame_len(&self, nb_fft: usize) -> usize {
        self.cp_pattern.iter().map(|cp| cp + nb_fft).sum()
    }

    /// Index of the null DC column dropped before bit extraction.
    pub fn dc_column(&self) -> usize {
        self.n_carriers / 2
    }
}

/// The broader set of signal types the packetizer and band estimator can
/// recognise. A superset of [`Profile`]: `Beacon`, `Pairing`, and `Video`
/// have known burst-duration and bandwidth signatures but no OFDM
/// demodulation parameters, since nothing downstream decodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    DroneId,
    DroneIdLegacy,
    C2,
    Beacon,
    Pairing,
    Video,
}

impl PacketType {
    pub fn demod_profile(self) -> Option<Profile> {
        match self {
            PacketType::DroneId => Some(Profile::DroneId),
            PacketType::DroneIdLegacy => Some(Profile::DroneIdLegacy),
            PacketType::C2 => Some(Profile::C2),
            PacketType::Beacon | PacketType::Pairing | PacketType::Video => None,
        }
    }

    /// Expected occupied-bandwidth range in Hz, used by the band estimator
    /// to accept or reject a candidate spectral run.
    pub fn expected_bandwidth_hz(self) -> (f64, f64) {
        match self {
            PacketType::DroneId | PacketType::Beacon => (8.0e6, 11.0e6),
            PacketType::DroneIdLegacy => (8.0e6, 11.0e6),
            PacketType::C2 => (1.2e6, 1.95e6),
            PacketType::Pairing => (8.0e6, 11.0e6),
            PacketType::Video => (18.0e6, 22.0e6),
        }
    }

    /// Expected packet burst duration range in seconds, used by the
    /// packetizer's peak-width constraint.
    pub fn expected_duration_s(self) -> (f64, f64) {
        match self {
            PacketType::DroneId => (630.0e-6, 665.0e-6),
            PacketType::DroneIdLegacy => (565.0e-6, 600.0e-6),
            PacketType::C2 => (500.0e-6, 520.0e-6),
            PacketType::Beacon | PacketType::Pairing => (490.0e-6, 540.0e-6),
            PacketType::Video => (630.0e-6, 665.0e-6),
        }
    }

    pub fn from_str_loose(s: &str) -> Option<PacketType> {
        match s {
            "droneid" => Some(PacketType::DroneId),
            "droneid-legacy" => Some(PacketType::DroneIdLegacy),
            "c2" => Some(PacketType::C2),
            "beacon" => Some(PacketType::Beacon),
            "pairing" => Some(PacketType::Pairing),
            "video" => Some(PacketType::Video),
            _ => None,
        }
    }
}

impl From<Profile> for PacketType {
    fn from(p: Profile) -> Self {
        match p {
            Profile::DroneId => PacketType::DroneId,
            Profile::DroneIdLegacy => PacketType::DroneIdLegacy,
            Profile::C2 => PacketType::C2,
        }
    }
}
