//! Procedural pathogen generation.
//!
//! A pathogen is fully determined by a 24-bit generator code. The code is
//! split into bit fields, each mapped to one onset or duration:
//!
//! | bits  | field               | range |
//! |-------|---------------------|-------|
//! | 0-7   | `immune_onset`      | 0-8, trailing ones (truncated geometric) |
//! | 8-9   | `recovery_duration` | 1-4   |
//! | 10-11 | `terminal_duration` | 1-4   |
//! | 12-14 | `symptom_onset`     | 2-9   |
//! | 15-17 | `shedding_onset`    | 2-9   |
//! | 18-20 | `moderate_duration` | 2-9   |
//! | 21-23 | `critical_duration` | 2-9   |
//!
//! Thresholds are sums of the fields above. Nothing guarantees that an
//! individual reaches `recovered_threshold` on the recovery track before it
//! reaches `dead_threshold` on the illness track; the two race.

use std::fmt::{Display, Formatter};

use rand::Rng;
use serde::Serialize;

use crate::error::ProgressionError;

/// Largest valid generator code.
pub const MAX_GENERATOR_CODE: u32 = 0x00FF_FFFF;
/// Number of distinct generator codes.
pub const GENERATOR_CODE_COUNT: u32 = MAX_GENERATOR_CODE + 1;

/// Counts the consecutive set bits of `value` starting at bit 0.
///
/// Over a uniformly random byte this is geometric with `P(n) = 2^-(n+1)`
/// for `n < 8`, truncated at `P(8) = 2^-8`.
#[must_use]
pub fn consecutive_ones(value: u8) -> u8 {
    // `trailing_ones` of a u8 is at most 8
    value.trailing_ones() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pathogen {
    generator_code: u32,
    immune_onset: u8,
    recovery_duration: u8,
    shedding_onset: u8,
    symptom_onset: u8,
    moderate_duration: u8,
    critical_duration: u8,
    terminal_duration: u8,
    recovered_threshold: u8,
    critical_threshold: u8,
    terminal_threshold: u8,
    dead_threshold: u8,
}

/// Extracts `width` bits starting at `shift`.
fn field(code: u32, shift: u32, width: u32) -> u8 {
    ((code >> shift) & ((1 << width) - 1)) as u8
}

impl Pathogen {
    /// Builds the pathogen for `generator_code`.
    ///
    /// # Errors
    /// `InvalidGeneratorCode` if the code does not fit in 24 bits.
    pub fn new(generator_code: u32) -> Result<Self, ProgressionError> {
        if generator_code > MAX_GENERATOR_CODE {
            return Err(ProgressionError::InvalidGeneratorCode(generator_code));
        }
        Ok(Self::from_valid_code(generator_code))
    }

    /// Builds the pathogen for a uniformly drawn generator code.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_valid_code(rng.random::<u32>() & MAX_GENERATOR_CODE)
    }

    fn from_valid_code(generator_code: u32) -> Self {
        let immune_onset = consecutive_ones(field(generator_code, 0, 8));
        let recovery_duration = field(generator_code, 8, 2) + 1;
        let terminal_duration = field(generator_code, 10, 2) + 1;
        let symptom_onset = field(generator_code, 12, 3) + 2;
        let shedding_onset = field(generator_code, 15, 3) + 2;
        let moderate_duration = field(generator_code, 18, 3) + 2;
        let critical_duration = field(generator_code, 21, 3) + 2;

        let critical_threshold = symptom_onset + moderate_duration;
        let terminal_threshold = critical_threshold + critical_duration;
        let dead_threshold = terminal_threshold + terminal_duration;
        let recovered_threshold = immune_onset + recovery_duration;

        Self {
            generator_code,
            immune_onset,
            recovery_duration,
            shedding_onset,
            symptom_onset,
            moderate_duration,
            critical_duration,
            terminal_duration,
            recovered_threshold,
            critical_threshold,
            terminal_threshold,
            dead_threshold,
        }
    }

    #[must_use]
    pub fn generator_code(&self) -> u32 {
        self.generator_code
    }
    /// Recovery value at which the individual stabilizes.
    /// The generator code as zero-padded hex, e.g. `0x00ffff33`.
    #[must_use]
    pub fn code_label(&self) -> String {
        format!("{:#010x}", self.generator_code)
    }

    #[must_use]
    pub fn immune_onset(&self) -> u8 {
        self.immune_onset
    }
    #[must_use]
    pub fn recovery_duration(&self) -> u8 {
        self.recovery_duration
    }
    /// Recovery value at which the individual has fully recovered.
    #[must_use]
    pub fn recovered_threshold(&self) -> u8 {
        self.recovered_threshold
    }
    /// Illness value at which the individual becomes contagious.
    #[must_use]
    pub fn shedding_onset(&self) -> u8 {
        self.shedding_onset
    }
    /// Illness value at which symptoms appear.
    #[must_use]
    pub fn symptom_onset(&self) -> u8 {
        self.symptom_onset
    }
    #[must_use]
    pub fn moderate_duration(&self) -> u8 {
        self.moderate_duration
    }
    #[must_use]
    pub fn critical_duration(&self) -> u8 {
        self.critical_duration
    }
    #[must_use]
    pub fn terminal_duration(&self) -> u8 {
        self.terminal_duration
    }
    #[must_use]
    pub fn critical_threshold(&self) -> u8 {
        self.critical_threshold
    }
    /// Illness value past which recovery can no longer progress.
    #[must_use]
    pub fn terminal_threshold(&self) -> u8 {
        self.terminal_threshold
    }
    #[must_use]
    pub fn dead_threshold(&self) -> u8 {
        self.dead_threshold
    }

    /// Two-line description: the illness thresholds (contagiousness in
    /// parentheses, then symptoms, critical, terminal, death) and the
    /// recovery thresholds (stabilization, full recovery).
    #[must_use]
    pub fn summary_label(&self) -> String {
        self.to_string()
    }
}

impl Display for Pathogen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Progression: ({}), {}, {}, {}, {}",
            self.shedding_onset,
            self.symptom_onset,
            self.critical_threshold,
            self.terminal_threshold,
            self.dead_threshold
        )?;
        write!(
            f,
            "Recovery: {}, {}",
            self.immune_onset, self.recovered_threshold
        )
    }
}

#[cfg(test)]
mod test {
    use super::{consecutive_ones, Pathogen, GENERATOR_CODE_COUNT, MAX_GENERATOR_CODE};
    use crate::{error::ProgressionError, random::stream_rng};

    #[test]
    fn test_consecutive_ones_edges() {
        assert_eq!(consecutive_ones(0x00), 0);
        assert_eq!(consecutive_ones(0xFF), 8);
        assert_eq!(consecutive_ones(0b0000_0001), 1);
        assert_eq!(consecutive_ones(0b0111_1111), 7);
        assert_eq!(consecutive_ones(0b1111_1110), 0);
        assert_eq!(consecutive_ones(0x33), 2);
    }

    #[test]
    fn test_consecutive_ones_never_exceeds_eight() {
        for value in 0..=u8::MAX {
            assert!(consecutive_ones(value) <= 8);
        }
    }

    #[test]
    fn test_known_generator_code() {
        let p = Pathogen::new(0x00FF_FF33).unwrap();
        assert_eq!(p.generator_code(), 0x00FF_FF33);
        assert_eq!(p.immune_onset(), 2);
        assert_eq!(p.recovery_duration(), 4);
        assert_eq!(p.terminal_duration(), 4);
        assert_eq!(p.symptom_onset(), 9);
        assert_eq!(p.shedding_onset(), 9);
        assert_eq!(p.moderate_duration(), 9);
        assert_eq!(p.critical_duration(), 9);
        assert_eq!(p.recovered_threshold(), 6);
        assert_eq!(p.critical_threshold(), 18);
        assert_eq!(p.terminal_threshold(), 27);
        assert_eq!(p.dead_threshold(), 31);
    }

    #[test]
    fn test_zero_code_is_mildest_fields() {
        let p = Pathogen::new(0).unwrap();
        assert_eq!(p.immune_onset(), 0);
        assert_eq!(p.recovery_duration(), 1);
        assert_eq!(p.terminal_duration(), 1);
        assert_eq!(p.symptom_onset(), 2);
        assert_eq!(p.shedding_onset(), 2);
        assert_eq!(p.moderate_duration(), 2);
        assert_eq!(p.critical_duration(), 2);
        assert_eq!(p.recovered_threshold(), 1);
        assert_eq!(p.critical_threshold(), 4);
        assert_eq!(p.terminal_threshold(), 6);
        assert_eq!(p.dead_threshold(), 7);
    }

    #[test]
    fn test_single_fields_are_isolated() {
        // shedding_onset alone at its maximum
        let p = Pathogen::new(0b111 << 15).unwrap();
        assert_eq!(p.shedding_onset(), 9);
        assert_eq!(p.symptom_onset(), 2);
        assert_eq!(p.moderate_duration(), 2);
        // terminal_duration alone at its maximum
        let p = Pathogen::new(0b11 << 10).unwrap();
        assert_eq!(p.terminal_duration(), 4);
        assert_eq!(p.recovery_duration(), 1);
        assert_eq!(p.dead_threshold(), 10);
    }

    #[test]
    fn test_out_of_range_code_rejected() {
        assert!(Pathogen::new(MAX_GENERATOR_CODE).is_ok());
        match Pathogen::new(GENERATOR_CODE_COUNT) {
            Err(ProgressionError::InvalidGeneratorCode(code)) => {
                assert_eq!(code, GENERATOR_CODE_COUNT);
            }
            other => panic!("Expected InvalidGeneratorCode, got {other:?}"),
        }
        assert!(Pathogen::new(u32::MAX).is_err());
    }

    #[test]
    fn test_derived_sums_and_ranges() {
        // Stride through the code space; covers every value of every field.
        for code in (0..GENERATOR_CODE_COUNT).step_by(4099) {
            let p = Pathogen::new(code).unwrap();
            assert_eq!(Pathogen::new(code).unwrap(), p);
            assert_eq!(
                p.recovered_threshold(),
                p.immune_onset() + p.recovery_duration()
            );
            assert_eq!(
                p.critical_threshold(),
                p.symptom_onset() + p.moderate_duration()
            );
            assert_eq!(
                p.terminal_threshold(),
                p.critical_threshold() + p.critical_duration()
            );
            assert_eq!(
                p.dead_threshold(),
                p.terminal_threshold() + p.terminal_duration()
            );
            assert!(p.immune_onset() <= 8);
            assert!((1..=12).contains(&p.recovered_threshold()));
            assert!((2..=9).contains(&p.shedding_onset()));
            assert!((4..=18).contains(&p.critical_threshold()));
            assert!((6..=27).contains(&p.terminal_threshold()));
            assert!((7..=31).contains(&p.dead_threshold()));
        }
    }

    #[test]
    fn test_random_pathogen_is_valid() {
        let mut rng = stream_rng(3, "pathogen", 0);
        for _ in 0..1000 {
            let p = Pathogen::random(&mut rng);
            assert!(p.generator_code() <= MAX_GENERATOR_CODE);
            assert_eq!(Pathogen::new(p.generator_code()).unwrap(), p);
        }
    }

    #[test]
    fn test_summary_label() {
        let p = Pathogen::new(0x00FF_FF33).unwrap();
        assert_eq!(
            p.summary_label(),
            "Progression: (9), 9, 18, 27, 31\nRecovery: 2, 6"
        );
    }

    #[test]
    fn test_code_label_is_zero_padded() {
        assert_eq!(Pathogen::new(0x00FF_FF33).unwrap().code_label(), "0x00ffff33");
        assert_eq!(Pathogen::new(0x2A).unwrap().code_label(), "0x0000002a");
        assert_eq!(Pathogen::new(0).unwrap().code_label(), "0x00000000");
    }
}
