//! Vendor command set and register sequences for the JD9165BA.

use embedded_hal::delay::DelayNs;

use crate::CommandTransport;

/// Enter sleep mode.
pub const CMD_SLPIN: u8 = 0x10;
/// Exit sleep mode.
pub const CMD_SLPOUT: u8 = 0x11;
/// Display off.
pub const CMD_DISPOFF: u8 = 0x28;
/// Display on.
pub const CMD_DISPON: u8 = 0x29;
/// Memory access / orientation control.
pub const CMD_MADCTL: u8 = 0x36;
/// Interface pixel format.
pub const CMD_COLMOD: u8 = 0x3A;
/// Power-rail control.
pub const CMD_SETPOWER: u8 = 0xB1;
/// Display cycle timing.
pub const CMD_SETCYC: u8 = 0xB4;
/// Common-voltage (VCOM) level.
pub const CMD_SETVCOM: u8 = 0xB6;
/// Extended command set enable.
pub const CMD_SETEXTC: u8 = 0xB9;
/// Serial interface mode select.
pub const CMD_SETMIPI: u8 = 0xBA;
/// Gamma correction curve.
pub const CMD_SETGAMMA: u8 = 0xC7;
/// Panel electrical characteristics.
pub const CMD_SETPANEL: u8 = 0xCC;

/// Settle time after sleep-in/sleep-out. Datasheet minimum; shortening it
/// leaves the charge pumps mid-transition.
pub const SLEEP_SETTLE_MS: u32 = 120;
/// Settle time after display on/off.
pub const DISPLAY_SETTLE_MS: u32 = 20;

/// MADCTL value selecting the module's landscape orientation
/// (row/column exchange plus column mirror). The only place rotation is
/// applied; must stay in step with [`crate::LOGICAL_WIDTH`] and
/// [`crate::LOGICAL_HEIGHT`].
pub const MADCTL_LANDSCAPE: u8 = 0x60;

/// COLMOD value for 16 bit/pixel (RGB565).
pub const COLMOD_16BPP: u8 = 0x55;

/// 32-point gamma correction curve, black to white.
pub const GAMMA_CURVE: [u8; 32] = [
    0x00, 0x04, 0x09, 0x0C, 0x10, 0x15, 0x19, 0x1F, //
    0x24, 0x2E, 0x38, 0x3E, 0x4A, 0x56, 0x5F, 0x66, //
    0x6E, 0x76, 0x7F, 0x85, 0x8C, 0x94, 0x9C, 0xA5, //
    0xAF, 0xB9, 0xC5, 0xD1, 0xDD, 0xE9, 0xF5, 0xFF,
];

/// One register write plus the settle time its effect needs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommandStep {
    pub opcode: u8,
    pub params: &'static [u8],
    pub delay_ms: u32,
}

impl CommandStep {
    const fn new(opcode: u8, params: &'static [u8], delay_ms: u32) -> Self {
        Self {
            opcode,
            params,
            delay_ms,
        }
    }
}

/// Full register bring-up: unlock, signaling mode, rails, timing, gamma,
/// pixel format, orientation, then sleep exit and display enable.
///
/// Order is load-bearing. Each write depends on register state left by the
/// one before it, so the table is never reordered and never partially
/// retried.
pub const POWER_ON_SEQUENCE: &[CommandStep] = &[
    CommandStep::new(CMD_SETEXTC, &[0xF1, 0x12, 0x83], 0),
    CommandStep::new(CMD_SETMIPI, &[0x33], 0),
    CommandStep::new(CMD_SETPOWER, &[0x00, 0x09, 0x0C, 0x0C, 0x33, 0x33], 0),
    CommandStep::new(CMD_SETCYC, &[0x80, 0x08, 0x04, 0x26, 0x26, 0x04, 0x00], 0),
    CommandStep::new(CMD_SETVCOM, &[0x87], 0),
    CommandStep::new(CMD_SETPANEL, &[0x0B], 0),
    CommandStep::new(CMD_SETGAMMA, &GAMMA_CURVE, 0),
    CommandStep::new(CMD_COLMOD, &[COLMOD_16BPP], 0),
    CommandStep::new(CMD_MADCTL, &[MADCTL_LANDSCAPE], 0),
    CommandStep::new(CMD_SLPOUT, &[], SLEEP_SETTLE_MS),
    CommandStep::new(CMD_DISPON, &[], DISPLAY_SETTLE_MS),
];

/// Sleep entry.
pub const SLEEP_SEQUENCE: &[CommandStep] = &[CommandStep::new(CMD_SLPIN, &[], SLEEP_SETTLE_MS)];

/// Sleep exit and display re-enable.
pub const WAKE_SEQUENCE: &[CommandStep] = &[
    CommandStep::new(CMD_SLPOUT, &[], SLEEP_SETTLE_MS),
    CommandStep::new(CMD_DISPON, &[], DISPLAY_SETTLE_MS),
];

/// Display disable and sleep entry, used during teardown.
pub const POWER_OFF_SEQUENCE: &[CommandStep] = &[
    CommandStep::new(CMD_DISPOFF, &[], DISPLAY_SETTLE_MS),
    CommandStep::new(CMD_SLPIN, &[], SLEEP_SETTLE_MS),
];

/// Executes `steps` top to bottom, blocking for each step's settle time
/// after a successful send.
///
/// The first transport failure aborts the rest of the sequence and is
/// returned to the caller; continuing against a non-responding controller
/// would leave its registers in an undefined state.
pub fn run_sequence<T, D>(io: &mut T, delay: &mut D, steps: &[CommandStep]) -> Result<(), T::Error>
where
    T: CommandTransport,
    D: DelayNs,
{
    for step in steps {
        io.send(step.opcode, step.params)?;
        if step.delay_ms > 0 {
            delay.delay_ms(step.delay_ms);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingLink {
        sent: Vec<(u8, Vec<u8>)>,
        fail_on: Option<u8>,
    }

    impl RecordingLink {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                fail_on: None,
            }
        }
    }

    impl CommandTransport for RecordingLink {
        type Error = u8;

        fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
            if self.fail_on == Some(opcode) {
                return Err(opcode);
            }
            self.sent.push((opcode, params.to_vec()));
            Ok(())
        }
    }

    struct RecordingDelay {
        slept_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.slept_ms.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.slept_ms.push(ms);
        }
    }

    #[test]
    fn gamma_curve_is_monotone_and_spans_full_range() {
        assert_eq!(GAMMA_CURVE.len(), 32);
        assert_eq!(GAMMA_CURVE[0], 0x00);
        assert_eq!(GAMMA_CURVE[31], 0xFF);
        assert!(GAMMA_CURVE.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn power_on_gamma_step_carries_the_full_curve() {
        let gamma = POWER_ON_SEQUENCE
            .iter()
            .find(|step| step.opcode == CMD_SETGAMMA)
            .unwrap();
        assert_eq!(gamma.params, &GAMMA_CURVE[..]);
        assert_eq!(gamma.params.len(), 32);
    }

    #[test]
    fn power_on_order_matches_datasheet() {
        let opcodes: Vec<u8> = POWER_ON_SEQUENCE.iter().map(|step| step.opcode).collect();
        assert_eq!(
            opcodes,
            [
                CMD_SETEXTC,
                CMD_SETMIPI,
                CMD_SETPOWER,
                CMD_SETCYC,
                CMD_SETVCOM,
                CMD_SETPANEL,
                CMD_SETGAMMA,
                CMD_COLMOD,
                CMD_MADCTL,
                CMD_SLPOUT,
                CMD_DISPON,
            ]
        );
    }

    #[test]
    fn register_parameter_lengths_match_datasheet() {
        let len_of = |opcode: u8| {
            POWER_ON_SEQUENCE
                .iter()
                .find(|step| step.opcode == opcode)
                .unwrap()
                .params
                .len()
        };
        assert_eq!(len_of(CMD_SETEXTC), 3);
        assert_eq!(len_of(CMD_SETMIPI), 1);
        assert_eq!(len_of(CMD_SETPOWER), 6);
        assert_eq!(len_of(CMD_SETCYC), 7);
        assert_eq!(len_of(CMD_SETVCOM), 1);
        assert_eq!(len_of(CMD_SETPANEL), 1);
        assert_eq!(len_of(CMD_COLMOD), 1);
        assert_eq!(len_of(CMD_MADCTL), 1);
    }

    #[test]
    fn settle_times_meet_chip_minimums() {
        let slpout = POWER_ON_SEQUENCE
            .iter()
            .find(|step| step.opcode == CMD_SLPOUT)
            .unwrap();
        let dispon = POWER_ON_SEQUENCE
            .iter()
            .find(|step| step.opcode == CMD_DISPON)
            .unwrap();
        assert!(slpout.delay_ms >= 120);
        assert!(dispon.delay_ms >= 20);
    }

    #[test]
    fn wake_sequence_is_the_power_on_tail() {
        let tail = &POWER_ON_SEQUENCE[POWER_ON_SEQUENCE.len() - 2..];
        assert_eq!(tail, WAKE_SEQUENCE);
    }

    #[test]
    fn run_sequence_sends_in_order_and_applies_settle_times() {
        let mut link = RecordingLink::new();
        let mut delay = RecordingDelay { slept_ms: Vec::new() };

        run_sequence(&mut link, &mut delay, POWER_ON_SEQUENCE).unwrap();

        assert_eq!(link.sent.len(), POWER_ON_SEQUENCE.len());
        assert_eq!(link.sent[0].0, CMD_SETEXTC);
        assert_eq!(link.sent[0].1, vec![0xF1, 0x12, 0x83]);
        assert_eq!(delay.slept_ms, vec![SLEEP_SETTLE_MS, DISPLAY_SETTLE_MS]);
    }

    #[test]
    fn run_sequence_aborts_on_first_failure() {
        let mut link = RecordingLink::new();
        link.fail_on = Some(CMD_SETVCOM);
        let mut delay = RecordingDelay { slept_ms: Vec::new() };

        let err = run_sequence(&mut link, &mut delay, POWER_ON_SEQUENCE).unwrap_err();

        assert_eq!(err, CMD_SETVCOM);
        // Everything before the failing step went out, nothing after it.
        assert_eq!(link.sent.len(), 4);
        assert!(delay.slept_ms.is_empty());
    }
}
