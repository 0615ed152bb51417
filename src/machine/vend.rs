use std::io::{Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::{Result, SaleResult, Transaction};
use crate::hw::{Dispenser, Display, Keypad};
use crate::machine::config::MachineConfig;
use crate::protocol::{Command, ResponseKind};
use crate::terminal::TerminalClient;

/// Steps of the vend cycle, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendStep {
    /// Waiting for the terminal to reach the disabled state
    PollingIdle,
    /// Waiting for a product key
    ProductSelect,
    /// Waiting for a portion key
    AmountSelect,
    /// Waiting for the confirm key
    Confirm,
    /// Waiting for the terminal's authorization verdict
    Authorize,
    /// Running the motor move sequence
    Dispense,
    /// Reporting the sale and collecting the transaction id
    ReportResult,
}

/// Why a cycle ended before payment was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No valid key before the selection deadline
    SelectionTimeout,
    /// Customer pressed the cancel key
    Cancelled,
    /// No authorization verdict before the deadline
    AuthorizationTimeout,
}

/// Why a cycle ended as a failed sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Bank declined the authorization
    Declined,
    /// The motor sequence did not complete
    DispenseFailed,
}

/// Outcome of one pass through the vend cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Terminal needed recovery; no sale was solicited
    NotReady,
    /// Transaction discarded; nothing was charged
    Aborted(AbortReason),
    /// Transaction ended in a reported failure
    Failed(FailureReason),
    /// Product dispensed and the sale reported
    Completed(Transaction),
}

/// The transaction state machine.
///
/// Owns the terminal client and the hardware collaborators exclusively; one
/// control thread drives everything, so no step ever runs concurrently with
/// another.
pub struct VendingMachine<T, K, D, P> {
    terminal: TerminalClient<T>,
    keypad: K,
    display: D,
    dispenser: P,
    config: MachineConfig,
}

impl<T, K, D, P> VendingMachine<T, K, D, P>
where
    T: Read + Write,
    K: Keypad,
    D: Display,
    P: Dispenser,
{
    /// Creates a machine from its collaborators and configuration
    pub fn new(
        terminal: TerminalClient<T>,
        keypad: K,
        display: D,
        dispenser: P,
        config: MachineConfig,
    ) -> Self {
        VendingMachine {
            terminal,
            keypad,
            display,
            dispenser,
            config,
        }
    }

    /// Shows the boot screen and disables the terminal before the first sale
    pub fn prepare(&mut self) -> Result<()> {
        self.display.clear();
        self.display.show("Booting...", 2, 5);
        self.terminal.send(Command::Disable, &[])?;
        Ok(())
    }

    /// Runs the vend loop forever.
    ///
    /// Every recoverable failure is absorbed here: declines, timeouts,
    /// framing faults, and unknown responses all restart the cycle from
    /// status polling. Only transport open failure, which happens before the
    /// machine is constructed, terminates the controller.
    pub fn run(&mut self) {
        if let Err(e) = self.prepare() {
            warn!("terminal not ready at startup: {}", e);
        }
        loop {
            match self.vend_cycle() {
                Ok(CycleOutcome::Completed(tx)) => {
                    info!(
                        product = %tx.product.name,
                        price = tx.price,
                        id = tx.transaction_id.as_deref().unwrap_or("?"),
                        "sale completed"
                    );
                }
                Ok(outcome) => debug!(?outcome, "cycle ended without a sale"),
                Err(e) => warn!("vend cycle error: {}", e),
            }
        }
    }

    /// Drives one purchase attempt from status polling to a terminal state.
    ///
    /// The in-progress transaction is discarded on every early return; the
    /// next cycle starts fresh from status polling.
    pub fn vend_cycle(&mut self) -> Result<CycleOutcome> {
        debug!(step = ?VendStep::PollingIdle, "cycle start");
        let status = self.terminal.send(Command::Status, &[])?;
        match status.kind {
            ResponseKind::ExpectingResult => {
                // The terminal is stuck waiting on a result from a previous
                // life of the controller; reset it and come back around.
                warn!("terminal expecting a transaction result; resetting");
                self.terminal.send(Command::Reset, &[])?;
                thread::sleep(self.config.timings.recovery_pause);
                return Ok(CycleOutcome::NotReady);
            }
            ResponseKind::Disabled => {}
            other => {
                debug!(status = other.name(), "disabling terminal before sale");
                self.terminal.send(Command::Disable, &[])?;
                thread::sleep(self.config.timings.recovery_pause);
                return Ok(CycleOutcome::NotReady);
            }
        }

        debug!(step = ?VendStep::ProductSelect);
        let Some(product) = self.select_product() else {
            return Ok(CycleOutcome::Aborted(AbortReason::SelectionTimeout));
        };

        debug!(step = ?VendStep::AmountSelect, product = %product.name);
        let Some(portion) = self.select_portion() else {
            return Ok(CycleOutcome::Aborted(AbortReason::SelectionTimeout));
        };

        let mut tx = Transaction::new(product, portion);

        debug!(step = ?VendStep::Confirm, price = tx.price);
        match self.confirm_selection(&tx) {
            Some(key) if key == self.config.confirm_key => {}
            Some(_) => return Ok(CycleOutcome::Aborted(AbortReason::Cancelled)),
            None => return Ok(CycleOutcome::Aborted(AbortReason::SelectionTimeout)),
        }

        debug!(step = ?VendStep::Authorize, price = tx.price);
        match self.authorize(&tx)? {
            Some(true) => tx.authorized = true,
            Some(false) => {
                self.display.clear();
                self.display.show("Payment declined", 2, 1);
                self.display.show("Purchase cancelled", 3, 1);
                thread::sleep(self.config.timings.farewell_pause);
                return Ok(CycleOutcome::Failed(FailureReason::Declined));
            }
            None => return Ok(CycleOutcome::Aborted(AbortReason::AuthorizationTimeout)),
        }

        debug!(step = ?VendStep::Dispense);
        let dispensed = self.dispense();

        debug!(step = ?VendStep::ReportResult, dispensed);
        if dispensed {
            tx.result = Some(SaleResult::Completed);
            self.report_result(&mut tx)?;
            self.terminal.send(Command::Disable, &[])?;
            self.display.clear();
            self.display.show("Thank you for ", 2, 3);
            self.display.show("your purchase!", 3, 3);
            thread::sleep(self.config.timings.farewell_pause);
            Ok(CycleOutcome::Completed(tx))
        } else {
            tx.result = Some(SaleResult::DispenseFailed);
            self.terminal.send(Command::Reset, &[])?;
            self.display.clear();
            self.display.show("Something went wrong", 2, 1);
            self.display.show("Purchase cancelled", 3, 1);
            thread::sleep(self.config.timings.farewell_pause);
            Ok(CycleOutcome::Failed(FailureReason::DispenseFailed))
        }
    }

    /// Waits for a product key; `None` on deadline expiry
    fn select_product(&mut self) -> Option<crate::core::Product> {
        self.display.clear();
        self.display.show("Please select", 2, 5);
        self.display.show("product", 3, 6);

        let interval = self.config.timings.key_poll;
        let deadline = self.config.timings.product_deadline;
        let config = &self.config;
        let key = Self::poll_key(&mut self.keypad, interval, deadline, |k| {
            config.product(k).is_some()
        })?;
        self.config.product(key).cloned()
    }

    /// Waits for a portion key; `None` on deadline expiry
    fn select_portion(&mut self) -> Option<crate::core::Portion> {
        self.display.clear();
        for (i, portion) in self.config.portions.iter().enumerate() {
            self.display
                .show(&format!("{}: {}", portion.key, portion.description), i as u8 + 1, 4);
        }

        let interval = self.config.timings.key_poll;
        let deadline = self.config.timings.portion_deadline;
        let config = &self.config;
        let key = Self::poll_key(&mut self.keypad, interval, deadline, |k| {
            config.portion(k).is_some()
        })?;
        self.config.portion(key).cloned()
    }

    /// Shows the selection summary and waits for confirm or cancel
    fn confirm_selection(&mut self, tx: &Transaction) -> Option<char> {
        self.display.clear();
        self.display
            .show(&format!("{} of ", tx.portion.description), 1, 1);
        self.display.show(&tx.product.name, 2, 1);
        self.display.show(&tx.price_display(), 3, 1);
        self.display.show(
            &format!(
                "{}-confirm {}-cancel",
                self.config.confirm_key, self.config.cancel_key
            ),
            4,
            1,
        );

        let interval = self.config.timings.key_poll;
        let deadline = self.config.timings.confirm_deadline;
        let confirm = self.config.confirm_key;
        let cancel = self.config.cancel_key;
        Self::poll_key(&mut self.keypad, interval, deadline, |k| {
            k == confirm || k == cancel
        })
    }

    /// Requests authorization and polls for the verdict.
    ///
    /// `Some(true)` approved, `Some(false)` declined, `None` deadline expired
    /// with no verdict.
    fn authorize(&mut self, tx: &Transaction) -> Result<Option<bool>> {
        self.terminal
            .send(Command::AuthorizationRequest, &[&tx.price_field()])?;
        self.display.clear();
        self.display.show("Please swipe card...", 1, 1);

        let begin = Instant::now();
        loop {
            let status = self.terminal.send(Command::Status, &[])?;
            match status.kind {
                ResponseKind::AuthApproved => return Ok(Some(true)),
                ResponseKind::AuthDeclined => {
                    warn!(
                        code = status.field("code").unwrap_or("?"),
                        message = status.field("message").unwrap_or(""),
                        "authorization declined"
                    );
                    return Ok(Some(false));
                }
                _ => {}
            }
            if let Some(limit) = self.config.timings.auth_deadline {
                if begin.elapsed() > limit {
                    return Ok(None);
                }
            }
            thread::sleep(self.config.timings.auth_poll);
        }
    }

    /// Runs the configured move sequence; any driver error counts as failure
    fn dispense(&mut self) -> bool {
        self.display.clear();
        self.display.show("Dispensing...", 1, 1);
        match self.dispenser.dispense(
            &self.config.dispense_moves,
            self.config.dispense_pre_wait,
            self.config.dispense_post_wait,
        ) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("dispense error: {}", e);
                false
            }
        }
    }

    /// Reports the sale and polls status until the transaction id arrives
    fn report_result(&mut self, tx: &mut Transaction) -> Result<()> {
        // Sale status, item number, price in cents, terminal code, receipt mode.
        let price = tx.price_field();
        self.terminal.send(
            Command::TransactionResult,
            &["1", "1", price.as_str(), "999", "print"],
        )?;
        self.terminal.send(Command::RequestTransactionId, &[])?;

        loop {
            let status = self.terminal.send(Command::Status, &[])?;
            if status.kind == ResponseKind::TransactionId {
                tx.transaction_id = status.field("transaction_id").map(String::from);
                return Ok(());
            }
            thread::sleep(self.config.timings.id_poll);
        }
    }

    /// Polls the keypad until exactly one accepted key is held down.
    ///
    /// `deadline` is explicit: `None` waits indefinitely, `Some` bounds the
    /// wait from now. Returns `None` on expiry.
    fn poll_key<F>(
        keypad: &mut K,
        interval: Duration,
        deadline: Option<Duration>,
        accept: F,
    ) -> Option<char>
    where
        F: Fn(char) -> bool,
    {
        let begin = Instant::now();
        loop {
            thread::sleep(interval);
            if let Some(limit) = deadline {
                if begin.elapsed() > limit {
                    return None;
                }
            }
            let pressed = keypad.pressed();
            if pressed.len() != 1 {
                continue;
            }
            if accept(pressed[0]) {
                return Some(pressed[0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::config::Timings;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::ErrorKind;
    use std::rc::Rc;

    /// Scripted terminal: asserts command order and replies from a queue.
    ///
    /// The client writes one complete frame per `write` call, so each call is
    /// treated as one command.
    struct FakeTerminal {
        script: VecDeque<(&'static str, Vec<u8>)>,
        sent: Rc<RefCell<Vec<Vec<u8>>>>,
        incoming: VecDeque<u8>,
    }

    impl FakeTerminal {
        fn new(script: Vec<(&'static str, Vec<u8>)>) -> (Self, Rc<RefCell<Vec<Vec<u8>>>>) {
            let sent = Rc::new(RefCell::new(Vec::new()));
            (
                FakeTerminal {
                    script: script.into(),
                    sent: Rc::clone(&sent),
                    incoming: VecDeque::new(),
                },
                sent,
            )
        }
    }

    impl Read for FakeTerminal {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.incoming.is_empty() {
                return Err(std::io::Error::new(ErrorKind::TimedOut, "no data"));
            }
            let n = buf.len().min(self.incoming.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.incoming.pop_front().expect("length checked");
            }
            Ok(n)
        }
    }

    impl Write for FakeTerminal {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let sep = buf.iter().position(|&b| b == 0x1E);
            let cr = buf.iter().position(|&b| b == 0x0D);
            let id_end = sep.or(cr).unwrap_or(buf.len());
            let id = String::from_utf8_lossy(&buf[..id_end]).to_string();

            let (expected, response) = self
                .script
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected command {:?} past end of script", id));
            assert_eq!(id, expected, "command out of order");

            self.sent.borrow_mut().push(buf.to_vec());
            self.incoming.extend(response);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Keypad that replays a scripted sequence of polls, then reads empty
    struct FakeKeypad {
        polls: VecDeque<Vec<char>>,
    }

    impl FakeKeypad {
        fn new(polls: Vec<Vec<char>>) -> Self {
            FakeKeypad {
                polls: polls.into(),
            }
        }
    }

    impl Keypad for FakeKeypad {
        fn pressed(&mut self) -> Vec<char> {
            self.polls.pop_front().unwrap_or_default()
        }
    }

    /// Display that records every line it is asked to show
    #[derive(Clone, Default)]
    struct FakeDisplay {
        lines: Rc<RefCell<Vec<String>>>,
    }

    impl Display for FakeDisplay {
        fn show(&mut self, text: &str, _line: u8, _column: u8) {
            self.lines.borrow_mut().push(text.to_string());
        }

        fn clear(&mut self) {}
    }

    /// Dispenser with a scripted verdict
    struct FakeDispenser {
        verdict: Result<bool>,
        calls: Rc<RefCell<usize>>,
    }

    impl FakeDispenser {
        fn new(verdict: Result<bool>) -> (Self, Rc<RefCell<usize>>) {
            let calls = Rc::new(RefCell::new(0));
            (
                FakeDispenser {
                    verdict,
                    calls: Rc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl Dispenser for FakeDispenser {
        fn dispense(
            &mut self,
            moves: &[crate::hw::MoveCommand],
            _pre_wait: Duration,
            _post_wait: Duration,
        ) -> Result<bool> {
            assert!(!moves.is_empty());
            *self.calls.borrow_mut() += 1;
            match &self.verdict {
                Ok(ok) => Ok(*ok),
                Err(_) => Err(crate::core::Error::dispense("jam")),
            }
        }
    }

    fn test_config() -> MachineConfig {
        let mut config = MachineConfig::default();
        config.timings = Timings {
            key_poll: Duration::from_millis(1),
            auth_poll: Duration::from_millis(1),
            id_poll: Duration::from_millis(1),
            product_deadline: Some(Duration::from_millis(100)),
            portion_deadline: Some(Duration::from_millis(100)),
            confirm_deadline: Some(Duration::from_millis(100)),
            auth_deadline: Some(Duration::from_millis(100)),
            recovery_pause: Duration::ZERO,
            farewell_pause: Duration::ZERO,
        };
        config
    }

    fn ack() -> Vec<u8> {
        vec![0x06]
    }

    fn approved() -> Vec<u8> {
        let mut frame = b"2\x1e3.00\x1e411111XXXXXX1111".to_vec();
        frame.extend_from_slice(&[0x21, 0x43, 0x0D]);
        frame
    }

    fn declined() -> Vec<u8> {
        let mut frame = b"3\x1e05\x1eDO NOT HONOR".to_vec();
        frame.extend_from_slice(&[0x21, 0x43, 0x0D]);
        frame
    }

    fn machine(
        script: Vec<(&'static str, Vec<u8>)>,
        keys: Vec<Vec<char>>,
        verdict: Result<bool>,
    ) -> (
        VendingMachine<FakeTerminal, FakeKeypad, FakeDisplay, FakeDispenser>,
        Rc<RefCell<Vec<Vec<u8>>>>,
        Rc<RefCell<Vec<String>>>,
        Rc<RefCell<usize>>,
    ) {
        let (terminal, sent) = FakeTerminal::new(script);
        let display = FakeDisplay::default();
        let lines = Rc::clone(&display.lines);
        let (dispenser, dispenses) = FakeDispenser::new(verdict);
        let machine = VendingMachine::new(
            TerminalClient::new(terminal),
            FakeKeypad::new(keys),
            display,
            dispenser,
            test_config(),
        );
        (machine, sent, lines, dispenses)
    }

    fn idents(sent: &Rc<RefCell<Vec<Vec<u8>>>>) -> Vec<String> {
        sent.borrow()
            .iter()
            .map(|frame| {
                let end = frame
                    .iter()
                    .position(|&b| b == 0x1E || b == 0x0D)
                    .unwrap_or(frame.len());
                String::from_utf8_lossy(&frame[..end]).to_string()
            })
            .collect()
    }

    #[test]
    fn test_busy_terminal_is_disabled_first() {
        let script = vec![("1", b"1\r".to_vec()), ("6", ack())];
        let (mut machine, sent, _, _) = machine(script, vec![], Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::NotReady);
        assert_eq!(idents(&sent), vec!["1", "6"]);
    }

    #[test]
    fn test_expecting_result_triggers_reset() {
        let script = vec![("1", b"9\r".to_vec()), ("3", ack())];
        let (mut machine, sent, _, _) = machine(script, vec![], Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::NotReady);
        assert_eq!(idents(&sent), vec!["1", "3"]);
    }

    #[test]
    fn test_successful_sale() {
        // Cycle 1: terminal busy, machine disables it. Cycle 2: full sale.
        let script = vec![
            ("1", b"1\r".to_vec()),
            ("6", ack()),
            ("1", b"6\r".to_vec()),
            ("21", ack()),
            ("1", approved()),
            ("22", ack()),
            ("13", ack()),
            ("1", b"0\r".to_vec()),
            ("1", b"17\x1e1234567890\r".to_vec()),
            ("6", ack()),
        ];
        let keys = vec![vec!['1'], vec!['3'], vec!['1']];
        let (mut machine, sent, lines, dispenses) = machine(script, keys, Ok(true));

        assert_eq!(machine.vend_cycle().unwrap(), CycleOutcome::NotReady);
        let outcome = machine.vend_cycle().unwrap();

        let CycleOutcome::Completed(tx) = outcome else {
            panic!("expected a completed sale, got {:?}", outcome);
        };
        assert_eq!(tx.product.name, "Lucky Charms");
        assert_eq!(tx.price, 300);
        assert!(tx.authorized);
        assert_eq!(tx.result, Some(SaleResult::Completed));
        assert_eq!(tx.transaction_id.as_deref(), Some("1234567890"));
        assert_eq!(*dispenses.borrow(), 1);

        // The authorization request carried the price in cents.
        let frames = sent.borrow();
        assert!(frames.iter().any(|f| f.starts_with(b"21\x1e300")));

        // Exactly one DISABLE after the transaction result was reported.
        let ids = idents(&sent);
        let report_at = ids.iter().position(|id| id == "22").unwrap();
        let disables_after = ids[report_at..].iter().filter(|id| *id == "6").count();
        assert_eq!(disables_after, 1);

        assert!(lines.borrow().iter().any(|l| l.contains("Thank you")));
    }

    #[test]
    fn test_portion_timeout_never_authorizes() {
        // A product key arrives, then the keypad goes quiet past the deadline.
        let script = vec![("1", b"6\r".to_vec())];
        let keys = vec![vec!['1']];
        let (mut machine, sent, _, dispenses) = machine(script, keys, Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::Aborted(AbortReason::SelectionTimeout));
        assert_eq!(idents(&sent), vec!["1"]);
        assert_eq!(*dispenses.borrow(), 0);
    }

    #[test]
    fn test_cancel_key_aborts() {
        let script = vec![("1", b"6\r".to_vec())];
        let keys = vec![vec!['1'], vec!['3'], vec!['2']];
        let (mut machine, sent, _, _) = machine(script, keys, Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::Aborted(AbortReason::Cancelled));
        assert_eq!(idents(&sent), vec!["1"]);
    }

    #[test]
    fn test_declined_authorization_fails_sale() {
        let script = vec![
            ("1", b"6\r".to_vec()),
            ("21", ack()),
            ("1", declined()),
        ];
        let keys = vec![vec!['1'], vec!['3'], vec!['1']];
        let (mut machine, _, lines, dispenses) = machine(script, keys, Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::Failed(FailureReason::Declined));
        assert_eq!(*dispenses.borrow(), 0);
        assert!(lines.borrow().iter().any(|l| l.contains("declined")));
    }

    #[test]
    fn test_authorization_timeout_aborts() {
        // Terminal keeps answering "authorizing" until the deadline passes.
        let pending: Vec<_> = std::iter::repeat(("1", b"8\r".to_vec()))
            .take(500)
            .collect();
        let mut script = vec![("1", b"6\r".to_vec()), ("21", ack())];
        script.extend(pending);
        let keys = vec![vec!['1'], vec!['3'], vec!['1']];
        let (mut machine, _, _, dispenses) = machine(script, keys, Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(
            outcome,
            CycleOutcome::Aborted(AbortReason::AuthorizationTimeout)
        );
        assert_eq!(*dispenses.borrow(), 0);
    }

    #[test]
    fn test_dispense_failure_resets_terminal() {
        let script = vec![
            ("1", b"6\r".to_vec()),
            ("21", ack()),
            ("1", approved()),
            ("3", ack()),
        ];
        let keys = vec![vec!['1'], vec!['3'], vec!['1']];
        let (mut machine, sent, lines, _) = machine(script, keys, Ok(false));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::Failed(FailureReason::DispenseFailed));
        assert_eq!(idents(&sent).last().map(String::as_str), Some("3"));
        assert!(lines.borrow().iter().any(|l| l.contains("went wrong")));
    }

    #[test]
    fn test_dispense_error_counts_as_failure() {
        let script = vec![
            ("1", b"6\r".to_vec()),
            ("21", ack()),
            ("1", approved()),
            ("3", ack()),
        ];
        let keys = vec![vec!['1'], vec!['3'], vec!['1']];
        let (mut machine, _, _, _) =
            machine(script, keys, Err(crate::core::Error::dispense("jam")));

        let outcome = machine.vend_cycle().unwrap();
        assert_eq!(outcome, CycleOutcome::Failed(FailureReason::DispenseFailed));
    }

    #[test]
    fn test_ignores_multi_key_and_unknown_presses() {
        let script = vec![
            ("1", b"6\r".to_vec()),
            ("21", ack()),
            ("1", approved()),
            ("22", ack()),
            ("13", ack()),
            ("1", b"17\x1e77\r".to_vec()),
            ("6", ack()),
        ];
        // Chords and unknown keys are skipped before each valid press.
        let keys = vec![
            vec!['1', '2'],
            vec!['9'],
            vec!['1'],
            vec![],
            vec!['3'],
            vec!['7'],
            vec!['1'],
        ];
        let (mut machine, _, _, _) = machine(script, keys, Ok(true));

        let outcome = machine.vend_cycle().unwrap();
        assert!(matches!(outcome, CycleOutcome::Completed(_)));
    }

    #[test]
    fn test_prepare_disables_terminal() {
        let script = vec![("6", ack())];
        let (mut machine, sent, lines, _) = machine(script, vec![], Ok(true));

        machine.prepare().unwrap();
        assert_eq!(idents(&sent), vec!["6"]);
        assert!(lines.borrow().iter().any(|l| l.contains("Booting")));
    }
}
