//! HidBridge: connects a serial byte source to a HID report sink.

use embassy_time::{with_deadline, Duration, Instant};
use embedded_hal_async::delay::DelayNs;

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::input::{InputError, InputSource};
use crate::output::ReportSink;
use crate::parser::{FrameParser, ParserStats};

/// Bytes pulled from the input per read.
pub const RX_CHUNK_LEN: usize = 16;

/// A bridge that parses frames from an input source and dispatches them
/// to a report sink.
///
/// # Error Handling
///
/// Input errors drop the in-flight frame, since bytes may have been lost,
/// and are returned from [`process_one`](Self::process_one). Output errors
/// are logged by the dispatcher and never stop the loop.
pub struct HidBridge<I, S, D> {
    input: I,
    sink: S,
    parser: FrameParser,
    dispatcher: Dispatcher<D>,
    rx_buf: [u8; RX_CHUNK_LEN],
}

impl<I: InputSource, S: ReportSink, D: DelayNs> HidBridge<I, S, D> {
    /// Create a new bridge from an input source, a report sink, and the
    /// delay used to pace mouse bursts.
    pub fn new(input: I, sink: S, delay: D) -> Self {
        Self {
            input,
            sink,
            parser: FrameParser::new(),
            dispatcher: Dispatcher::new(delay),
            rx_buf: [0; RX_CHUNK_LEN],
        }
    }

    /// Run the bridge, forwarding packets indefinitely.
    ///
    /// This method never returns under normal operation.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.process_one().await {
                error!("input error: {}", e);
            }
        }
    }

    /// Wait for input or the frame deadline, whichever comes first, and
    /// process what arrived.
    ///
    /// Returns the result of the read for testing purposes.
    pub async fn process_one(&mut self) -> Result<(), InputError> {
        let read = match self.parser.deadline() {
            Some(deadline) => {
                // The frame goes stale on the first tick past its deadline.
                let stale_at = deadline
                    .checked_add(Duration::from_ticks(1))
                    .unwrap_or(Instant::MAX);
                match with_deadline(stale_at, self.input.read(&mut self.rx_buf)).await {
                    Ok(read) => read,
                    Err(_) => {
                        self.parser.poll_timeout(Instant::now());
                        return Ok(());
                    }
                }
            }
            None => self.input.read(&mut self.rx_buf).await,
        };

        let len = match read {
            Ok(len) => len.min(RX_CHUNK_LEN),
            Err(e) => {
                self.parser.reset();
                return Err(e);
            }
        };

        let chunk = self.rx_buf;
        for &byte in &chunk[..len] {
            self.process_byte(byte, Instant::now()).await;
        }
        Ok(())
    }

    /// Feed one byte received at `now`, dispatching the packet it completes.
    ///
    /// A stale in-flight frame is dropped before the byte is consumed.
    pub async fn process_byte(&mut self, byte: u8, now: Instant) -> Option<DispatchOutcome> {
        self.parser.poll_timeout(now);
        let packet = self.parser.push_byte(byte, now)?;
        trace!("packet type {=u8:#x} len {}", packet.packet_type, packet.len());
        Some(self.dispatcher.dispatch(&packet, &mut self.sink).await)
    }

    /// Drop the in-flight frame if its deadline has been reached.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        self.parser.poll_timeout(now)
    }

    /// Deadline of the in-flight frame, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.parser.deadline()
    }

    /// Parser counters.
    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Get a reference to the frame parser.
    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    /// Get a reference to the input source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the input source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Get a reference to the report sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the report sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decompose the bridge into its input and sink.
    pub fn into_parts(self) -> (I, S) {
        (self.input, self.sink)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::dispatch::tests::{block_on, FakeDelay, FakeSink, SinkEvent};
    use crate::parser::ParserStage;
    use core::future::Future;
    use std::collections::VecDeque;
    use std::vec::Vec;
    use uart_hid_proto::{buttons, MouseCommand};

    const MOUSE_FRAME: [u8; 9] = [0xAA, 0x01, 0x05, 0x34, 0x12, 0x00, 0x00, 0x05, 0x51];
    const KEYBOARD_FRAME: [u8; 11] = [0xAA, 0x02, 0x07, 0x02, 0x04, 0, 0, 0, 0, 0, 0x0F];

    /// Scripted input: each entry is one read result. Once the script runs
    /// out, reads never complete.
    struct ScriptedInput {
        reads: VecDeque<Result<Vec<u8>, InputError>>,
    }

    impl ScriptedInput {
        fn new(reads: Vec<Result<Vec<u8>, InputError>>) -> Self {
            Self {
                reads: reads.into(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, InputError>> {
            let next = self.reads.pop_front();
            let result = next.map(|r| {
                r.map(|bytes| {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    bytes.len()
                })
            });
            async move {
                match result {
                    Some(r) => r,
                    None => core::future::pending().await,
                }
            }
        }
    }

    fn bridge(reads: Vec<Result<Vec<u8>, InputError>>) -> HidBridge<ScriptedInput, FakeSink, FakeDelay> {
        HidBridge::new(ScriptedInput::new(reads), FakeSink::ready(), FakeDelay::default())
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_process_byte_mouse_burst() {
        let mut bridge = bridge(Vec::new());

        let mut outcomes = Vec::new();
        for &b in &MOUSE_FRAME {
            if let Some(o) = block_on(bridge.process_byte(b, at(0))) {
                outcomes.push(o);
            }
        }

        assert_eq!(outcomes, [DispatchOutcome::MouseBurst { sent: 3 }]);
        let expected = MouseCommand::new(0x1234, 0, buttons::LEFT | buttons::MIDDLE);
        assert_eq!(bridge.sink().mouse_reports(), [expected; 3]);
        assert_eq!(bridge.stats().packets, 1);
    }

    #[test]
    fn test_timeout_then_fresh_frame() {
        let mut bridge = bridge(Vec::new());

        for &b in &MOUSE_FRAME[..3] {
            block_on(bridge.process_byte(b, at(0)));
        }
        assert!(bridge.deadline().is_some());

        for &b in &KEYBOARD_FRAME {
            block_on(bridge.process_byte(b, at(150)));
        }

        assert_eq!(bridge.sink().report_count(), 1);
        assert!(matches!(bridge.sink().events[0], SinkEvent::Keyboard(_)));
        assert_eq!(bridge.stats().timeouts, 1);
    }

    #[test]
    fn test_poll_timeout_without_bytes() {
        let mut bridge = bridge(Vec::new());
        block_on(bridge.process_byte(0xAA, at(0)));

        assert!(!bridge.poll_timeout(at(50)));
        assert!(!bridge.poll_timeout(at(100)));
        assert!(bridge.poll_timeout(at(101)));
        assert_eq!(bridge.deadline(), None);
    }

    #[test]
    fn test_process_one_reads_chunk() {
        let mut bridge = bridge(std::vec![Ok(MOUSE_FRAME.to_vec())]);

        assert_eq!(block_on(bridge.process_one()), Ok(()));
        assert_eq!(bridge.sink().mouse_reports().len(), 3);
    }

    #[test]
    fn test_process_one_frame_split_across_reads() {
        let mut bridge = bridge(std::vec![
            Ok(KEYBOARD_FRAME[..4].to_vec()),
            Ok(KEYBOARD_FRAME[4..].to_vec()),
        ]);

        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.parser().stage(), ParserStage::AwaitingPayload);
        block_on(bridge.process_one()).unwrap();

        assert_eq!(bridge.sink().report_count(), 1);
    }

    #[test]
    fn test_process_one_input_error_resyncs() {
        let mut tail = KEYBOARD_FRAME[5..].to_vec();
        tail.extend_from_slice(&MOUSE_FRAME);
        let mut bridge = bridge(std::vec![
            Ok(KEYBOARD_FRAME[..5].to_vec()),
            Err(InputError::Overrun),
            Ok(tail),
        ]);

        block_on(bridge.process_one()).unwrap();
        assert_eq!(block_on(bridge.process_one()), Err(InputError::Overrun));
        assert_eq!(bridge.parser().stage(), ParserStage::AwaitingMagic);
        block_on(bridge.process_one()).unwrap();

        // The keyboard frame was cut by the overrun; only the mouse frame lands.
        assert_eq!(bridge.sink().mouse_reports().len(), 3);
        assert_eq!(bridge.sink().report_count(), 3);
    }

    #[test]
    fn test_process_one_times_out_stalled_frame() {
        let mut bridge = bridge(Vec::new());

        // Partial frame stamped at the time origin; its deadline is already
        // behind the host clock or soon will be.
        for &b in &MOUSE_FRAME[..3] {
            block_on(bridge.process_byte(b, at(0)));
        }

        // The script is empty, so the read never completes and only the
        // deadline can end this call.
        assert_eq!(block_on(bridge.process_one()), Ok(()));
        assert_eq!(bridge.parser().stage(), ParserStage::AwaitingMagic);
        assert_eq!(bridge.stats().timeouts, 1);
    }

    #[test]
    fn test_into_parts() {
        let bridge = bridge(Vec::new());
        let (input, sink) = bridge.into_parts();
        assert!(input.reads.is_empty());
        assert!(sink.events.is_empty());
    }
}
