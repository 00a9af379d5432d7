//! Operator command interface
//!
//! Single-byte commands arrive on a [`CommandChannel`]. At most one byte is
//! consumed per tick and an empty channel returns immediately. Every byte
//! other than a line ending is acknowledged with `Command received: <c>`
//! before it is acted on.
//!
//! | Byte | Action |
//! |------|--------|
//! | `s`  | Status report: a `--- SYSTEM STATUS ---` banner, then one line per lane with its pending count |
//! | `h`  | List the known commands |
//! | `\r`, `\n` | Ignored (line endings from terminals) |
//! | other | Echoed back as unrecognized |

use core::fmt::Write;

use heapless::String;

use crate::signal::Controller;
use crate::traits::CommandChannel;

/// Capacity of one reply line
pub const REPLY_CAPACITY: usize = 48;

/// First line of a status report
pub const STATUS_BANNER: &str = "--- SYSTEM STATUS ---";

/// Decoded command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Status,
    Help,
    /// Line ending, silently dropped
    Ignored,
    Unrecognized(u8),
}

impl Command {
    pub fn parse(byte: u8) -> Self {
        match byte {
            b's' => Command::Status,
            b'h' => Command::Help,
            b'\r' | b'\n' => Command::Ignored,
            other => Command::Unrecognized(other),
        }
    }
}

/// Handle at most one pending command byte
///
/// Returns the command that was handled, or `None` if the channel was
/// empty.
pub fn service<O, I, K, const N: usize>(
    controller: &Controller<O, I, N>,
    channel: &mut K,
) -> Option<Command>
where
    K: CommandChannel,
{
    if !channel.available() {
        return None;
    }
    let byte = channel.read_byte()?;
    let command = Command::parse(byte);
    if command != Command::Ignored {
        reply(channel, "Command received", byte);
    }

    match command {
        Command::Status => status_report(controller, channel),
        Command::Help => {
            channel.write_line("s - lane status");
            channel.write_line("h - this help");
        }
        Command::Ignored => {}
        Command::Unrecognized(byte) => reply(channel, "Unrecognized command", byte),
    }

    Some(command)
}

/// Write `<prefix>: <byte>`, in hex when the byte is not printable
fn reply<K: CommandChannel>(channel: &mut K, prefix: &str, byte: u8) {
    let mut line: String<REPLY_CAPACITY> = String::new();
    if byte.is_ascii_graphic() {
        let _ = write!(line, "{}: {}", prefix, byte as char);
    } else {
        let _ = write!(line, "{}: 0x{:02x}", prefix, byte);
    }
    channel.write_line(&line);
}

/// Write the status banner, then one `Lane <id> count: <pending>` line per
/// lane
pub fn status_report<O, I, K, const N: usize>(controller: &Controller<O, I, N>, channel: &mut K)
where
    K: CommandChannel,
{
    channel.write_line(STATUS_BANNER);
    for lane in controller.lanes().iter() {
        let mut line: String<REPLY_CAPACITY> = String::new();
        let _ = write!(line, "Lane {} count: {}", lane.id(), lane.pending_count());
        channel.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::controller_at;
    use heapless::{Deque, Vec};

    #[derive(Default)]
    struct Console {
        rx: Deque<u8, 8>,
        lines: Vec<String<REPLY_CAPACITY>, 8>,
    }

    impl Console {
        fn push(&mut self, byte: u8) {
            self.rx.push_back(byte).expect("rx capacity");
        }
    }

    impl CommandChannel for Console {
        fn available(&self) -> bool {
            !self.rx.is_empty()
        }

        fn read_byte(&mut self) -> Option<u8> {
            self.rx.pop_front()
        }

        fn write_line(&mut self, line: &str) {
            let mut owned = String::new();
            owned.push_str(line).expect("line capacity");
            self.lines.push(owned).expect("line count");
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse(b's'), Command::Status);
        assert_eq!(Command::parse(b'h'), Command::Help);
        assert_eq!(Command::parse(b'\n'), Command::Ignored);
        assert_eq!(Command::parse(b'x'), Command::Unrecognized(b'x'));
    }

    #[test]
    fn test_empty_channel_returns_immediately() {
        let c = controller_at(0);
        let mut console = Console::default();
        assert_eq!(service(&c, &mut console), None);
        assert!(console.lines.is_empty());
    }

    #[test]
    fn test_status_reports_pending_counts() {
        let mut c = controller_at(0);
        for _ in 0..3 {
            c.record_arrival(0).expect("lane 0 exists");
        }
        let mut console = Console::default();
        console.push(b's');

        assert_eq!(service(&c, &mut console), Some(Command::Status));
        assert_eq!(console.lines.len(), 4);
        assert_eq!(console.lines[0].as_str(), "Command received: s");
        assert_eq!(console.lines[1].as_str(), STATUS_BANNER);
        assert_eq!(console.lines[2].as_str(), "Lane 0 count: 3");
        assert_eq!(console.lines[3].as_str(), "Lane 1 count: 0");
    }

    #[test]
    fn test_one_byte_per_call() {
        let c = controller_at(0);
        let mut console = Console::default();
        console.push(b's');
        console.push(b's');

        service(&c, &mut console);
        assert_eq!(console.lines.len(), 4);
        assert!(console.available());
    }

    #[test]
    fn test_unrecognized_is_echoed() {
        let c = controller_at(0);
        let mut console = Console::default();
        console.push(b'x');
        console.push(0x07);

        assert_eq!(service(&c, &mut console), Some(Command::Unrecognized(b'x')));
        assert_eq!(console.lines[0].as_str(), "Command received: x");
        assert_eq!(console.lines[1].as_str(), "Unrecognized command: x");

        service(&c, &mut console);
        assert_eq!(console.lines[2].as_str(), "Command received: 0x07");
        assert_eq!(console.lines[3].as_str(), "Unrecognized command: 0x07");
    }

    #[test]
    fn test_help_is_acknowledged() {
        let c = controller_at(0);
        let mut console = Console::default();
        console.push(b'h');

        assert_eq!(service(&c, &mut console), Some(Command::Help));
        assert_eq!(console.lines.len(), 3);
        assert_eq!(console.lines[0].as_str(), "Command received: h");
        assert_eq!(console.lines[1].as_str(), "s - lane status");
    }

    #[test]
    fn test_line_endings_are_silent() {
        let c = controller_at(0);
        let mut console = Console::default();
        console.push(b'\r');
        console.push(b'\n');

        assert_eq!(service(&c, &mut console), Some(Command::Ignored));
        assert_eq!(service(&c, &mut console), Some(Command::Ignored));
        assert!(console.lines.is_empty());
    }
}
