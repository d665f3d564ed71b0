pub mod aggregate;
pub mod chart;
pub mod error;
pub mod parse;
pub mod plot;

pub use error::{Error, Result};

use log::{error, log_enabled, Level};
use std::io::Write;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Header of the connection statistics table, in column order.
pub const COLUMNS: [&str; 15] = [
    "label",
    "Throughput(kbps)",
    "EcnCapable",
    "RTT(us)",
    "SendTotalPackets",
    "SendSuspectedLostPackets",
    "SendSpuriousLostPackets",
    "SendCongestionCount",
    "SendEcnCongestionCount",
    "RecvTotalPackets",
    "RecvReorderedPackets",
    "RecvDroppedPackets",
    "RecvDuplicatePackets",
    "RecvDecryptionFailures",
    "RecvMaxCoalescedCount",
];

pub const LABEL_COLUMN: usize = 0;
pub const THROUGHPUT_COLUMN: usize = 1;
/// first column filled from the key=value pairs of a `[conn]` line
pub const FIRST_STAT_COLUMN: usize = 2;

pub const DEFAULT_STAT: &str = "Throughput(kbps)";

/// Reports the error that aborts a run: through the logger when it shows errors,
/// straight to `diag` otherwise, so the message is never swallowed by `RUST_LOG`.
pub fn report_fatal<W: Write>(err: &Error, diag: &mut W) {
    if log_enabled!(Level::Error) {
        error!("{}", err);
    } else {
        let _ = writeln!(diag, "error: {}", err);
    }
}
