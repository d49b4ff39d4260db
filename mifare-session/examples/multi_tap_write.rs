// Batch write surviving a transient fault across two simulated taps.
//
// Run with `RUST_LOG=debug cargo run --example multi_tap_write` to see the
// round-level logging.

use anyhow::Result;
use mifare_session::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let (reporter, events) = ChannelReporter::new();
    let driver = SessionDriver::new(reporter);

    let payload = BlockData::from_plain_text("hello from rust").to_hex();
    let ack = driver.prepare_write(
        vec![
            WriteSpec::new(1, 0, payload),
            WriteSpec::new(1, 3, "00".repeat(16)), // trailer: rejected up front
        ],
        "FFFFFFFFFFFF",
    )?;
    println!("{}", ack);

    // Stand-in for the physical card; the first write attempt fails once.
    let mut tag = MockTag::classic_1k(&[0xDE, 0xAD, 0xBE, 0xEF]);
    tag.fail_next_writes(4, 1);

    // The platform layer would call on_tag once per physical presentation.
    for tap in 1.. {
        driver.on_tag(&mut tag);
        match events.try_recv()? {
            Event::Progress {
                kind,
                total,
                completed,
            } => {
                println!("tap {}: {} progress {}/{}", tap, kind, completed, total);
            }
            Event::WriteComplete { records } => {
                for record in &records {
                    match &record.error {
                        None => println!(
                            "tap {}: wrote sector {} block {}",
                            tap, record.sector, record.block
                        ),
                        Some(err) => println!(
                            "tap {}: sector {} block {} rejected: {}",
                            tap, record.sector, record.block, err
                        ),
                    }
                }
                break;
            }
            other => println!("unexpected event: {:?}", other),
        }
    }

    Ok(())
}
