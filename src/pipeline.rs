use crossbeam_channel::{after, bounded, select, Receiver};
use rand::Rng;
use std::{thread, time::Duration};

/// Emit uniformly random integers in `0..1000` until `deadline` elapses.
///
/// The generator runs on its own thread and races each send against a
/// deadline channel; once the deadline fires the thread stops and the
/// returned receiver disconnects. Dropping the receiver early also stops
/// the generator.
pub fn generate(deadline: Duration) -> Receiver<i64> {
    let (tx, rx) = bounded(0);
    let cancel = after(deadline);
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        loop {
            let value = rng.gen_range(0..1000);
            select! {
                recv(cancel) -> _ => break,
                send(tx, value) -> sent => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Transform stage: forward the square of every input value.
///
/// Closes its output when the input disconnects.
pub fn square(input: Receiver<i64>) -> Receiver<i64> {
    let (tx, rx) = bounded(0);
    thread::spawn(move || {
        for value in input {
            if tx.send(value * value).is_err() {
                break;
            }
        }
    });
    rx
}
