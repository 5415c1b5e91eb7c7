use std::{
    io::{self, BufRead, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Instant,
};

use autolang::{
    config::{self, Config, SignalTransport},
    notify::{DisabledSignal, ExternalSignal, TriggerFileSignal},
    runtime::{Event, EventLoop},
    store::{self, JsonFileStore, MemoryStore},
    util::tracing::init_tracing,
};

fn build_signal(cfg: &Config) -> Box<dyn ExternalSignal> {
    match cfg.signal {
        SignalTransport::TriggerFile => Box::new(TriggerFileSignal::new(
            cfg.trigger_dir(),
            cfg.trigger_cleanup_delay(),
        )),
        SignalTransport::Disabled => Box::new(DisabledSignal),
    }
}

fn open_store(cfg: &Config, home: &std::path::Path) -> store::SharedStore {
    match JsonFileStore::open(cfg.state_file_in(home)) {
        Ok(file) => store::shared(file),
        Err(e) => {
            tracing::warn!(error = %e, "state store unavailable, running in memory");
            store::shared(MemoryStore::new())
        }
    }
}

fn write_outputs(event_loop: &mut EventLoop, out: &mut impl Write) -> io::Result<()> {
    for output in event_loop.take_outputs() {
        serde_json::to_writer(&mut *out, &output).map_err(io::Error::other)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn main() -> io::Result<()> {
    let cfg = config::load()?;
    let home = config::home_dir()?;
    init_tracing(&cfg.log_dir_in(&home));

    let store = open_store(&cfg, &home);
    let signal = build_signal(&cfg);
    let mut event_loop = EventLoop::new(cfg, store, signal);
    event_loop.start();

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout().lock();
    loop {
        let received = match event_loop.next_deadline() {
            Some(deadline) => {
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => match serde_json::from_str::<Event>(&line) {
                Ok(event) => {
                    event_loop.dispatch(event, Instant::now());
                }
                Err(e) => tracing::warn!(error = %e, "ignoring malformed event"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        event_loop.advance(Instant::now());
        write_outputs(&mut event_loop, &mut stdout)?;
    }

    event_loop.shutdown();
    Ok(())
}
